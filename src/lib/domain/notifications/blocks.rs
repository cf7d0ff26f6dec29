//! Dynamic content blocks injected after the body template

use askama::Template;

use super::{Language, SendRequest};

#[derive(Debug, Template)]
#[template(
    source = "{% for line in lines %}{{ line }}<br>{% endfor %}",
    ext = "html",
    escape = "none"
)]
struct PayloadTemplate<'a> {
    lines: &'a [&'a str],
}

#[derive(Debug, Template)]
#[template(source = "<p>{{ text }}</p>", ext = "html", escape = "none")]
struct ErrorTemplate<'a> {
    text: &'a str,
}

#[derive(Debug, Template)]
#[template(
    source = "<p>{{ heading }}</p><ul>{% for item in items %}<li>{{ item }}</li>{% endfor %}</ul>",
    ext = "html",
    escape = "none"
)]
struct BackupListTemplate<'a> {
    heading: &'a str,
    items: &'a [&'a str],
}

/// The one variable section of a notification body
#[derive(Debug, PartialEq, Eq)]
pub enum DynamicBlock<'a> {
    /// Free-text payload lines
    Payload(Vec<&'a str>),

    /// Error text of the `error` template
    Error(&'a str),

    /// Localised list of backups
    BackupList {
        /// Language of the heading
        language: Language,
        /// Backup descriptors in request order
        items: Vec<&'a str>,
    },

    /// No dynamic content
    Empty,
}

impl<'a> DynamicBlock<'a> {
    /// Picks the block for `request`: payload first, then error text for the
    /// `error` template, then the backup list if one was given.
    pub fn select(request: &'a SendRequest) -> Self {
        if !request.payload().is_empty() {
            Self::Payload(request.payload().split(':').collect())
        } else if request.template().is_error() {
            Self::Error(request.error_text())
        } else if request.backup_list().is_empty() {
            Self::Empty
        } else {
            Self::BackupList {
                language: request.language(),
                items: request.backup_list().split(':').collect(),
            }
        }
    }

    /// Renders the block as HTML. Request text is inserted as given.
    pub fn render(&self) -> Result<String, askama::Error> {
        match self {
            Self::Payload(lines) => PayloadTemplate { lines }.render(),
            Self::Error(text) => ErrorTemplate { text }.render(),
            Self::BackupList { language, items } => {
                let list = BackupListTemplate {
                    heading: language.backup_list_heading(),
                    items,
                }
                .render()?;

                Ok(format!("{list}\n"))
            }
            Self::Empty => Ok(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::domain::notifications::{
        request::tests::params, tests::MockAllowList, SendParams,
    };

    async fn request(raw: SendParams) -> SendRequest {
        let mut allow_list = MockAllowList::new();
        allow_list.expect_contains().returning(|_| true);

        SendRequest::validate(raw, "10.0.0.1", &allow_list)
            .await
            .expect("valid request")
    }

    #[tokio::test]
    async fn test_payload_wins_over_backup_list() -> TestResult {
        let mut raw = params("web1", "backup_ok", "ops@example.com");
        raw.payload = Some("line one:line two".to_string());
        raw.backup_list = Some("db1:db2".to_string());
        let request = request(raw).await;

        let block = DynamicBlock::select(&request);

        assert_eq!(block, DynamicBlock::Payload(vec!["line one", "line two"]));
        assert_eq!(block.render()?, "line one<br>line two<br>");

        Ok(())
    }

    #[tokio::test]
    async fn test_error_template_renders_error_text() -> TestResult {
        let mut raw = params("web1", "error", "ops@example.com");
        raw.error_text = Some("disk full".to_string());
        raw.backup_list = Some("db1".to_string());
        let request = request(raw).await;

        let block = DynamicBlock::select(&request);

        assert_eq!(block, DynamicBlock::Error("disk full"));
        assert_eq!(block.render()?, "<p>disk full</p>");

        Ok(())
    }

    #[tokio::test]
    async fn test_backup_list_in_ukrainian() -> TestResult {
        let mut raw = params("web1", "backup_ok", "ops@example.com");
        raw.backup_list = Some("db1:db2".to_string());
        let request = request(raw).await;

        let rendered = DynamicBlock::select(&request).render()?;

        assert_eq!(
            rendered,
            "<p>Список локальних бекапів:</p><ul><li>db1</li><li>db2</li></ul>\n"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_backup_list_in_english() -> TestResult {
        let mut raw = params("web1", "backup_ok", "ops@example.com");
        raw.backup_list = Some("db1".to_string());
        raw.language = Some("EN".to_string());
        let request = request(raw).await;

        let rendered = DynamicBlock::select(&request).render()?;

        assert!(rendered.starts_with("<p>List of your current local backup:</p>"));

        Ok(())
    }

    #[tokio::test]
    async fn test_no_block_without_payload_error_or_list() -> TestResult {
        let request = request(params("web1", "backup_ok", "ops@example.com")).await;

        let block = DynamicBlock::select(&request);

        assert_eq!(block, DynamicBlock::Empty);
        assert_eq!(block.render()?, "");

        Ok(())
    }

    #[tokio::test]
    async fn test_request_text_is_inserted_verbatim() -> TestResult {
        let mut raw = params("web1", "backup_ok", "ops@example.com");
        raw.payload = Some("a&b <b>x</b>:it's \"done\"".to_string());
        let request = request(raw).await;

        let rendered = DynamicBlock::select(&request).render()?;

        assert_eq!(rendered, "a&b <b>x</b><br>it's \"done\"<br>");

        Ok(())
    }

    #[tokio::test]
    async fn test_backup_items_are_inserted_verbatim() -> TestResult {
        let mut raw = params("web1", "backup_ok", "ops@example.com");
        raw.backup_list = Some("R&D/db1".to_string());
        raw.language = Some("EN".to_string());
        let request = request(raw).await;

        let rendered = DynamicBlock::select(&request).render()?;

        assert!(rendered.contains("<li>R&D/db1</li>"));

        Ok(())
    }
}
