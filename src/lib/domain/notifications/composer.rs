//! Template composition

use std::sync::Arc;

use tracing::warn;

use super::{render, DynamicBlock, Placeholders, SendMailError, SendRequest, TemplateStore};

/// A rendered notification, ready for relay
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComposedMessage {
    /// Subject line
    pub subject: String,

    /// HTML body
    pub html_body: String,
}

/// Builds notification mails from a [`TemplateStore`]
#[derive(Debug, Clone)]
pub struct TemplateComposer<T>
where
    T: TemplateStore,
{
    store: Arc<T>,
}

impl<T> TemplateComposer<T>
where
    T: TemplateStore,
{
    /// Creates a new composer.
    pub fn new(store: Arc<T>) -> Self {
        Self { store }
    }

    /// Composes the subject and body for `request`.
    ///
    /// The body is the shared top fragment, the body template, the request's
    /// [`DynamicBlock`] and the shared bottom fragment, in that order. The
    /// hostname token is substituted across the whole assembled body.
    pub async fn compose(&self, request: &SendRequest) -> Result<ComposedMessage, SendMailError> {
        let lang = request.language().code();
        let body_name = format!("{}_{lang}.html", request.template());
        let subject_name = format!("{}_{lang}_sub", request.template());

        let (Some(body), Some(subject)) = (
            self.store.read(&body_name).await?,
            self.store.read(&subject_name).await?,
        ) else {
            return Err(SendMailError::TemplateNotFound {
                body: self.store.locate(&body_name),
                subject: self.store.locate(&subject_name),
            });
        };

        let top = self.fragment(&format!("main_top_{lang}.html")).await?;
        let bottom = self.fragment(&format!("main_bottom_{lang}.html")).await?;

        let placeholders = Placeholders::hostname(request.server(), request.caller_ip());
        let block = DynamicBlock::select(request).render()?;

        let html_body = render(&[top, body, block, bottom].concat(), &placeholders);

        Ok(ComposedMessage {
            subject: subject.trim().to_string(),
            html_body,
        })
    }

    async fn fragment(&self, name: &str) -> Result<String, SendMailError> {
        match self.store.read(name).await? {
            Some(contents) => Ok(contents),
            None => {
                warn!("shared fragment {} is missing", self.store.locate(name));
                Ok(String::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::domain::notifications::{
        request::tests::params,
        tests::{MemoryTemplateStore, MockAllowList},
        SendParams, HOSTNAME_TOKEN,
    };

    fn store() -> MemoryTemplateStore {
        MemoryTemplateStore::default()
            .with("main_top_EN.html", "<html><!-- HOSTNAMEREPLACE -->")
            .with("main_bottom_EN.html", "</html>")
            .with("main_top_UA.html", "<html>")
            .with("main_bottom_UA.html", "</html>")
            .with("backup_ok_EN.html", "<h1>Backup done on HOSTNAMEREPLACE</h1>")
            .with("backup_ok_EN_sub", "Backup completed\n")
            .with("backup_ok_UA.html", "<h1>HOSTNAMEREPLACE</h1>")
            .with("backup_ok_UA_sub", "Бекап виконано\n")
            .with("error_EN.html", "<h1>Error on HOSTNAMEREPLACE</h1>")
            .with("error_EN_sub", "Error")
    }

    async fn request(raw: SendParams) -> SendRequest {
        let mut allow_list = MockAllowList::new();
        allow_list.expect_contains().returning(|_| true);

        SendRequest::validate(raw, "10.0.0.1", &allow_list)
            .await
            .expect("valid request")
    }

    #[tokio::test]
    async fn test_compose_without_dynamic_block() -> TestResult {
        let mut raw = params("web1", "backup_ok", "ops@example.com");
        raw.language = Some("EN".to_string());

        let message = TemplateComposer::new(Arc::new(store()))
            .compose(&request(raw).await)
            .await?;

        assert_eq!(message.subject, "Backup completed");
        assert_eq!(
            message.html_body,
            "<html><!-- web1 [10.0.0.1] --><h1>Backup done on web1 [10.0.0.1]</h1></html>"
        );
        assert!(!message.html_body.contains(HOSTNAME_TOKEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_compose_error_template() -> TestResult {
        let mut raw = params("web1", "error", "ops@example.com");
        raw.language = Some("EN".to_string());
        raw.error_text = Some("disk full".to_string());

        let message = TemplateComposer::new(Arc::new(store()))
            .compose(&request(raw).await)
            .await?;

        assert!(message.html_body.contains("<p>disk full</p>"));
        assert!(!message.html_body.contains("<ul>"));

        Ok(())
    }

    #[tokio::test]
    async fn test_compose_ukrainian_backup_list() -> TestResult {
        let mut raw = params("web1", "backup_ok", "ops@example.com");
        raw.backup_list = Some("db1:db2".to_string());

        let message = TemplateComposer::new(Arc::new(store()))
            .compose(&request(raw).await)
            .await?;

        assert_eq!(message.subject, "Бекап виконано");
        assert_eq!(
            message.html_body,
            "<html><h1>web1 [10.0.0.1]</h1><p>Список локальних бекапів:</p><ul><li>db1</li><li>db2</li></ul>\n</html>"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_hostname_token_in_payload_is_substituted() -> TestResult {
        let mut raw = params("web1", "backup_ok", "ops@example.com");
        raw.language = Some("EN".to_string());
        raw.payload = Some("job on HOSTNAMEREPLACE:done".to_string());

        let message = TemplateComposer::new(Arc::new(store()))
            .compose(&request(raw).await)
            .await?;

        assert!(!message.html_body.contains(HOSTNAME_TOKEN));
        assert!(message.html_body.contains("job on web1 [10.0.0.1]<br>done<br>"));

        Ok(())
    }

    #[tokio::test]
    async fn test_hostname_token_in_error_text_is_substituted() -> TestResult {
        let mut raw = params("web1", "error", "ops@example.com");
        raw.language = Some("EN".to_string());
        raw.error_text = Some("HOSTNAMEREPLACE: disk full".to_string());

        let message = TemplateComposer::new(Arc::new(store()))
            .compose(&request(raw).await)
            .await?;

        assert!(message.html_body.contains("<p>web1 [10.0.0.1]: disk full</p>"));

        Ok(())
    }

    #[tokio::test]
    async fn test_compose_is_deterministic() -> TestResult {
        let mut raw = params("web1", "backup_ok", "ops@example.com");
        raw.payload = Some("a:b".to_string());
        let request = request(raw).await;
        let composer = TemplateComposer::new(Arc::new(store()));

        assert_eq!(composer.compose(&request).await?, composer.compose(&request).await?);

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_subject_file_is_template_not_found() {
        let store = MemoryTemplateStore::default().with("weekly_UA.html", "<p>weekly</p>");
        let request = request(params("web1", "weekly", "ops@example.com")).await;

        let result = TemplateComposer::new(Arc::new(store)).compose(&request).await;

        assert!(matches!(
            result,
            Err(SendMailError::TemplateNotFound { body, subject })
                if body == "templates/weekly_UA.html" && subject == "templates/weekly_UA_sub"
        ));
    }

    #[tokio::test]
    async fn test_missing_shared_fragments_are_empty() -> TestResult {
        let store = MemoryTemplateStore::default()
            .with("weekly_UA.html", "<p>HOSTNAMEREPLACE</p>")
            .with("weekly_UA_sub", "Weekly");
        let request = request(params("web1", "weekly", "ops@example.com")).await;

        let message = TemplateComposer::new(Arc::new(store)).compose(&request).await?;

        assert_eq!(message.html_body, "<p>web1 [10.0.0.1]</p>");

        Ok(())
    }
}
