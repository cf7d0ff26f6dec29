//! Template sources and placeholder rendering

use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;

/// Token in template files replaced by `"{server} [{caller_ip}]"`
pub const HOSTNAME_TOKEN: &str = "HOSTNAMEREPLACE";

/// Source of named template files
#[async_trait]
pub trait TemplateStore: Clone + Send + Sync + 'static {
    /// Human-readable location of the template called `name`
    fn locate(&self, name: &str) -> String;

    /// Reads the template called `name`.
    ///
    /// # Returns
    /// - [`Ok`] with [`None`] if no such template exists.
    /// - [`Err`] if it exists but could not be read.
    async fn read(&self, name: &str) -> Result<Option<String>>;
}

/// Named placeholder tokens and the values that replace them
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Placeholders(BTreeMap<String, String>);

impl Placeholders {
    /// An empty placeholder map
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a token. Empty tokens are ignored.
    pub fn with(mut self, token: &str, value: impl Into<String>) -> Self {
        if !token.is_empty() {
            self.0.insert(token.to_string(), value.into());
        }
        self
    }

    /// Placeholders for the reporting host
    pub fn hostname(server: &str, caller_ip: &str) -> Self {
        Self::new().with(HOSTNAME_TOKEN, format!("{server} [{caller_ip}]"))
    }
}

/// Replaces every placeholder token in `source` in a single left-to-right
/// pass. Replacement values are never scanned for tokens. Where two tokens
/// start at the same position the longer one wins.
pub fn render(source: &str, placeholders: &Placeholders) -> String {
    let mut rendered = String::with_capacity(source.len());
    let mut rest = source;

    while let Some((at, token, value)) = placeholders
        .0
        .iter()
        .filter_map(|(token, value)| rest.find(token.as_str()).map(|at| (at, token, value)))
        .min_by(|a, b| a.0.cmp(&b.0).then(b.1.len().cmp(&a.1.len())))
    {
        rendered.push_str(&rest[..at]);
        rendered.push_str(value);
        rest = &rest[at + token.len()..];
    }

    rendered.push_str(rest);
    rendered
}

#[cfg(test)]
pub mod tests {
    use std::collections::HashMap;

    use super::*;

    /// Template store backed by a map
    #[derive(Clone, Debug, Default)]
    pub struct MemoryTemplateStore(HashMap<String, String>);

    impl MemoryTemplateStore {
        pub fn with(mut self, name: &str, contents: &str) -> Self {
            self.0.insert(name.to_string(), contents.to_string());
            self
        }
    }

    #[async_trait]
    impl TemplateStore for MemoryTemplateStore {
        fn locate(&self, name: &str) -> String {
            format!("templates/{name}")
        }

        async fn read(&self, name: &str) -> Result<Option<String>> {
            Ok(self.0.get(name).cloned())
        }
    }

    #[test]
    fn test_render_replaces_every_hostname_token() {
        let rendered = render(
            "<h1>HOSTNAMEREPLACE</h1><p>Report for HOSTNAMEREPLACE</p>",
            &Placeholders::hostname("web1", "10.0.0.1"),
        );

        assert_eq!(
            rendered,
            "<h1>web1 [10.0.0.1]</h1><p>Report for web1 [10.0.0.1]</p>"
        );
        assert!(!rendered.contains(HOSTNAME_TOKEN));
    }

    #[test]
    fn test_render_does_not_rescan_replacement_values() {
        let placeholders = Placeholders::new()
            .with("{a}", "{b}")
            .with("{b}", "bee");

        assert_eq!(render("{a} {b}", &placeholders), "{b} bee");
    }

    #[test]
    fn test_render_prefers_longer_token_at_same_position() {
        let placeholders = Placeholders::new()
            .with("HOST", "short")
            .with(HOSTNAME_TOKEN, "long");

        assert_eq!(render("HOSTNAMEREPLACE HOST", &placeholders), "long short");
    }

    #[test]
    fn test_render_without_placeholders_is_identity() {
        assert_eq!(render("plain <b>text</b>", &Placeholders::new()), "plain <b>text</b>");
    }

    #[test]
    fn test_empty_tokens_are_ignored() {
        let placeholders = Placeholders::new().with("", "never");

        assert_eq!(render("abc", &placeholders), "abc");
    }
}
