//! Template directory

use std::{io::ErrorKind, path::PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::domain::notifications::TemplateStore;

/// Templates read from a directory on every request
#[derive(Clone, Debug)]
pub struct FileTemplateStore {
    dir: PathBuf,
}

impl FileTemplateStore {
    /// Creates a store reading from `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl TemplateStore for FileTemplateStore {
    fn locate(&self, name: &str) -> String {
        self.dir.join(name).display().to_string()
    }

    async fn read(&self, name: &str) -> Result<Option<String>> {
        let path = self.dir.join(name);

        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("failed to read {}", path.display())),
        }
    }
}
