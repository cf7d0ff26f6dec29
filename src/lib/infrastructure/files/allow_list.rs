//! Allow-list file

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::notifications::AllowList;

/// Allow-list read from disk on every lookup, so edits apply without a restart
#[derive(Clone, Debug)]
pub struct FileAllowList {
    path: PathBuf,
}

impl FileAllowList {
    /// Creates an allow-list backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl AllowList for FileAllowList {
    async fn contains(&self, ip: &str) -> bool {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents
                .lines()
                .filter(|line| !line.is_empty())
                .any(|line| line == ip),
            Err(err) => {
                warn!("could not read allow-list {}: {err}", self.path.display());
                false
            }
        }
    }
}
