//! Activity log file

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Local;
use tokio::{fs::OpenOptions, io::AsyncWriteExt};
use tracing::info;

use crate::domain::notifications::ActivityLog;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Activity log appending `[timestamp] message` lines to a file
#[derive(Clone, Debug)]
pub struct FileActivityLog {
    path: PathBuf,
}

impl FileActivityLog {
    /// Creates a log appending to the file at `path`, created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ActivityLog for FileActivityLog {
    async fn record(&self, message: &str) -> Result<()> {
        // one entry per line
        let message = message.replace(['\r', '\n'], " ");

        info!(target: "activity", "{message}");

        let line = format!("[{}] {message}\n", Local::now().format(TIMESTAMP_FORMAT));

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("failed to open {}", self.path.display()))?;

        file.write_all(line.as_bytes())
            .await
            .with_context(|| format!("failed to append to {}", self.path.display()))?;

        Ok(())
    }
}
