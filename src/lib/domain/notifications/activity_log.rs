//! Activity log port

use anyhow::Result;
use async_trait::async_trait;

/// Append-only record of every send attempt and its outcome
#[async_trait]
pub trait ActivityLog: Clone + Send + Sync + 'static {
    /// Appends `message` as a single timestamped entry
    async fn record(&self, message: &str) -> Result<()>;
}
