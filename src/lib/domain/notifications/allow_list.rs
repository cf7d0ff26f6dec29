//! Caller allow-list port

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

/// Static set of caller addresses permitted to send mail
#[async_trait]
pub trait AllowList: Clone + Send + Sync + 'static {
    /// Whether `ip` is on the list.
    ///
    /// Comparison is by exact string equality; no address normalisation is
    /// applied. An unreadable list contains nothing.
    async fn contains(&self, ip: &str) -> bool;
}

#[cfg(test)]
mock! {
    pub AllowList {}

    impl Clone for AllowList {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl AllowList for AllowList {
        async fn contains(&self, ip: &str) -> bool;
    }
}
