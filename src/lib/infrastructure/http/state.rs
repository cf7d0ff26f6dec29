//! Application state module

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};

use crate::domain::notifications::NotificationService;

/// Global application state
#[derive(Clone)]
pub struct AppState<N: NotificationService> {
    /// The time the server started
    pub start_time: DateTime<Utc>,

    /// Notification service
    pub notifications: Arc<N>,
}

impl<N> AppState<N>
where
    N: NotificationService,
{
    /// Create a new application state
    pub fn new(notifications: N) -> Self {
        Self {
            start_time: Utc::now(),
            notifications: Arc::new(notifications),
        }
    }
}

impl<N> fmt::Debug for AppState<N>
where
    N: NotificationService,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("start_time", &self.start_time)
            .field("notifications", &"NotificationService")
            .finish()
    }
}
