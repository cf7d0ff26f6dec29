//! Notification service

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

#[cfg(test)]
use mockall::mock;

use crate::domain::communication::mailer::{Mailer, Message};

use super::{
    ActivityLog, AllowList, SendMailError, SendParams, SendRequest, TemplateComposer,
    TemplateStore,
};

/// Notification service
#[async_trait]
pub trait NotificationService: Clone + Send + Sync + 'static {
    /// Validates a send request, composes the notification and relays it.
    ///
    /// # Arguments
    /// * `params` - The raw request parameters.
    /// * `caller_ip` - The address the request came from.
    ///
    /// # Returns
    /// A [`Result`] which is [`Ok`] once the mail backend accepted the message,
    /// or an [`Err`] containing the [`SendMailError`] that stopped the request.
    /// Every outcome is written to the activity log.
    async fn send_notification(
        &self,
        params: SendParams,
        caller_ip: &str,
    ) -> Result<(), SendMailError>;
}

#[cfg(test)]
mock! {
    pub NotificationService {}

    impl Clone for NotificationService {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl NotificationService for NotificationService {
        async fn send_notification(&self, params: SendParams, caller_ip: &str) -> Result<(), SendMailError>;
    }
}

/// Notification service implementation
#[derive(Debug, Clone)]
pub struct NotificationServiceImpl<M, L, A, T>
where
    M: Mailer,
    L: ActivityLog,
    A: AllowList,
    T: TemplateStore,
{
    mailer: Arc<M>,
    log: Arc<L>,
    allow_list: Arc<A>,
    composer: TemplateComposer<T>,
}

impl<M, L, A, T> NotificationServiceImpl<M, L, A, T>
where
    M: Mailer,
    L: ActivityLog,
    A: AllowList,
    T: TemplateStore,
{
    /// Creates a new notification service.
    pub fn new(mailer: Arc<M>, log: Arc<L>, allow_list: Arc<A>, templates: Arc<T>) -> Self {
        Self {
            mailer,
            log,
            allow_list,
            composer: TemplateComposer::new(templates),
        }
    }

    async fn record(&self, message: &str) {
        if let Err(err) = self.log.record(message).await {
            warn!("could not write activity log entry: {err:#}");
        }
    }

    async fn deliver(&self, params: SendParams, caller_ip: &str) -> Result<(), SendMailError> {
        let request = SendRequest::validate(params, caller_ip, self.allow_list.as_ref()).await?;

        self.record(&format!("Temp: {}", request.template())).await;

        let composed = self.composer.compose(&request).await?;

        self.record(&format!("Trying send mail to {}", request.recipient()))
            .await;

        let message = Message {
            to: request.recipient().to_string(),
            subject: composed.subject,
            html_body: composed.html_body,
        };

        self.mailer.send_email(&message).await?;

        info!(to = %message.to, template = %request.template(), "notification sent");

        self.record(&format!(
            "Mail has been send to {} Subject: {} Template: {}",
            message.to,
            message.subject,
            request.template()
        ))
        .await;

        Ok(())
    }
}

#[async_trait]
impl<M, L, A, T> NotificationService for NotificationServiceImpl<M, L, A, T>
where
    M: Mailer,
    L: ActivityLog,
    A: AllowList,
    T: TemplateStore,
{
    async fn send_notification(
        &self,
        params: SendParams,
        caller_ip: &str,
    ) -> Result<(), SendMailError> {
        let result = self.deliver(params, caller_ip).await;

        if let Err(err) = &result {
            warn!(caller_ip, "notification rejected: {err}");
            self.record(&err.log_message()).await;
        }

        result
    }
}
