//! Notification mails: request validation, template composition and relay.

mod activity_log;
mod allow_list;
mod blocks;
mod composer;
mod errors;
mod request;
mod service;
mod templates;

pub use activity_log::ActivityLog;
pub use allow_list::AllowList;
pub use blocks::DynamicBlock;
pub use composer::{ComposedMessage, TemplateComposer};
pub use errors::SendMailError;
pub use request::{Language, SendParams, SendRequest, TemplateId};
pub use service::{NotificationService, NotificationServiceImpl};
pub use templates::{render, Placeholders, TemplateStore, HOSTNAME_TOKEN};
