//! User accounts

pub mod mailer;
pub mod model;
mod service;

pub use mailer::{LogMailer, Mailer, Notification, NotificationKind, RecordingMailer};
pub use model::*;
pub use service::UserService;
