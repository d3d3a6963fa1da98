//! Outbound account notifications
//!
//! Delivery is pluggable. The bundled [`LogMailer`] only records the
//! message, which is enough for development and tests.

use axum::async_trait;
use std::sync::Mutex;

use crate::error::ApiError;

/// Kinds of account notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    ConfirmRegistration,
    ConfirmEmail,
    ResetPassword,
}

impl NotificationKind {
    pub fn subject(&self) -> &'static str {
        match self {
            NotificationKind::ConfirmRegistration => "Confirm your account",
            NotificationKind::ConfirmEmail => "Confirm your new email address",
            NotificationKind::ResetPassword => "Reset your password",
        }
    }
}

/// A message carrying a single action link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub to: String,
    pub link: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, notification: Notification) -> Result<(), ApiError>;
}

/// Writes notifications to the log instead of delivering them
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, notification: Notification) -> Result<(), ApiError> {
        tracing::info!(
            to = %notification.to,
            subject = notification.kind.subject(),
            link = %notification.link,
            "Notification queued"
        );
        Ok(())
    }
}

/// Keeps every notification in memory
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, notification: Notification) -> Result<(), ApiError> {
        self.sent
            .lock()
            .map_err(|_| ApiError::InternalError("mailer state poisoned".to_string()))?
            .push(notification);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_mailer_keeps_messages() {
        let mailer = RecordingMailer::default();
        mailer
            .send(Notification {
                kind: NotificationKind::ResetPassword,
                to: "lifter@example.com".to_string(),
                link: "http://localhost/password-reset/abc".to_string(),
            })
            .await
            .unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind.subject(), "Reset your password");
    }

    #[tokio::test]
    async fn test_log_mailer_accepts_messages() {
        let result = LogMailer
            .send(Notification {
                kind: NotificationKind::ConfirmEmail,
                to: "lifter@example.com".to_string(),
                link: "http://localhost/confirm-email?token=abc".to_string(),
            })
            .await;
        assert!(result.is_ok());
    }
}
