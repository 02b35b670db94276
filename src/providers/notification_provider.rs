use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationResult {
    Success,
    Error(String),
}

/// Outbound notifications (mail, push, ...)
#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn send(&self, notification: Notification) -> NotificationResult;
}

/// Writes notifications to the application log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotificationService;

#[async_trait]
impl NotificationService for LogNotificationService {
    async fn send(&self, notification: Notification) -> NotificationResult {
        if notification.recipient.trim().is_empty() {
            return NotificationResult::Error("notification has no recipient".to_string());
        }

        tracing::info!(
            recipient = %notification.recipient,
            subject = %notification.subject,
            "Notification sent: {}",
            notification.body
        );
        NotificationResult::Success
    }
}
