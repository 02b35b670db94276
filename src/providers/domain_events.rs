use std::sync::Arc;

use async_trait::async_trait;

use crate::types::internal::DomainEvent;

use super::notification_provider::{Notification, NotificationResult, NotificationService};

/// Reacts to a committed domain event; failures stay inside the handler
#[async_trait]
pub trait DomainEventHandler: Send + Sync {
    async fn handle(&self, event: &DomainEvent);
}

/// Fans committed events out to every registered handler, in registration order
#[derive(Clone, Default)]
pub struct DomainEventDispatcher {
    handlers: Vec<Arc<dyn DomainEventHandler>>,
}

impl DomainEventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handler(mut self, handler: Arc<dyn DomainEventHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Logging plus notification on todo item completion
    pub fn standard(notifications: Arc<dyn NotificationService>) -> Self {
        Self::new()
            .with_handler(Arc::new(LoggingEventHandler))
            .with_handler(Arc::new(CompletionNotifier::new(notifications)))
    }

    pub async fn dispatch(&self, events: Vec<DomainEvent>) {
        for event in &events {
            for handler in &self.handlers {
                handler.handle(event).await;
            }
        }
    }
}

pub struct LoggingEventHandler;

#[async_trait]
impl DomainEventHandler for LoggingEventHandler {
    async fn handle(&self, event: &DomainEvent) {
        match serde_json::to_string(event) {
            Ok(payload) => tracing::info!(event = event.name(), "Domain event: {}", payload),
            Err(e) => tracing::warn!(event = event.name(), "Domain event could not be serialized: {}", e),
        }
    }
}

/// Tells the user who completed a todo item
pub struct CompletionNotifier {
    notifications: Arc<dyn NotificationService>,
}

impl CompletionNotifier {
    pub fn new(notifications: Arc<dyn NotificationService>) -> Self {
        Self { notifications }
    }
}

#[async_trait]
impl DomainEventHandler for CompletionNotifier {
    async fn handle(&self, event: &DomainEvent) {
        let DomainEvent::TodoItemCompleted {
            item_id,
            title,
            done_at,
            completed_by,
            ..
        } = event
        else {
            return;
        };

        let notification = Notification {
            recipient: completed_by.clone(),
            subject: "Todo item completed".to_string(),
            body: format!("\"{}\" (#{}) was completed at {}", title, item_id, done_at.to_rfc3339()),
        };

        if let NotificationResult::Error(reason) = self.notifications.send(notification).await {
            tracing::warn!("Completion notification for item {} failed: {}", item_id, reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifications {
        sent: Mutex<Vec<Notification>>,
    }

    #[async_trait]
    impl NotificationService for RecordingNotifications {
        async fn send(&self, notification: Notification) -> NotificationResult {
            self.sent.lock().unwrap().push(notification);
            NotificationResult::Success
        }
    }

    #[tokio::test]
    async fn test_only_completion_sends_a_notification() {
        let notifications = Arc::new(RecordingNotifications::default());
        let dispatcher = DomainEventDispatcher::standard(notifications.clone());

        dispatcher
            .dispatch(vec![
                DomainEvent::TodoListCreated {
                    list_id: 1,
                    title: "Spring drop".to_string(),
                },
                DomainEvent::TodoItemCompleted {
                    item_id: 7,
                    list_id: 1,
                    title: "Shoot lookbook".to_string(),
                    done_at: Utc::now(),
                    completed_by: "user-1".to_string(),
                },
            ])
            .await;

        let sent = notifications.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient, "user-1");
        assert!(sent[0].body.contains("Shoot lookbook"));
    }
}
