use chrono::{DateTime, Utc};
use serde::Serialize;

/// In-process notification raised by a handler and dispatched after its unit of work commits
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum DomainEvent {
    TodoListCreated {
        list_id: i64,
        title: String,
    },
    TodoListDeleted {
        list_id: i64,
    },
    TodoItemCreated {
        item_id: i64,
        list_id: i64,
        title: String,
    },
    TodoItemCompleted {
        item_id: i64,
        list_id: i64,
        title: String,
        done_at: DateTime<Utc>,
        completed_by: String,
    },
    TodoItemDeleted {
        item_id: i64,
        list_id: i64,
    },
    UserRegistered {
        user_id: String,
        username: String,
        email: String,
    },
}

impl DomainEvent {
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::TodoListCreated { .. } => "todo_list_created",
            DomainEvent::TodoListDeleted { .. } => "todo_list_deleted",
            DomainEvent::TodoItemCreated { .. } => "todo_item_created",
            DomainEvent::TodoItemCompleted { .. } => "todo_item_completed",
            DomainEvent::TodoItemDeleted { .. } => "todo_item_deleted",
            DomainEvent::UserRegistered { .. } => "user_registered",
        }
    }
}
