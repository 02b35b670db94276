use chrono::{DateTime, Utc};

use crate::types::db::todo_item::{self, PriorityLevel};
use crate::types::db::todo_list;

use super::colour::Colour;
use super::pagination::PageRequest;

// Commands

#[derive(Debug, Clone)]
pub struct CreateTodoList {
    pub title: String,
    pub colour: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateTodoList {
    pub id: i64,
    pub title: String,
    pub colour: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteTodoList {
    pub id: i64,
}

#[derive(Debug, Clone)]
pub struct CreateTodoItem {
    pub list_id: i64,
    pub title: String,
}

#[derive(Debug, Clone)]
pub struct UpdateTodoItem {
    pub id: i64,
    pub title: String,
    pub done: bool,
}

#[derive(Debug, Clone)]
pub struct UpdateTodoItemDetail {
    pub id: i64,
    pub list_id: i64,
    pub priority: PriorityLevel,
    pub note: Option<String>,
    pub reminder: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy)]
pub struct CompleteTodoItem {
    pub id: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteTodoItem {
    pub id: i64,
}

// Queries

#[derive(Debug, Clone, Copy)]
pub struct GetTodoItemsWithPagination {
    pub list_id: i64,
    /// 1-based
    pub page_number: u64,
    pub page_size: u64,
}

impl GetTodoItemsWithPagination {
    pub fn page(&self) -> PageRequest {
        PageRequest::new(Some(self.page_number), Some(self.page_size))
    }
}

// Views

#[derive(Debug, Clone, PartialEq)]
pub struct TodoItemView {
    pub id: i64,
    pub list_id: i64,
    pub title: String,
    pub note: Option<String>,
    pub priority: PriorityLevel,
    pub reminder: Option<DateTime<Utc>>,
    pub done: bool,
    pub done_at: Option<DateTime<Utc>>,
}

impl From<todo_item::Model> for TodoItemView {
    fn from(model: todo_item::Model) -> Self {
        Self {
            id: model.id,
            list_id: model.list_id,
            title: model.title,
            note: model.note,
            priority: model.priority,
            reminder: model.reminder,
            done: model.done,
            done_at: model.done_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TodoListView {
    pub id: i64,
    pub title: String,
    pub colour: String,
    pub items: Vec<TodoItemView>,
}

impl TodoListView {
    pub fn from_model(list: todo_list::Model, items: Vec<todo_item::Model>) -> Self {
        Self {
            id: list.id,
            title: list.title,
            colour: list.colour,
            items: items.into_iter().map(TodoItemView::from).collect(),
        }
    }
}

/// Everything the todo screen needs in one read
#[derive(Debug, Clone, PartialEq)]
pub struct TodosView {
    pub priority_levels: Vec<PriorityLevel>,
    pub colours: Vec<Colour>,
    pub lists: Vec<TodoListView>,
}
