use chrono::{DateTime, Utc};
use poem_openapi::payload::Json;
use poem_openapi::{ApiResponse, Enum, Object};
use serde::{Deserialize, Serialize};

use crate::types::db::todo_item::PriorityLevel;
use crate::types::internal::todo::{TodoItemView, TodoListView, TodosView};
use crate::types::internal::{Colour, PaginatedList};

#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[oai(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PriorityLevelDto {
    None,
    Low,
    Medium,
    High,
}

impl From<PriorityLevel> for PriorityLevelDto {
    fn from(level: PriorityLevel) -> Self {
        match level {
            PriorityLevel::None => PriorityLevelDto::None,
            PriorityLevel::Low => PriorityLevelDto::Low,
            PriorityLevel::Medium => PriorityLevelDto::Medium,
            PriorityLevel::High => PriorityLevelDto::High,
        }
    }
}

impl From<PriorityLevelDto> for PriorityLevel {
    fn from(level: PriorityLevelDto) -> Self {
        match level {
            PriorityLevelDto::None => PriorityLevel::None,
            PriorityLevelDto::Low => PriorityLevel::Low,
            PriorityLevelDto::Medium => PriorityLevel::Medium,
            PriorityLevelDto::High => PriorityLevel::High,
        }
    }
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreateTodoListRequest {
    pub title: String,
    /// Hex code from the supported palette; white when omitted
    pub colour: Option<String>,
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UpdateTodoListRequest {
    pub title: String,
    pub colour: Option<String>,
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreateTodoItemRequest {
    pub list_id: i64,
    pub title: String,
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UpdateTodoItemRequest {
    pub title: String,
    pub done: bool,
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UpdateTodoItemDetailRequest {
    /// List the item belongs to; may move the item
    pub list_id: i64,
    pub priority: PriorityLevelDto,
    pub note: Option<String>,
    pub reminder: Option<DateTime<Utc>>,
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreatedTodoResponse {
    pub id: i64,
}

/// API response for endpoints creating a list or an item
#[derive(ApiResponse, Debug)]
pub enum CreatedTodoApiResponse {
    /// Created; the body carries the new id
    #[oai(status = 201)]
    Created(Json<CreatedTodoResponse>),
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct TodoItemResponse {
    pub id: i64,
    pub list_id: i64,
    pub title: String,
    pub note: Option<String>,
    pub priority: PriorityLevelDto,
    pub reminder: Option<DateTime<Utc>>,
    pub done: bool,
    pub done_at: Option<DateTime<Utc>>,
}

impl From<TodoItemView> for TodoItemResponse {
    fn from(view: TodoItemView) -> Self {
        Self {
            id: view.id,
            list_id: view.list_id,
            title: view.title,
            note: view.note,
            priority: view.priority.into(),
            reminder: view.reminder,
            done: view.done,
            done_at: view.done_at,
        }
    }
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct TodoListResponse {
    pub id: i64,
    pub title: String,
    pub colour: String,
    pub items: Vec<TodoItemResponse>,
}

impl From<TodoListView> for TodoListResponse {
    fn from(view: TodoListView) -> Self {
        Self {
            id: view.id,
            title: view.title,
            colour: view.colour,
            items: view.items.into_iter().map(TodoItemResponse::from).collect(),
        }
    }
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ColourDto {
    pub name: String,
    pub code: String,
}

impl From<Colour> for ColourDto {
    fn from(colour: Colour) -> Self {
        Self {
            name: colour.name().to_string(),
            code: colour.code().to_string(),
        }
    }
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct TodosResponse {
    pub priority_levels: Vec<PriorityLevelDto>,
    pub colours: Vec<ColourDto>,
    pub lists: Vec<TodoListResponse>,
}

impl From<TodosView> for TodosResponse {
    fn from(view: TodosView) -> Self {
        Self {
            priority_levels: view.priority_levels.into_iter().map(PriorityLevelDto::from).collect(),
            colours: view.colours.into_iter().map(ColourDto::from).collect(),
            lists: view.lists.into_iter().map(TodoListResponse::from).collect(),
        }
    }
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct TodoItemPageResponse {
    pub items: Vec<TodoItemResponse>,
    pub page_number: u64,
    pub total_pages: u64,
    pub total_count: u64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl From<PaginatedList<TodoItemView>> for TodoItemPageResponse {
    fn from(page: PaginatedList<TodoItemView>) -> Self {
        Self {
            has_previous_page: page.has_previous_page(),
            has_next_page: page.has_next_page(),
            page_number: page.page_number,
            total_pages: page.total_pages,
            total_count: page.total_count,
            items: page.items.into_iter().map(TodoItemResponse::from).collect(),
        }
    }
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct PurgeResponse {
    /// Number of lists removed
    pub purged: u64,
}
