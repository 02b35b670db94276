use std::sync::Arc;

use poem::Request;
use poem_openapi::param::{Path, Query};
use poem_openapi::payload::Json;
use poem_openapi::{OpenApi, Tags};

use crate::api::access_guard::AccessGuard;
use crate::coordinators::TodoItemCoordinator;
use crate::errors::ApiError;
use crate::providers::authorization::permissions::routes;
use crate::types::dto::common::NoContentResponse;
use crate::types::dto::todos::{
    CreateTodoItemRequest, CreatedTodoApiResponse, CreatedTodoResponse, TodoItemPageResponse,
    UpdateTodoItemDetailRequest, UpdateTodoItemRequest,
};
use crate::types::internal::pagination::PageRequest;
use crate::types::internal::todo::{
    CompleteTodoItem, CreateTodoItem, DeleteTodoItem, GetTodoItemsWithPagination, UpdateTodoItem,
    UpdateTodoItemDetail,
};

/// Todo item endpoints
pub struct TodoItemApi {
    guard: AccessGuard,
    coordinator: Arc<TodoItemCoordinator>,
}

impl TodoItemApi {
    pub fn new(guard: AccessGuard, coordinator: Arc<TodoItemCoordinator>) -> Self {
        Self { guard, coordinator }
    }
}

#[derive(Tags)]
enum TodoTags {
    /// Todo items
    TodoItems,
}

#[OpenApi(prefix_path = "/todo-items")]
impl TodoItemApi {
    /// One page of a list's items, ordered by title
    #[oai(path = "/", method = "get", tag = "TodoTags::TodoItems")]
    async fn items_page(
        &self,
        req: &Request,
        list_id: Query<i64>,
        page_number: Query<Option<u64>>,
        page_size: Query<Option<u64>>,
    ) -> Result<Json<TodoItemPageResponse>, ApiError> {
        let ctx = self.guard.check(req, routes::TODOS_VIEW).await?;
        let page = self
            .coordinator
            .items_page(
                &ctx,
                GetTodoItemsWithPagination {
                    list_id: list_id.0,
                    page_number: page_number.0.unwrap_or(1),
                    page_size: page_size.0.unwrap_or(PageRequest::DEFAULT_PAGE_SIZE),
                },
            )
            .await?;
        Ok(Json(page.into()))
    }

    #[oai(path = "/", method = "post", tag = "TodoTags::TodoItems")]
    async fn create(&self, req: &Request, body: Json<CreateTodoItemRequest>) -> Result<CreatedTodoApiResponse, ApiError> {
        let ctx = self.guard.check(req, routes::TODOS_CREATE).await?;
        let body = body.0;
        let id = self
            .coordinator
            .create(
                &ctx,
                CreateTodoItem {
                    list_id: body.list_id,
                    title: body.title,
                },
            )
            .await?;
        Ok(CreatedTodoApiResponse::Created(Json(CreatedTodoResponse { id })))
    }

    #[oai(path = "/:id", method = "put", tag = "TodoTags::TodoItems")]
    async fn update(
        &self,
        req: &Request,
        id: Path<i64>,
        body: Json<UpdateTodoItemRequest>,
    ) -> Result<NoContentResponse, ApiError> {
        let ctx = self.guard.check(req, routes::TODOS_EDIT).await?;
        let body = body.0;
        self.coordinator
            .update(
                &ctx,
                UpdateTodoItem {
                    id: id.0,
                    title: body.title,
                    done: body.done,
                },
            )
            .await?;
        Ok(NoContentResponse::NoContent)
    }

    /// Move the item and change its priority, note and reminder
    #[oai(path = "/:id/detail", method = "put", tag = "TodoTags::TodoItems")]
    async fn update_detail(
        &self,
        req: &Request,
        id: Path<i64>,
        body: Json<UpdateTodoItemDetailRequest>,
    ) -> Result<NoContentResponse, ApiError> {
        let ctx = self.guard.check(req, routes::TODOS_EDIT).await?;
        let body = body.0;
        self.coordinator
            .update_detail(
                &ctx,
                UpdateTodoItemDetail {
                    id: id.0,
                    list_id: body.list_id,
                    priority: body.priority.into(),
                    note: body.note,
                    reminder: body.reminder,
                },
            )
            .await?;
        Ok(NoContentResponse::NoContent)
    }

    #[oai(path = "/:id/complete", method = "post", tag = "TodoTags::TodoItems")]
    async fn complete(&self, req: &Request, id: Path<i64>) -> Result<NoContentResponse, ApiError> {
        let ctx = self.guard.check(req, routes::TODOS_EDIT).await?;
        self.coordinator.complete(&ctx, CompleteTodoItem { id: id.0 }).await?;
        Ok(NoContentResponse::NoContent)
    }

    #[oai(path = "/:id", method = "delete", tag = "TodoTags::TodoItems")]
    async fn delete(&self, req: &Request, id: Path<i64>) -> Result<NoContentResponse, ApiError> {
        let ctx = self.guard.check(req, routes::TODOS_DELETE).await?;
        self.coordinator.delete(&ctx, DeleteTodoItem { id: id.0 }).await?;
        Ok(NoContentResponse::NoContent)
    }
}
