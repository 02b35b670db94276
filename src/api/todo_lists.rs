use std::sync::Arc;

use poem::Request;
use poem_openapi::param::Path;
use poem_openapi::payload::Json;
use poem_openapi::{OpenApi, Tags};

use crate::api::access_guard::AccessGuard;
use crate::coordinators::TodoListCoordinator;
use crate::errors::ApiError;
use crate::providers::authorization::permissions::routes;
use crate::types::dto::common::NoContentResponse;
use crate::types::dto::todos::{
    CreateTodoListRequest, CreatedTodoApiResponse, CreatedTodoResponse, PurgeResponse, TodosResponse,
    UpdateTodoListRequest,
};
use crate::types::internal::todo::{CreateTodoList, DeleteTodoList, UpdateTodoList};

/// Todo list endpoints
pub struct TodoListApi {
    guard: AccessGuard,
    coordinator: Arc<TodoListCoordinator>,
}

impl TodoListApi {
    pub fn new(guard: AccessGuard, coordinator: Arc<TodoListCoordinator>) -> Self {
        Self { guard, coordinator }
    }
}

#[derive(Tags)]
enum TodoTags {
    /// Todo lists
    TodoLists,
}

#[OpenApi(prefix_path = "/todo-lists")]
impl TodoListApi {
    /// Every list with its items, plus the priority levels and colours to choose from
    #[oai(path = "/", method = "get", tag = "TodoTags::TodoLists")]
    async fn get_todos(&self, req: &Request) -> Result<Json<TodosResponse>, ApiError> {
        let ctx = self.guard.check(req, routes::TODOS_VIEW).await?;
        let view = self.coordinator.get_todos(&ctx).await?;
        Ok(Json(view.into()))
    }

    #[oai(path = "/", method = "post", tag = "TodoTags::TodoLists")]
    async fn create(&self, req: &Request, body: Json<CreateTodoListRequest>) -> Result<CreatedTodoApiResponse, ApiError> {
        let ctx = self.guard.check(req, routes::TODOS_CREATE).await?;
        let body = body.0;
        let id = self
            .coordinator
            .create(
                &ctx,
                CreateTodoList {
                    title: body.title,
                    colour: body.colour,
                },
            )
            .await?;
        Ok(CreatedTodoApiResponse::Created(Json(CreatedTodoResponse { id })))
    }

    /// Delete every list and item
    #[oai(path = "/purge", method = "delete", tag = "TodoTags::TodoLists")]
    async fn purge(&self, req: &Request) -> Result<Json<PurgeResponse>, ApiError> {
        let ctx = self.guard.check(req, routes::TODOS_PURGE).await?;
        let purged = self.coordinator.purge(&ctx).await?;
        Ok(Json(PurgeResponse { purged }))
    }

    #[oai(path = "/:id", method = "put", tag = "TodoTags::TodoLists")]
    async fn update(
        &self,
        req: &Request,
        id: Path<i64>,
        body: Json<UpdateTodoListRequest>,
    ) -> Result<NoContentResponse, ApiError> {
        let ctx = self.guard.check(req, routes::TODOS_EDIT).await?;
        let body = body.0;
        self.coordinator
            .update(
                &ctx,
                UpdateTodoList {
                    id: id.0,
                    title: body.title,
                    colour: body.colour,
                },
            )
            .await?;
        Ok(NoContentResponse::NoContent)
    }

    #[oai(path = "/:id", method = "delete", tag = "TodoTags::TodoLists")]
    async fn delete(&self, req: &Request, id: Path<i64>) -> Result<NoContentResponse, ApiError> {
        let ctx = self.guard.check(req, routes::TODOS_DELETE).await?;
        self.coordinator.delete(&ctx, DeleteTodoList { id: id.0 }).await?;
        Ok(NoContentResponse::NoContent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{bearer_request, register_and_login, setup_test_app};

    fn api(app_data: &Arc<crate::AppData>) -> TodoListApi {
        TodoListApi::new(
            AccessGuard::new(app_data),
            Arc::new(TodoListCoordinator::new(app_data.clone())),
        )
    }

    #[tokio::test]
    async fn test_missing_token_is_401() {
        let app = setup_test_app().await;

        let err = api(&app.app_data).get_todos(&poem::Request::default()).await.unwrap_err();

        assert_eq!(err.status_code(), 401);
    }

    #[tokio::test]
    async fn test_customer_can_create_and_read_lists() {
        let app = setup_test_app().await;
        let tokens = register_and_login(&app.app_data, "grace").await;
        let req = bearer_request(&tokens.access_token);
        let api = api(&app.app_data);

        let created = api
            .create(
                &req,
                Json(CreateTodoListRequest {
                    title: "Lookbook".to_string(),
                    colour: Some("#6666ff".to_string()),
                }),
            )
            .await
            .unwrap();
        let CreatedTodoApiResponse::Created(Json(created)) = created;

        let todos = api.get_todos(&req).await.unwrap().0;
        assert_eq!(todos.lists.len(), 1);
        assert_eq!(todos.lists[0].id, created.id);
        assert_eq!(todos.lists[0].colour, "#6666FF");
    }

    #[tokio::test]
    async fn test_customer_cannot_purge() {
        let app = setup_test_app().await;
        let tokens = register_and_login(&app.app_data, "grace").await;

        let err = api(&app.app_data)
            .purge(&bearer_request(&tokens.access_token))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 403);
        assert_eq!(err.codes(), vec!["Auth.MissingPermission"]);
    }

    #[tokio::test]
    async fn test_delete_unknown_list_is_404() {
        let app = setup_test_app().await;
        let tokens = register_and_login(&app.app_data, "grace").await;

        let err = api(&app.app_data)
            .delete(&bearer_request(&tokens.access_token), Path(404))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 404);
        assert!(app.events.events().iter().all(|e| e.name() != "todo_list_deleted"));
    }
}
