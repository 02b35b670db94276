// API layer - HTTP endpoints
pub mod access_guard;
pub mod accounts;
pub mod activity_logs;
pub mod activity_middleware;
pub mod health;
pub mod roles;
pub mod todo_items;
pub mod todo_lists;

use std::sync::Arc;

use poem::endpoint::StaticFilesEndpoint;
use poem::{EndpointExt, Route};
use poem_openapi::OpenApiService;

pub use access_guard::AccessGuard;
pub use accounts::AccountApi;
pub use activity_logs::ActivityLogApi;
pub use activity_middleware::ActivityLogMiddleware;
pub use health::HealthApi;
pub use roles::RoleApi;
pub use todo_items::TodoItemApi;
pub use todo_lists::TodoListApi;

use crate::app_data::AppData;
use crate::coordinators::{
    AccountCoordinator, ActivityLogCoordinator, LoginCoordinator, RoleCoordinator, TodoItemCoordinator,
    TodoListCoordinator,
};

/// Every API module, in the order they appear in the OpenAPI document
pub type ApiSet = (HealthApi, AccountApi, RoleApi, TodoListApi, TodoItemApi, ActivityLogApi);

pub fn api_set(app_data: Arc<AppData>) -> ApiSet {
    let guard = AccessGuard::new(&app_data);

    (
        HealthApi::new(app_data.connections.main.clone()),
        AccountApi::new(
            guard.clone(),
            Arc::new(AccountCoordinator::new(app_data.clone())),
            Arc::new(LoginCoordinator::new(app_data.clone())),
        ),
        RoleApi::new(guard.clone(), Arc::new(RoleCoordinator::new(app_data.clone()))),
        TodoListApi::new(guard.clone(), Arc::new(TodoListCoordinator::new(app_data.clone()))),
        TodoItemApi::new(guard.clone(), Arc::new(TodoItemCoordinator::new(app_data.clone()))),
        ActivityLogApi::new(guard, Arc::new(ActivityLogCoordinator::new(app_data))),
    )
}

/// Compose routes: API under /api (with activity logging), Swagger UI under
/// /swagger and uploaded files under the storage base URL
pub fn routes(app_data: Arc<AppData>, server_url: &str) -> Route {
    let api_service = OpenApiService::new(api_set(app_data.clone()), "Fashion Backend API", env!("CARGO_PKG_VERSION"))
        .server(server_url);
    let ui = api_service.swagger_ui();

    let activity = ActivityLogMiddleware::new(app_data.activity_log_store.clone(), app_data.token_provider.clone());
    let files = StaticFilesEndpoint::new(app_data.settings.storage_root().clone());

    Route::new()
        .nest("/api", api_service.with(activity))
        .nest("/swagger", ui)
        .nest(app_data.settings.storage_base_url(), files)
}
