// Coordinators - command and query handlers, one per feature
pub mod account_coordinator;
pub mod activity_log_coordinator;
pub mod login_coordinator;
pub mod role_coordinator;
pub mod todo_item_coordinator;
pub mod todo_list_coordinator;

pub use account_coordinator::AccountCoordinator;
pub use activity_log_coordinator::ActivityLogCoordinator;
pub use login_coordinator::LoginCoordinator;
pub use role_coordinator::RoleCoordinator;
pub use todo_item_coordinator::TodoItemCoordinator;
pub use todo_list_coordinator::TodoListCoordinator;
