// Database entities - SeaORM models
pub mod activity_log;
pub mod auditable;
pub mod role;
pub mod role_claim;
pub mod todo_item;
pub mod todo_list;
pub mod user;
pub mod user_profile;
pub mod user_role;
