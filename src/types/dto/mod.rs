// DTOs - API request and response objects
pub mod accounts;
pub mod activity_logs;
pub mod common;
pub mod roles;
pub mod todos;
