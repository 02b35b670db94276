// Internal types - not exposed over the API
pub mod accounts;
pub mod activity_log;
pub mod auth;
pub mod colour;
pub mod context;
pub mod domain_event;
pub mod pagination;
pub mod profile;
pub mod roles;
pub mod todo;

pub use colour::Colour;
pub use context::RequestContext;
pub use domain_event::DomainEvent;
pub use pagination::{PageRequest, PaginatedList};
