// Stores layer - data access, unit of work and audit stamping
pub mod activity_log_store;
pub mod audit_stamper;
pub mod authorization_store;
pub mod profile_store;
pub mod role_store;
pub mod todo_store;
pub mod unit_of_work;
pub mod user_store;

pub use activity_log_store::ActivityLogStore;
pub use audit_stamper::{AuditStamper, EntryState};
pub use authorization_store::AuthorizationStore;
pub use profile_store::ProfileStore;
pub use role_store::RoleStore;
pub use todo_store::TodoStore;
pub use unit_of_work::UnitOfWork;
pub use user_store::{NewUser, UserStore};
