// Providers layer - Work performers and business logic
//
// Providers contain business logic and provide composable operations that
// coordinators can orchestrate: tokens, hashing, time, files, notifications,
// validation, authorization decisions and domain event dispatch.

pub mod authorization;
pub mod clock;
pub mod crypto_provider;
pub mod domain_events;
pub mod notification_provider;
pub mod storage_provider;
pub mod token_provider;
pub mod validation;

pub use authorization::{PermissionAuthorizer, UserAuthorizationProvider};
pub use clock::{Clock, ManualClock, SystemClock};
pub use crypto_provider::CryptoProvider;
pub use domain_events::{DomainEventDispatcher, DomainEventHandler};
pub use notification_provider::{LogNotificationService, Notification, NotificationResult, NotificationService};
pub use storage_provider::{FileStorage, LocalFileStorage};
pub use token_provider::TokenProvider;
