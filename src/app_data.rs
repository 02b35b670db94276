use std::sync::Arc;

use crate::config::{ApplicationSettings, DatabaseConnections};
use crate::providers::{
    Clock, CryptoProvider, DomainEventDispatcher, FileStorage, LocalFileStorage, LogNotificationService,
    NotificationService, PermissionAuthorizer, SystemClock, TokenProvider,
};
use crate::stores::{ActivityLogStore, AuditStamper, AuthorizationStore};

/// Centralized application data
///
/// Everything is created once in main.rs and shared across coordinators and
/// API modules.
///
/// ```text
/// main.rs
///   ↓
/// AppData::init(connections, settings)
///   ↓ creates once
///   ├─ token_provider, crypto_provider
///   ├─ clock → audit_stamper (stores read it too)
///   ├─ notifications → event_dispatcher
///   ├─ file_storage
///   ├─ authorizer (AuthorizationStore)
///   └─ activity_log_store
///   ↓ wrapped in Arc<AppData>
///   ├─ TodoListCoordinator::new(app_data)
///   └─ AccountCoordinator::new(app_data) ...
/// ```
pub struct AppData {
    pub connections: DatabaseConnections,
    pub settings: ApplicationSettings,
    pub token_provider: Arc<TokenProvider>,
    pub crypto_provider: Arc<CryptoProvider>,
    pub clock: Arc<dyn Clock>,
    pub audit_stamper: Arc<AuditStamper>,
    pub event_dispatcher: Arc<DomainEventDispatcher>,
    pub notifications: Arc<dyn NotificationService>,
    pub file_storage: Arc<dyn FileStorage>,
    pub authorizer: Arc<PermissionAuthorizer>,
    pub activity_log_store: Arc<ActivityLogStore>,
}

impl AppData {
    /// Production wiring: system clock, local file storage, log notifications
    pub fn init(connections: DatabaseConnections, settings: ApplicationSettings) -> Self {
        tracing::info!("Initializing AppData...");

        let notifications: Arc<dyn NotificationService> = Arc::new(LogNotificationService);
        let dispatcher = DomainEventDispatcher::standard(notifications.clone());
        let file_storage = Arc::new(LocalFileStorage::new(
            settings.storage_root().clone(),
            settings.storage_base_url(),
        ));

        let app_data = Self::new(
            connections,
            settings,
            Arc::new(SystemClock),
            dispatcher,
            notifications,
            file_storage,
        );
        tracing::info!("AppData initialization complete");
        app_data
    }

    /// Wire the application around explicit collaborators
    pub fn new(
        connections: DatabaseConnections,
        settings: ApplicationSettings,
        clock: Arc<dyn Clock>,
        dispatcher: DomainEventDispatcher,
        notifications: Arc<dyn NotificationService>,
        file_storage: Arc<dyn FileStorage>,
    ) -> Self {
        let token_provider = Arc::new(TokenProvider::from_settings(&settings));
        let crypto_provider = Arc::new(CryptoProvider::new(settings.password_pepper()));
        let audit_stamper = Arc::new(AuditStamper::new(clock.clone()));
        let authorizer = Arc::new(PermissionAuthorizer::new(Arc::new(AuthorizationStore::new(
            connections.main.clone(),
        ))));
        let activity_log_store = Arc::new(ActivityLogStore::new(
            connections.activity.clone(),
            clock.clone(),
        ));

        Self {
            connections,
            settings,
            token_provider,
            crypto_provider,
            clock,
            audit_stamper,
            event_dispatcher: Arc::new(dispatcher),
            notifications,
            file_storage,
            authorizer,
            activity_log_store,
        }
    }
}
