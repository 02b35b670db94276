// Test utilities shared across unit tests
// Only compiled when running tests

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use migration::{ActivityLogMigrator, AppMigrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::app_data::AppData;
use crate::config::{ApplicationSettings, DatabaseConnections, MockEnvironment};
use crate::coordinators::{AccountCoordinator, LoginCoordinator};
use crate::providers::{DomainEventDispatcher, DomainEventHandler, LocalFileStorage, LogNotificationService, ManualClock};
use crate::types::internal::accounts::{Login, RegisterAccount, TokenPair};
use crate::types::internal::{DomainEvent, RequestContext};

pub const TEST_JWT_SECRET: &str = "test-secret-key-minimum-32-characters-long";
pub const TEST_REFRESH_SECRET: &str = "test-refresh-secret-minimum-32-chars";

pub async fn setup_main_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    AppMigrator::up(&db, None).await.expect("Failed to run migrations");
    db
}

pub async fn setup_activity_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create activity database");
    ActivityLogMigrator::up(&db, None)
        .await
        .expect("Failed to run activity migrations");
    db
}

pub fn test_settings() -> ApplicationSettings {
    let env = MockEnvironment::empty().with_vars(&[
        ("JWT_SECRET", TEST_JWT_SECRET),
        ("REFRESH_TOKEN_SECRET", TEST_REFRESH_SECRET),
        ("PASSWORD_PEPPER", "test-pepper-for-unit-tests"),
    ]);
    ApplicationSettings::from_env(&env).expect("valid test settings")
}

/// Records every dispatched event
#[derive(Default)]
pub struct RecordingHandler {
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingHandler {
    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl DomainEventHandler for RecordingHandler {
    async fn handle(&self, event: &DomainEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

pub struct TestApp {
    pub app_data: Arc<AppData>,
    pub clock: Arc<ManualClock>,
    pub events: Arc<RecordingHandler>,
    pub storage_dir: tempfile::TempDir,
}

/// AppData over in-memory databases with a manual clock and an event recorder
pub async fn setup_test_app() -> TestApp {
    let connections = DatabaseConnections::in_memory()
        .await
        .expect("Failed to create test databases");
    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()));
    let events = Arc::new(RecordingHandler::default());
    let storage_dir = tempfile::tempdir().expect("temp dir");

    let app_data = AppData::new(
        connections,
        test_settings(),
        clock.clone(),
        DomainEventDispatcher::new().with_handler(events.clone()),
        Arc::new(LogNotificationService),
        Arc::new(LocalFileStorage::new(storage_dir.path(), "/files")),
    );

    TestApp {
        app_data: Arc::new(app_data),
        clock,
        events,
        storage_dir,
    }
}

pub const TEST_PASSWORD: &str = "Str0ng-Secret!";

/// Seed default roles, register `username` as a customer and log in
pub async fn register_and_login(app_data: &Arc<AppData>, username: &str) -> TokenPair {
    crate::cli::seed::seed_defaults(app_data).await.expect("seed");
    let ctx = RequestContext::new();

    AccountCoordinator::new(app_data.clone())
        .register(
            &ctx,
            RegisterAccount {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                password: TEST_PASSWORD.to_string(),
                first_name: None,
                last_name: None,
            },
        )
        .await
        .expect("register");

    LoginCoordinator::new(app_data.clone())
        .login(
            &ctx,
            Login {
                login: username.to_string(),
                password: TEST_PASSWORD.to_string(),
            },
        )
        .await
        .expect("login")
}

/// Request carrying `access_token` as a bearer token
pub fn bearer_request(access_token: &str) -> poem::Request {
    poem::Request::builder()
        .header("Authorization", format!("Bearer {}", access_token))
        .finish()
}
