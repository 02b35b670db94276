// Common test utilities for integration tests
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use fashion_backend::AppData;
use fashion_backend::config::{ApplicationSettings, DatabaseConnections, MockEnvironment};
use fashion_backend::providers::{
    DomainEventDispatcher, DomainEventHandler, LocalFileStorage, LogNotificationService, ManualClock,
};
use fashion_backend::coordinators::{AccountCoordinator, LoginCoordinator};
use fashion_backend::types::internal::accounts::{AccountView, Login, RegisterAccount, TokenPair};
use fashion_backend::types::internal::{DomainEvent, RequestContext};

pub const TEST_PASSWORD: &str = "Str0ng-Secret!";

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
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
    // Held so uploaded files outlive the test body
    pub _storage_dir: tempfile::TempDir,
}

pub fn test_settings(extra: &[(&str, &str)]) -> ApplicationSettings {
    let env = MockEnvironment::empty()
        .with_vars(&[
            ("JWT_SECRET", "integration-jwt-secret-at-least-32-chars"),
            ("REFRESH_TOKEN_SECRET", "integration-refresh-secret-32-chars-long"),
            ("PASSWORD_PEPPER", "integration-pepper"),
        ])
        .with_vars(extra);
    ApplicationSettings::from_env(&env).expect("valid test settings")
}

/// Application over migrated in-memory databases, a manual clock and an event recorder
pub async fn setup_app() -> TestApp {
    setup_app_with(&[]).await
}

pub async fn setup_app_with(extra_env: &[(&str, &str)]) -> TestApp {
    let connections = DatabaseConnections::in_memory()
        .await
        .expect("Failed to create test databases");
    let clock = Arc::new(ManualClock::new(start_time()));
    let events = Arc::new(RecordingHandler::default());
    let storage_dir = tempfile::tempdir().expect("temp dir");

    let app_data = AppData::new(
        connections,
        test_settings(extra_env),
        clock.clone(),
        DomainEventDispatcher::new().with_handler(events.clone()),
        Arc::new(LogNotificationService),
        Arc::new(LocalFileStorage::new(storage_dir.path(), "/files")),
    );

    TestApp {
        app_data: Arc::new(app_data),
        clock,
        events,
        _storage_dir: storage_dir,
    }
}

/// Context of an authenticated API caller
pub fn user_ctx(actor: &str) -> RequestContext {
    RequestContext::new().with_actor_id(actor)
}

/// Context carrying the claims of a freshly issued access token
pub fn authenticated_ctx(app_data: &AppData, access_token: &str) -> RequestContext {
    let claims = app_data
        .token_provider
        .validate_access_token(access_token)
        .expect("valid access token");
    let sub = claims.sub.clone();
    RequestContext::new().with_auth(claims).with_actor_id(sub)
}

pub async fn register_customer(app_data: &Arc<AppData>, username: &str) -> AccountView {
    AccountCoordinator::new(app_data.clone())
        .register(
            &RequestContext::new(),
            RegisterAccount {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                password: TEST_PASSWORD.to_string(),
                first_name: Some("Test".to_string()),
                last_name: Some("Customer".to_string()),
            },
        )
        .await
        .expect("register")
}

pub async fn login(app_data: &Arc<AppData>, login: &str, password: &str) -> TokenPair {
    LoginCoordinator::new(app_data.clone())
        .login(
            &RequestContext::new(),
            Login {
                login: login.to_string(),
                password: password.to_string(),
            },
        )
        .await
        .expect("login")
}
