mod common;

use chrono::Duration;
use common::{register_customer, setup_app, start_time, user_ctx};
use fashion_backend::stores::{ProfileStore, TodoStore, UnitOfWork};
use fashion_backend::types::db::todo_list;
use fashion_backend::types::internal::DomainEvent;
use sea_orm::{IntoActiveModel, Set};

async fn begin(app: &common::TestApp, actor: &str) -> UnitOfWork {
    UnitOfWork::begin(
        &app.app_data.connections.main,
        app.app_data.audit_stamper.clone(),
        app.app_data.event_dispatcher.clone(),
        &user_ctx(actor),
    )
    .await
    .unwrap()
}

fn new_list(title: &str) -> todo_list::ActiveModel {
    todo_list::ActiveModel {
        title: Set(title.to_string()),
        colour: Set("#FFFFFF".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_added_row_gets_all_four_columns() {
    let app = setup_app().await;

    let mut uow = begin(&app, "creator").await;
    let list = uow.add(new_list("Spring drop")).await.unwrap();
    uow.commit().await.unwrap();

    assert_eq!(list.created_at, start_time());
    assert_eq!(list.last_modified_at, start_time());
    assert_eq!(list.created_by.as_deref(), Some("creator"));
    assert_eq!(list.last_modified_by.as_deref(), Some("creator"));
}

#[tokio::test]
async fn test_modified_row_keeps_created_columns() {
    let app = setup_app().await;
    let mut uow = begin(&app, "creator").await;
    let list = uow.add(new_list("Spring drop")).await.unwrap();
    uow.commit().await.unwrap();

    app.clock.advance(Duration::minutes(30));
    let mut uow = begin(&app, "editor").await;
    let mut model = list.into_active_model();
    model.title = Set("Spring drop, final".to_string());
    uow.modify(model).await.unwrap();
    uow.commit().await.unwrap();

    let stored = TodoStore::new()
        .find_list(&app.app_data.connections.main, 1)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.created_at, start_time());
    assert_eq!(stored.created_by.as_deref(), Some("creator"));
    assert_eq!(stored.last_modified_at, start_time() + Duration::minutes(30));
    assert_eq!(stored.last_modified_by.as_deref(), Some("editor"));
}

#[tokio::test]
async fn test_owned_record_change_stamps_owner() {
    let app = setup_app().await;
    let account = register_customer(&app.app_data, "mara").await;
    app.clock.advance(Duration::days(1));

    let profile_store = ProfileStore::new();
    let profile = profile_store
        .find(&app.app_data.connections.main, &account.id)
        .await
        .unwrap()
        .unwrap();

    let mut uow = begin(&app, "mara").await;
    let mut model = profile.into_active_model();
    model.addresses = Set(
        r#"[{"label":"Home","line1":"1 Main St","line2":null,"city":"Leeds","region":null,"postal_code":"LS1 1AA","country":"UK"}]"#
            .to_string(),
    );
    uow.modify(model).await.unwrap();
    uow.commit().await.unwrap();

    let stored = profile_store
        .find(&app.app_data.connections.main, &account.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.created_at, start_time());
    assert_eq!(stored.last_modified_at, start_time() + Duration::days(1));
    assert_eq!(stored.last_modified_by.as_deref(), Some("mara"));
}

#[tokio::test]
async fn test_events_dispatch_only_after_commit() {
    let app = setup_app().await;

    let mut uow = begin(&app, "creator").await;
    uow.add(new_list("Dropped")).await.unwrap();
    uow.raise(DomainEvent::TodoListCreated {
        list_id: 1,
        title: "Dropped".to_string(),
    });
    assert_eq!(uow.pending_events().len(), 1);
    drop(uow);

    assert!(app.events.events().is_empty());
    assert!(
        TodoStore::new()
            .find_list(&app.app_data.connections.main, 1)
            .await
            .unwrap()
            .is_none()
    );

    let mut uow = begin(&app, "creator").await;
    let list = uow.add(new_list("Kept")).await.unwrap();
    uow.raise(DomainEvent::TodoListCreated {
        list_id: list.id,
        title: list.title.clone(),
    });
    assert!(app.events.events().is_empty());
    uow.commit().await.unwrap();

    assert_eq!(app.events.events().len(), 1);
}
