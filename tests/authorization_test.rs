mod common;

use common::{register_customer, setup_app};
use fashion_backend::cli::seed::seed_defaults;
use fashion_backend::coordinators::AccountCoordinator;
use fashion_backend::providers::UserAuthorizationProvider;
use fashion_backend::providers::authorization::{AuthorizationDecision, AuthorizationRecord, AuthorizationRequirement};
use fashion_backend::stores::AuthorizationStore;
use fashion_backend::types::db::user::UserStatus;
use fashion_backend::types::internal::RequestContext;
use fashion_backend::types::internal::accounts::SetAccountStatus;

fn record() -> AuthorizationRecord {
    AuthorizationRecord::new(
        ["todos.view", "todos.edit"],
        ["CanPurge"],
        ["Customer"],
    )
}

#[test]
fn test_empty_requirement_granted_for_any_authenticated_record() {
    let requirement = AuthorizationRequirement::new();

    assert!(requirement.evaluate(true, Some(&record())).is_granted());
    assert!(
        requirement
            .evaluate(true, Some(&AuthorizationRecord::default()))
            .is_granted()
    );
}

#[test]
fn test_any_missing_claim_denies_regardless_of_order() {
    let held = record();
    let orders: Vec<AuthorizationRequirement> = vec![
        AuthorizationRequirement::new()
            .permission("todos.view")
            .permission("logs.view")
            .policy("CanPurge"),
        AuthorizationRequirement::new()
            .policy("CanPurge")
            .permission("logs.view")
            .permission("todos.view"),
        AuthorizationRequirement::new()
            .role("Customer")
            .permission("logs.view"),
    ];

    for requirement in orders {
        assert_eq!(
            requirement.evaluate(true, Some(&held)),
            AuthorizationDecision::MissingPermission("logs.view".to_string()),
            "{}",
            requirement
        );
    }

    let missing_policy = AuthorizationRequirement::new().role("Customer").policy("CanExport");
    assert_eq!(
        missing_policy.evaluate(true, Some(&held)),
        AuthorizationDecision::MissingPolicy("CanExport".to_string())
    );

    let missing_role = AuthorizationRequirement::new().role("Administrator").permission("todos.edit");
    assert_eq!(
        missing_role.evaluate(true, Some(&held)),
        AuthorizationDecision::MissingRole("Administrator".to_string())
    );
}

#[test]
fn test_full_match_granted() {
    let requirement = AuthorizationRequirement::from_policy_name("role:Customer;perm:todos.edit,todos.view;policy:CanPurge")
        .unwrap();

    assert!(requirement.evaluate(true, Some(&record())).is_granted());
}

#[tokio::test]
async fn test_store_resolves_claims_from_roles() {
    let app = setup_app().await;
    seed_defaults(&app.app_data).await.unwrap();
    let account = register_customer(&app.app_data, "ines").await;

    let store = AuthorizationStore::new(app.app_data.connections.main.clone());
    let record = store.fetch(&account.id).await.unwrap().unwrap();

    assert!(record.roles.contains("Customer"));
    assert!(record.permissions.contains("todos.view"));
    assert!(!record.permissions.contains("todos.purge"));
    assert!(record.policies.is_empty());
}

#[tokio::test]
async fn test_suspended_account_has_no_record() {
    let app = setup_app().await;
    seed_defaults(&app.app_data).await.unwrap();
    let account = register_customer(&app.app_data, "ines").await;

    AccountCoordinator::new(app.app_data.clone())
        .set_status(
            &RequestContext::new().with_actor_id("admin"),
            SetAccountStatus {
                user_id: account.id.clone(),
                status: UserStatus::Suspended,
            },
        )
        .await
        .unwrap();

    let store = AuthorizationStore::new(app.app_data.connections.main.clone());
    assert!(store.fetch(&account.id).await.unwrap().is_none());
    assert!(store.fetch("no-such-user").await.unwrap().is_none());
}
