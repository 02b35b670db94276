// Seed command implementation
// Creates the default roles and the optional admin account; safe to run repeatedly

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::providers::authorization::permissions::{
    ALL_PERMISSIONS, CUSTOMER_PERMISSIONS, POLICY_CAN_PURGE, ROLE_ADMINISTRATOR, ROLE_CUSTOMER,
};
use crate::stores::{NewUser, ProfileStore, RoleStore, UnitOfWork, UserStore};
use crate::types::db::role;
use crate::types::internal::RequestContext;

/// What a seed run changed
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub roles_created: Vec<String>,
    pub admin_created: Option<String>,
}

async fn ensure_role(
    uow: &UnitOfWork,
    role_store: &RoleStore,
    name: &str,
    description: &str,
    permissions: &[&str],
    policies: &[&str],
    report: &mut SeedReport,
) -> Result<role::Model, InternalError> {
    let role = match role_store.find_by_name(uow.conn(), name).await? {
        Some(role) => role,
        None => {
            report.roles_created.push(name.to_string());
            role_store
                .create(uow.conn(), name, Some(description.to_string()))
                .await?
        }
    };

    let permissions: Vec<String> = permissions.iter().map(|p| p.to_string()).collect();
    let policies: Vec<String> = policies.iter().map(|p| p.to_string()).collect();
    role_store
        .replace_claims(uow.conn(), &role.id, &permissions, &policies)
        .await?;
    Ok(role)
}

/// Create or refresh the `Administrator` and `Customer` roles, then the seed admin
pub async fn seed_defaults(app_data: &AppData) -> Result<SeedReport, InternalError> {
    let ctx = RequestContext::for_cli("seed");
    let role_store = RoleStore::new(app_data.clock.clone());
    let user_store = UserStore::new(app_data.clock.clone());
    let profile_store = ProfileStore::new();
    let mut report = SeedReport::default();

    let mut uow = UnitOfWork::begin(
        &app_data.connections.main,
        app_data.audit_stamper.clone(),
        app_data.event_dispatcher.clone(),
        &ctx,
    )
    .await?;

    let administrator = ensure_role(
        &uow,
        &role_store,
        ROLE_ADMINISTRATOR,
        "Full access, including purging todo data",
        ALL_PERMISSIONS,
        &[POLICY_CAN_PURGE],
        &mut report,
    )
    .await?;
    ensure_role(
        &uow,
        &role_store,
        ROLE_CUSTOMER,
        "Storefront customer",
        CUSTOMER_PERMISSIONS,
        &[],
        &mut report,
    )
    .await?;

    if let Some(admin) = app_data.settings.seed_admin() {
        if user_store.find_by_login(uow.conn(), &admin.username).await?.is_none() {
            let password_hash = app_data.crypto_provider.hash_password(&admin.password)?;
            let user = user_store
                .create(
                    uow.conn(),
                    NewUser {
                        username: admin.username.clone(),
                        email: admin.email.clone(),
                        password_hash,
                    },
                )
                .await?;
            uow.add(profile_store.new_profile(&user.id, None, None)?).await?;
            role_store
                .set_user_roles(uow.conn(), &user.id, std::slice::from_ref(&administrator))
                .await?;
            report.admin_created = Some(user.username);
        } else {
            tracing::info!("Seed admin '{}' already exists", admin.username);
        }
    }

    uow.commit().await?;

    tracing::info!(
        "Seed completed: roles created {:?}, admin created {:?}",
        report.roles_created,
        report.admin_created
    );
    Ok(report)
}
