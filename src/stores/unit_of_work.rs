use std::sync::Arc;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, IntoActiveModel,
    TransactionTrait,
};

use crate::errors::InternalError;
use crate::providers::DomainEventDispatcher;
use crate::types::db::auditable::Auditable;
use crate::types::internal::{DomainEvent, RequestContext};

use super::audit_stamper::{AuditStamper, EntryState};

/// One transaction plus the domain events raised while it is open
///
/// Auditable rows written through `add`/`modify` are stamped with the
/// request's actor. Events are dispatched only after `commit` succeeds;
/// dropping the unit of work rolls back and discards them.
pub struct UnitOfWork {
    txn: DatabaseTransaction,
    stamper: Arc<AuditStamper>,
    dispatcher: Arc<DomainEventDispatcher>,
    actor: String,
    events: Vec<DomainEvent>,
}

impl UnitOfWork {
    pub async fn begin(
        db: &DatabaseConnection,
        stamper: Arc<AuditStamper>,
        dispatcher: Arc<DomainEventDispatcher>,
        ctx: &RequestContext,
    ) -> Result<Self, InternalError> {
        let txn = db.begin().await.map_err(InternalError::transaction_begin)?;

        Ok(Self {
            txn,
            stamper,
            dispatcher,
            actor: ctx.actor_id.clone(),
            events: Vec::new(),
        })
    }

    /// Connection for reads and non-auditable writes inside the transaction
    pub fn conn(&self) -> &DatabaseTransaction {
        &self.txn
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    /// Insert a new auditable row
    pub async fn add<A>(&mut self, mut model: A) -> Result<<A::Entity as EntityTrait>::Model, InternalError>
    where
        A: Auditable + ActiveModelBehavior + Send + Sync + 'static,
        <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    {
        self.stamper.stamp(&mut model, EntryState::Added, &self.actor);
        model
            .insert(&self.txn)
            .await
            .map_err(|e| InternalError::database("unit_of_work_add", e))
    }

    /// Update an existing auditable row; an unchanged row is not stamped
    pub async fn modify<A>(&mut self, mut model: A) -> Result<<A::Entity as EntityTrait>::Model, InternalError>
    where
        A: Auditable + ActiveModelBehavior + Send + Sync + 'static,
        <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    {
        let state = EntryState::resolve(false, &model);
        self.stamper.stamp(&mut model, state, &self.actor);
        model
            .update(&self.txn)
            .await
            .map_err(|e| InternalError::database("unit_of_work_modify", e))
    }

    /// Delete a row; returns the number of rows removed
    pub async fn remove<A>(&mut self, model: A) -> Result<u64, InternalError>
    where
        A: ActiveModelTrait + ActiveModelBehavior + Send + Sync + 'static,
    {
        let result = model
            .delete(&self.txn)
            .await
            .map_err(|e| InternalError::database("unit_of_work_remove", e))?;
        Ok(result.rows_affected)
    }

    /// Hold an event until commit
    pub fn raise(&mut self, event: DomainEvent) {
        self.events.push(event);
    }

    pub fn pending_events(&self) -> &[DomainEvent] {
        &self.events
    }

    /// Commit, then dispatch the held events
    pub async fn commit(self) -> Result<(), InternalError> {
        self.txn.commit().await.map_err(InternalError::transaction_commit)?;

        if !self.events.is_empty() {
            tracing::debug!("Dispatching {} domain event(s) after commit", self.events.len());
            self.dispatcher.dispatch(self.events).await;
        }
        Ok(())
    }
}
