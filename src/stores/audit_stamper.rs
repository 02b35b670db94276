use std::sync::Arc;

use sea_orm::{EntityTrait, IdenStatic, Iterable, PrimaryKeyToColumn};

use crate::providers::Clock;
use crate::types::db::auditable::Auditable;

/// How an auditable row participates in a unit of work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Added,
    Modified,
    Unchanged,
}

impl EntryState {
    /// Classify an active model about to be written
    ///
    /// Inserts are `Added`. Otherwise the row is `Modified` when an owned
    /// column or any other non-audit, non-key column holds a new value.
    pub fn resolve<A: Auditable>(insert: bool, model: &A) -> Self {
        if insert {
            return EntryState::Added;
        }

        if A::owned_columns().into_iter().any(|c| model.get(c).is_set()) {
            tracing::trace!("Owned record changed; owner marked modified");
            return EntryState::Modified;
        }

        let audit = A::audit_columns();
        let keys: Vec<String> = <A::Entity as EntityTrait>::PrimaryKey::iter()
            .map(|pk| pk.into_column().as_str().to_string())
            .collect();

        let changed = <A::Entity as EntityTrait>::Column::iter()
            .filter(|c| !audit.contains(c) && !keys.iter().any(|k| k == c.as_str()))
            .any(|c| model.get(c).is_set());

        if changed {
            EntryState::Modified
        } else {
            EntryState::Unchanged
        }
    }
}

/// Writes the created/last-modified columns from the injected clock
pub struct AuditStamper {
    clock: Arc<dyn Clock>,
}

impl AuditStamper {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Stamp `model` for `state`
    ///
    /// Added rows get all four columns from one clock reading. Modified rows
    /// get only the last-modified pair and their created pair is unset so it
    /// is never written. Unchanged rows are left alone.
    pub fn stamp<A: Auditable>(&self, model: &mut A, state: EntryState, actor: &str) {
        let columns = A::audit_columns();
        let now = self.clock.now_utc();

        match state {
            EntryState::Added => {
                model.set(columns.created_at, now.into());
                model.set(columns.created_by, Some(actor.to_string()).into());
                model.set(columns.last_modified_at, now.into());
                model.set(columns.last_modified_by, Some(actor.to_string()).into());
            }
            EntryState::Modified => {
                model.not_set(columns.created_at);
                model.not_set(columns.created_by);
                model.set(columns.last_modified_at, now.into());
                model.set(columns.last_modified_by, Some(actor.to_string()).into());
            }
            EntryState::Unchanged => {}
        }
    }
}
