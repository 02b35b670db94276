use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::errors::InternalError;
use crate::providers::Clock;
use crate::types::db::activity_log;
use crate::types::internal::activity_log::{ActivityLogQuery, ActivityRecord, RequestOutcome};
use crate::types::internal::pagination::PaginatedList;

/// Repository for captured API calls
///
/// Holds its own connection since activity logs may live in a separate database.
#[derive(Clone)]
pub struct ActivityLogStore {
    db: DatabaseConnection,
    clock: Arc<dyn Clock>,
}

impl ActivityLogStore {
    pub fn new(db: DatabaseConnection, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// Write one captured call, timestamped from the clock
    pub async fn write(&self, record: ActivityRecord) -> Result<(), InternalError> {
        let outcome = RequestOutcome::from_status(record.status_code);

        let model = activity_log::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            timestamp: Set(self.clock.now_utc().to_rfc3339()),
            actor: Set(record.actor),
            endpoint: Set(record.endpoint),
            method: Set(record.method),
            ip_address: Set(record.ip_address),
            user_agent: Set(record.user_agent),
            status_code: Set(i32::from(record.status_code)),
            result: Set(outcome.as_str().to_string()),
            request: Set(record.request),
            duration_ms: Set(record.duration_ms),
        };

        model
            .insert(&self.db)
            .await
            .map_err(|e| InternalError::database("write_activity_log", e))?;
        Ok(())
    }

    /// Newest first, optionally filtered by actor and outcome
    pub async fn query(&self, query: ActivityLogQuery) -> Result<PaginatedList<activity_log::Model>, InternalError> {
        let mut select = activity_log::Entity::find();
        if let Some(actor) = &query.actor {
            select = select.filter(activity_log::Column::Actor.eq(actor.as_str()));
        }
        if let Some(outcome) = query.outcome {
            select = select.filter(activity_log::Column::Result.eq(outcome.as_str()));
        }

        let paginator = select
            .order_by_desc(activity_log::Column::Id)
            .paginate(&self.db, query.page.page_size);
        let total_count = paginator
            .num_items()
            .await
            .map_err(|e| InternalError::database("count_activity_logs", e))?;
        let items = paginator
            .fetch_page(query.page.page_number - 1)
            .await
            .map_err(|e| InternalError::database("query_activity_logs", e))?;

        Ok(PaginatedList::new(
            items,
            query.page.page_number,
            query.page.page_size,
            total_count,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ManualClock;
    use crate::test::utils::setup_activity_db;
    use crate::types::internal::pagination::PageRequest;
    use chrono::{Duration, TimeZone, Utc};

    async fn store_at(clock: Arc<ManualClock>) -> ActivityLogStore {
        ActivityLogStore::new(setup_activity_db().await, clock)
    }

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()))
    }

    fn record(actor: &str, status_code: u16) -> ActivityRecord {
        ActivityRecord {
            actor: actor.to_string(),
            endpoint: "/api/todo-lists".to_string(),
            method: "GET".to_string(),
            ip_address: Some("127.0.0.1".to_string()),
            user_agent: None,
            status_code,
            request: "{}".to_string(),
            duration_ms: 3,
        }
    }

    #[tokio::test]
    async fn test_write_records_outcome_from_status() {
        let store = store_at(clock()).await;
        store.write(record("user-1", 200)).await.unwrap();
        store.write(record("user-1", 403)).await.unwrap();

        let page = store.query(ActivityLogQuery::default()).await.unwrap();

        assert_eq!(page.total_count, 2);
        // newest first
        assert_eq!(page.items[0].result, "failure");
        assert_eq!(page.items[1].result, "success");
    }

    #[tokio::test]
    async fn test_query_filters_by_actor_and_outcome() {
        let store = store_at(clock()).await;
        store.write(record("user-1", 200)).await.unwrap();
        store.write(record("user-2", 500)).await.unwrap();
        store.write(record("user-2", 201)).await.unwrap();

        let page = store
            .query(ActivityLogQuery {
                actor: Some("user-2".to_string()),
                outcome: Some(RequestOutcome::Success),
                page: PageRequest::default(),
            })
            .await
            .unwrap();

        assert_eq!(page.total_count, 1);
        assert_eq!(page.items[0].status_code, 201);
    }

    #[tokio::test]
    async fn test_timestamps_come_from_the_clock() {
        let clock = clock();
        let store = store_at(clock.clone()).await;
        store.write(record("user-1", 200)).await.unwrap();
        clock.advance(Duration::minutes(5));
        store.write(record("user-1", 200)).await.unwrap();

        let page = store.query(ActivityLogQuery::default()).await.unwrap();

        assert_eq!(page.items[0].timestamp, "2025-03-01T09:05:00+00:00");
        assert_eq!(page.items[1].timestamp, "2025-03-01T09:00:00+00:00");
    }
}
