use std::sync::Arc;

use crate::app_data::AppData;
use crate::errors::DomainResult;
use crate::stores::ActivityLogStore;
use crate::types::db::activity_log;
use crate::types::internal::RequestContext;
use crate::types::internal::activity_log::ActivityLogQuery;
use crate::types::internal::pagination::PaginatedList;

/// Read side of the activity log
pub struct ActivityLogCoordinator {
    activity_log_store: Arc<ActivityLogStore>,
}

impl ActivityLogCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            activity_log_store: app_data.activity_log_store.clone(),
        }
    }

    pub async fn query(
        &self,
        _ctx: &RequestContext,
        query: ActivityLogQuery,
    ) -> DomainResult<PaginatedList<activity_log::Model>> {
        Ok(self.activity_log_store.query(query).await?)
    }
}
