use std::sync::Arc;

use poem::Request;
use poem_openapi::param::Query;
use poem_openapi::payload::Json;
use poem_openapi::{OpenApi, Tags};

use crate::api::access_guard::AccessGuard;
use crate::coordinators::ActivityLogCoordinator;
use crate::errors::{ApiError, DomainError, DomainErrors};
use crate::providers::authorization::permissions::routes;
use crate::types::dto::activity_logs::ActivityLogPageResponse;
use crate::types::internal::activity_log::{ActivityLogQuery, RequestOutcome};
use crate::types::internal::pagination::PageRequest;

/// Activity log endpoints
pub struct ActivityLogApi {
    guard: AccessGuard,
    coordinator: Arc<ActivityLogCoordinator>,
}

impl ActivityLogApi {
    pub fn new(guard: AccessGuard, coordinator: Arc<ActivityLogCoordinator>) -> Self {
        Self { guard, coordinator }
    }
}

#[derive(Tags)]
enum LogTags {
    /// Captured API calls
    ActivityLogs,
}

#[OpenApi(prefix_path = "/logs")]
impl ActivityLogApi {
    /// Captured calls, newest first; filter by actor and by `success` / `failure`
    #[oai(path = "/", method = "get", tag = "LogTags::ActivityLogs")]
    async fn query(
        &self,
        req: &Request,
        actor: Query<Option<String>>,
        result: Query<Option<String>>,
        page_number: Query<Option<u64>>,
        page_size: Query<Option<u64>>,
    ) -> Result<Json<ActivityLogPageResponse>, ApiError> {
        let ctx = self.guard.check(req, routes::LOGS_VIEW).await?;

        let outcome = match result.0.as_deref() {
            None => None,
            Some(value) => Some(RequestOutcome::parse(value).ok_or_else(|| {
                ApiError::from(DomainErrors::from(DomainError::validation(
                    "Result.Invalid",
                    format!("Result must be 'success' or 'failure', got '{}'", value),
                )))
            })?),
        };

        let page = self
            .coordinator
            .query(
                &ctx,
                ActivityLogQuery {
                    actor: actor.0,
                    outcome,
                    page: PageRequest::new(page_number.0, page_size.0),
                },
            )
            .await?;
        Ok(Json(page.into()))
    }
}
