use chrono::Utc;
use poem_openapi::{OpenApi, Tags, payload::Json};
use sea_orm::DatabaseConnection;

use crate::types::dto::common::HealthResponse;

/// Health check API
pub struct HealthApi {
    db: DatabaseConnection,
}

impl HealthApi {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[derive(Tags)]
enum HealthTags {
    /// Service status
    Health,
}

#[OpenApi]
impl HealthApi {
    /// Report service status; `degraded` when the database does not answer
    #[oai(path = "/health", method = "get", tag = "HealthTags::Health")]
    async fn health(&self) -> Json<HealthResponse> {
        let status = match self.db.ping().await {
            Ok(()) => "healthy",
            Err(e) => {
                tracing::warn!("Health check database ping failed: {}", e);
                "degraded"
            }
        };

        Json(HealthResponse {
            status: status.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::setup_main_db;

    #[tokio::test]
    async fn test_health_reports_healthy_database() {
        let api = HealthApi::new(setup_main_db().await);

        let response = api.health().await;

        assert_eq!(response.0.status, "healthy");
    }
}
