use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::activity_log;
use crate::types::internal::PaginatedList;

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ActivityLogResponse {
    pub id: i64,
    /// RFC 3339 timestamp
    pub timestamp: String,
    pub actor: String,
    pub endpoint: String,
    pub method: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub status_code: i32,
    /// `success` or `failure`
    pub result: String,
    /// Serialized request with secrets redacted
    pub request: String,
    pub duration_ms: i64,
}

impl From<activity_log::Model> for ActivityLogResponse {
    fn from(model: activity_log::Model) -> Self {
        Self {
            id: model.id,
            timestamp: model.timestamp,
            actor: model.actor,
            endpoint: model.endpoint,
            method: model.method,
            ip_address: model.ip_address,
            user_agent: model.user_agent,
            status_code: model.status_code,
            result: model.result,
            request: model.request,
            duration_ms: model.duration_ms,
        }
    }
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ActivityLogPageResponse {
    pub items: Vec<ActivityLogResponse>,
    pub page_number: u64,
    pub total_pages: u64,
    pub total_count: u64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl From<PaginatedList<activity_log::Model>> for ActivityLogPageResponse {
    fn from(page: PaginatedList<activity_log::Model>) -> Self {
        Self {
            has_previous_page: page.has_previous_page(),
            has_next_page: page.has_next_page(),
            page_number: page.page_number,
            total_pages: page.total_pages,
            total_count: page.total_count,
            items: page.items.into_iter().map(ActivityLogResponse::from).collect(),
        }
    }
}
