use std::sync::Arc;
use std::time::Instant;

use poem::http::header;
use poem::{Endpoint, IntoResponse, Middleware, Request, Response, Result};
use poem_openapi::auth::{Bearer, BearerAuthorization};
use serde_json::{Map, Value};

use crate::providers::TokenProvider;
use crate::stores::ActivityLogStore;
use crate::types::internal::activity_log::ActivityRecord;
use crate::types::internal::context::extract_ip_address;

/// Upper bound of the stored request snapshot, in bytes
pub const MAX_REQUEST_SNAPSHOT: usize = 4096;

const REDACTED: &str = "[redacted]";

/// Keys whose values never reach the activity log
fn is_secret_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    key.contains("password") || key.contains("token") || key.contains("secret")
}

fn redact(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, v) in map.iter_mut() {
                if is_secret_key(key) {
                    *v = Value::String(REDACTED.to_string());
                } else {
                    redact(v);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact),
        _ => {}
    }
}

/// Decoded query pairs, as poem parses them for handlers
pub fn query_params(req: &Request) -> Vec<(String, String)> {
    req.params::<Vec<(String, String)>>().unwrap_or_else(|e| {
        tracing::debug!("Unparsable query string: {}", e);
        Vec::new()
    })
}

/// Path as the client sent it
///
/// Nesting strips the mount prefix from `uri`, so the original URI wins when
/// the server recorded one.
pub fn request_path(req: &Request) -> String {
    let original = req.original_uri().path();
    if original == "/" { req.uri().path() } else { original }.to_string()
}

/// Serialize decoded query pairs and body into a redacted, size-bounded snapshot
pub fn request_snapshot(query: &[(String, String)], content_type: Option<&str>, body: &[u8]) -> String {
    let mut snapshot = Map::new();

    if !query.is_empty() {
        let params: Map<String, Value> = query
            .iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect();
        snapshot.insert("query".to_string(), Value::Object(params));
    }

    if !body.is_empty() {
        let is_json = content_type.is_some_and(|ct| ct.contains("json"));
        let body_value = if is_json {
            serde_json::from_slice::<Value>(body).unwrap_or_else(|_| Value::String("<malformed json>".to_string()))
        } else {
            Value::String(format!("<{} bytes>", body.len()))
        };
        snapshot.insert("body".to_string(), body_value);
    }

    let mut snapshot = Value::Object(snapshot);
    redact(&mut snapshot);
    truncate(snapshot.to_string(), MAX_REQUEST_SNAPSHOT)
}

fn truncate(mut text: String, max: usize) -> String {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
    text
}

/// Records one activity log row per call; logging failures never fail the request
pub struct ActivityLogMiddleware {
    store: Arc<ActivityLogStore>,
    token_provider: Arc<TokenProvider>,
}

impl ActivityLogMiddleware {
    pub fn new(store: Arc<ActivityLogStore>, token_provider: Arc<TokenProvider>) -> Self {
        Self { store, token_provider }
    }
}

impl<E: Endpoint> Middleware<E> for ActivityLogMiddleware {
    type Output = ActivityLogEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        ActivityLogEndpoint {
            inner: ep,
            store: self.store.clone(),
            token_provider: self.token_provider.clone(),
        }
    }
}

pub struct ActivityLogEndpoint<E> {
    inner: E,
    store: Arc<ActivityLogStore>,
    token_provider: Arc<TokenProvider>,
}

impl<E: Endpoint> Endpoint for ActivityLogEndpoint<E> {
    type Output = Response;

    async fn call(&self, mut req: Request) -> Result<Self::Output> {
        let started = Instant::now();

        let actor = Bearer::from_request(&req)
            .ok()
            .and_then(|bearer| self.token_provider.validate_access_token(&bearer.token).ok())
            .map(|claims| claims.sub)
            .unwrap_or_else(|| "anonymous".to_string());
        let endpoint = request_path(&req);
        let method = req.method().to_string();
        let ip_address = extract_ip_address(&req).map(|ip| ip.to_string());
        let user_agent = req.header(header::USER_AGENT).map(str::to_string);

        let body = req.take_body().into_bytes().await?;
        let request = request_snapshot(&query_params(&req), req.content_type(), &body);
        req.set_body(body);

        let response = match self.inner.call(req).await {
            Ok(output) => output.into_response(),
            Err(err) => err.into_response(),
        };

        let record = ActivityRecord {
            actor,
            endpoint,
            method,
            ip_address,
            user_agent,
            status_code: response.status().as_u16(),
            request,
            duration_ms: started.elapsed().as_millis() as i64,
        };
        if let Err(e) = self.store.write(record).await {
            tracing::warn!("Failed to write activity log: {}", e);
        }

        Ok(response)
    }
}
