use std::net::IpAddr;

use poem::Request;
use poem_openapi::auth::{Bearer, BearerAuthorization};

use crate::providers::TokenProvider;
use crate::types::internal::auth::Claims;

use super::{request_id::RequestId, request_source::RequestSource};

/// Request context that flows through all layers
///
/// Contains contextual information about the current request that is needed
/// for authorization, audit stamping and logging across API, coordinator and
/// store layers.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// IP address of the client making the request
    pub ip_address: Option<IpAddr>,

    /// Unique identifier for this request (for tracing across layers)
    pub request_id: RequestId,

    /// Whether the request is authenticated (JWT validated successfully)
    pub authenticated: bool,

    /// Full JWT claims if authenticated
    pub claims: Option<Claims>,

    /// Where the request came from
    pub source: RequestSource,

    /// Actor who initiated the operation; stamped on audited rows
    pub actor_id: String,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestContext {
    /// Create an unauthenticated API context
    pub fn new() -> Self {
        Self {
            ip_address: None,
            request_id: RequestId::generate(),
            authenticated: false,
            claims: None,
            source: RequestSource::API,
            actor_id: "unknown".to_owned(),
        }
    }

    /// Create a RequestContext for CLI operations
    pub fn for_cli(command_name: &str) -> Self {
        Self {
            source: RequestSource::CLI,
            actor_id: format!("cli:{}", command_name),
            ..Self::new()
        }
    }

    /// Build the context for an incoming API request
    ///
    /// Extracts the client IP and, when a bearer token is present and valid,
    /// the claims. An invalid or expired token leaves the context
    /// unauthenticated; the authorization step reports it.
    pub fn from_request(req: &Request, token_provider: &TokenProvider) -> Self {
        let mut ctx = RequestContext::new();
        ctx.ip_address = extract_ip_address(req);

        if let Ok(bearer) = Bearer::from_request(req) {
            match token_provider.validate_access_token(&bearer.token) {
                Ok(claims) => {
                    let sub = claims.sub.clone();
                    ctx = ctx.with_auth(claims).with_actor_id(sub);
                }
                Err(e) => {
                    tracing::debug!("Bearer token rejected: {}", e);
                }
            }
        }

        tracing::trace!("Request context created: {:?}", ctx);
        ctx
    }

    /// Set the ip_address
    pub fn with_ip_address(mut self, ip_address: IpAddr) -> Self {
        self.ip_address = Some(ip_address);
        self
    }

    /// Set authentication state with claims
    pub fn with_auth(mut self, claims: Claims) -> Self {
        self.authenticated = true;
        self.claims = Some(claims);
        self
    }

    /// Set the actor_id
    pub fn with_actor_id(mut self, actor_id: impl Into<String>) -> Self {
        self.actor_id = actor_id.into();
        self
    }

    /// Authenticated user id, if any
    pub fn user_id(&self) -> Option<&str> {
        if !self.authenticated {
            return None;
        }
        self.claims.as_ref().map(|c| c.sub.as_str())
    }
}

/// Extract IP address from request headers
///
/// Checks X-Forwarded-For, X-Real-IP, and falls back to remote address.
pub fn extract_ip_address(req: &Request) -> Option<IpAddr> {
    // Check X-Forwarded-For header (proxy/load balancer)
    if let Some(forwarded) = req.header("X-Forwarded-For") {
        if let Some(ip) = forwarded.split(',').next() {
            if let Ok(ip) = ip.trim().parse() {
                return Some(ip);
            }
        }
    }

    // Check X-Real-IP header (nginx)
    if let Some(real_ip) = req.header("X-Real-IP") {
        if let Ok(ip) = real_ip.trim().parse() {
            return Some(ip);
        }
    }

    // Fall back to remote address
    req.remote_addr().as_socket_addr().map(|addr| addr.ip())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forwarded_for_takes_first_address() {
        let req = Request::builder()
            .header("X-Forwarded-For", "203.0.113.7, 10.0.0.1")
            .finish();

        assert_eq!(extract_ip_address(&req), Some("203.0.113.7".parse().unwrap()));
    }

    #[test]
    fn test_real_ip_used_when_forwarded_for_missing() {
        let req = Request::builder().header("X-Real-IP", "198.51.100.2").finish();

        assert_eq!(extract_ip_address(&req), Some("198.51.100.2".parse().unwrap()));
    }

    #[test]
    fn test_user_id_requires_authentication() {
        let mut ctx = RequestContext::new();
        ctx.claims = Some(Claims {
            sub: "user-1".to_string(),
            name: "ada".to_string(),
            email: "ada@example.com".to_string(),
            exp: 0,
            iat: 0,
            jti: "jti".to_string(),
        });

        assert_eq!(ctx.user_id(), None);
        assert_eq!(ctx.clone().with_auth(ctx.claims.clone().unwrap()).user_id(), Some("user-1"));
    }
}
