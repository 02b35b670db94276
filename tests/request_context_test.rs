use fashion_backend::providers::TokenProvider;
use fashion_backend::types::internal::context::{RequestContext, RequestSource};
use poem::Request;

fn token_provider() -> TokenProvider {
    TokenProvider::new(
        "integration-jwt-secret-at-least-32-chars",
        "integration-refresh-secret-32-chars-long",
    )
}

#[test]
fn test_request_context_new_defaults_to_api_source() {
    let ctx = RequestContext::new();

    assert_eq!(ctx.source, RequestSource::API);
    assert_eq!(ctx.actor_id, "unknown");
    assert!(!ctx.authenticated);
    assert!(ctx.claims.is_none());
}

#[test]
fn test_request_context_for_cli() {
    let ctx = RequestContext::for_cli("seed");

    assert_eq!(ctx.source, RequestSource::CLI);
    assert_eq!(ctx.actor_id, "cli:seed");
    assert!(ctx.ip_address.is_none());
    assert!(ctx.user_id().is_none());
}

#[test]
fn test_request_context_with_ip_address() {
    let ctx = RequestContext::new().with_ip_address("192.168.1.1".parse().unwrap());

    assert_eq!(ctx.ip_address, Some("192.168.1.1".parse().unwrap()));
    assert_eq!(ctx.source, RequestSource::API);
}

#[test]
fn test_valid_bearer_token_authenticates() {
    let provider = token_provider();
    let (token, _jti) = provider
        .create_access_token("user-42", "lena", "lena@example.com")
        .unwrap();
    let req = Request::builder()
        .header("Authorization", format!("Bearer {}", token))
        .header("X-Forwarded-For", "203.0.113.9")
        .finish();

    let ctx = RequestContext::from_request(&req, &provider);

    assert!(ctx.authenticated);
    assert_eq!(ctx.user_id(), Some("user-42"));
    assert_eq!(ctx.actor_id, "user-42");
    assert_eq!(ctx.ip_address, Some("203.0.113.9".parse().unwrap()));
}

#[test]
fn test_invalid_bearer_token_leaves_context_anonymous() {
    let req = Request::builder()
        .header("Authorization", "Bearer not-a-jwt")
        .finish();

    let ctx = RequestContext::from_request(&req, &token_provider());

    assert!(!ctx.authenticated);
    assert!(ctx.user_id().is_none());
    assert_eq!(ctx.actor_id, "unknown");
}
