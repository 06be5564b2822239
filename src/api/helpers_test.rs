use std::net::IpAddr;
use std::sync::Arc;

use poem::Request;
use poem_openapi::auth::Bearer;

use crate::api::helpers::*;
use crate::config::{MockEnvironment, SecretManager};
use crate::providers::TokenProvider;

fn token_provider() -> TokenProvider {
    let secrets = SecretManager::from_env_provider(&MockEnvironment::with_test_secrets()).unwrap();
    TokenProvider::new(Arc::new(secrets))
}

#[test]
fn test_extract_ip_from_x_forwarded_for() {
    let req = Request::builder()
        .header("X-Forwarded-For", "192.168.1.1, 10.0.0.1")
        .finish();

    assert_eq!(extract_ip_address(&req), Some("192.168.1.1".parse::<IpAddr>().unwrap()));
}

#[test]
fn test_extract_ip_from_x_real_ip() {
    let req = Request::builder().header("X-Real-IP", "192.168.1.2").finish();

    assert_eq!(extract_ip_address(&req), Some("192.168.1.2".parse::<IpAddr>().unwrap()));
}

#[test]
fn test_extract_ip_without_headers_is_none() {
    // No socket address in a built request
    let req = Request::builder().finish();

    assert_eq!(extract_ip_address(&req), None);
}

#[test]
fn test_create_request_context_with_valid_jwt() {
    let provider = token_provider();
    let (jwt, _jti) = provider.generate_jwt(7).unwrap();
    let req = Request::builder().finish();

    let ctx = create_request_context(&req, Some(&BearerAuth(Bearer { token: jwt })), &provider);

    assert!(ctx.authenticated);
    assert_eq!(ctx.user_id(), Some(7));
    assert_eq!(ctx.actor_id, "user:7");
}

#[test]
fn test_create_request_context_with_invalid_jwt() {
    let provider = token_provider();
    let req = Request::builder().finish();
    let auth = BearerAuth(Bearer { token: "invalid-jwt-token".to_string() });

    let ctx = create_request_context(&req, Some(&auth), &provider);

    assert!(!ctx.authenticated);
    assert!(ctx.claims.is_none());
}

#[test]
fn test_create_request_context_without_auth() {
    let provider = token_provider();
    let req = Request::builder().finish();

    let ctx = create_request_context(&req, None, &provider);

    assert!(!ctx.authenticated);
    assert_eq!(ctx.actor_id, "anonymous");
}
