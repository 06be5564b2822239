use std::net::IpAddr;

use uuid::Uuid;

use crate::types::internal::auth::Claims;

use super::request_source::RequestSource;

/// Request context that flows from the API layer into coordinators
///
/// Carries the validated JWT claims (if any) so coordinators can resolve the
/// caller; stores never see it.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// IP address of the client making the request
    pub ip_address: Option<IpAddr>,

    /// Unique identifier for this request (for tracing across layers)
    pub request_id: Uuid,

    /// Whether a bearer token was presented and validated
    pub authenticated: bool,

    /// Full JWT claims if authenticated
    pub claims: Option<Claims>,

    /// Source of the request (API or CLI)
    pub source: RequestSource,

    /// Actor who initiated the operation, for log lines
    pub actor_id: String,
}

impl RequestContext {
    /// Create an anonymous API context
    pub fn new() -> Self {
        Self {
            ip_address: None,
            request_id: Uuid::new_v4(),
            authenticated: false,
            claims: None,
            source: RequestSource::API,
            actor_id: "anonymous".to_string(),
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

    pub fn with_ip_address(mut self, ip_address: Option<IpAddr>) -> Self {
        self.ip_address = ip_address;
        self
    }

    /// Set authentication state with claims
    pub fn with_auth(mut self, claims: Claims) -> Self {
        self.authenticated = true;
        self.actor_id = format!("user:{}", claims.sub);
        self.claims = Some(claims);
        self
    }

    /// Id of the authenticated caller
    pub fn user_id(&self) -> Option<i32> {
        self.claims.as_ref().and_then(Claims::user_id)
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
