use std::net::IpAddr;

use poem::Request;
use poem_openapi::SecurityScheme;
use poem_openapi::auth::Bearer;

use crate::providers::TokenProvider;
use crate::types::internal::context::RequestContext;

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(ty = "bearer", bearer_format = "JWT")]
pub struct BearerAuth(pub Bearer);

/// Client IP, preferring proxy headers over the socket address
pub fn extract_ip_address(req: &Request) -> Option<IpAddr> {
    // Check X-Forwarded-For header (proxy/load balancer)
    if let Some(forwarded) = req.header("X-Forwarded-For") {
        if let Some(ip) = forwarded.split(',').next() {
            return ip.trim().parse().ok();
        }
    }

    // Check X-Real-IP header (nginx)
    if let Some(real_ip) = req.header("X-Real-IP") {
        return real_ip.trim().parse().ok();
    }

    req.remote_addr().as_socket_addr().map(|addr| addr.ip())
}

/// Build the RequestContext for an incoming request
///
/// A token that fails validation leaves the context unauthenticated; the
/// coordinator decides whether that is an error.
pub fn create_request_context(req: &Request, auth: Option<&BearerAuth>, token_provider: &TokenProvider) -> RequestContext {
    let ctx = RequestContext::new().with_ip_address(extract_ip_address(req));

    let Some(auth) = auth else {
        return ctx;
    };

    match token_provider.validate_jwt(&auth.0.token) {
        Ok(claims) => ctx.with_auth(claims),
        Err(e) => {
            tracing::debug!(request_id = %ctx.request_id, "Bearer token rejected: {}", e);
            ctx
        }
    }
}
