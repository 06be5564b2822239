use serde::{Deserialize, Serialize};

use crate::types::db::role::RoleName;

/// JWT Claims structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// JWT ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl Claims {
    /// Numeric user id carried in `sub`, if it parses
    pub fn user_id(&self) -> Option<i32> {
        self.sub.parse().ok()
    }
}

/// The caller behind a validated bearer token, resolved against the users table
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub role: Option<RoleName>,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        is_admin(self)
    }
}

/// The single capability check used for every admin-gated operation
pub fn is_admin(user: &AuthenticatedUser) -> bool {
    matches!(user.role, Some(RoleName::Admin))
}
