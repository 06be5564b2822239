use crate::types::db::role::RoleName;

/// Fields for a new account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub role: RoleName,
}

/// Partial account update; `None` leaves a field untouched
///
/// `role`, `is_active` and `password` are only set by admin operations.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<RoleName>,
    pub is_active: Option<bool>,
    pub password: Option<String>,
}
