use poem_openapi::{ApiResponse, Object, payload::Json};

use crate::types::db::role::RoleName;
use crate::types::dto::user::UserResponse;
use crate::types::internal::account::{NewUser, UserUpdate};

/// Create an account with any role
#[derive(Object, Debug)]
pub struct AdminCreateUserRequest {
    pub username: String,
    pub email: String,
    #[oai(default)]
    pub first_name: String,
    #[oai(default)]
    pub last_name: String,
    pub password: String,
    /// Defaults to `user`
    pub role: Option<RoleName>,
}

impl From<AdminCreateUserRequest> for NewUser {
    fn from(request: AdminCreateUserRequest) -> Self {
        Self {
            username: request.username,
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
            password: request.password,
            role: request.role.unwrap_or(RoleName::User),
        }
    }
}

/// Partial account update; omitted fields stay unchanged
#[derive(Object, Debug, Default)]
pub struct AdminUpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<RoleName>,
    pub is_active: Option<bool>,
    pub password: Option<String>,
}

impl From<AdminUpdateUserRequest> for UserUpdate {
    fn from(request: AdminUpdateUserRequest) -> Self {
        Self {
            username: request.username,
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
            role: request.role,
            is_active: request.is_active,
            password: request.password,
        }
    }
}

#[derive(ApiResponse)]
pub enum CreateUserApiResponse {
    /// Account created
    #[oai(status = 201)]
    Created(Json<UserResponse>),
}
