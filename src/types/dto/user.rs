use poem_openapi::Object;

use crate::types::db::role::{self, RoleName};
use crate::types::db::user;
use crate::types::internal::catalog::Page;

/// Public view of an account
#[derive(Object, Debug, Clone)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Absent when the account's role was removed
    pub role: Option<RoleName>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl UserResponse {
    pub fn from_model(user: user::Model, role: Option<RoleName>) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// One page of accounts
#[derive(Object, Debug)]
pub struct UserPageResponse {
    pub items: Vec<UserResponse>,
    pub total: u64,
    pub page: u64,
    pub pages: u64,
}

impl From<Page<UserResponse>> for UserPageResponse {
    fn from(page: Page<UserResponse>) -> Self {
        Self {
            items: page.items,
            total: page.total,
            page: page.page,
            pages: page.pages,
        }
    }
}

#[derive(Object, Debug)]
pub struct RoleResponse {
    pub id: i32,
    pub role: RoleName,
    pub created_at: i64,
}

impl From<role::Model> for RoleResponse {
    fn from(model: role::Model) -> Self {
        Self {
            id: model.id,
            role: model.role,
            created_at: model.created_at,
        }
    }
}
