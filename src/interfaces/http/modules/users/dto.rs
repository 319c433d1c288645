//! User DTOs

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::User;

/// User details in API responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// USER or ADMIN
    pub role: String,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role.as_str().to_string(),
        }
    }
}

/// Total number of registered users
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserCountDto {
    pub total_users: u64,
}
