//! User repository interface

use async_trait::async_trait;

use super::model::User;
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user (id assigned by the store) or update an existing one.
    async fn save(&self, user: User) -> DomainResult<User>;

    /// Find user by ID
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<User>>;

    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    /// All registered users
    async fn find_all(&self) -> DomainResult<Vec<User>>;

    /// Total number of users
    async fn count(&self) -> DomainResult<u64>;
}
