//! User query service

use std::sync::Arc;

use crate::domain::{DomainResult, RepositoryProvider, User};

pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn all_users(&self) -> DomainResult<Vec<User>> {
        self.repos.users().find_all().await
    }

    pub async fn total_users(&self) -> DomainResult<u64> {
        self.repos.users().count().await
    }

    pub async fn user_by_id(&self, id: i64) -> DomainResult<Option<User>> {
        self.repos.users().find_by_id(id).await
    }

    pub async fn user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        self.repos.users().find_by_email(email).await
    }
}
