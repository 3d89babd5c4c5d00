//! In-memory user DAO implementation

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{User, UserDao, UserId};
use crate::domain::DomainError;

/// In-memory implementation of UserDao that tracks known user IDs
#[derive(Debug, Default)]
pub struct InMemoryUserDao {
    ids: Arc<RwLock<HashSet<UserId>>>,
}

impl InMemoryUserDao {
    /// Create a new empty DAO
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a DAO that knows the given users
    pub fn with_users(users: &[User]) -> Self {
        let ids = users.iter().map(User::id).collect();

        Self {
            ids: Arc::new(RwLock::new(ids)),
        }
    }

    #[cfg(test)]
    async fn contains(&self, id: UserId) -> bool {
        self.ids.read().await.contains(&id)
    }
}

#[async_trait]
impl UserDao for InMemoryUserDao {
    async fn delete(&self, id: UserId) -> Result<bool, DomainError> {
        let mut ids = self.ids.write().await;
        Ok(ids.remove(&id))
    }
}
