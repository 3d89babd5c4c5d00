//! User persistence collaborator trait

use async_trait::async_trait;

use super::entity::UserId;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Persistence capability the directory delegates deletes to
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserDao: Send + Sync {
    /// Delete a user, returning whether a record was removed
    async fn delete(&self, id: UserId) -> Result<bool, DomainError>;
}
