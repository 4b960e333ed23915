//! Directory port for resolving user references.
//!
//! The task core never owns user records; it only needs to know whether an
//! assignee exists. The surrounding user service supplies this contract.

use crate::task::domain::UserId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for user directory lookups.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Minimal view of a user as seen by the task core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    /// User identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Unique email address.
    pub email: String,
}

/// User existence check supplied by the caller.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Resolves a user id to a user reference.
    ///
    /// Returns `None` when no such user exists.
    async fn resolve(&self, id: UserId) -> DirectoryResult<Option<UserRef>>;
}

/// Errors returned by user directory implementations.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// Lookup-layer failure.
    #[error("directory error: {0}")]
    Lookup(Arc<dyn std::error::Error + Send + Sync>),
}

impl DirectoryError {
    /// Wraps a lookup error.
    #[must_use]
    pub fn lookup(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Lookup(Arc::new(err))
    }
}
