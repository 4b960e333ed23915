//! In-memory user directory for tests and demos.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::UserId,
    ports::{DirectoryError, DirectoryResult, UserDirectory, UserRef},
};

/// Thread-safe in-memory user directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    users: Arc<RwLock<HashMap<UserId, UserRef>>>,
}

impl InMemoryUserDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Lookup`] when the lock is poisoned.
    pub fn register(
        &self,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> DirectoryResult<UserId> {
        let mut users = self
            .users
            .write()
            .map_err(|err| DirectoryError::lookup(std::io::Error::other(err.to_string())))?;
        let id = UserId::new();
        users.insert(
            id,
            UserRef {
                id,
                name: name.into(),
                email: email.into(),
            },
        );
        Ok(id)
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn resolve(&self, id: UserId) -> DirectoryResult<Option<UserRef>> {
        let users = self
            .users
            .read()
            .map_err(|err| DirectoryError::lookup(std::io::Error::other(err.to_string())))?;
        Ok(users.get(&id).cloned())
    }
}
