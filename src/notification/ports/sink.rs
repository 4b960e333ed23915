//! Sink port for notification persistence and delivery.

use crate::notification::domain::{Notification, NotificationDraft};
use crate::task::domain::{TaskId, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for notification sink operations.
pub type SinkResult<T> = Result<T, SinkError>;

/// External collaborator that persists and delivers notifications.
///
/// The core treats the sink as fire-and-forget: a rejected write never rolls
/// back the task mutation that produced the draft. The one synchronous
/// obligation is `delete_by_task`, invoked as part of task deletion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Persists a draft, returning the materialized notification.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] when the sink rejects the write or is
    /// unavailable.
    async fn create(&self, draft: NotificationDraft) -> SinkResult<Notification>;

    /// Removes every notification referencing the given task.
    ///
    /// Returns the number of notifications removed.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] when the sink is unavailable.
    async fn delete_by_task(&self, task_id: TaskId) -> SinkResult<u64>;

    /// Removes every notification addressed to the given user.
    ///
    /// Returns the number of notifications removed.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] when the sink is unavailable.
    async fn delete_by_user(&self, user_id: UserId) -> SinkResult<u64>;
}

/// Errors returned by notification sink implementations.
#[derive(Debug, Clone, Error)]
pub enum SinkError {
    /// The sink refused the write.
    #[error("notification rejected: {0}")]
    Rejected(String),

    /// The sink could not be reached.
    #[error("notification sink unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl SinkError {
    /// Wraps an availability error.
    #[must_use]
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
