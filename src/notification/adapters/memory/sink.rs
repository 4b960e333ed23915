//! In-memory notification sink for tests and demos.

use async_trait::async_trait;
use mockable::Clock;
use std::sync::{Arc, RwLock};

use crate::notification::{
    domain::{Notification, NotificationDraft, NotificationId},
    ports::{NotificationSink, SinkError, SinkResult},
};
use crate::task::domain::{TaskId, UserId};

/// Thread-safe in-memory notification sink.
///
/// Besides the sink port it exposes the query helpers the surrounding
/// notification service offers its users: per-user listing, unread counts,
/// and read-state changes.
#[derive(Debug, Clone)]
pub struct InMemoryNotificationSink<C>
where
    C: Clock + Send + Sync,
{
    notifications: Arc<RwLock<Vec<Notification>>>,
    clock: Arc<C>,
}

impl<C> InMemoryNotificationSink<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty sink.
    #[must_use]
    pub fn new(clock: Arc<C>) -> Self {
        Self {
            notifications: Arc::new(RwLock::new(Vec::new())),
            clock,
        }
    }

    /// Returns all stored notifications in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Unavailable`] when the lock is poisoned.
    pub fn all(&self) -> SinkResult<Vec<Notification>> {
        let notifications = read_lock(&self.notifications)?;
        Ok(notifications.clone())
    }

    /// Returns the notifications addressed to a user, in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Unavailable`] when the lock is poisoned.
    pub fn for_user(&self, user_id: UserId) -> SinkResult<Vec<Notification>> {
        let notifications = read_lock(&self.notifications)?;
        Ok(notifications
            .iter()
            .filter(|notification| notification.user_id() == user_id)
            .cloned()
            .collect())
    }

    /// Returns how many unread notifications a user has.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Unavailable`] when the lock is poisoned.
    pub fn unread_count(&self, user_id: UserId) -> SinkResult<usize> {
        let notifications = read_lock(&self.notifications)?;
        Ok(notifications
            .iter()
            .filter(|notification| notification.user_id() == user_id && !notification.is_read())
            .count())
    }

    /// Marks a notification as read.
    ///
    /// Returns the updated record, or `None` when no such notification
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Unavailable`] when the lock is poisoned.
    pub fn mark_read(&self, id: NotificationId) -> SinkResult<Option<Notification>> {
        let mut notifications = write_lock(&self.notifications)?;
        let updated = notifications
            .iter_mut()
            .find(|notification| notification.id() == id)
            .map(|notification| {
                notification.mark_read(self.clock.utc());
                notification.clone()
            });
        Ok(updated)
    }
}

#[async_trait]
impl<C> NotificationSink for InMemoryNotificationSink<C>
where
    C: Clock + Send + Sync,
{
    async fn create(&self, draft: NotificationDraft) -> SinkResult<Notification> {
        let notification = Notification::from_draft(draft, self.clock.utc());
        let mut notifications = write_lock(&self.notifications)?;
        notifications.push(notification.clone());
        Ok(notification)
    }

    async fn delete_by_task(&self, task_id: TaskId) -> SinkResult<u64> {
        let mut notifications = write_lock(&self.notifications)?;
        let before = notifications.len();
        notifications.retain(|notification| notification.related_task() != Some(task_id));
        Ok(removed_count(before, notifications.len()))
    }

    async fn delete_by_user(&self, user_id: UserId) -> SinkResult<u64> {
        let mut notifications = write_lock(&self.notifications)?;
        let before = notifications.len();
        notifications.retain(|notification| notification.user_id() != user_id);
        Ok(removed_count(before, notifications.len()))
    }
}

/// Computes how many records a retain pass removed.
fn removed_count(before: usize, after: usize) -> u64 {
    u64::try_from(before.saturating_sub(after)).unwrap_or(u64::MAX)
}

/// Acquires the read lock, mapping poison to a sink error.
fn read_lock(
    notifications: &RwLock<Vec<Notification>>,
) -> SinkResult<std::sync::RwLockReadGuard<'_, Vec<Notification>>> {
    notifications
        .read()
        .map_err(|err| SinkError::unavailable(std::io::Error::other(err.to_string())))
}

/// Acquires the write lock, mapping poison to a sink error.
fn write_lock(
    notifications: &RwLock<Vec<Notification>>,
) -> SinkResult<std::sync::RwLockWriteGuard<'_, Vec<Notification>>> {
    notifications
        .write()
        .map_err(|err| SinkError::unavailable(std::io::Error::other(err.to_string())))
}
