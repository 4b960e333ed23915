//! Notification records and the drafts the dispatcher produces.

use super::error::{NotificationDomainError, ParseNotificationTypeError};
use crate::task::domain::{TaskId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Maximum title length accepted by the persisted schema.
const TITLE_MAX_CHARS: usize = 100;

/// Unique identifier for a notification record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(Uuid);

impl NotificationId {
    /// Creates a new random notification identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a notification identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Presentation category of a notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    /// General informational message.
    #[default]
    Info,
    /// Something needs attention soon.
    Warning,
    /// Something went wrong.
    Error,
    /// Something finished well.
    Success,
    /// Task lifecycle message.
    Task,
    /// Due-date reminder.
    Reminder,
    /// Account welcome message.
    Welcome,
}

impl NotificationType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Success => "success",
            Self::Task => "task",
            Self::Reminder => "reminder",
            Self::Welcome => "welcome",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for NotificationType {
    type Error = ParseNotificationTypeError;

    fn try_from(value: &str) -> Result<Self, ParseNotificationTypeError> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "info" => Ok(Self::Info),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "success" => Ok(Self::Success),
            "task" => Ok(Self::Task),
            "reminder" => Ok(Self::Reminder),
            "welcome" => Ok(Self::Welcome),
            _ => Err(ParseNotificationTypeError(value.to_owned())),
        }
    }
}

/// Addressed notification content before the sink assigns identity and
/// timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationDraft {
    /// Recipient of the notification. Exactly one per draft.
    pub user_id: UserId,
    /// Short headline.
    pub title: String,
    /// Message body.
    pub message: String,
    /// Presentation category.
    #[serde(rename = "type")]
    pub kind: NotificationType,
    /// Task the notification refers to, when task-derived.
    pub related_task: Option<TaskId>,
}

impl NotificationDraft {
    /// Maximum message length accepted by the persisted schema.
    pub const MESSAGE_MAX_CHARS: usize = 500;

    /// Creates a validated draft.
    ///
    /// # Errors
    ///
    /// Returns a [`NotificationDomainError`] when the title or message is
    /// empty after trimming or exceeds its length limit (100 and 500
    /// characters respectively).
    pub fn new(
        user_id: UserId,
        title: impl Into<String>,
        message: impl Into<String>,
        kind: NotificationType,
    ) -> Result<Self, NotificationDomainError> {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(NotificationDomainError::EmptyTitle);
        }
        let title_length = title.chars().count();
        if title_length > TITLE_MAX_CHARS {
            return Err(NotificationDomainError::TitleTooLong(title_length));
        }

        let message = message.into().trim().to_owned();
        if message.is_empty() {
            return Err(NotificationDomainError::EmptyMessage);
        }
        let message_length = message.chars().count();
        if message_length > Self::MESSAGE_MAX_CHARS {
            return Err(NotificationDomainError::MessageTooLong(message_length));
        }

        Ok(Self {
            user_id,
            title,
            message,
            kind,
            related_task: None,
        })
    }

    /// Links the draft to the task it was derived from.
    #[must_use]
    pub const fn with_related_task(mut self, task_id: TaskId) -> Self {
        self.related_task = Some(task_id);
        self
    }
}

/// Persisted notification record.
///
/// Immutable except for the read flag and `updated_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    id: NotificationId,
    user_id: UserId,
    title: String,
    message: String,
    #[serde(rename = "type")]
    kind: NotificationType,
    read: bool,
    related_task: Option<TaskId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Notification {
    /// Materializes a draft into an unread notification record.
    #[must_use]
    pub fn from_draft(draft: NotificationDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id: NotificationId::new(),
            user_id: draft.user_id,
            title: draft.title,
            message: draft.message,
            kind: draft.kind,
            read: false,
            related_task: draft.related_task,
            created_at,
            updated_at: created_at,
        }
    }

    /// Returns the notification identifier.
    #[must_use]
    pub const fn id(&self) -> NotificationId {
        self.id
    }

    /// Returns the recipient.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the headline.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the message body.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the presentation category.
    #[must_use]
    pub const fn kind(&self) -> NotificationType {
        self.kind
    }

    /// Returns whether the recipient has read the notification.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        self.read
    }

    /// Returns the related task, when task-derived.
    #[must_use]
    pub const fn related_task(&self) -> Option<TaskId> {
        self.related_task
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Marks the notification as read.
    pub fn mark_read(&mut self, now: DateTime<Utc>) {
        self.read = true;
        self.updated_at = now;
    }

    /// Marks the notification as unread.
    pub fn mark_unread(&mut self, now: DateTime<Utc>) {
        self.read = false;
        self.updated_at = now;
    }
}
