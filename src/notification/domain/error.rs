//! Error types for notification domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing notification values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotificationDomainError {
    /// The notification title is empty after trimming.
    #[error("notification title must not be empty")]
    EmptyTitle,

    /// The notification title exceeds the persisted length limit.
    #[error("notification title is {0} characters, maximum is 100")]
    TitleTooLong(usize),

    /// The notification message is empty after trimming.
    #[error("notification message must not be empty")]
    EmptyMessage,

    /// The notification message exceeds the persisted length limit.
    #[error("notification message is {0} characters, maximum is 500")]
    MessageTooLong(usize),
}

/// Error returned while parsing notification types from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown notification type: {0}")]
pub struct ParseNotificationTypeError(pub String);
