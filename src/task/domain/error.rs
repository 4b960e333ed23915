//! Error types for task domain validation and state transitions.

use super::{TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task title exceeds the persisted length limit.
    #[error("task title is {0} characters, maximum is 100")]
    TitleTooLong(usize),

    /// The task description exceeds the persisted length limit.
    #[error("task description is {0} characters, maximum is 500")]
    DescriptionTooLong(usize),

    /// The due date is not strictly in the future.
    #[error("due date cannot be in the past")]
    DueDateNotInFuture,

    /// The requested status change is not a legal edge of the task
    /// state machine.
    #[error("task {task_id}: invalid status transition {from} -> {to}")]
    InvalidStatusTransition {
        /// Task whose transition was rejected.
        task_id: TaskId,
        /// Status the task currently holds.
        from: TaskStatus,
        /// Status that was requested.
        to: TaskStatus,
    },
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task priorities from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParseTaskPriorityError(pub String);
