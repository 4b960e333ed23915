//! Domain events emitted by accepted task mutations.
//!
//! Events form a closed vocabulary: the notification dispatcher matches them
//! exhaustively, so adding a kind is a compile-time-checked exercise. Events
//! carry a snapshot of the task at emission time rather than the live
//! aggregate, and are handed to the dispatcher in emission order.

use super::{Task, TaskId, TaskPriority, TaskStatus, TaskTitle, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable view of a task captured when an event was emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    /// Identifier of the task the event concerns.
    pub task_id: TaskId,
    /// Task title at emission time.
    pub title: TaskTitle,
    /// Task status at emission time.
    pub status: TaskStatus,
    /// Task priority at emission time.
    pub priority: TaskPriority,
}

impl TaskSnapshot {
    /// Captures a snapshot of the given task.
    #[must_use]
    pub fn of(task: &Task) -> Self {
        Self {
            task_id: task.id(),
            title: task.title().clone(),
            status: task.status(),
            priority: task.priority(),
        }
    }
}

/// Signal emitted by the task state machine on a successful mutation.
///
/// Every variant carries exactly one recipient; fan-out to several users is
/// expressed as several events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A task was created.
    TaskCreated {
        /// Task state at creation.
        task: TaskSnapshot,
        /// User the notification is addressed to.
        recipient: UserId,
        /// Emission timestamp.
        occurred_at: DateTime<Utc>,
    },
    /// A task was assigned to a user.
    TaskAssigned {
        /// Task state after assignment.
        task: TaskSnapshot,
        /// The new assignee.
        recipient: UserId,
        /// Emission timestamp.
        occurred_at: DateTime<Utc>,
    },
    /// A task status changed to a new legal state.
    TaskStatusChanged {
        /// Task state after the transition.
        task: TaskSnapshot,
        /// The current assignee.
        recipient: UserId,
        /// Emission timestamp.
        occurred_at: DateTime<Utc>,
    },
    /// A task reached the completed state.
    ///
    /// Always preceded by the [`DomainEvent::TaskStatusChanged`] event of the
    /// same transition.
    TaskCompleted {
        /// Task state after completion.
        task: TaskSnapshot,
        /// The current assignee.
        recipient: UserId,
        /// Emission timestamp.
        occurred_at: DateTime<Utc>,
    },
    /// A task was reassigned away from the recipient.
    ///
    /// Informational event addressed to the previous assignee; the status is
    /// reported to them with the synthetic `reassigned` label.
    TaskReassigned {
        /// Task state after reassignment.
        task: TaskSnapshot,
        /// The previous assignee.
        recipient: UserId,
        /// Emission timestamp.
        occurred_at: DateTime<Utc>,
    },
    /// Non-status task fields were updated.
    TaskUpdated {
        /// Task state after the update.
        task: TaskSnapshot,
        /// The current assignee.
        recipient: UserId,
        /// Emission timestamp.
        occurred_at: DateTime<Utc>,
    },
    /// A task is due within the next 24 hours.
    TaskDueSoon {
        /// Task state at scan time.
        task: TaskSnapshot,
        /// The current assignee.
        recipient: UserId,
        /// Emission timestamp.
        occurred_at: DateTime<Utc>,
    },
    /// A task is past its due date.
    TaskOverdue {
        /// Task state at scan time.
        task: TaskSnapshot,
        /// The current assignee.
        recipient: UserId,
        /// Emission timestamp.
        occurred_at: DateTime<Utc>,
    },
    /// A user account was registered.
    ///
    /// Emitted by the account layer outside this crate; the variant lives
    /// here so the dispatcher's mapping stays exhaustive.
    UserRegistered {
        /// Display name of the new user.
        user_name: String,
        /// The new user.
        recipient: UserId,
        /// Emission timestamp.
        occurred_at: DateTime<Utc>,
    },
}

impl DomainEvent {
    /// Creates a registration event for a new user account.
    #[must_use]
    pub fn user_registered(
        user_name: impl Into<String>,
        recipient: UserId,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self::UserRegistered {
            user_name: user_name.into(),
            recipient,
            occurred_at,
        }
    }

    /// Returns the user the event is addressed to.
    #[must_use]
    pub const fn recipient(&self) -> UserId {
        match self {
            Self::TaskCreated { recipient, .. }
            | Self::TaskAssigned { recipient, .. }
            | Self::TaskStatusChanged { recipient, .. }
            | Self::TaskCompleted { recipient, .. }
            | Self::TaskReassigned { recipient, .. }
            | Self::TaskUpdated { recipient, .. }
            | Self::TaskDueSoon { recipient, .. }
            | Self::TaskOverdue { recipient, .. }
            | Self::UserRegistered { recipient, .. } => *recipient,
        }
    }

    /// Returns the emission timestamp.
    #[must_use]
    pub const fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::TaskCreated { occurred_at, .. }
            | Self::TaskAssigned { occurred_at, .. }
            | Self::TaskStatusChanged { occurred_at, .. }
            | Self::TaskCompleted { occurred_at, .. }
            | Self::TaskReassigned { occurred_at, .. }
            | Self::TaskUpdated { occurred_at, .. }
            | Self::TaskDueSoon { occurred_at, .. }
            | Self::TaskOverdue { occurred_at, .. }
            | Self::UserRegistered { occurred_at, .. } => *occurred_at,
        }
    }

    /// Returns the task snapshot carried by the event, if any.
    #[must_use]
    pub const fn task(&self) -> Option<&TaskSnapshot> {
        match self {
            Self::TaskCreated { task, .. }
            | Self::TaskAssigned { task, .. }
            | Self::TaskStatusChanged { task, .. }
            | Self::TaskCompleted { task, .. }
            | Self::TaskReassigned { task, .. }
            | Self::TaskUpdated { task, .. }
            | Self::TaskDueSoon { task, .. }
            | Self::TaskOverdue { task, .. } => Some(task),
            Self::UserRegistered { .. } => None,
        }
    }

    /// Returns a stable name for the event kind, used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::TaskCreated { .. } => "task_created",
            Self::TaskAssigned { .. } => "task_assigned",
            Self::TaskStatusChanged { .. } => "task_status_changed",
            Self::TaskCompleted { .. } => "task_completed",
            Self::TaskReassigned { .. } => "task_reassigned",
            Self::TaskUpdated { .. } => "task_updated",
            Self::TaskDueSoon { .. } => "task_due_soon",
            Self::TaskOverdue { .. } => "task_overdue",
            Self::UserRegistered { .. } => "user_registered",
        }
    }
}
