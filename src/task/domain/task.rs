//! Task aggregate root and the status state machine.

use super::{
    DomainEvent, TaskDescription, TaskDomainError, TaskId, TaskPriority, TaskSnapshot, TaskTitle,
    UserId, error::ParseTaskStatusError,
};
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Task has been created but work has not started.
    Pending,
    /// Task is being worked on.
    InProgress,
    /// Task work is finished. Terminal.
    Completed,
    /// Task was cancelled; may be re-opened to pending.
    Cancelled,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns whether transition to `target` is a legal edge.
    ///
    /// A same-status request is not an edge; callers treat it as a no-op
    /// before consulting this table.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::InProgress | Self::Cancelled)
                | (
                    Self::InProgress,
                    Self::Completed | Self::Cancelled | Self::Pending
                )
                | (Self::Cancelled, Self::Pending)
        )
    }

    /// Returns whether the status has no outgoing edges.
    ///
    /// Only `completed` is terminal; `cancelled` can re-open to pending.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Validated field values for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskData {
    /// Task title.
    pub title: TaskTitle,
    /// Task description; empty when the caller supplied none.
    pub description: TaskDescription,
    /// Task priority.
    pub priority: TaskPriority,
    /// User the task is assigned to. Existence is checked by the caller.
    pub assigned_to: UserId,
    /// Optional due date; must be strictly in the future.
    pub due_date: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description.
    pub description: TaskDescription,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted assignee.
    pub assigned_to: UserId,
    /// Persisted due date, if any.
    pub due_date: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Validated non-status field changes applied atomically with an optional
/// status transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// Replacement title, if any.
    pub title: Option<TaskTitle>,
    /// Replacement description, if any.
    pub description: Option<TaskDescription>,
    /// Replacement priority, if any.
    pub priority: Option<TaskPriority>,
    /// Replacement due date, if any; must be strictly in the future.
    pub due_date: Option<DateTime<Utc>>,
    /// Requested status, if any; validated against the transition table
    /// before any field is applied.
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    /// Returns whether the patch carries no changes at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.status.is_none()
    }
}

/// Window before the due date in which a task counts as due soon.
const DUE_SOON_WINDOW_HOURS: i64 = 24;

/// Task aggregate root.
///
/// Owns the status state machine: every mutation either commits entirely,
/// returning the domain events it produced, or leaves the aggregate
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: TaskDescription,
    status: TaskStatus,
    priority: TaskPriority,
    assigned_to: UserId,
    due_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task in the `pending` state.
    ///
    /// Returns the task together with the events of its creation: a
    /// `TaskCreated` event followed by a `TaskAssigned` event, both addressed
    /// to the assignee.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::DueDateNotInFuture`] when a due date is
    /// supplied that is not strictly after the current clock time.
    pub fn new(
        data: NewTaskData,
        clock: &impl Clock,
    ) -> Result<(Self, Vec<DomainEvent>), TaskDomainError> {
        let timestamp = clock.utc();
        validate_due_date(data.due_date, timestamp)?;

        let task = Self {
            id: TaskId::new(),
            title: data.title,
            description: data.description,
            status: TaskStatus::Pending,
            priority: data.priority,
            assigned_to: data.assigned_to,
            due_date: data.due_date,
            created_at: timestamp,
            updated_at: timestamp,
        };

        let snapshot = TaskSnapshot::of(&task);
        let events = vec![
            DomainEvent::TaskCreated {
                task: snapshot.clone(),
                recipient: task.assigned_to,
                occurred_at: timestamp,
            },
            DomainEvent::TaskAssigned {
                task: snapshot,
                recipient: task.assigned_to,
                occurred_at: timestamp,
            },
        ];
        Ok((task, events))
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            assigned_to: data.assigned_to,
            due_date: data.due_date,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the task description.
    #[must_use]
    pub const fn description(&self) -> &TaskDescription {
        &self.description
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the current assignee.
    #[must_use]
    pub const fn assigned_to(&self) -> UserId {
        self.assigned_to
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
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

    /// Requests a status transition.
    ///
    /// A same-status request is an idempotent no-op: nothing is mutated, not
    /// even `updated_at`, and no events are produced. A legal transition
    /// mutates status and `updated_at` and produces a `TaskStatusChanged`
    /// event addressed to the current assignee, followed by a
    /// `TaskCompleted` event when the target is `completed`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] when the edge is
    /// not in the legal table; the task is left unchanged.
    pub fn transition_to(
        &mut self,
        target: TaskStatus,
        clock: &impl Clock,
    ) -> Result<Vec<DomainEvent>, TaskDomainError> {
        if target == self.status {
            return Ok(Vec::new());
        }
        if !self.status.can_transition_to(target) {
            return Err(TaskDomainError::InvalidStatusTransition {
                task_id: self.id,
                from: self.status,
                to: target,
            });
        }

        self.status = target;
        self.touch(clock);

        let snapshot = TaskSnapshot::of(self);
        let mut events = vec![DomainEvent::TaskStatusChanged {
            task: snapshot.clone(),
            recipient: self.assigned_to,
            occurred_at: self.updated_at,
        }];
        if target == TaskStatus::Completed {
            events.push(DomainEvent::TaskCompleted {
                task: snapshot,
                recipient: self.assigned_to,
                occurred_at: self.updated_at,
            });
        }
        Ok(events)
    }

    /// Reassigns the task to a new user.
    ///
    /// Reassigning to the current assignee is a no-op producing no events.
    /// Otherwise produces a `TaskAssigned` event to the new assignee and an
    /// informational `TaskReassigned` event to the previous one, in that
    /// order. Resolving the new assignee is the caller's responsibility.
    pub fn reassign_to(&mut self, new_assignee: UserId, clock: &impl Clock) -> Vec<DomainEvent> {
        if new_assignee == self.assigned_to {
            return Vec::new();
        }

        let previous = self.assigned_to;
        self.assigned_to = new_assignee;
        self.touch(clock);

        let snapshot = TaskSnapshot::of(self);
        vec![
            DomainEvent::TaskAssigned {
                task: snapshot.clone(),
                recipient: new_assignee,
                occurred_at: self.updated_at,
            },
            DomainEvent::TaskReassigned {
                task: snapshot,
                recipient: previous,
                occurred_at: self.updated_at,
            },
        ]
    }

    /// Applies a field patch, all-or-nothing.
    ///
    /// When the patch carries a status, the transition is validated first; a
    /// rejection aborts the entire patch with no mutation. Remaining fields
    /// are applied afterwards. Produces the transition's events when the
    /// status changed, or a single `TaskUpdated` event when only non-status
    /// fields changed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] for an illegal
    /// status edge or [`TaskDomainError::DueDateNotInFuture`] for a stale
    /// due date; either way the task is left unchanged.
    pub fn apply_patch(
        &mut self,
        patch: TaskPatch,
        clock: &impl Clock,
    ) -> Result<Vec<DomainEvent>, TaskDomainError> {
        validate_due_date(patch.due_date, clock.utc())?;

        let mut events = match patch.status {
            Some(target) => self.transition_to(target, clock)?,
            None => Vec::new(),
        };

        let mut fields_changed = false;
        if let Some(title) = patch.title {
            fields_changed |= title != self.title;
            self.title = title;
        }
        if let Some(description) = patch.description {
            fields_changed |= description != self.description;
            self.description = description;
        }
        if let Some(priority) = patch.priority {
            fields_changed |= priority != self.priority;
            self.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            fields_changed |= Some(due_date) != self.due_date;
            self.due_date = Some(due_date);
        }

        if fields_changed {
            self.touch(clock);
            if events.is_empty() {
                events.push(DomainEvent::TaskUpdated {
                    task: TaskSnapshot::of(self),
                    recipient: self.assigned_to,
                    occurred_at: self.updated_at,
                });
            }
        }
        Ok(events)
    }

    /// Evaluates the due date against `now`.
    ///
    /// Returns a `TaskOverdue` event when the due date has passed, a
    /// `TaskDueSoon` event when it falls within the next 24 hours, and
    /// `None` otherwise. Tasks without a due date, completed tasks, and
    /// cancelled tasks never alert.
    #[must_use]
    pub fn due_alert(&self, now: DateTime<Utc>) -> Option<DomainEvent> {
        if matches!(self.status, TaskStatus::Completed | TaskStatus::Cancelled) {
            return None;
        }
        let due = self.due_date?;
        let snapshot = TaskSnapshot::of(self);
        if due < now {
            return Some(DomainEvent::TaskOverdue {
                task: snapshot,
                recipient: self.assigned_to,
                occurred_at: now,
            });
        }
        if due - now <= Duration::hours(DUE_SOON_WINDOW_HOURS) {
            return Some(DomainEvent::TaskDueSoon {
                task: snapshot,
                recipient: self.assigned_to,
                occurred_at: now,
            });
        }
        None
    }

    /// Updates `updated_at` to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

/// Rejects due dates that are not strictly in the future.
fn validate_due_date(
    due_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<(), TaskDomainError> {
    match due_date {
        Some(due) if due <= now => Err(TaskDomainError::DueDateNotInFuture),
        _ => Ok(()),
    }
}
