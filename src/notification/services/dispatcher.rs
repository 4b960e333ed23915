//! Translates domain events into addressed notification drafts and hands
//! them to the sink.

use crate::notification::{
    domain::{NotificationDraft, NotificationType},
    ports::NotificationSink,
};
use crate::task::domain::{DomainEvent, TaskSnapshot, UserId};
use crate::task::services::EventStream;
use std::sync::Arc;
use std::time::Duration;

/// Default upper bound on a single sink write.
const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Tally of a delivery attempt.
///
/// Failures are observable here and in the logs, never as errors raised to
/// the caller: by the time dispatch runs, the task mutation has already
/// committed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Drafts the sink accepted.
    pub delivered: usize,
    /// Drafts rejected by the sink or timed out.
    pub failed: usize,
}

/// Stateless consumer of domain events.
///
/// Each event is processed independently; events arriving from one task are
/// delivered in the order the state machine produced them. The mapping from
/// event to draft is a pure function, so replaying an event through a fresh
/// sink yields identical content.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher<N>
where
    N: NotificationSink,
{
    sink: Arc<N>,
    delivery_timeout: Duration,
}

impl<N> NotificationDispatcher<N>
where
    N: NotificationSink,
{
    /// Creates a dispatcher writing to the given sink.
    #[must_use]
    pub const fn new(sink: Arc<N>) -> Self {
        Self {
            sink,
            delivery_timeout: DEFAULT_DELIVERY_TIMEOUT,
        }
    }

    /// Overrides the per-write delivery timeout.
    #[must_use]
    pub const fn with_delivery_timeout(mut self, timeout: Duration) -> Self {
        self.delivery_timeout = timeout;
        self
    }

    /// Maps an event to its notification drafts.
    ///
    /// Pure and deterministic: title, type, and message are functions of the
    /// event kind and the task snapshot it carries. Every draft is addressed
    /// to exactly one recipient. Interpolated content that would overflow the
    /// message limit is clamped rather than dropped, so every recognized
    /// event kind always produces a draft.
    #[must_use]
    pub fn drafts_for(event: &DomainEvent) -> Vec<NotificationDraft> {
        let recipient = event.recipient();
        let draft = match event {
            DomainEvent::TaskCreated { task, .. } => task_draft(
                recipient,
                task,
                "New Task Created",
                NotificationType::Task,
                format!("Task \"{}\" has been created", task.title),
            ),
            DomainEvent::TaskAssigned { task, .. } => task_draft(
                recipient,
                task,
                "Task Assigned",
                NotificationType::Task,
                format!("You have been assigned to task: \"{}\"", task.title),
            ),
            DomainEvent::TaskCompleted { task, .. } => task_draft(
                recipient,
                task,
                "Task Completed",
                NotificationType::Success,
                format!("Task \"{}\" has been marked as completed", task.title),
            ),
            DomainEvent::TaskStatusChanged { task, .. } => task_draft(
                recipient,
                task,
                "Task Status Updated",
                NotificationType::Info,
                format!("Task \"{}\" status changed to {}", task.title, task.status),
            ),
            DomainEvent::TaskReassigned { task, .. } => task_draft(
                recipient,
                task,
                "Task Status Updated",
                NotificationType::Info,
                format!("Task \"{}\" status changed to reassigned", task.title),
            ),
            DomainEvent::TaskDueSoon { task, .. } => task_draft(
                recipient,
                task,
                "Task Due Soon",
                NotificationType::Reminder,
                format!("Task \"{}\" is due in 24 hours", task.title),
            ),
            DomainEvent::TaskOverdue { task, .. } => task_draft(
                recipient,
                task,
                "Task Overdue",
                NotificationType::Warning,
                format!("Task \"{}\" is overdue", task.title),
            ),
            DomainEvent::TaskUpdated { task, .. } => task_draft(
                recipient,
                task,
                "Task Update",
                NotificationType::Info,
                format!("Task \"{}\" has been updated", task.title),
            ),
            DomainEvent::UserRegistered { user_name, .. } => NotificationDraft::new(
                recipient,
                "Welcome to the Platform!",
                clamp_message(format!(
                    "Welcome {user_name}! Your account has been successfully created."
                )),
                NotificationType::Welcome,
            ),
        };

        match draft {
            Ok(draft) => vec![draft],
            Err(err) => {
                tracing::warn!(kind = event.kind(), error = %err, "draft rejected by validation");
                Vec::new()
            }
        }
    }

    /// Delivers an event's drafts to the sink, best-effort.
    ///
    /// Sink rejections and timeouts are logged at warn and counted in the
    /// outcome; they are never raised.
    pub async fn deliver(&self, event: &DomainEvent) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        for draft in Self::drafts_for(event) {
            let recipient = draft.user_id;
            match tokio::time::timeout(self.delivery_timeout, self.sink.create(draft)).await {
                Ok(Ok(notification)) => {
                    tracing::debug!(
                        kind = event.kind(),
                        notification_id = %notification.id(),
                        recipient = %recipient,
                        "notification delivered"
                    );
                    outcome.delivered += 1;
                }
                Ok(Err(err)) => {
                    tracing::warn!(
                        kind = event.kind(),
                        recipient = %recipient,
                        error = %err,
                        "notification delivery failed"
                    );
                    outcome.failed += 1;
                }
                Err(_) => {
                    tracing::warn!(
                        kind = event.kind(),
                        recipient = %recipient,
                        "notification delivery timed out"
                    );
                    outcome.failed += 1;
                }
            }
        }
        outcome
    }

    /// Consumes the event stream until every publisher is dropped,
    /// delivering events in arrival order.
    pub async fn run(&self, mut events: EventStream) -> DispatchOutcome {
        let mut total = DispatchOutcome::default();
        while let Some(event) = events.next().await {
            let outcome = self.deliver(&event).await;
            total.delivered += outcome.delivered;
            total.failed += outcome.failed;
        }
        total
    }
}

/// Builds a task-derived draft carrying the related task reference.
fn task_draft(
    recipient: UserId,
    task: &TaskSnapshot,
    title: &str,
    kind: NotificationType,
    message: String,
) -> Result<NotificationDraft, crate::notification::domain::NotificationDomainError> {
    Ok(
        NotificationDraft::new(recipient, title, clamp_message(message), kind)?
            .with_related_task(task.task_id),
    )
}

/// Clamps interpolated content to the sink's message limit.
fn clamp_message(message: String) -> String {
    if message.chars().count() <= NotificationDraft::MESSAGE_MAX_CHARS {
        message
    } else {
        message
            .chars()
            .take(NotificationDraft::MESSAGE_MAX_CHARS)
            .collect()
    }
}
