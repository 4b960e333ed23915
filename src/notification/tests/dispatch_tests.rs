//! Tests for the event-to-notification mapping and delivery isolation.

use std::sync::Arc;
use std::time::Duration;

use crate::notification::{
    adapters::memory::InMemoryNotificationSink,
    domain::{Notification, NotificationDraft, NotificationType},
    ports::{MockNotificationSink, NotificationSink, SinkError, SinkResult},
    services::{DispatchOutcome, NotificationDispatcher},
};
use crate::task::domain::{
    DomainEvent, TaskId, TaskPriority, TaskSnapshot, TaskStatus, TaskTitle, UserId,
};
use async_trait::async_trait;
use chrono::Utc;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn snapshot() -> TaskSnapshot {
    TaskSnapshot {
        task_id: TaskId::new(),
        title: TaskTitle::new("Write spec").expect("valid title"),
        status: TaskStatus::Pending,
        priority: TaskPriority::Medium,
    }
}

fn draft_for(event: &DomainEvent) -> NotificationDraft {
    let drafts = NotificationDispatcher::<MockNotificationSink>::drafts_for(event);
    assert_eq!(drafts.len(), 1, "every event maps to exactly one draft");
    drafts.into_iter().next().expect("one draft")
}

#[rstest]
fn task_created_maps_to_task_notification(snapshot: TaskSnapshot) {
    let recipient = UserId::new();
    let event = DomainEvent::TaskCreated {
        task: snapshot.clone(),
        recipient,
        occurred_at: Utc::now(),
    };

    let draft = draft_for(&event);
    assert_eq!(draft.user_id, recipient);
    assert_eq!(draft.title, "New Task Created");
    assert_eq!(draft.kind, NotificationType::Task);
    assert_eq!(draft.message, "Task \"Write spec\" has been created");
    assert_eq!(draft.related_task, Some(snapshot.task_id));
}

#[rstest]
fn task_assigned_maps_to_task_notification(snapshot: TaskSnapshot) {
    let event = DomainEvent::TaskAssigned {
        task: snapshot,
        recipient: UserId::new(),
        occurred_at: Utc::now(),
    };

    let draft = draft_for(&event);
    assert_eq!(draft.title, "Task Assigned");
    assert_eq!(draft.kind, NotificationType::Task);
    assert_eq!(
        draft.message,
        "You have been assigned to task: \"Write spec\""
    );
}

#[rstest]
fn task_completed_maps_to_success_notification(mut snapshot: TaskSnapshot) {
    snapshot.status = TaskStatus::Completed;
    let event = DomainEvent::TaskCompleted {
        task: snapshot,
        recipient: UserId::new(),
        occurred_at: Utc::now(),
    };

    let draft = draft_for(&event);
    assert_eq!(draft.title, "Task Completed");
    assert_eq!(draft.kind, NotificationType::Success);
    assert_eq!(
        draft.message,
        "Task \"Write spec\" has been marked as completed"
    );
}

#[rstest]
fn status_change_interpolates_the_new_status(mut snapshot: TaskSnapshot) {
    snapshot.status = TaskStatus::InProgress;
    let event = DomainEvent::TaskStatusChanged {
        task: snapshot,
        recipient: UserId::new(),
        occurred_at: Utc::now(),
    };

    let draft = draft_for(&event);
    assert_eq!(draft.title, "Task Status Updated");
    assert_eq!(draft.kind, NotificationType::Info);
    assert_eq!(
        draft.message,
        "Task \"Write spec\" status changed to in-progress"
    );
}

#[rstest]
fn reassignment_reports_the_synthetic_reassigned_label(snapshot: TaskSnapshot) {
    let old_assignee = UserId::new();
    let event = DomainEvent::TaskReassigned {
        task: snapshot,
        recipient: old_assignee,
        occurred_at: Utc::now(),
    };

    let draft = draft_for(&event);
    assert_eq!(draft.user_id, old_assignee);
    assert_eq!(draft.title, "Task Status Updated");
    assert_eq!(draft.kind, NotificationType::Info);
    assert_eq!(
        draft.message,
        "Task \"Write spec\" status changed to reassigned"
    );
}

#[rstest]
#[case::due_soon(
    "Task Due Soon",
    NotificationType::Reminder,
    "Task \"Write spec\" is due in 24 hours"
)]
#[case::overdue(
    "Task Overdue",
    NotificationType::Warning,
    "Task \"Write spec\" is overdue"
)]
fn due_events_map_to_reminder_and_warning(
    snapshot: TaskSnapshot,
    #[case] title: &str,
    #[case] kind: NotificationType,
    #[case] message: &str,
) {
    let event = match kind {
        NotificationType::Reminder => DomainEvent::TaskDueSoon {
            task: snapshot,
            recipient: UserId::new(),
            occurred_at: Utc::now(),
        },
        _ => DomainEvent::TaskOverdue {
            task: snapshot,
            recipient: UserId::new(),
            occurred_at: Utc::now(),
        },
    };

    let draft = draft_for(&event);
    assert_eq!(draft.title, title);
    assert_eq!(draft.kind, kind);
    assert_eq!(draft.message, message);
}

#[rstest]
fn generic_update_maps_to_the_fallback_notification(snapshot: TaskSnapshot) {
    let event = DomainEvent::TaskUpdated {
        task: snapshot,
        recipient: UserId::new(),
        occurred_at: Utc::now(),
    };

    let draft = draft_for(&event);
    assert_eq!(draft.title, "Task Update");
    assert_eq!(draft.kind, NotificationType::Info);
    assert_eq!(draft.message, "Task \"Write spec\" has been updated");
}

#[rstest]
fn user_registration_maps_to_welcome_notification() {
    let recipient = UserId::new();
    let event = DomainEvent::user_registered("Alice", recipient, Utc::now());

    let draft = draft_for(&event);
    assert_eq!(draft.user_id, recipient);
    assert_eq!(draft.title, "Welcome to the Platform!");
    assert_eq!(draft.kind, NotificationType::Welcome);
    assert_eq!(
        draft.message,
        "Welcome Alice! Your account has been successfully created."
    );
    assert!(draft.related_task.is_none());
}

#[rstest]
fn oversized_welcome_message_is_clamped_not_dropped() {
    let recipient = UserId::new();
    let event = DomainEvent::user_registered("N".repeat(600), recipient, Utc::now());

    let draft = draft_for(&event);
    assert_eq!(
        draft.message.chars().count(),
        NotificationDraft::MESSAGE_MAX_CHARS
    );
    assert!(draft.message.starts_with("Welcome NNN"));
    assert_eq!(draft.kind, NotificationType::Welcome);
}

#[rstest]
fn mapping_is_deterministic_across_replays(snapshot: TaskSnapshot) {
    let event = DomainEvent::TaskCreated {
        task: snapshot,
        recipient: UserId::new(),
        occurred_at: Utc::now(),
    };

    assert_eq!(draft_for(&event), draft_for(&event));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deliver_writes_to_the_sink(snapshot: TaskSnapshot) {
    let clock = Arc::new(DefaultClock);
    let sink = Arc::new(InMemoryNotificationSink::new(clock));
    let dispatcher = NotificationDispatcher::new(Arc::clone(&sink));
    let recipient = UserId::new();

    let outcome = dispatcher
        .deliver(&DomainEvent::TaskAssigned {
            task: snapshot,
            recipient,
            occurred_at: Utc::now(),
        })
        .await;

    assert_eq!(
        outcome,
        DispatchOutcome {
            delivered: 1,
            failed: 0
        }
    );
    let stored = sink.for_user(recipient).expect("sink readable");
    assert_eq!(stored.len(), 1);
    let notification = stored.first().expect("one notification");
    assert_eq!(notification.title(), "Task Assigned");
    assert!(!notification.is_read());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sink_rejection_is_reported_but_not_raised(snapshot: TaskSnapshot) {
    let mut sink = MockNotificationSink::new();
    sink.expect_create()
        .times(1)
        .returning(|_| Err(SinkError::Rejected("store offline".to_owned())));
    let dispatcher = NotificationDispatcher::new(Arc::new(sink));

    let outcome = dispatcher
        .deliver(&DomainEvent::TaskCreated {
            task: snapshot,
            recipient: UserId::new(),
            occurred_at: Utc::now(),
        })
        .await;

    assert_eq!(
        outcome,
        DispatchOutcome {
            delivered: 0,
            failed: 1
        }
    );
}

/// Sink that never answers, for timeout coverage.
struct StalledSink;

#[async_trait]
impl NotificationSink for StalledSink {
    async fn create(&self, _draft: NotificationDraft) -> SinkResult<Notification> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Err(SinkError::Rejected("unreachable".to_owned()))
    }

    async fn delete_by_task(&self, _task_id: TaskId) -> SinkResult<u64> {
        Ok(0)
    }

    async fn delete_by_user(&self, _user_id: UserId) -> SinkResult<u64> {
        Ok(0)
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delivery_times_out_against_a_stalled_sink(snapshot: TaskSnapshot) {
    let dispatcher = NotificationDispatcher::new(Arc::new(StalledSink))
        .with_delivery_timeout(Duration::from_millis(20));

    let outcome = dispatcher
        .deliver(&DomainEvent::TaskCreated {
            task: snapshot,
            recipient: UserId::new(),
            occurred_at: Utc::now(),
        })
        .await;

    assert_eq!(
        outcome,
        DispatchOutcome {
            delivered: 0,
            failed: 1
        }
    );
}
