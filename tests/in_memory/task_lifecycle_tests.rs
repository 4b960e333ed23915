//! In-memory integration tests for task lifecycle operations.

use std::sync::Arc;

use rstest::rstest;
use taskhub::notification::services::NotificationDispatcher;
use taskhub::task::{
    domain::{TaskDomainError, TaskPriority, TaskStatus, UserId},
    services::{CreateTaskRequest, TaskLifecycleError, UpdateTaskRequest},
};

use super::helpers::{Stack, drain_event_kinds, register_user, stack};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_task_starts_pending_with_defaults(stack: Stack) {
    let assignee = register_user(&stack, "Alice");

    let mutation = stack
        .service
        .create(CreateTaskRequest::new("Draft launch plan".to_owned(), assignee))
        .await
        .expect("task creation should succeed");

    assert_eq!(mutation.task.status(), TaskStatus::Pending);
    assert_eq!(mutation.task.priority(), TaskPriority::Medium);
    assert_eq!(mutation.task.assigned_to(), assignee);

    let found = stack
        .service
        .find(mutation.task.id())
        .await
        .expect("lookup should succeed");
    assert_eq!(found, Some(mutation.task));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_assignee_is_rejected(stack: Stack) {
    let result = stack
        .service
        .create(CreateTaskRequest::new(
            "Draft launch plan".to_owned(),
            UserId::new(),
        ))
        .await;

    assert!(matches!(
        result,
        Err(TaskLifecycleError::InvalidAssignee(_))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn pending_task_cannot_jump_to_completed(stack: Stack) {
    let assignee = register_user(&stack, "Alice");
    let created = stack
        .service
        .create(CreateTaskRequest::new("Ship the release".to_owned(), assignee))
        .await
        .expect("task creation should succeed");

    let result = stack
        .service
        .request_transition(created.task.id(), TaskStatus::Completed)
        .await;

    assert!(matches!(
        result,
        Err(TaskLifecycleError::Domain(
            TaskDomainError::InvalidStatusTransition {
                from: TaskStatus::Pending,
                to: TaskStatus::Completed,
                ..
            }
        ))
    ));

    let found = stack
        .service
        .find(created.task.id())
        .await
        .expect("lookup should succeed")
        .expect("task should still exist");
    assert_eq!(found.status(), TaskStatus::Pending);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancelled_task_can_be_reopened(mut stack: Stack) {
    let assignee = register_user(&stack, "Alice");
    let created = stack
        .service
        .create(CreateTaskRequest::new("Ship the release".to_owned(), assignee))
        .await
        .expect("task creation should succeed");
    let id = created.task.id();

    stack
        .service
        .request_transition(id, TaskStatus::Cancelled)
        .await
        .expect("cancellation should succeed");
    let reopened = stack
        .service
        .request_transition(id, TaskStatus::Pending)
        .await
        .expect("reopening should succeed");

    assert_eq!(reopened.task.status(), TaskStatus::Pending);
    assert_eq!(
        drain_event_kinds(&mut stack.events),
        vec![
            "task_created",
            "task_assigned",
            "task_status_changed",
            "task_status_changed",
        ]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn same_status_request_changes_nothing(stack: Stack) {
    let assignee = register_user(&stack, "Alice");
    let created = stack
        .service
        .create(CreateTaskRequest::new("Ship the release".to_owned(), assignee))
        .await
        .expect("task creation should succeed");

    let mutation = stack
        .service
        .request_transition(created.task.id(), TaskStatus::Pending)
        .await
        .expect("same-status request should be accepted");

    assert!(mutation.events.is_empty());
    assert_eq!(mutation.task.updated_at(), created.task.updated_at());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_transition_aborts_the_whole_update(stack: Stack) {
    let assignee = register_user(&stack, "Alice");
    let created = stack
        .service
        .create(CreateTaskRequest::new("Ship the release".to_owned(), assignee))
        .await
        .expect("task creation should succeed");
    let id = created.task.id();

    let result = stack
        .service
        .update_fields(
            id,
            UpdateTaskRequest::new()
                .with_title("Ship the hotfix")
                .with_priority(TaskPriority::Urgent)
                .with_status(TaskStatus::Completed),
        )
        .await;

    assert!(matches!(
        result,
        Err(TaskLifecycleError::Domain(
            TaskDomainError::InvalidStatusTransition { .. }
        ))
    ));

    let found = stack
        .service
        .find(id)
        .await
        .expect("lookup should succeed")
        .expect("task should still exist");
    assert_eq!(found, created.task);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_task_removes_its_notifications(mut stack: Stack) {
    let assignee = register_user(&stack, "Alice");
    let created = stack
        .service
        .create(CreateTaskRequest::new("Ship the release".to_owned(), assignee))
        .await
        .expect("task creation should succeed");
    let id = created.task.id();

    let dispatcher = NotificationDispatcher::new(Arc::clone(&stack.sink));
    while let Some(event) = stack.events.try_next() {
        dispatcher.deliver(&event).await;
    }
    assert_eq!(
        stack
            .sink
            .for_user(assignee)
            .expect("sink should be readable")
            .len(),
        2
    );

    stack.service.delete(id).await.expect("delete should succeed");

    assert_eq!(
        stack.service.find(id).await.expect("lookup should succeed"),
        None
    );
    assert!(
        stack
            .sink
            .for_user(assignee)
            .expect("sink should be readable")
            .is_empty()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_twice_reports_not_found(stack: Stack) {
    let assignee = register_user(&stack, "Alice");
    let created = stack
        .service
        .create(CreateTaskRequest::new("Ship the release".to_owned(), assignee))
        .await
        .expect("task creation should succeed");
    let id = created.task.id();

    stack.service.delete(id).await.expect("delete should succeed");
    let second = stack.service.delete(id).await;

    assert!(matches!(second, Err(TaskLifecycleError::NotFound(_))));
}
