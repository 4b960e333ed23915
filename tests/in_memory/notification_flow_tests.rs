//! In-memory integration tests for event fan-out through the dispatcher.

use std::sync::Arc;

use rstest::rstest;
use taskhub::notification::{
    domain::NotificationType, services::NotificationDispatcher,
};
use taskhub::task::{
    domain::TaskStatus,
    services::CreateTaskRequest,
};

use super::helpers::{Stack, register_user, stack};

/// Delivers every queued event and returns the total dispatched.
async fn drain_through_dispatcher(stack: &mut Stack) -> usize {
    let dispatcher = NotificationDispatcher::new(Arc::clone(&stack.sink));
    let mut delivered = 0;
    while let Some(event) = stack.events.try_next() {
        delivered += dispatcher.deliver(&event).await.delivered;
    }
    delivered
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn creation_notifies_the_assignee_twice(mut stack: Stack) {
    let assignee = register_user(&stack, "Alice");
    stack
        .service
        .create(CreateTaskRequest::new("Draft launch plan".to_owned(), assignee))
        .await
        .expect("task creation should succeed");

    let delivered = drain_through_dispatcher(&mut stack).await;
    assert_eq!(delivered, 2);

    let inbox = stack
        .sink
        .for_user(assignee)
        .expect("sink should be readable");
    let titles: Vec<&str> = inbox.iter().map(|n| n.title()).collect();
    assert_eq!(titles, vec!["New Task Created", "Task Assigned"]);
    assert!(inbox.iter().all(|n| n.kind() == NotificationType::Task));
    assert!(inbox.iter().all(|n| !n.is_read()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completion_produces_a_status_update_and_a_success(mut stack: Stack) {
    let assignee = register_user(&stack, "Alice");
    let created = stack
        .service
        .create(CreateTaskRequest::new("Ship the release".to_owned(), assignee))
        .await
        .expect("task creation should succeed");
    let id = created.task.id();

    stack
        .service
        .request_transition(id, TaskStatus::InProgress)
        .await
        .expect("start should succeed");
    stack
        .service
        .request_transition(id, TaskStatus::Completed)
        .await
        .expect("completion should succeed");

    drain_through_dispatcher(&mut stack).await;

    let inbox = stack
        .sink
        .for_user(assignee)
        .expect("sink should be readable");
    let tail: Vec<(&str, NotificationType, &str)> = inbox
        .iter()
        .skip(2)
        .map(|n| (n.title(), n.kind(), n.message()))
        .collect();
    assert_eq!(
        tail,
        vec![
            (
                "Task Status Updated",
                NotificationType::Info,
                "Task \"Ship the release\" status changed to in-progress",
            ),
            (
                "Task Status Updated",
                NotificationType::Info,
                "Task \"Ship the release\" status changed to completed",
            ),
            (
                "Task Completed",
                NotificationType::Success,
                "Task \"Ship the release\" has been marked as completed",
            ),
        ]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reassignment_notifies_both_parties(mut stack: Stack) {
    let first = register_user(&stack, "Alice");
    let second = register_user(&stack, "Bob");
    let created = stack
        .service
        .create(CreateTaskRequest::new("Ship the release".to_owned(), first))
        .await
        .expect("task creation should succeed");

    stack
        .service
        .reassign(created.task.id(), second)
        .await
        .expect("reassignment should succeed");

    drain_through_dispatcher(&mut stack).await;

    let new_assignee_inbox = stack
        .sink
        .for_user(second)
        .expect("sink should be readable");
    assert_eq!(new_assignee_inbox.len(), 1);
    let assignment = new_assignee_inbox.first().expect("one notification");
    assert_eq!(assignment.title(), "Task Assigned");
    assert_eq!(
        assignment.message(),
        "You have been assigned to task: \"Ship the release\""
    );

    let old_assignee_inbox = stack
        .sink
        .for_user(first)
        .expect("sink should be readable");
    let last = old_assignee_inbox.last().expect("at least one notification");
    assert_eq!(last.kind(), NotificationType::Info);
    assert_eq!(
        last.message(),
        "Task \"Ship the release\" status changed to reassigned"
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dispatcher_run_drains_the_stream_in_order(stack: Stack) {
    let Stack {
        service,
        directory,
        sink,
        events,
    } = stack;
    let assignee = directory
        .register("Alice", "alice@example.com")
        .expect("directory should register user");

    let dispatcher = NotificationDispatcher::new(Arc::clone(&sink));
    let consumer = tokio::spawn(async move { dispatcher.run(events).await });

    let created = service
        .create(CreateTaskRequest::new("Ship the release".to_owned(), assignee))
        .await
        .expect("task creation should succeed");
    service
        .request_transition(created.task.id(), TaskStatus::InProgress)
        .await
        .expect("start should succeed");

    // Dropping the service drops the publisher, which ends the stream.
    drop(service);
    let outcome = consumer.await.expect("consumer should not panic");

    assert_eq!(outcome.delivered, 3);
    assert_eq!(outcome.failed, 0);

    let inbox = sink.for_user(assignee).expect("sink should be readable");
    let titles: Vec<&str> = inbox.iter().map(|n| n.title()).collect();
    assert_eq!(
        titles,
        vec!["New Task Created", "Task Assigned", "Task Status Updated"]
    );
}
