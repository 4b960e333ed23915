//! Shared test helpers for in-memory integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskhub::notification::adapters::memory::InMemoryNotificationSink;
use taskhub::task::{
    adapters::memory::{InMemoryTaskStore, InMemoryUserDirectory},
    domain::UserId,
    services::{EventPublisher, EventStream, TaskLifecycleService},
};

/// Fully wired in-memory service stack for one test.
pub type TestService = TaskLifecycleService<
    InMemoryTaskStore,
    InMemoryUserDirectory,
    InMemoryNotificationSink<DefaultClock>,
    DefaultClock,
>;

/// The service plus the collaborators a test needs to observe side effects.
pub struct Stack {
    pub service: TestService,
    pub directory: InMemoryUserDirectory,
    pub sink: Arc<InMemoryNotificationSink<DefaultClock>>,
    pub events: EventStream,
}

/// Provides a fresh in-memory stack for each test.
#[fixture]
pub fn stack() -> Stack {
    let clock = Arc::new(DefaultClock);
    let directory = InMemoryUserDirectory::new();
    let sink = Arc::new(InMemoryNotificationSink::new(Arc::clone(&clock)));
    let (publisher, events) = EventPublisher::channel();
    let service = TaskLifecycleService::new(
        Arc::new(InMemoryTaskStore::new()),
        Arc::new(directory.clone()),
        Arc::clone(&sink),
        clock,
        publisher,
    );
    Stack {
        service,
        directory,
        sink,
        events,
    }
}

/// Registers a user in the stack's directory.
pub fn register_user(stack: &Stack, name: &str) -> UserId {
    stack
        .directory
        .register(name, format!("{}@example.com", name.to_ascii_lowercase()))
        .expect("directory should register user")
}

/// Drains the event stream into a vector of kind names.
pub fn drain_event_kinds(events: &mut EventStream) -> Vec<&'static str> {
    let mut kinds = Vec::new();
    while let Some(event) = events.try_next() {
        kinds.push(event.kind());
    }
    kinds
}
