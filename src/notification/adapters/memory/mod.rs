//! In-memory adapter implementations for notification ports.

mod sink;

pub use sink::InMemoryNotificationSink;
