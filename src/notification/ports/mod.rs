//! Port contracts for notification delivery.

pub mod sink;

pub use sink::{NotificationSink, SinkError, SinkResult};

#[cfg(test)]
pub use sink::MockNotificationSink;
