//! Event channel between the task state machine and its subscribers.
//!
//! The lifecycle service publishes every accepted mutation's events through
//! an unbounded channel; the notification dispatcher subscribes on the other
//! end. Publishing with no live subscriber is acceptable: events are a side
//! channel, never part of the mutation's transactional boundary.

use crate::task::domain::DomainEvent;
use tokio::sync::mpsc;

/// Sending half of the domain event channel.
#[derive(Debug, Clone)]
pub struct EventPublisher {
    sender: mpsc::UnboundedSender<DomainEvent>,
}

impl EventPublisher {
    /// Creates a connected publisher/stream pair.
    #[must_use]
    pub fn channel() -> (Self, EventStream) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, EventStream { receiver })
    }

    /// Publishes a single event.
    ///
    /// A closed channel means no subscriber is listening, which is not an
    /// error for a best-effort side channel.
    pub fn publish(&self, event: DomainEvent) {
        if self.sender.send(event).is_err() {
            tracing::debug!("domain event dropped: no subscriber");
        }
    }

    /// Publishes a batch of events in order.
    pub fn publish_all(&self, events: &[DomainEvent]) {
        for event in events {
            self.publish(event.clone());
        }
    }
}

/// Receiving half of the domain event channel.
#[derive(Debug)]
pub struct EventStream {
    receiver: mpsc::UnboundedReceiver<DomainEvent>,
}

impl EventStream {
    /// Awaits the next event, or `None` once all publishers are dropped.
    pub async fn next(&mut self) -> Option<DomainEvent> {
        self.receiver.recv().await
    }

    /// Returns the next event without awaiting, or `None` when the channel
    /// is currently empty.
    pub fn try_next(&mut self) -> Option<DomainEvent> {
        self.receiver.try_recv().ok()
    }
}
