//! Change notification hub.
//!
//! # Responsibility
//! - Deliver post-commit change events to registered subscribers.
//!
//! # Invariants
//! - Publishing never blocks the mutator: events travel over unbounded
//!   channels and disconnected listeners are pruned on delivery.
//! - A subscriber observes every event whose pattern its registered
//!   pattern is a segment-prefix of.

use crate::router::pattern::ResourcePattern;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Mutex;
use std::time::Duration;

/// A committed mutation on the resource identified by `pattern`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub pattern: ResourcePattern,
}

struct Subscription {
    prefix: ResourcePattern,
    sender: Sender<ChangeEvent>,
}

/// Receiving end of one subscription.
pub struct ChangeListener {
    receiver: Receiver<ChangeEvent>,
}

impl ChangeListener {
    /// Returns the next pending event without blocking.
    pub fn try_next(&self) -> Option<ChangeEvent> {
        self.receiver.try_recv().ok()
    }

    /// Waits up to `timeout` for the next event.
    pub fn next_within(&self, timeout: Duration) -> Option<ChangeEvent> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<ChangeEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.try_next() {
            events.push(event);
        }
        events
    }
}

/// Registry mapping pattern prefixes to subscriber channels.
#[derive(Default)]
pub struct ChangeHub {
    subscriptions: Mutex<Vec<Subscription>>,
}

impl ChangeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber for every pattern `prefix` is a prefix of.
    pub fn subscribe(&self, prefix: ResourcePattern) -> ChangeListener {
        let (sender, receiver) = channel();
        self.lock().push(Subscription { prefix, sender });
        ChangeListener { receiver }
    }

    /// Delivers `event` to all matching subscribers.
    ///
    /// Subscribers whose receiving end is gone are dropped here.
    pub fn publish(&self, event: &ChangeEvent) {
        self.lock().retain(|subscription| {
            if !subscription.prefix.is_prefix_of(&event.pattern) {
                return true;
            }
            subscription.sender.send(event.clone()).is_ok()
        });
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Subscription>> {
        // A poisoned registry still holds valid subscriptions; delivery
        // must not panic the mutator.
        match self.subscriptions.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
