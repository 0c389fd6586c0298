// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event bus for routing race events to subscribers

use super::event::RaceEvent;
use super::subscription::{SubscriberId, Subscription};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

/// Sender for event delivery
pub type EventSender = mpsc::UnboundedSender<RaceEvent>;
/// Receiver for event delivery
pub type EventReceiver = mpsc::UnboundedReceiver<RaceEvent>;

/// Callback invoked after a race's results change.
///
/// Runs on the poller's task, so it must return quickly.
pub trait Notifier: Send + Sync + 'static {
    fn notify(&self, race: &str);
}

impl<F> Notifier for F
where
    F: Fn(&str) + Send + Sync + 'static,
{
    fn notify(&self, race: &str) {
        self(race)
    }
}

/// The event bus routes events to matching subscribers
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<RwLock<HashMap<SubscriberId, (Subscription, EventSender)>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to events matching the subscription
    pub fn subscribe(&self, subscription: Subscription) -> EventReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = subscription.id.clone();

        let mut subs = self.subscribers.write().unwrap_or_else(|e| e.into_inner());
        subs.insert(id, (subscription, tx));

        rx
    }

    /// Unsubscribe from events
    pub fn unsubscribe(&self, id: &SubscriberId) {
        let mut subs = self.subscribers.write().unwrap_or_else(|e| e.into_inner());
        subs.remove(id);
    }

    /// Publish an event to all matching subscribers
    pub fn publish(&self, event: RaceEvent) {
        tracing::debug!(event = event.name(), race = event.race(), "publishing race event");

        let subs = self.subscribers.read().unwrap_or_else(|e| e.into_inner());
        for (subscription, tx) in subs.values() {
            if subscription.matches(&event) {
                // Receivers dropped without unsubscribing are ignored
                let _ = tx.send(event.clone());
            }
        }
    }

    /// Get count of active subscribers
    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

impl Notifier for EventBus {
    fn notify(&self, race: &str) {
        self.publish(RaceEvent::Updated {
            race: race.to_string(),
        });
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
