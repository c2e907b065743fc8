use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::EventEnvelope;

/// Fan-out contract for freshly appended events.
///
/// `publish` is fire-and-forget: it runs only after a successful append, and
/// a misbehaving listener must never roll back the store write, so
/// implementations report problems through logging rather than a `Result`.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers appended events to interested listeners.
    async fn publish(&self, events: &[EventEnvelope]);
}

/// A listener callback registered with the dispatcher.
pub type Listener = Arc<dyn Fn(&EventEnvelope) + Send + Sync>;

/// In-memory notifier routing events to listeners by event-type name.
///
/// An injected collaborator with its own locking discipline; the kernel
/// never sees it.
#[derive(Clone, Default)]
pub struct EventTypeDispatcher {
    listeners: Arc<RwLock<HashMap<String, Vec<Listener>>>>,
}

impl EventTypeDispatcher {
    /// Creates a dispatcher with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener for the given event types.
    pub async fn subscribe<F>(&self, event_types: &[&str], listener: F)
    where
        F: Fn(&EventEnvelope) + Send + Sync + 'static,
    {
        let listener: Listener = Arc::new(listener);
        let mut listeners = self.listeners.write().await;
        for event_type in event_types {
            listeners
                .entry((*event_type).to_string())
                .or_default()
                .push(Arc::clone(&listener));
        }
    }
}

#[async_trait]
impl Notifier for EventTypeDispatcher {
    async fn publish(&self, events: &[EventEnvelope]) {
        let listeners = self.listeners.read().await;
        for event in events {
            match listeners.get(&event.event_type) {
                Some(subscribed) => {
                    for listener in subscribed {
                        listener(event);
                    }
                }
                None => {
                    tracing::trace!(event_type = %event.event_type, "no listeners for event");
                }
            }
        }
    }
}

/// Notifier that drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn publish(&self, _events: &[EventEnvelope]) {}
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::{AggregateId, Version};

    fn envelope(event_type: &str) -> EventEnvelope {
        EventEnvelope::builder()
            .aggregate_id(AggregateId::new())
            .aggregate_type("Bill")
            .event_type(event_type)
            .version(Version::first())
            .payload_raw(serde_json::json!({}))
            .build()
    }

    #[tokio::test]
    async fn routes_events_to_matching_listeners() {
        let dispatcher = EventTypeDispatcher::new();
        let opened = Arc::new(AtomicUsize::new(0));
        let closed = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&opened);
        dispatcher
            .subscribe(&["BillOpened"], move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .await;
        let counter = Arc::clone(&closed);
        dispatcher
            .subscribe(&["BillClosed"], move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        dispatcher
            .publish(&[envelope("BillOpened"), envelope("BillOpened")])
            .await;

        assert_eq!(opened.load(Ordering::SeqCst), 2);
        assert_eq!(closed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn one_listener_may_watch_several_event_types() {
        let dispatcher = EventTypeDispatcher::new();
        let seen = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&seen);
        dispatcher
            .subscribe(&["ItemReserved", "ReservationCancelled"], move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        dispatcher
            .publish(&[envelope("ItemReserved"), envelope("ReservationCancelled")])
            .await;

        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unmatched_events_are_dropped() {
        let dispatcher = EventTypeDispatcher::new();
        dispatcher.publish(&[envelope("OrderTaken")]).await;
    }
}
