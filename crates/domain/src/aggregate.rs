//! Core aggregate and domain event traits.

use common::AggregateId;
use serde::{Serialize, de::DeserializeOwned};

use crate::log::{EventLog, EventLogError};

/// Trait for domain events.
///
/// Domain events are immutable facts about one aggregate instance, named in
/// past tense. They serialize as tagged unions so the store can persist them
/// as JSON payloads.
pub trait DomainEvent: Serialize + DeserializeOwned + Send + Sync + Clone + PartialEq {
    /// Returns the event type name, used for store filtering and routing.
    fn event_type(&self) -> &'static str;

    /// Returns the aggregate instance this event belongs to.
    fn aggregate_id(&self) -> AggregateId;
}

/// Trait for event-sourced aggregates.
///
/// An aggregate's entire state derives from its own event log. [`apply`] is
/// the single transition function shared by replay and by commands; it must
/// be pure, deterministic and total over the aggregate's event enum (the
/// exhaustive match makes an unrecognized event kind unrepresentable rather
/// than a runtime fallback).
///
/// Commands follow one pattern: validate against the already-replayed state,
/// build exactly one event, clone, [`record`] it, return the new value. A
/// failed validation returns before any event exists, so the receiver and
/// its log are untouched.
///
/// [`apply`]: Aggregate::apply
/// [`record`]: Aggregate::record
pub trait Aggregate: Default + Clone + Send + Sync + Sized {
    /// The type of events this aggregate produces and consumes.
    type Event: DomainEvent;

    /// The type of validation errors its commands can produce.
    type Error: std::error::Error + Send + Sync;

    /// Returns the aggregate type name, used for event store organization.
    fn aggregate_type() -> &'static str;

    /// Returns the aggregate's identity, or None before its creation event.
    fn id(&self) -> Option<AggregateId>;

    /// Borrows the event log this state was derived from.
    fn events(&self) -> &EventLog<Self::Event>;

    /// Mutably borrows the owned log. Trait plumbing for [`record`] and
    /// [`load_from_events`]; command code goes through those instead.
    ///
    /// [`record`]: Aggregate::record
    /// [`load_from_events`]: Aggregate::load_from_events
    fn events_mut(&mut self) -> &mut EventLog<Self::Event>;

    /// Applies one event to the state. Pure and infallible: events are facts
    /// that have already happened.
    fn apply(&mut self, event: &Self::Event);

    /// Applies an event and appends it to the owned log.
    ///
    /// The identity check runs before the transition, so a rejected event
    /// leaves both state and log untouched.
    fn record(&mut self, event: Self::Event) -> Result<(), EventLogError> {
        if let Some(expected) = self.events().aggregate_id() {
            let found = event.aggregate_id();
            if found != expected {
                return Err(EventLogError::MixedAggregate { expected, found });
            }
        }
        self.apply(&event);
        self.events_mut().append(event)
    }

    /// Reconstructs state by folding the transition function over a log,
    /// starting from the empty state. Deterministic and order-sensitive.
    fn load_from_events(log: EventLog<Self::Event>) -> Self {
        let mut aggregate = Self::default();
        for event in log.iter() {
            aggregate.apply(event);
        }
        *aggregate.events_mut() = log;
        aggregate
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(tag = "type", content = "data")]
    enum CounterEvent {
        Started { counter_id: AggregateId },
        SetTo { counter_id: AggregateId, value: i64 },
    }

    impl DomainEvent for CounterEvent {
        fn event_type(&self) -> &'static str {
            match self {
                CounterEvent::Started { .. } => "Started",
                CounterEvent::SetTo { .. } => "SetTo",
            }
        }

        fn aggregate_id(&self) -> AggregateId {
            match self {
                CounterEvent::Started { counter_id } => *counter_id,
                CounterEvent::SetTo { counter_id, .. } => *counter_id,
            }
        }
    }

    #[derive(Debug, Clone, Default)]
    struct Counter {
        id: Option<AggregateId>,
        value: i64,
        log: EventLog<CounterEvent>,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("counter error")]
    struct CounterError;

    impl Aggregate for Counter {
        type Event = CounterEvent;
        type Error = CounterError;

        fn aggregate_type() -> &'static str {
            "Counter"
        }

        fn id(&self) -> Option<AggregateId> {
            self.id
        }

        fn events(&self) -> &EventLog<CounterEvent> {
            &self.log
        }

        fn events_mut(&mut self) -> &mut EventLog<CounterEvent> {
            &mut self.log
        }

        fn apply(&mut self, event: &CounterEvent) {
            match event {
                CounterEvent::Started { counter_id } => self.id = Some(*counter_id),
                CounterEvent::SetTo { value, .. } => self.value = *value,
            }
        }
    }

    #[test]
    fn replay_folds_in_log_order() {
        let id = AggregateId::new();
        let log = EventLog::from_events(vec![
            CounterEvent::Started { counter_id: id },
            CounterEvent::SetTo {
                counter_id: id,
                value: 2,
            },
            CounterEvent::SetTo {
                counter_id: id,
                value: 7,
            },
        ])
        .unwrap();

        let counter = Counter::load_from_events(log);
        assert_eq!(counter.id(), Some(id));
        assert_eq!(counter.value, 7);
        assert_eq!(counter.events().len(), 3);
    }

    #[test]
    fn replay_is_deterministic() {
        let id = AggregateId::new();
        let events = vec![
            CounterEvent::Started { counter_id: id },
            CounterEvent::SetTo {
                counter_id: id,
                value: 42,
            },
        ];

        let a = Counter::load_from_events(EventLog::from_events(events.clone()).unwrap());
        let b = Counter::load_from_events(EventLog::from_events(events).unwrap());
        assert_eq!(a.value, b.value);
        assert_eq!(a.events(), b.events());
    }

    #[test]
    fn record_applies_and_appends() {
        let id = AggregateId::new();
        let mut counter = Counter::default();
        counter
            .record(CounterEvent::Started { counter_id: id })
            .unwrap();
        counter
            .record(CounterEvent::SetTo {
                counter_id: id,
                value: 3,
            })
            .unwrap();

        assert_eq!(counter.value, 3);
        assert_eq!(counter.events().len(), 2);
    }

    #[test]
    fn record_rejects_event_for_another_aggregate() {
        let mut counter = Counter::default();
        counter
            .record(CounterEvent::Started {
                counter_id: AggregateId::new(),
            })
            .unwrap();

        let err = counter
            .record(CounterEvent::SetTo {
                counter_id: AggregateId::new(),
                value: 1,
            })
            .unwrap_err();
        assert!(matches!(err, EventLogError::MixedAggregate { .. }));
        // Rejected before the transition ran.
        assert_eq!(counter.value, 0);
        assert_eq!(counter.events().len(), 1);
    }
}
