//! The typed, append-only event log owned by each aggregate.

use common::AggregateId;
use thiserror::Error;

use crate::aggregate::DomainEvent;

/// Structural errors raised when grouping events into a log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EventLogError {
    /// Events for more than one aggregate id were grouped together.
    #[error("events for aggregate {found} cannot join the log of aggregate {expected}")]
    MixedAggregate {
        expected: AggregateId,
        found: AggregateId,
    },
}

/// Ordered, append-only sequence of events sharing one aggregate identity.
///
/// An empty log has no fixed identity; the first event establishes it and
/// every later append must match. Order is preserved and duplicates are kept
/// verbatim: the log records what happened, deciding what a duplicate means
/// is the transition function's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLog<E> {
    events: Vec<E>,
}

impl<E> Default for EventLog<E> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<E: DomainEvent> EventLog<E> {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a log seeded with one event; that event fixes the identity.
    pub fn single(event: E) -> Self {
        Self {
            events: vec![event],
        }
    }

    /// Builds a log from an event sequence.
    ///
    /// Fails with [`EventLogError::MixedAggregate`] if the events span more
    /// than one aggregate id. Order is kept as given.
    pub fn from_events(events: impl IntoIterator<Item = E>) -> Result<Self, EventLogError> {
        let mut log = Self::new();
        for event in events {
            log.append(event)?;
        }
        Ok(log)
    }

    /// Appends one event, which must match the log's established identity.
    pub fn append(&mut self, event: E) -> Result<(), EventLogError> {
        if let Some(expected) = self.aggregate_id() {
            let found = event.aggregate_id();
            if found != expected {
                return Err(EventLogError::MixedAggregate { expected, found });
            }
        }
        self.events.push(event);
        Ok(())
    }

    /// Appends every event of another log, in order.
    pub fn extend(&mut self, other: EventLog<E>) -> Result<(), EventLogError> {
        for event in other.events {
            self.append(event)?;
        }
        Ok(())
    }

    /// The identity shared by every event, or None while the log is empty.
    pub fn aggregate_id(&self) -> Option<AggregateId> {
        self.events.first().map(DomainEvent::aggregate_id)
    }

    /// Number of events in the log.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the log holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterates the events in log order.
    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.events.iter()
    }

    /// The events appended at or after the given position.
    ///
    /// Used by the command handler to extract the delta a command produced on
    /// top of the replayed prefix.
    pub fn events_from(&self, position: usize) -> &[E] {
        &self.events[position.min(self.events.len())..]
    }

    /// Borrows the whole log as a slice.
    pub fn as_slice(&self) -> &[E] {
        &self.events
    }
}

impl<E: DomainEvent> IntoIterator for EventLog<E> {
    type Item = E;
    type IntoIter = std::vec::IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl<'a, E: DomainEvent> IntoIterator for &'a EventLog<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
