use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    AggregateId, EventEnvelope, EventStoreError, Result, Version,
    store::{AppendOptions, EventStore, validate_append},
};

/// In-memory event store: a lock-guarded map from aggregate id to its
/// append-only stream.
///
/// Suitable for tests and single-process hosts. Appends take the write lock
/// for the whole batch, so per-aggregate version checks and the write itself
/// are atomic.
#[derive(Clone, Default)]
pub struct InMemoryEventStore {
    streams: Arc<RwLock<HashMap<AggregateId, Vec<EventEnvelope>>>>,
}

impl InMemoryEventStore {
    /// Creates a new empty in-memory event store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of events across all streams.
    pub async fn event_count(&self) -> usize {
        self.streams.read().await.values().map(Vec::len).sum()
    }

    /// Clears all streams.
    pub async fn clear(&self) {
        self.streams.write().await.clear();
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn append(&self, events: Vec<EventEnvelope>, options: AppendOptions) -> Result<Version> {
        validate_append(&events)?;

        let aggregate_id = events[0].aggregate_id;
        let first_version = events[0].version;
        let last_version = events[events.len() - 1].version;

        let mut streams = self.streams.write().await;
        let stream = streams.entry(aggregate_id).or_default();

        let current_version = stream
            .last()
            .map(|e| e.version)
            .unwrap_or_else(Version::initial);

        if let Some(expected) = options.expected_version
            && current_version != expected
        {
            return Err(EventStoreError::ConcurrencyConflict {
                aggregate_id,
                expected,
                actual: current_version,
            });
        }

        // Streams only grow with contiguous versions even when no expected
        // version was supplied.
        if first_version != current_version.next() {
            return Err(EventStoreError::ConcurrencyConflict {
                aggregate_id,
                expected: options.expected_version.unwrap_or(current_version),
                actual: current_version,
            });
        }

        stream.extend(events);
        Ok(last_version)
    }

    async fn events_for_aggregate(&self, aggregate_id: AggregateId) -> Result<Vec<EventEnvelope>> {
        let streams = self.streams.read().await;
        Ok(streams.get(&aggregate_id).cloned().unwrap_or_default())
    }

    async fn aggregate_version(&self, aggregate_id: AggregateId) -> Result<Option<Version>> {
        let streams = self.streams.read().await;
        Ok(streams
            .get(&aggregate_id)
            .and_then(|stream| stream.last())
            .map(|e| e.version))
    }
}
