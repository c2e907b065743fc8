use async_trait::async_trait;

use crate::{AggregateId, EventEnvelope, EventStoreError, Result, Version};

/// Options for appending events to the store.
#[derive(Debug, Clone, Default)]
pub struct AppendOptions {
    /// Expected head version of the stream, for optimistic concurrency
    /// control. If None, no version check is performed (use with caution).
    pub expected_version: Option<Version>,
}

impl AppendOptions {
    /// Creates options with no version check.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options expecting the stream to be at a specific version.
    pub fn expect_version(version: Version) -> Self {
        Self {
            expected_version: Some(version),
        }
    }

    /// Creates options expecting the stream to not exist yet.
    pub fn expect_new() -> Self {
        Self {
            expected_version: Some(Version::initial()),
        }
    }
}

/// Contract for event store implementations.
///
/// The store owns the serialization point for concurrent commands against the
/// same aggregate: the kernel is pure and performs no locking, so the
/// expected-version check on `append` is what prevents two commands replayed
/// from the same snapshot from both landing.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Appends a batch of events to one aggregate's stream.
    ///
    /// The batch is appended atomically. If `options.expected_version` is
    /// set and does not match the current stream head, the append fails with
    /// [`EventStoreError::ConcurrencyConflict`].
    ///
    /// Returns the new head version of the stream.
    async fn append(&self, events: Vec<EventEnvelope>, options: AppendOptions) -> Result<Version>;

    /// Retrieves all events for one aggregate, in version order.
    ///
    /// Returns an empty vec for an aggregate with no events.
    async fn events_for_aggregate(&self, aggregate_id: AggregateId) -> Result<Vec<EventEnvelope>>;

    /// Returns the current head version of an aggregate's stream, or None if
    /// the aggregate has no events.
    async fn aggregate_version(&self, aggregate_id: AggregateId) -> Result<Option<Version>>;
}

/// Validates an append batch before it touches storage.
///
/// A valid batch is non-empty, belongs to exactly one aggregate (the store's
/// mirror of the kernel's mixed-aggregate rule), carries one aggregate type
/// and has strictly sequential versions.
pub fn validate_append(events: &[EventEnvelope]) -> Result<()> {
    let first = events
        .first()
        .ok_or_else(|| EventStoreError::InvalidAppend("empty event batch".to_string()))?;

    for event in events.iter().skip(1) {
        if event.aggregate_id != first.aggregate_id {
            return Err(EventStoreError::InvalidAppend(
                "all events in a batch must belong to the same aggregate".to_string(),
            ));
        }
        if event.aggregate_type != first.aggregate_type {
            return Err(EventStoreError::InvalidAppend(
                "all events in a batch must have the same aggregate type".to_string(),
            ));
        }
    }

    let mut expected = first.version;
    for event in events.iter().skip(1) {
        expected = expected.next();
        if event.version != expected {
            return Err(EventStoreError::InvalidAppend(format!(
                "event versions must be sequential: expected {expected}, got {}",
                event.version
            )));
        }
    }

    Ok(())
}
