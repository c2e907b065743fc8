//! Domain error types.

use common::AggregateId;
use event_store::EventStoreError;
use thiserror::Error;

use crate::bill::BillError;
use crate::item::ItemError;
use crate::log::EventLogError;

/// Errors that can surface when driving aggregates through the services.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An error occurred in the event store.
    #[error("Event store error: {0}")]
    EventStore(#[from] EventStoreError),

    /// A bill command was rejected.
    #[error("Bill error: {0}")]
    Bill(#[from] BillError),

    /// An item command was rejected.
    #[error("Item error: {0}")]
    Item(#[from] ItemError),

    /// A command produced an aggregate whose log does not extend the
    /// persisted history, such as a creation command re-issued against an
    /// existing stream.
    #[error("aggregate {aggregate_id} already has history the command did not build on")]
    HistoryMismatch { aggregate_id: AggregateId },

    /// Events for several aggregates were grouped into one log.
    #[error("Event log error: {0}")]
    Log(#[from] EventLogError),

    /// An event payload could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
