//! Event store and notifier collaborators.
//!
//! The kernel in the `domain` crate is pure and synchronous; everything that
//! touches shared state lives here, behind narrow traits:
//! - [`EventStore`]: load/append the event stream of one aggregate, with
//!   optimistic-concurrency checks at the append boundary.
//! - [`Notifier`]: fire-and-forget fan-out of freshly appended events.

pub mod error;
pub mod event;
pub mod memory;
pub mod notify;
pub mod store;

pub use common::AggregateId;
pub use error::{EventStoreError, Result};
pub use event::{EventEnvelope, EventEnvelopeBuilder, EventId, Version};
pub use memory::InMemoryEventStore;
pub use notify::{EventTypeDispatcher, Notifier, NullNotifier};
pub use store::{AppendOptions, EventStore};
