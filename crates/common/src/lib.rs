//! Shared identifier types used across the kernel.

mod types;

pub use types::{AggregateId, ReservationId};
