//! Inventory item aggregate and related types.

mod aggregate;
mod commands;
mod events;
mod service;

pub use aggregate::Item;
pub use commands::{
    AddStock, CancelReservation, ChangeItemPrice, ConfirmReservation, CreateItem, RemoveStock,
    RenameItem, ReserveStock,
};
pub use events::{
    ItemCreatedData, ItemEvent, ItemReservedData, NameChangedData, PriceChangedData,
    ReservationCancelledData, ReservationConfirmedData, StockAddedData, StockRemovedData,
};
pub use service::ItemService;

use common::ReservationId;
use thiserror::Error;

use crate::log::EventLogError;

/// Validation errors raised by item commands, always before any event is
/// built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ItemError {
    /// The item name was empty.
    #[error("item name must not be empty")]
    InvalidName,

    /// The price was negative.
    #[error("item price must not be negative")]
    NegativePrice,

    /// A stock amount was negative.
    #[error("stock amount must not be negative: {0}")]
    NegativeAmount(i64),

    /// More stock was requested than is available.
    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: i64, available: i64 },

    /// The reservation id is not pending on this item: it was never issued
    /// here, or it has already been confirmed or cancelled.
    #[error("unknown reservation {0}")]
    UnknownReservation(ReservationId),

    /// The item has no creation event yet.
    #[error("item has not been created")]
    NotCreated,

    /// A structural event-log violation surfaced while recording.
    #[error(transparent)]
    Log(#[from] EventLogError),
}
