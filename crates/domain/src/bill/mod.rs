//! Bill aggregate and related types.

mod aggregate;
mod commands;
mod events;
mod order;
mod service;

pub use aggregate::Bill;
pub use commands::{CloseBill, OpenBill, PayBill, TakeOrder};
pub use events::{BillClosedData, BillEvent, BillOpenedData, BillPaidData, OrderTakenData};
pub use order::{MenuItem, Money, Order, OrderError};
pub use service::BillService;

use thiserror::Error;

use crate::log::EventLogError;

/// Validation errors raised by bill commands, always before any event is
/// built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BillError {
    /// The bill is closed; no further command is accepted.
    #[error("bill is closed")]
    BillClosed,

    /// The bill has no creation event yet.
    #[error("bill has not been opened")]
    NotOpened,

    /// A payment was not covered by what is still owed.
    #[error("payment does not match what is left to pay")]
    UnexpectedPayment,

    /// Close was requested while items are still owed.
    #[error("bill is not fully paid")]
    UnpaidBill,

    /// A structural event-log violation surfaced while recording.
    #[error(transparent)]
    Log(#[from] EventLogError),
}
