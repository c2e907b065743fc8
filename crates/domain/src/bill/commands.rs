//! Bill commands.

use common::AggregateId;

use crate::command::Command;

use super::{Bill, Order};

/// Command to open a new bill.
#[derive(Debug, Clone)]
pub struct OpenBill {
    /// The identity the new bill will carry.
    pub bill_id: AggregateId,
}

impl OpenBill {
    /// Creates an OpenBill command for a specific identity.
    pub fn with_id(bill_id: AggregateId) -> Self {
        Self { bill_id }
    }

    /// Creates an OpenBill command with a freshly generated identity.
    pub fn new() -> Self {
        Self {
            bill_id: AggregateId::new(),
        }
    }
}

impl Default for OpenBill {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for OpenBill {
    type Aggregate = Bill;

    fn aggregate_id(&self) -> AggregateId {
        self.bill_id
    }
}

/// Command to order items onto a bill.
#[derive(Debug, Clone)]
pub struct TakeOrder {
    /// The bill ordered against.
    pub bill_id: AggregateId,

    /// The items being ordered.
    pub items: Order,
}

impl TakeOrder {
    /// Creates a TakeOrder command.
    pub fn new(bill_id: AggregateId, items: Order) -> Self {
        Self { bill_id, items }
    }
}

impl Command for TakeOrder {
    type Aggregate = Bill;

    fn aggregate_id(&self) -> AggregateId {
        self.bill_id
    }
}

/// Command to record a payment against a bill.
#[derive(Debug, Clone)]
pub struct PayBill {
    /// The bill paid against.
    pub bill_id: AggregateId,

    /// The items covered by this payment.
    pub payment: Order,
}

impl PayBill {
    /// Creates a PayBill command.
    pub fn new(bill_id: AggregateId, payment: Order) -> Self {
        Self { bill_id, payment }
    }
}

impl Command for PayBill {
    type Aggregate = Bill;

    fn aggregate_id(&self) -> AggregateId {
        self.bill_id
    }
}

/// Command to close a fully paid bill.
#[derive(Debug, Clone)]
pub struct CloseBill {
    /// The bill to close.
    pub bill_id: AggregateId,
}

impl CloseBill {
    /// Creates a CloseBill command.
    pub fn new(bill_id: AggregateId) -> Self {
        Self { bill_id }
    }
}

impl Command for CloseBill {
    type Aggregate = Bill;

    fn aggregate_id(&self) -> AggregateId {
        self.bill_id
    }
}
