//! Bill domain events.
//!
//! `OrderTaken` and `BillPaid` carry the resulting totals, not deltas: every
//! transition sets state to an absolute value, so replaying a log with
//! duplicated events lands on the same state as replaying it once.

use common::AggregateId;
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;

use super::Order;

/// Events that can occur on a bill aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum BillEvent {
    /// A new bill was opened for a table or customer.
    BillOpened(BillOpenedData),

    /// Items were ordered onto the bill.
    OrderTaken(OrderTakenData),

    /// A payment was received against the bill.
    BillPaid(BillPaidData),

    /// The fully paid bill was closed.
    BillClosed(BillClosedData),
}

impl DomainEvent for BillEvent {
    fn event_type(&self) -> &'static str {
        match self {
            BillEvent::BillOpened(_) => "BillOpened",
            BillEvent::OrderTaken(_) => "OrderTaken",
            BillEvent::BillPaid(_) => "BillPaid",
            BillEvent::BillClosed(_) => "BillClosed",
        }
    }

    fn aggregate_id(&self) -> AggregateId {
        match self {
            BillEvent::BillOpened(data) => data.bill_id,
            BillEvent::OrderTaken(data) => data.bill_id,
            BillEvent::BillPaid(data) => data.bill_id,
            BillEvent::BillClosed(data) => data.bill_id,
        }
    }
}

/// Data for BillOpened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillOpenedData {
    /// The newly opened bill.
    pub bill_id: AggregateId,
}

/// Data for OrderTaken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderTakenData {
    /// The bill ordered against.
    pub bill_id: AggregateId,

    /// Everything ordered so far, including this order.
    pub items_ordered: Order,
}

/// Data for BillPaid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillPaidData {
    /// The bill paid against.
    pub bill_id: AggregateId,

    /// Everything paid so far, including this payment.
    pub items_paid: Order,
}

/// Data for BillClosed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillClosedData {
    /// The closed bill.
    pub bill_id: AggregateId,
}

impl BillEvent {
    /// Creates a BillOpened event.
    pub fn bill_opened(bill_id: AggregateId) -> Self {
        BillEvent::BillOpened(BillOpenedData { bill_id })
    }

    /// Creates an OrderTaken event carrying the new ordered total.
    pub fn order_taken(bill_id: AggregateId, items_ordered: Order) -> Self {
        BillEvent::OrderTaken(OrderTakenData {
            bill_id,
            items_ordered,
        })
    }

    /// Creates a BillPaid event carrying the new paid total.
    pub fn bill_paid(bill_id: AggregateId, items_paid: Order) -> Self {
        BillEvent::BillPaid(BillPaidData {
            bill_id,
            items_paid,
        })
    }

    /// Creates a BillClosed event.
    pub fn bill_closed(bill_id: AggregateId) -> Self {
        BillEvent::BillClosed(BillClosedData { bill_id })
    }
}
