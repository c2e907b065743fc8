//! Bill aggregate: an open/closed tab tracking items ordered against items
//! paid.

use common::AggregateId;

use crate::aggregate::Aggregate;
use crate::log::EventLog;

use super::{BillError, BillEvent, Order};

/// Bill aggregate root.
///
/// Created open; orders and payments accumulate while open; once everything
/// ordered has been paid the bill can be closed, which is terminal. Commands
/// never mutate in place: each returns a fresh `Bill` with one more event in
/// its log, or an error that leaves the receiver untouched.
#[derive(Debug, Clone, Default)]
pub struct Bill {
    id: Option<AggregateId>,
    items_ordered: Order,
    items_paid: Order,
    closed: bool,
    log: EventLog<BillEvent>,
}

impl Aggregate for Bill {
    type Event = BillEvent;
    type Error = BillError;

    fn aggregate_type() -> &'static str {
        "Bill"
    }

    fn id(&self) -> Option<AggregateId> {
        self.id
    }

    fn events(&self) -> &EventLog<BillEvent> {
        &self.log
    }

    fn events_mut(&mut self) -> &mut EventLog<BillEvent> {
        &mut self.log
    }

    fn apply(&mut self, event: &BillEvent) {
        match event {
            BillEvent::BillOpened(data) => {
                self.id = Some(data.bill_id);
            }
            BillEvent::OrderTaken(data) => {
                self.items_ordered = data.items_ordered.clone();
            }
            BillEvent::BillPaid(data) => {
                self.items_paid = data.items_paid.clone();
            }
            BillEvent::BillClosed(_) => {
                self.closed = true;
            }
        }
    }
}

// State comparison ignores the log: two bills are the same bill when their
// identity and replayed state agree.
impl PartialEq for Bill {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.items_ordered == other.items_ordered
            && self.items_paid == other.items_paid
            && self.closed == other.closed
    }
}

impl Eq for Bill {}

// Query methods
impl Bill {
    /// Everything ordered onto the bill so far.
    pub fn items_ordered(&self) -> &Order {
        &self.items_ordered
    }

    /// Everything paid so far.
    pub fn items_paid(&self) -> &Order {
        &self.items_paid
    }

    /// Whether the bill is still open.
    pub fn is_open(&self) -> bool {
        !self.closed
    }

    /// Whether the bill has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Whether everything ordered has been paid.
    pub fn is_paid(&self) -> bool {
        self.items_ordered == self.items_paid
    }

    /// What remains to be paid.
    pub fn outstanding(&self) -> Order {
        // `pay` never lets items_paid exceed items_ordered, so the removal
        // holds for any bill built through commands.
        self.items_ordered
            .remove(&self.items_paid)
            .unwrap_or_default()
    }
}

// Factories and commands
impl Bill {
    /// Opens a new bill under a fresh identity.
    pub fn open() -> Bill {
        Self::open_with_id(AggregateId::new())
    }

    /// Opens a new bill under the given identity.
    pub fn open_with_id(bill_id: AggregateId) -> Bill {
        let event = BillEvent::bill_opened(bill_id);
        let mut bill = Bill::default();
        bill.apply(&event);
        bill.log = EventLog::single(event);
        bill
    }

    /// Orders items onto the bill.
    pub fn order(&self, items: &Order) -> Result<Bill, BillError> {
        let bill_id = self.ensure_open()?;
        let new_total = self.items_ordered.add(items);
        self.emit(BillEvent::order_taken(bill_id, new_total))
    }

    /// Records a payment against the bill.
    ///
    /// The payment must be covered by what is still owed; paying for items
    /// never ordered (or already paid) fails with
    /// [`BillError::UnexpectedPayment`].
    pub fn pay(&self, payment: &Order) -> Result<Bill, BillError> {
        let bill_id = self.ensure_open()?;
        if !self.outstanding().contains(payment) {
            return Err(BillError::UnexpectedPayment);
        }
        let new_total = self.items_paid.add(payment);
        self.emit(BillEvent::bill_paid(bill_id, new_total))
    }

    /// Closes the bill. Only reachable once ordered and paid match.
    pub fn close(&self) -> Result<Bill, BillError> {
        let bill_id = self.ensure_open()?;
        if !self.is_paid() {
            return Err(BillError::UnpaidBill);
        }
        self.emit(BillEvent::bill_closed(bill_id))
    }

    fn ensure_open(&self) -> Result<AggregateId, BillError> {
        let bill_id = self.id.ok_or(BillError::NotOpened)?;
        if self.closed {
            return Err(BillError::BillClosed);
        }
        Ok(bill_id)
    }

    fn emit(&self, event: BillEvent) -> Result<Bill, BillError> {
        let mut next = self.clone();
        next.record(event)?;
        Ok(next)
    }
}
