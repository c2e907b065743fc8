//! Inventory item commands.

use common::{AggregateId, ReservationId};

use crate::bill::Money;
use crate::command::Command;

use super::Item;

/// Command to put a new item into the inventory.
#[derive(Debug, Clone)]
pub struct CreateItem {
    /// The identity the new item will carry.
    pub item_id: AggregateId,

    /// The item name.
    pub name: String,

    /// The initial stock level.
    pub stock: i64,

    /// The unit price.
    pub price: Money,
}

impl CreateItem {
    /// Creates a CreateItem command with a freshly generated identity.
    pub fn new(name: impl Into<String>, stock: i64, price: Money) -> Self {
        Self::with_id(AggregateId::new(), name, stock, price)
    }

    /// Creates a CreateItem command for a specific identity.
    pub fn with_id(
        item_id: AggregateId,
        name: impl Into<String>,
        stock: i64,
        price: Money,
    ) -> Self {
        Self {
            item_id,
            name: name.into(),
            stock,
            price,
        }
    }
}

impl Command for CreateItem {
    type Aggregate = Item;

    fn aggregate_id(&self) -> AggregateId {
        self.item_id
    }
}

/// Command to rename an item.
#[derive(Debug, Clone)]
pub struct RenameItem {
    /// The item to rename.
    pub item_id: AggregateId,

    /// The new name.
    pub name: String,
}

impl RenameItem {
    /// Creates a RenameItem command.
    pub fn new(item_id: AggregateId, name: impl Into<String>) -> Self {
        Self {
            item_id,
            name: name.into(),
        }
    }
}

impl Command for RenameItem {
    type Aggregate = Item;

    fn aggregate_id(&self) -> AggregateId {
        self.item_id
    }
}

/// Command to reprice an item.
#[derive(Debug, Clone)]
pub struct ChangeItemPrice {
    /// The item to reprice.
    pub item_id: AggregateId,

    /// The new unit price.
    pub price: Money,
}

impl ChangeItemPrice {
    /// Creates a ChangeItemPrice command.
    pub fn new(item_id: AggregateId, price: Money) -> Self {
        Self { item_id, price }
    }
}

impl Command for ChangeItemPrice {
    type Aggregate = Item;

    fn aggregate_id(&self) -> AggregateId {
        self.item_id
    }
}

/// Command to add units to an item's stock.
#[derive(Debug, Clone)]
pub struct AddStock {
    /// The item restocked.
    pub item_id: AggregateId,

    /// How many units to add.
    pub amount: i64,
}

impl AddStock {
    /// Creates an AddStock command.
    pub fn new(item_id: AggregateId, amount: i64) -> Self {
        Self { item_id, amount }
    }
}

impl Command for AddStock {
    type Aggregate = Item;

    fn aggregate_id(&self) -> AggregateId {
        self.item_id
    }
}

/// Command to remove units from stock outright, without a reservation.
#[derive(Debug, Clone)]
pub struct RemoveStock {
    /// The item drawn from.
    pub item_id: AggregateId,

    /// How many units to remove.
    pub amount: i64,
}

impl RemoveStock {
    /// Creates a RemoveStock command.
    pub fn new(item_id: AggregateId, amount: i64) -> Self {
        Self { item_id, amount }
    }
}

impl Command for RemoveStock {
    type Aggregate = Item;

    fn aggregate_id(&self) -> AggregateId {
        self.item_id
    }
}

/// Command to provisionally reserve units of stock.
///
/// The reservation id is generated when the command is built so callers
/// know it before the command runs and can retry with the same id.
#[derive(Debug, Clone)]
pub struct ReserveStock {
    /// The item reserved against.
    pub item_id: AggregateId,

    /// How many units to reserve.
    pub amount: i64,

    /// The identity of the reservation being opened.
    pub reservation_id: ReservationId,
}

impl ReserveStock {
    /// Creates a ReserveStock command with a freshly generated reservation id.
    pub fn new(item_id: AggregateId, amount: i64) -> Self {
        Self::with_reservation_id(item_id, amount, ReservationId::new())
    }

    /// Creates a ReserveStock command under a specific reservation id.
    pub fn with_reservation_id(
        item_id: AggregateId,
        amount: i64,
        reservation_id: ReservationId,
    ) -> Self {
        Self {
            item_id,
            amount,
            reservation_id,
        }
    }
}

impl Command for ReserveStock {
    type Aggregate = Item;

    fn aggregate_id(&self) -> AggregateId {
        self.item_id
    }
}

/// Command to confirm a pending reservation.
#[derive(Debug, Clone)]
pub struct ConfirmReservation {
    /// The item holding the reservation.
    pub item_id: AggregateId,

    /// The reservation to confirm.
    pub reservation_id: ReservationId,
}

impl ConfirmReservation {
    /// Creates a ConfirmReservation command.
    pub fn new(item_id: AggregateId, reservation_id: ReservationId) -> Self {
        Self {
            item_id,
            reservation_id,
        }
    }
}

impl Command for ConfirmReservation {
    type Aggregate = Item;

    fn aggregate_id(&self) -> AggregateId {
        self.item_id
    }
}

/// Command to cancel a pending reservation and restore its stock.
#[derive(Debug, Clone)]
pub struct CancelReservation {
    /// The item holding the reservation.
    pub item_id: AggregateId,

    /// The reservation to cancel.
    pub reservation_id: ReservationId,
}

impl CancelReservation {
    /// Creates a CancelReservation command.
    pub fn new(item_id: AggregateId, reservation_id: ReservationId) -> Self {
        Self {
            item_id,
            reservation_id,
        }
    }
}

impl Command for CancelReservation {
    type Aggregate = Item;

    fn aggregate_id(&self) -> AggregateId {
        self.item_id
    }
}
