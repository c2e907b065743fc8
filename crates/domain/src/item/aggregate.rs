//! Inventory item aggregate: a stock count with a two-phase reservation
//! protocol.

use std::collections::BTreeMap;

use common::{AggregateId, ReservationId};

use crate::aggregate::Aggregate;
use crate::bill::Money;
use crate::log::EventLog;

use super::{ItemError, ItemEvent};

/// Inventory item aggregate root.
///
/// Stock moves through plain add/remove and through reservations:
/// `reserve` provisionally takes units out of stock under a fresh
/// reservation id; `confirm_reservation` consumes them for good;
/// `cancel_reservation` puts exactly the reserved amount back. A reservation
/// id is pending from its `ItemReserved` event until the one confirmation or
/// cancellation that consumes it; touching it again is an error, so stock can
/// be neither double-spent nor resurrected.
#[derive(Debug, Clone, Default)]
pub struct Item {
    id: Option<AggregateId>,
    name: String,
    stock: i64,
    price: Money,
    // Pending reservations keep the reserved quantity alongside the id, so a
    // cancellation restores the amount recorded at reservation time without
    // scanning the log for the matching ItemReserved event.
    pending: BTreeMap<ReservationId, i64>,
    log: EventLog<ItemEvent>,
}

impl Aggregate for Item {
    type Event = ItemEvent;
    type Error = ItemError;

    fn aggregate_type() -> &'static str {
        "Item"
    }

    fn id(&self) -> Option<AggregateId> {
        self.id
    }

    fn events(&self) -> &EventLog<ItemEvent> {
        &self.log
    }

    fn events_mut(&mut self) -> &mut EventLog<ItemEvent> {
        &mut self.log
    }

    fn apply(&mut self, event: &ItemEvent) {
        match event {
            ItemEvent::ItemCreated(data) => {
                self.id = Some(data.item_id);
                self.name = data.name.clone();
                self.stock = data.stock;
                self.price = data.price;
            }
            ItemEvent::NameChanged(data) => {
                self.name = data.new_name.clone();
            }
            ItemEvent::PriceChanged(data) => {
                self.price = data.new_price;
            }
            ItemEvent::StockAdded(data) => {
                self.stock = data.new_stock;
            }
            ItemEvent::StockRemoved(data) => {
                self.stock = data.new_stock;
            }
            ItemEvent::ItemReserved(data) => {
                self.stock = data.new_stock;
                self.pending.insert(data.reservation_id, data.quantity);
            }
            ItemEvent::ReservationConfirmed(data) => {
                self.pending.remove(&data.reservation_id);
            }
            ItemEvent::ReservationCancelled(data) => {
                self.stock = data.new_stock;
                self.pending.remove(&data.reservation_id);
            }
        }
    }
}

// State comparison ignores the log, like the bill's.
impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.stock == other.stock
            && self.price == other.price
            && self.pending == other.pending
    }
}

impl Eq for Item {}

// Query methods
impl Item {
    /// The item's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Units currently available, excluding pending reservations.
    pub fn stock(&self) -> i64 {
        self.stock
    }

    /// The unit price.
    pub fn price(&self) -> Money {
        self.price
    }

    /// Ids of all in-flight reservations.
    pub fn pending_reservations(&self) -> impl Iterator<Item = ReservationId> + '_ {
        self.pending.keys().copied()
    }

    /// The quantity held by a pending reservation, or None if the id is not
    /// pending.
    pub fn reserved_quantity(&self, reservation_id: ReservationId) -> Option<i64> {
        self.pending.get(&reservation_id).copied()
    }

    /// Whether any reservation is in flight.
    pub fn has_pending_reservations(&self) -> bool {
        !self.pending.is_empty()
    }
}

// Factories and commands
impl Item {
    /// Puts a new item into the inventory under a fresh identity.
    pub fn create(
        name: impl Into<String>,
        stock: i64,
        price: Money,
    ) -> Result<Item, ItemError> {
        Self::create_with_id(AggregateId::new(), name, stock, price)
    }

    /// Puts a new item into the inventory under the given identity.
    pub fn create_with_id(
        item_id: AggregateId,
        name: impl Into<String>,
        stock: i64,
        price: Money,
    ) -> Result<Item, ItemError> {
        let name = name.into();
        check_name(&name)?;
        check_amount(stock)?;
        check_price(price)?;

        let event = ItemEvent::item_created(item_id, name, stock, price);
        let mut item = Item::default();
        item.apply(&event);
        item.log = EventLog::single(event);
        Ok(item)
    }

    /// Renames the item.
    pub fn change_name(&self, name: impl Into<String>) -> Result<Item, ItemError> {
        let item_id = self.ensure_created()?;
        let name = name.into();
        check_name(&name)?;
        self.emit(ItemEvent::name_changed(item_id, name))
    }

    /// Reprices the item.
    pub fn change_price(&self, price: Money) -> Result<Item, ItemError> {
        let item_id = self.ensure_created()?;
        check_price(price)?;
        self.emit(ItemEvent::price_changed(item_id, price))
    }

    /// Adds units to stock, saturating at the numeric bound.
    pub fn add(&self, amount: i64) -> Result<Item, ItemError> {
        let item_id = self.ensure_created()?;
        check_amount(amount)?;
        self.emit(ItemEvent::stock_added(
            item_id,
            self.stock.saturating_add(amount),
        ))
    }

    /// Removes units from stock outright, without a reservation.
    pub fn remove(&self, amount: i64) -> Result<Item, ItemError> {
        let item_id = self.ensure_created()?;
        check_amount(amount)?;
        if amount > self.stock {
            return Err(ItemError::InsufficientStock {
                requested: amount,
                available: self.stock,
            });
        }
        self.emit(ItemEvent::stock_removed(item_id, self.stock - amount))
    }

    /// Provisionally takes units out of stock under a fresh reservation id.
    ///
    /// Returns the new item value together with the id to later confirm or
    /// cancel the reservation with.
    pub fn reserve(&self, amount: i64) -> Result<(Item, ReservationId), ItemError> {
        let reservation_id = ReservationId::new();
        let item = self.reserve_with_id(reservation_id, amount)?;
        Ok((item, reservation_id))
    }

    /// Reserves under a caller-supplied reservation id.
    pub fn reserve_with_id(
        &self,
        reservation_id: ReservationId,
        amount: i64,
    ) -> Result<Item, ItemError> {
        let item_id = self.ensure_created()?;
        check_amount(amount)?;
        if amount > self.stock {
            return Err(ItemError::InsufficientStock {
                requested: amount,
                available: self.stock,
            });
        }
        self.emit(ItemEvent::item_reserved(
            item_id,
            reservation_id,
            amount,
            self.stock - amount,
        ))
    }

    /// Confirms a pending reservation: the reserved units are consumed for
    /// good and stock is not restored.
    pub fn confirm_reservation(&self, reservation_id: ReservationId) -> Result<Item, ItemError> {
        let item_id = self.ensure_created()?;
        if self.reserved_quantity(reservation_id).is_none() {
            return Err(ItemError::UnknownReservation(reservation_id));
        }
        self.emit(ItemEvent::reservation_confirmed(item_id, reservation_id))
    }

    /// Cancels a pending reservation, restoring exactly the quantity that
    /// was recorded when it was reserved.
    pub fn cancel_reservation(&self, reservation_id: ReservationId) -> Result<Item, ItemError> {
        let item_id = self.ensure_created()?;
        let quantity = self
            .reserved_quantity(reservation_id)
            .ok_or(ItemError::UnknownReservation(reservation_id))?;
        self.emit(ItemEvent::reservation_cancelled(
            item_id,
            reservation_id,
            self.stock.saturating_add(quantity),
        ))
    }

    fn ensure_created(&self) -> Result<AggregateId, ItemError> {
        self.id.ok_or(ItemError::NotCreated)
    }

    fn emit(&self, event: ItemEvent) -> Result<Item, ItemError> {
        let mut next = self.clone();
        next.record(event)?;
        Ok(next)
    }
}

fn check_name(name: &str) -> Result<(), ItemError> {
    if name.is_empty() {
        return Err(ItemError::InvalidName);
    }
    Ok(())
}

fn check_price(price: Money) -> Result<(), ItemError> {
    if price.is_negative() {
        return Err(ItemError::NegativePrice);
    }
    Ok(())
}

fn check_amount(amount: i64) -> Result<(), ItemError> {
    if amount < 0 {
        return Err(ItemError::NegativeAmount(amount));
    }
    Ok(())
}
