//! Inventory item domain events.
//!
//! Stock-bearing events carry the resulting stock level, never a delta, so a
//! duplicated event re-applies to the same state. `ItemReserved` additionally
//! records the reserved quantity: that recorded figure, not a recomputation,
//! is what a later cancellation restores.

use common::{AggregateId, ReservationId};
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;
use crate::bill::Money;

/// Events that can occur on an inventory item aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ItemEvent {
    /// The item entered the inventory.
    ItemCreated(ItemCreatedData),

    /// The item was renamed.
    NameChanged(NameChangedData),

    /// The unit price changed.
    PriceChanged(PriceChangedData),

    /// Stock was added.
    StockAdded(StockAddedData),

    /// Stock was removed outright (no reservation involved).
    StockRemoved(StockRemovedData),

    /// Stock was provisionally taken by a reservation.
    ItemReserved(ItemReservedData),

    /// A pending reservation was confirmed; its units are consumed for good.
    ReservationConfirmed(ReservationConfirmedData),

    /// A pending reservation was cancelled; its units return to stock.
    ReservationCancelled(ReservationCancelledData),
}

impl DomainEvent for ItemEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ItemEvent::ItemCreated(_) => "ItemCreated",
            ItemEvent::NameChanged(_) => "NameChanged",
            ItemEvent::PriceChanged(_) => "PriceChanged",
            ItemEvent::StockAdded(_) => "StockAdded",
            ItemEvent::StockRemoved(_) => "StockRemoved",
            ItemEvent::ItemReserved(_) => "ItemReserved",
            ItemEvent::ReservationConfirmed(_) => "ReservationConfirmed",
            ItemEvent::ReservationCancelled(_) => "ReservationCancelled",
        }
    }

    fn aggregate_id(&self) -> AggregateId {
        match self {
            ItemEvent::ItemCreated(data) => data.item_id,
            ItemEvent::NameChanged(data) => data.item_id,
            ItemEvent::PriceChanged(data) => data.item_id,
            ItemEvent::StockAdded(data) => data.item_id,
            ItemEvent::StockRemoved(data) => data.item_id,
            ItemEvent::ItemReserved(data) => data.item_id,
            ItemEvent::ReservationConfirmed(data) => data.item_id,
            ItemEvent::ReservationCancelled(data) => data.item_id,
        }
    }
}

/// Data for ItemCreated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemCreatedData {
    /// The new item.
    pub item_id: AggregateId,

    /// Initial name.
    pub name: String,

    /// Initial stock count.
    pub stock: i64,

    /// Initial unit price.
    pub price: Money,
}

/// Data for NameChanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameChangedData {
    /// The renamed item.
    pub item_id: AggregateId,

    /// The new name.
    pub new_name: String,
}

/// Data for PriceChanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceChangedData {
    /// The repriced item.
    pub item_id: AggregateId,

    /// The new unit price.
    pub new_price: Money,
}

/// Data for StockAdded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockAddedData {
    /// The restocked item.
    pub item_id: AggregateId,

    /// The stock level after the addition.
    pub new_stock: i64,
}

/// Data for StockRemoved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRemovedData {
    /// The item stock was taken from.
    pub item_id: AggregateId,

    /// The stock level after the removal.
    pub new_stock: i64,
}

/// Data for ItemReserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemReservedData {
    /// The reserved item.
    pub item_id: AggregateId,

    /// The reservation's identity for later confirm/cancel.
    pub reservation_id: ReservationId,

    /// How many units this reservation holds.
    pub quantity: i64,

    /// The stock level after the reservation.
    pub new_stock: i64,
}

/// Data for ReservationConfirmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationConfirmedData {
    /// The item the reservation was held on.
    pub item_id: AggregateId,

    /// The confirmed reservation.
    pub reservation_id: ReservationId,
}

/// Data for ReservationCancelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationCancelledData {
    /// The item the reservation was held on.
    pub item_id: AggregateId,

    /// The cancelled reservation.
    pub reservation_id: ReservationId,

    /// The stock level after restoring the reserved units.
    pub new_stock: i64,
}

impl ItemEvent {
    /// Creates an ItemCreated event.
    pub fn item_created(
        item_id: AggregateId,
        name: impl Into<String>,
        stock: i64,
        price: Money,
    ) -> Self {
        ItemEvent::ItemCreated(ItemCreatedData {
            item_id,
            name: name.into(),
            stock,
            price,
        })
    }

    /// Creates a NameChanged event.
    pub fn name_changed(item_id: AggregateId, new_name: impl Into<String>) -> Self {
        ItemEvent::NameChanged(NameChangedData {
            item_id,
            new_name: new_name.into(),
        })
    }

    /// Creates a PriceChanged event.
    pub fn price_changed(item_id: AggregateId, new_price: Money) -> Self {
        ItemEvent::PriceChanged(PriceChangedData { item_id, new_price })
    }

    /// Creates a StockAdded event carrying the resulting stock level.
    pub fn stock_added(item_id: AggregateId, new_stock: i64) -> Self {
        ItemEvent::StockAdded(StockAddedData { item_id, new_stock })
    }

    /// Creates a StockRemoved event carrying the resulting stock level.
    pub fn stock_removed(item_id: AggregateId, new_stock: i64) -> Self {
        ItemEvent::StockRemoved(StockRemovedData { item_id, new_stock })
    }

    /// Creates an ItemReserved event.
    pub fn item_reserved(
        item_id: AggregateId,
        reservation_id: ReservationId,
        quantity: i64,
        new_stock: i64,
    ) -> Self {
        ItemEvent::ItemReserved(ItemReservedData {
            item_id,
            reservation_id,
            quantity,
            new_stock,
        })
    }

    /// Creates a ReservationConfirmed event.
    pub fn reservation_confirmed(item_id: AggregateId, reservation_id: ReservationId) -> Self {
        ItemEvent::ReservationConfirmed(ReservationConfirmedData {
            item_id,
            reservation_id,
        })
    }

    /// Creates a ReservationCancelled event.
    pub fn reservation_cancelled(
        item_id: AggregateId,
        reservation_id: ReservationId,
        new_stock: i64,
    ) -> Self {
        ItemEvent::ReservationCancelled(ReservationCancelledData {
            item_id,
            reservation_id,
            new_stock,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_types_and_identity() {
        let item_id = AggregateId::new();
        let reservation_id = ReservationId::new();

        let event = ItemEvent::item_created(item_id, "coffee", 10, Money::from_cents(100));
        assert_eq!(event.event_type(), "ItemCreated");
        assert_eq!(event.aggregate_id(), item_id);

        assert_eq!(
            ItemEvent::item_reserved(item_id, reservation_id, 5, 5).event_type(),
            "ItemReserved"
        );
        assert_eq!(
            ItemEvent::reservation_confirmed(item_id, reservation_id).event_type(),
            "ReservationConfirmed"
        );
        assert_eq!(
            ItemEvent::reservation_cancelled(item_id, reservation_id, 10).event_type(),
            "ReservationCancelled"
        );
    }

    #[test]
    fn reserved_event_roundtrip_keeps_quantity_and_stock() {
        let item_id = AggregateId::new();
        let reservation_id = ReservationId::new();
        let event = ItemEvent::item_reserved(item_id, reservation_id, 3, 7);

        let json = serde_json::to_string(&event).unwrap();
        let back: ItemEvent = serde_json::from_str(&json).unwrap();

        match back {
            ItemEvent::ItemReserved(data) => {
                assert_eq!(data.reservation_id, reservation_id);
                assert_eq!(data.quantity, 3);
                assert_eq!(data.new_stock, 7);
            }
            other => panic!("expected ItemReserved, got {other:?}"),
        }
    }
}
