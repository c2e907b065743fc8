//! Inventory service wiring the store and notifier collaborators.

use common::AggregateId;
use event_store::{EventStore, Notifier};

use crate::command::{Command, CommandHandler, CommandResult};
use crate::error::DomainError;

use super::{
    AddStock, CancelReservation, ChangeItemPrice, ConfirmReservation, CreateItem, Item,
    RemoveStock, RenameItem, ReserveStock,
};

/// High-level API for inventory operations.
///
/// Each method loads the item from the store, runs one command, appends the
/// resulting event and then hands it to the notifier. Publication is
/// fire-and-forget: it happens only after a successful append and can never
/// roll the append back.
pub struct ItemService<S: EventStore, N: Notifier> {
    handler: CommandHandler<S, Item>,
    notifier: N,
}

impl<S: EventStore, N: Notifier> ItemService<S, N> {
    /// Creates an inventory service over the given collaborators.
    pub fn new(store: S, notifier: N) -> Self {
        Self {
            handler: CommandHandler::new(store),
            notifier,
        }
    }

    /// Returns a reference to the underlying command handler.
    pub fn handler(&self) -> &CommandHandler<S, Item> {
        &self.handler
    }

    /// Puts a new item into the inventory.
    #[tracing::instrument(skip(self))]
    pub async fn create_item(&self, cmd: CreateItem) -> Result<CommandResult<Item>, DomainError> {
        let item_id = cmd.aggregate_id();
        let result = self
            .handler
            .execute(item_id, |_| {
                Item::create_with_id(item_id, cmd.name.clone(), cmd.stock, cmd.price)
            })
            .await?;
        self.publish(&result).await;
        Ok(result)
    }

    /// Renames an item.
    #[tracing::instrument(skip(self))]
    pub async fn rename_item(&self, cmd: RenameItem) -> Result<CommandResult<Item>, DomainError> {
        let result = self
            .handler
            .execute(cmd.aggregate_id(), |item| item.change_name(cmd.name.clone()))
            .await?;
        self.publish(&result).await;
        Ok(result)
    }

    /// Reprices an item.
    #[tracing::instrument(skip(self))]
    pub async fn change_item_price(
        &self,
        cmd: ChangeItemPrice,
    ) -> Result<CommandResult<Item>, DomainError> {
        let result = self
            .handler
            .execute(cmd.aggregate_id(), |item| item.change_price(cmd.price))
            .await?;
        self.publish(&result).await;
        Ok(result)
    }

    /// Adds units to an item's stock.
    #[tracing::instrument(skip(self))]
    pub async fn add_stock(&self, cmd: AddStock) -> Result<CommandResult<Item>, DomainError> {
        let result = self
            .handler
            .execute(cmd.aggregate_id(), |item| item.add(cmd.amount))
            .await?;
        self.publish(&result).await;
        Ok(result)
    }

    /// Removes units from stock outright.
    #[tracing::instrument(skip(self))]
    pub async fn remove_stock(&self, cmd: RemoveStock) -> Result<CommandResult<Item>, DomainError> {
        let result = self
            .handler
            .execute(cmd.aggregate_id(), |item| item.remove(cmd.amount))
            .await?;
        self.publish(&result).await;
        Ok(result)
    }

    /// Provisionally reserves units of stock under the command's
    /// reservation id.
    #[tracing::instrument(skip(self))]
    pub async fn reserve_stock(
        &self,
        cmd: ReserveStock,
    ) -> Result<CommandResult<Item>, DomainError> {
        let result = self
            .handler
            .execute(cmd.aggregate_id(), |item| {
                item.reserve_with_id(cmd.reservation_id, cmd.amount)
            })
            .await?;
        self.publish(&result).await;
        Ok(result)
    }

    /// Confirms a pending reservation.
    #[tracing::instrument(skip(self))]
    pub async fn confirm_reservation(
        &self,
        cmd: ConfirmReservation,
    ) -> Result<CommandResult<Item>, DomainError> {
        let result = self
            .handler
            .execute(cmd.aggregate_id(), |item| {
                item.confirm_reservation(cmd.reservation_id)
            })
            .await?;
        self.publish(&result).await;
        Ok(result)
    }

    /// Cancels a pending reservation, restoring its stock.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_reservation(
        &self,
        cmd: CancelReservation,
    ) -> Result<CommandResult<Item>, DomainError> {
        let result = self
            .handler
            .execute(cmd.aggregate_id(), |item| {
                item.cancel_reservation(cmd.reservation_id)
            })
            .await?;
        self.publish(&result).await;
        Ok(result)
    }

    /// Loads an item by ID, or None if it was never created.
    #[tracing::instrument(skip(self))]
    pub async fn get_item(&self, item_id: AggregateId) -> Result<Option<Item>, DomainError> {
        self.handler.load_existing(item_id).await
    }

    async fn publish(&self, result: &CommandResult<Item>) {
        if !result.envelopes.is_empty() {
            self.notifier.publish(&result.envelopes).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use event_store::{InMemoryEventStore, NullNotifier};

    use crate::aggregate::Aggregate;
    use crate::bill::Money;
    use crate::item::ItemError;

    use super::*;

    fn service() -> ItemService<InMemoryEventStore, NullNotifier> {
        ItemService::new(InMemoryEventStore::new(), NullNotifier)
    }

    async fn coffee(service: &ItemService<InMemoryEventStore, NullNotifier>) -> AggregateId {
        let cmd = CreateItem::new("coffee", 10, Money::from_cents(100));
        let item_id = cmd.item_id;
        service.create_item(cmd).await.unwrap();
        item_id
    }

    #[tokio::test]
    async fn create_then_reserve_then_confirm() {
        let service = service();
        let item_id = coffee(&service).await;

        let cmd = ReserveStock::new(item_id, 5);
        let reservation_id = cmd.reservation_id;
        let result = service.reserve_stock(cmd).await.unwrap();
        assert_eq!(result.aggregate.stock(), 5);

        let result = service
            .confirm_reservation(ConfirmReservation::new(item_id, reservation_id))
            .await
            .unwrap();
        assert_eq!(result.aggregate.stock(), 5);
        assert!(!result.aggregate.has_pending_reservations());
    }

    #[tokio::test]
    async fn cancel_restores_the_reserved_stock() {
        let service = service();
        let item_id = coffee(&service).await;

        let cmd = ReserveStock::new(item_id, 5);
        let reservation_id = cmd.reservation_id;
        service.reserve_stock(cmd).await.unwrap();

        let result = service
            .cancel_reservation(CancelReservation::new(item_id, reservation_id))
            .await
            .unwrap();
        assert_eq!(result.aggregate.stock(), 10);
    }

    #[tokio::test]
    async fn rejected_commands_keep_the_stream_intact() {
        let service = service();
        let item_id = coffee(&service).await;

        let result = service
            .remove_stock(RemoveStock::new(item_id, 11))
            .await;
        assert!(matches!(
            result,
            Err(DomainError::Item(ItemError::InsufficientStock {
                requested: 11,
                available: 10
            }))
        ));

        let item = service.get_item(item_id).await.unwrap().unwrap();
        assert_eq!(item.stock(), 10);
        assert_eq!(item.events().len(), 1);
    }

    #[tokio::test]
    async fn recreating_an_existing_item_fails() {
        let service = service();
        let item_id = coffee(&service).await;
        service
            .add_stock(AddStock::new(item_id, 5))
            .await
            .unwrap();

        let result = service
            .create_item(CreateItem::with_id(
                item_id,
                "espresso",
                1,
                Money::from_cents(90),
            ))
            .await;
        assert!(matches!(
            result,
            Err(DomainError::HistoryMismatch { aggregate_id }) if aggregate_id == item_id
        ));

        // The stream keeps its history.
        let item = service.get_item(item_id).await.unwrap().unwrap();
        assert_eq!(item.name(), "coffee");
        assert_eq!(item.stock(), 15);
        assert_eq!(item.events().len(), 2);
    }

    #[tokio::test]
    async fn get_item_returns_none_for_unknown_id() {
        let service = service();
        assert!(service
            .get_item(AggregateId::new())
            .await
            .unwrap()
            .is_none());
    }
}
