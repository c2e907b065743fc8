//! Bill service wiring the store and notifier collaborators.

use common::AggregateId;
use event_store::{EventStore, Notifier};

use crate::command::{Command, CommandHandler, CommandResult};
use crate::error::DomainError;

use super::{Bill, CloseBill, OpenBill, PayBill, TakeOrder};

/// High-level API for bill operations.
///
/// Each method loads the bill from the store, runs one command, appends the
/// resulting event and then hands it to the notifier. Publication is
/// fire-and-forget: it happens only after a successful append and can never
/// roll the append back.
pub struct BillService<S: EventStore, N: Notifier> {
    handler: CommandHandler<S, Bill>,
    notifier: N,
}

impl<S: EventStore, N: Notifier> BillService<S, N> {
    /// Creates a bill service over the given collaborators.
    pub fn new(store: S, notifier: N) -> Self {
        Self {
            handler: CommandHandler::new(store),
            notifier,
        }
    }

    /// Returns a reference to the underlying command handler.
    pub fn handler(&self) -> &CommandHandler<S, Bill> {
        &self.handler
    }

    /// Opens a new bill.
    #[tracing::instrument(skip(self))]
    pub async fn open_bill(&self, cmd: OpenBill) -> Result<CommandResult<Bill>, DomainError> {
        let bill_id = cmd.aggregate_id();
        let result = self
            .handler
            .execute(bill_id, |_| Ok(Bill::open_with_id(bill_id)))
            .await?;
        self.publish(&result).await;
        Ok(result)
    }

    /// Orders items onto a bill.
    #[tracing::instrument(skip(self))]
    pub async fn take_order(&self, cmd: TakeOrder) -> Result<CommandResult<Bill>, DomainError> {
        let result = self
            .handler
            .execute(cmd.aggregate_id(), |bill| bill.order(&cmd.items))
            .await?;
        self.publish(&result).await;
        Ok(result)
    }

    /// Records a payment against a bill.
    #[tracing::instrument(skip(self))]
    pub async fn pay_bill(&self, cmd: PayBill) -> Result<CommandResult<Bill>, DomainError> {
        let result = self
            .handler
            .execute(cmd.aggregate_id(), |bill| bill.pay(&cmd.payment))
            .await?;
        self.publish(&result).await;
        Ok(result)
    }

    /// Closes a fully paid bill.
    #[tracing::instrument(skip(self))]
    pub async fn close_bill(&self, cmd: CloseBill) -> Result<CommandResult<Bill>, DomainError> {
        let result = self
            .handler
            .execute(cmd.aggregate_id(), |bill| bill.close())
            .await?;
        self.publish(&result).await;
        Ok(result)
    }

    /// Loads a bill by ID, or None if it was never opened.
    #[tracing::instrument(skip(self))]
    pub async fn get_bill(&self, bill_id: AggregateId) -> Result<Option<Bill>, DomainError> {
        self.handler.load_existing(bill_id).await
    }

    async fn publish(&self, result: &CommandResult<Bill>) {
        if !result.envelopes.is_empty() {
            self.notifier.publish(&result.envelopes).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use event_store::{InMemoryEventStore, NullNotifier};

    use crate::aggregate::Aggregate;
    use crate::bill::{BillError, MenuItem, Money, Order};

    use super::*;

    fn service() -> BillService<InMemoryEventStore, NullNotifier> {
        BillService::new(InMemoryEventStore::new(), NullNotifier)
    }

    fn one_coffee() -> Order {
        Order::of(MenuItem::new("coffee", Money::from_cents(100)), 1).unwrap()
    }

    #[tokio::test]
    async fn open_take_pay_close() {
        let service = service();

        let cmd = OpenBill::new();
        let bill_id = cmd.bill_id;
        service.open_bill(cmd).await.unwrap();

        service
            .take_order(TakeOrder::new(bill_id, one_coffee()))
            .await
            .unwrap();
        service
            .pay_bill(PayBill::new(bill_id, one_coffee()))
            .await
            .unwrap();
        let result = service.close_bill(CloseBill::new(bill_id)).await.unwrap();

        assert!(result.aggregate.is_closed());
        assert_eq!(result.aggregate.id(), Some(bill_id));
    }

    #[tokio::test]
    async fn rejected_commands_keep_the_stream_intact() {
        let service = service();

        let cmd = OpenBill::new();
        let bill_id = cmd.bill_id;
        service.open_bill(cmd).await.unwrap();

        let result = service
            .pay_bill(PayBill::new(bill_id, one_coffee()))
            .await;
        assert!(matches!(
            result,
            Err(DomainError::Bill(BillError::UnexpectedPayment))
        ));

        let bill = service.get_bill(bill_id).await.unwrap().unwrap();
        assert_eq!(bill.events().len(), 1);
    }

    #[tokio::test]
    async fn reopening_an_existing_bill_fails() {
        let service = service();

        let cmd = OpenBill::new();
        let bill_id = cmd.bill_id;
        service.open_bill(cmd).await.unwrap();
        service
            .take_order(TakeOrder::new(bill_id, one_coffee()))
            .await
            .unwrap();

        let result = service.open_bill(OpenBill::with_id(bill_id)).await;
        assert!(matches!(
            result,
            Err(DomainError::HistoryMismatch { aggregate_id }) if aggregate_id == bill_id
        ));

        // The stream keeps its history.
        let bill = service.get_bill(bill_id).await.unwrap().unwrap();
        assert_eq!(bill.events().len(), 2);
        assert_eq!(bill.items_ordered(), &one_coffee());
    }

    #[tokio::test]
    async fn get_bill_returns_none_for_unknown_id() {
        let service = service();
        assert!(service
            .get_bill(AggregateId::new())
            .await
            .unwrap()
            .is_none());
    }
}
