//! Integration tests for the Bill aggregate.
//!
//! These tests drive the full bill lifecycle through the service layer,
//! including event persistence, aggregate reconstruction, and concurrency
//! handling at the store boundary.

use common::AggregateId;
use domain::{
    Aggregate, Bill, BillError, BillEvent, BillService, CloseBill, DomainError, DomainEvent,
    MenuItem, Money, OpenBill, Order, PayBill, TakeOrder,
};
use event_store::{
    EventStore, EventStoreError, InMemoryEventStore, NullNotifier, Version,
};

fn create_service() -> BillService<InMemoryEventStore, NullNotifier> {
    BillService::new(InMemoryEventStore::new(), NullNotifier)
}

fn coffee() -> MenuItem {
    MenuItem::new("coffee", Money::from_cents(120))
}

fn muffin() -> MenuItem {
    MenuItem::new("muffin", Money::from_cents(250))
}

mod bill_lifecycle {
    use super::*;

    #[tokio::test]
    async fn open_order_pay_close() {
        let service = create_service();

        let cmd = OpenBill::new();
        let bill_id = cmd.bill_id;

        let result = service.open_bill(cmd).await.unwrap();
        assert!(result.aggregate.is_open());
        assert_eq!(result.new_version, Version::first());

        let order = Order::from_pairs([(coffee(), 2), (muffin(), 1)]).unwrap();
        let result = service
            .take_order(TakeOrder::new(bill_id, order.clone()))
            .await
            .unwrap();
        assert_eq!(result.aggregate.items_ordered(), &order);
        assert_eq!(result.new_version, Version::new(2));

        let result = service
            .pay_bill(PayBill::new(bill_id, order))
            .await
            .unwrap();
        assert!(result.aggregate.is_paid());
        assert!(result.aggregate.outstanding().is_empty());

        let result = service.close_bill(CloseBill::new(bill_id)).await.unwrap();
        assert!(result.aggregate.is_closed());
        assert_eq!(result.new_version, Version::new(4));
    }

    #[tokio::test]
    async fn payment_in_installments() {
        let service = create_service();

        let cmd = OpenBill::new();
        let bill_id = cmd.bill_id;
        service.open_bill(cmd).await.unwrap();

        service
            .take_order(TakeOrder::new(
                bill_id,
                Order::from_pairs([(coffee(), 2), (muffin(), 1)]).unwrap(),
            ))
            .await
            .unwrap();

        // First installment covers the coffees only.
        let result = service
            .pay_bill(PayBill::new(
                bill_id,
                Order::of(coffee(), 2).unwrap(),
            ))
            .await
            .unwrap();
        assert!(!result.aggregate.is_paid());
        assert_eq!(
            result.aggregate.outstanding(),
            Order::of(muffin(), 1).unwrap()
        );

        // Second installment settles the rest.
        let result = service
            .pay_bill(PayBill::new(
                bill_id,
                Order::of(muffin(), 1).unwrap(),
            ))
            .await
            .unwrap();
        assert!(result.aggregate.is_paid());

        service.close_bill(CloseBill::new(bill_id)).await.unwrap();
    }

    #[tokio::test]
    async fn aggregate_reconstruction_from_events() {
        let store = InMemoryEventStore::new();
        let service = BillService::new(store.clone(), NullNotifier);

        let cmd = OpenBill::new();
        let bill_id = cmd.bill_id;
        service.open_bill(cmd).await.unwrap();

        service
            .take_order(TakeOrder::new(
                bill_id,
                Order::from_pairs([(coffee(), 3)]).unwrap(),
            ))
            .await
            .unwrap();
        service
            .pay_bill(PayBill::new(bill_id, Order::of(coffee(), 1).unwrap()))
            .await
            .unwrap();

        let bill = service.get_bill(bill_id).await.unwrap().unwrap();
        assert_eq!(bill.id(), Some(bill_id));
        assert!(bill.is_open());
        assert_eq!(bill.items_ordered().quantity_of(&coffee()), 3);
        assert_eq!(bill.items_paid().quantity_of(&coffee()), 1);
        assert_eq!(bill.outstanding(), Order::of(coffee(), 2).unwrap());
        assert_eq!(bill.events().len(), 3);
    }

    #[tokio::test]
    async fn persisted_envelopes_carry_absolute_totals() {
        let store = InMemoryEventStore::new();
        let service = BillService::new(store.clone(), NullNotifier);

        let cmd = OpenBill::new();
        let bill_id = cmd.bill_id;
        service.open_bill(cmd).await.unwrap();

        service
            .take_order(TakeOrder::new(bill_id, Order::of(coffee(), 1).unwrap()))
            .await
            .unwrap();
        service
            .take_order(TakeOrder::new(bill_id, Order::of(coffee(), 1).unwrap()))
            .await
            .unwrap();

        let envelopes = store.events_for_aggregate(bill_id).await.unwrap();
        assert_eq!(envelopes.len(), 3);
        assert_eq!(envelopes[2].event_type, "OrderTaken");

        // The second OrderTaken records the running total, not the increment.
        let event: BillEvent = serde_json::from_value(envelopes[2].payload.clone()).unwrap();
        match event {
            BillEvent::OrderTaken(data) => {
                assert_eq!(data.items_ordered.quantity_of(&coffee()), 2);
            }
            other => panic!("unexpected event {}", other.event_type()),
        }
    }
}

mod concurrency {
    use super::*;
    use event_store::{AppendOptions, EventEnvelope};

    #[tokio::test]
    async fn concurrent_modifications_detected() {
        let store = InMemoryEventStore::new();
        let bill_id = AggregateId::new();

        let event = BillEvent::bill_opened(bill_id);
        let envelope = EventEnvelope::builder()
            .aggregate_id(bill_id)
            .aggregate_type("Bill")
            .event_type(event.event_type())
            .version(Version::first())
            .payload(&event)
            .unwrap()
            .build();
        store
            .append(vec![envelope], AppendOptions::expect_new())
            .await
            .unwrap();

        // Two writers both replayed version 1 and race to append version 2.
        let build = |order: Order| {
            let event = BillEvent::order_taken(bill_id, order);
            EventEnvelope::builder()
                .aggregate_id(bill_id)
                .aggregate_type("Bill")
                .event_type(event.event_type())
                .version(Version::new(2))
                .payload(&event)
                .unwrap()
                .build()
        };

        store
            .append(
                vec![build(Order::of(coffee(), 1).unwrap())],
                AppendOptions::expect_version(Version::first()),
            )
            .await
            .unwrap();

        let result = store
            .append(
                vec![build(Order::of(muffin(), 1).unwrap())],
                AppendOptions::expect_version(Version::first()),
            )
            .await;

        assert!(matches!(
            result,
            Err(EventStoreError::ConcurrencyConflict { .. })
        ));
    }

    #[tokio::test]
    async fn sequential_commands_reload_and_do_not_conflict() {
        let service = create_service();

        let cmd = OpenBill::new();
        let bill_id = cmd.bill_id;
        service.open_bill(cmd).await.unwrap();

        service
            .take_order(TakeOrder::new(bill_id, Order::of(coffee(), 1).unwrap()))
            .await
            .unwrap();
        let result = service
            .take_order(TakeOrder::new(bill_id, Order::of(muffin(), 1).unwrap()))
            .await
            .unwrap();

        assert_eq!(result.new_version, Version::new(3));
        assert_eq!(result.aggregate.items_ordered().line_count(), 2);
    }
}

mod error_handling {
    use super::*;

    #[tokio::test]
    async fn cannot_pay_for_items_never_ordered() {
        let service = create_service();

        let cmd = OpenBill::new();
        let bill_id = cmd.bill_id;
        service.open_bill(cmd).await.unwrap();

        let result = service
            .pay_bill(PayBill::new(bill_id, Order::of(coffee(), 1).unwrap()))
            .await;

        assert!(matches!(
            result,
            Err(DomainError::Bill(BillError::UnexpectedPayment))
        ));
    }

    #[tokio::test]
    async fn cannot_close_with_an_outstanding_balance() {
        let service = create_service();

        let cmd = OpenBill::new();
        let bill_id = cmd.bill_id;
        service.open_bill(cmd).await.unwrap();

        service
            .take_order(TakeOrder::new(bill_id, Order::of(coffee(), 1).unwrap()))
            .await
            .unwrap();

        let result = service.close_bill(CloseBill::new(bill_id)).await;
        assert!(matches!(
            result,
            Err(DomainError::Bill(BillError::UnpaidBill))
        ));
    }

    #[tokio::test]
    async fn closed_bills_reject_further_commands() {
        let service = create_service();

        let cmd = OpenBill::new();
        let bill_id = cmd.bill_id;
        service.open_bill(cmd).await.unwrap();
        service.close_bill(CloseBill::new(bill_id)).await.unwrap();

        let result = service
            .take_order(TakeOrder::new(bill_id, Order::of(coffee(), 1).unwrap()))
            .await;
        assert!(matches!(
            result,
            Err(DomainError::Bill(BillError::BillClosed))
        ));

        let result = service.close_bill(CloseBill::new(bill_id)).await;
        assert!(matches!(
            result,
            Err(DomainError::Bill(BillError::BillClosed))
        ));
    }

    #[tokio::test]
    async fn commands_against_an_unopened_bill_fail() {
        let service = create_service();

        let result = service
            .take_order(TakeOrder::new(
                AggregateId::new(),
                Order::of(coffee(), 1).unwrap(),
            ))
            .await;

        assert!(matches!(
            result,
            Err(DomainError::Bill(BillError::NotOpened))
        ));
    }

    #[tokio::test]
    async fn failed_commands_leave_no_trace_in_the_store() {
        let store = InMemoryEventStore::new();
        let service = BillService::new(store.clone(), NullNotifier);

        let cmd = OpenBill::new();
        let bill_id = cmd.bill_id;
        service.open_bill(cmd).await.unwrap();

        let _ = service.close_bill(CloseBill::new(bill_id)).await;
        let _ = service
            .pay_bill(PayBill::new(bill_id, Order::of(coffee(), 1).unwrap()))
            .await;

        assert_eq!(store.event_count().await, 1);
        let bill: Bill = service.get_bill(bill_id).await.unwrap().unwrap();
        assert!(bill.is_open());
    }
}
