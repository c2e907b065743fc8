//! Event-sourced cafe domain kernel.
//!
//! Aggregates exist only as the fold of their event log: commands validate
//! against the replayed state, emit exactly one new event, and apply it
//! through the same transition function replay uses. This crate provides:
//! - the [`Aggregate`]/[`DomainEvent`] traits and the typed [`EventLog`]
//! - the [`Order`] value object (a multiset of priced menu items)
//! - the [`Bill`] aggregate (open/closed tab tracking ordered vs. paid)
//! - the [`Item`] aggregate (stock with a two-phase reservation protocol)
//! - command structs and services wiring the store and notifier collaborators

pub mod aggregate;
pub mod bill;
pub mod command;
pub mod error;
pub mod item;
pub mod log;

pub use aggregate::{Aggregate, DomainEvent};
pub use bill::{
    Bill, BillError, BillEvent, BillService, CloseBill, MenuItem, Money, OpenBill, Order,
    OrderError, PayBill, TakeOrder,
};
pub use command::{Command, CommandHandler, CommandResult};
pub use error::DomainError;
pub use item::{
    AddStock, CancelReservation, ChangeItemPrice, ConfirmReservation, CreateItem, Item, ItemError,
    ItemEvent, ItemService, RemoveStock, RenameItem, ReserveStock,
};
pub use log::{EventLog, EventLogError};
