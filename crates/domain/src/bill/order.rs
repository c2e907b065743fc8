//! The `Order` value object and its building blocks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by order arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OrderError {
    /// An explicit quantity was negative, or a removal would drive a
    /// quantity below zero.
    #[error("order quantities must not go negative")]
    NegativeQuantity,
}

/// Money amount in cents, avoiding floating point for prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money {
    cents: i64,
}

impl Money {
    /// Creates a money amount from cents.
    pub fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self { cents: 0 }
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.cents == 0
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.cents < 0
    }

    /// Multiplies by a quantity, saturating at the numeric bounds.
    pub fn multiply(&self, quantity: i64) -> Money {
        Money {
            cents: self.cents.saturating_mul(quantity),
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.abs();
        write!(f, "{sign}${}.{:02}", abs / 100, abs % 100)
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    /// Saturating at the numeric bounds.
    fn add(self, rhs: Self) -> Self::Output {
        Money {
            cents: self.cents.saturating_add(rhs.cents),
        }
    }
}

impl std::ops::Sub for Money {
    type Output = Money;

    /// Saturating at the numeric bounds.
    fn sub(self, rhs: Self) -> Self::Output {
        Money {
            cents: self.cents.saturating_sub(rhs.cents),
        }
    }
}

/// A sellable menu entry, compared by value: two entries with the same name
/// and price are the same item.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct MenuItem {
    /// Display name of the item.
    pub name: String,

    /// Unit price.
    pub price: Money,
}

impl MenuItem {
    /// Creates a menu item.
    pub fn new(name: impl Into<String>, price: Money) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

impl std::fmt::Display for MenuItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.price)
    }
}

/// One line of an order's serialized form.
///
/// JSON object keys must be strings, so an [`Order`] goes over the wire as a
/// sequence of lines rather than a map keyed by [`MenuItem`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OrderLine {
    item: MenuItem,
    quantity: i64,
}

/// A multiset of menu items with per-item quantities.
///
/// Always normalized: quantities are strictly positive, zero entries are
/// dropped at construction. Equality is structural over the normalized
/// mapping, so `Order::of(item, 0)` equals `Order::empty()`. All arithmetic
/// returns new values; nothing is mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<OrderLine>", into = "Vec<OrderLine>")]
pub struct Order {
    lines: BTreeMap<MenuItem, i64>,
}

impl Order {
    /// The empty order.
    pub fn empty() -> Self {
        Self::default()
    }

    /// An order of one item.
    ///
    /// Fails with [`OrderError::NegativeQuantity`] for a negative quantity;
    /// a zero quantity yields the empty order.
    pub fn of(item: MenuItem, quantity: i64) -> Result<Self, OrderError> {
        Self::from_pairs([(item, quantity)])
    }

    /// An order built from (item, quantity) pairs. Quantities for repeated
    /// items are summed; zero entries are normalized away.
    pub fn from_pairs(
        pairs: impl IntoIterator<Item = (MenuItem, i64)>,
    ) -> Result<Self, OrderError> {
        let mut lines: BTreeMap<MenuItem, i64> = BTreeMap::new();
        for (item, quantity) in pairs {
            if quantity < 0 {
                return Err(OrderError::NegativeQuantity);
            }
            let slot = lines.entry(item).or_insert(0);
            *slot = slot.saturating_add(quantity);
        }
        Ok(Self::normalized(lines))
    }

    fn normalized(mut lines: BTreeMap<MenuItem, i64>) -> Self {
        lines.retain(|_, quantity| *quantity > 0);
        Self { lines }
    }

    /// Sums this order with another, per item.
    pub fn add(&self, other: &Order) -> Order {
        let mut lines = self.lines.clone();
        for (item, quantity) in &other.lines {
            let slot = lines.entry(item.clone()).or_insert(0);
            *slot = slot.saturating_add(*quantity);
        }
        Self::normalized(lines)
    }

    /// Adds a quantity of one item.
    pub fn add_item(&self, item: MenuItem, quantity: i64) -> Result<Order, OrderError> {
        Ok(self.add(&Order::of(item, quantity)?))
    }

    /// Subtracts another order, per item.
    ///
    /// Fails with [`OrderError::NegativeQuantity`] if any resulting quantity
    /// would be negative; on failure this order is unchanged.
    pub fn remove(&self, other: &Order) -> Result<Order, OrderError> {
        let mut lines = self.lines.clone();
        for (item, quantity) in &other.lines {
            let remaining = lines.get(item).copied().unwrap_or(0) - quantity;
            if remaining < 0 {
                return Err(OrderError::NegativeQuantity);
            }
            lines.insert(item.clone(), remaining);
        }
        Ok(Self::normalized(lines))
    }

    /// Removes a quantity of one item.
    pub fn remove_item(&self, item: MenuItem, quantity: i64) -> Result<Order, OrderError> {
        self.remove(&Order::of(item, quantity)?)
    }

    /// Whether this order covers the other: true iff `remove` would succeed.
    pub fn contains(&self, other: &Order) -> bool {
        self.remove(other).is_ok()
    }

    /// Quantity of one item, zero if absent.
    pub fn quantity_of(&self, item: &MenuItem) -> i64 {
        self.lines.get(item).copied().unwrap_or(0)
    }

    /// Whether the order has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct items.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Iterates (item, quantity) lines in item order.
    pub fn lines(&self) -> impl Iterator<Item = (&MenuItem, i64)> {
        self.lines.iter().map(|(item, quantity)| (item, *quantity))
    }

    /// Total price across all lines.
    pub fn total_price(&self) -> Money {
        self.lines
            .iter()
            .fold(Money::zero(), |total, (item, quantity)| {
                total + item.price.multiply(*quantity)
            })
    }
}

impl TryFrom<Vec<OrderLine>> for Order {
    type Error = OrderError;

    fn try_from(lines: Vec<OrderLine>) -> Result<Self, Self::Error> {
        Self::from_pairs(lines.into_iter().map(|line| (line.item, line.quantity)))
    }
}

impl From<Order> for Vec<OrderLine> {
    fn from(order: Order) -> Self {
        order
            .lines
            .into_iter()
            .map(|(item, quantity)| OrderLine { item, quantity })
            .collect()
    }
}

impl std::fmt::Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.lines.is_empty() {
            return write!(f, "(empty order)");
        }
        let mut first = true;
        for (item, quantity) in &self.lines {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{quantity}x {}", item.name)?;
            first = false;
        }
        Ok(())
    }
}
