// ============================================================================
// Order Domain Model
// ============================================================================

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Limit price. Exact decimal, strictly positive for accepted orders.
pub type Price = Decimal;

/// Order and trade quantity. Strictly positive for accepted orders.
pub type Quantity = i64;

// ============================================================================
// Value Objects
// ============================================================================

/// Process-unique order identity.
///
/// Ids are drawn from one counter shared by every symbol, so comparing two ids
/// tells which order arrived first even across books.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderId(u64);

impl OrderId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic order id source owned by the matching engine.
#[derive(Debug)]
pub struct OrderIdGenerator {
    next: AtomicU64,
}

impl OrderIdGenerator {
    /// First id handed out is 1
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    pub fn next_id(&self) -> OrderId {
        OrderId(self.next.fetch_add(1, Ordering::AcqRel))
    }

    /// Id the next call to `next_id` will return
    pub fn peek(&self) -> OrderId {
        OrderId(self.next.load(Ordering::Acquire))
    }
}

impl Default for OrderIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn opposite(&self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fill status derived from an order's counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OrderStatus {
    /// Nothing filled yet
    New,
    /// Some quantity filled, some still open
    PartiallyFilled,
    /// Terminal: remaining quantity is zero
    Filled,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Filled)
    }
}

// ============================================================================
// Order Intake
// ============================================================================

/// Unvalidated order request handed to the engine by an intake collaborator
#[derive(Debug, Clone, PartialEq)]
pub struct OrderInput {
    pub side: Side,
    pub symbol: String,
    pub quantity: Quantity,
    pub price: Price,
}

impl OrderInput {
    pub fn new(side: Side, symbol: impl Into<String>, quantity: Quantity, price: Price) -> Self {
        Self {
            side,
            symbol: symbol.into(),
            quantity,
            price,
        }
    }

    pub fn buy(symbol: impl Into<String>, quantity: Quantity, price: Price) -> Self {
        Self::new(Side::Buy, symbol, quantity, price)
    }

    pub fn sell(symbol: impl Into<String>, quantity: Quantity, price: Price) -> Self {
        Self::new(Side::Sell, symbol, quantity, price)
    }
}

// ============================================================================
// Order Entity
// ============================================================================

/// A limit order with immutable identity and mutable fill state.
///
/// `filled_quantity + remaining_quantity == quantity` holds after every call.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub symbol: Arc<str>,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
    pub timestamp: DateTime<Utc>,

    filled_quantity: Quantity,
    remaining_quantity: Quantity,
}

impl Order {
    /// Build an order, drawing its id from `ids`. Performs no validation.
    pub fn new(
        ids: &OrderIdGenerator,
        side: Side,
        symbol: Arc<str>,
        price: Price,
        quantity: Quantity,
    ) -> Self {
        Self {
            id: ids.next_id(),
            symbol,
            side,
            price,
            quantity,
            timestamp: Utc::now(),
            filled_quantity: 0,
            remaining_quantity: quantity,
        }
    }

    pub fn filled_quantity(&self) -> Quantity {
        self.filled_quantity
    }

    pub fn remaining_quantity(&self) -> Quantity {
        self.remaining_quantity
    }

    pub fn is_filled(&self) -> bool {
        self.remaining_quantity == 0
    }

    pub fn status(&self) -> OrderStatus {
        if self.remaining_quantity == 0 {
            OrderStatus::Filled
        } else if self.filled_quantity > 0 {
            OrderStatus::PartiallyFilled
        } else {
            OrderStatus::New
        }
    }

    /// Move `quantity` from remaining to filled.
    /// Returns false and leaves the order untouched if it would over-fill.
    pub fn fill(&mut self, quantity: Quantity) -> bool {
        if quantity <= 0 || quantity > self.remaining_quantity {
            return false;
        }

        self.remaining_quantity -= quantity;
        self.filled_quantity += quantity;
        true
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} #{} {}/{}@{}",
            self.symbol, self.side, self.id, self.remaining_quantity, self.quantity, self.price
        )
    }
}

// ============================================================================
// Order View
// ============================================================================

/// Point-in-time copy of an order, safe to hand out of the engine
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderView {
    pub id: OrderId,
    pub symbol: String,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
    pub filled_quantity: Quantity,
    pub remaining_quantity: Quantity,
    pub status: OrderStatus,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            symbol: order.symbol.to_string(),
            side: order.side,
            price: order.price,
            quantity: order.quantity,
            filled_quantity: order.filled_quantity(),
            remaining_quantity: order.remaining_quantity(),
            status: order.status(),
        }
    }
}

impl fmt::Display for OrderView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} #{} {}/{}@{}",
            self.symbol, self.side, self.id, self.remaining_quantity, self.quantity, self.price
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limit(ids: &OrderIdGenerator, side: Side, quantity: Quantity) -> Order {
        Order::new(ids, side, Arc::from("SONY"), Decimal::from(100), quantity)
    }

    #[test]
    fn test_order_creation() {
        let ids = OrderIdGenerator::new();
        let order = limit(&ids, Side::Buy, 50);

        assert_eq!(order.id, OrderId::from_raw(1));
        assert_eq!(order.remaining_quantity(), 50);
        assert_eq!(order.filled_quantity(), 0);
        assert_eq!(order.status(), OrderStatus::New);
    }

    #[test]
    fn test_ids_shared_across_symbols() {
        let ids = OrderIdGenerator::new();
        let a = Order::new(&ids, Side::Buy, Arc::from("SONY"), Decimal::from(1), 1);
        let b = Order::new(&ids, Side::Sell, Arc::from("TM"), Decimal::from(1), 1);
        let c = Order::new(&ids, Side::Buy, Arc::from("SONY"), Decimal::from(1), 1);

        assert!(a.id < b.id);
        assert!(b.id < c.id);
        assert_eq!(ids.peek(), OrderId::from_raw(4));
    }

    #[test]
    fn test_fill() {
        let ids = OrderIdGenerator::new();
        let mut order = limit(&ids, Side::Sell, 10);

        assert!(order.fill(3));
        assert_eq!(order.filled_quantity(), 3);
        assert_eq!(order.remaining_quantity(), 7);
        assert_eq!(order.status(), OrderStatus::PartiallyFilled);

        assert!(order.fill(7));
        assert!(order.is_filled());
        assert!(order.status().is_terminal());
    }

    #[test]
    fn test_overfill_protection() {
        let ids = OrderIdGenerator::new();
        let mut order = limit(&ids, Side::Buy, 5);

        assert!(!order.fill(6));
        assert!(!order.fill(0));
        assert_eq!(order.filled_quantity(), 0);
        assert_eq!(order.remaining_quantity(), 5);
    }

    #[test]
    fn test_display() {
        let ids = OrderIdGenerator::starting_at(7);
        let mut order = limit(&ids, Side::Buy, 50);
        order.fill(20);

        assert_eq!(order.to_string(), "SONY BUY #7 30/50@100");
        assert_eq!(OrderView::from(&order).to_string(), "SONY BUY #7 30/50@100");
    }
}
