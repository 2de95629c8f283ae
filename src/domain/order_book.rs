// ============================================================================
// Order Book Domain Model
// ============================================================================

use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::{Order, OrderId, OrderView, Price, Quantity, Side, Trade};
use crate::interfaces::MatchingAlgorithm;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Priority Key
// ============================================================================

/// Sort key of a resting order.
///
/// Bids rank by price descending, asks by price ascending; equal prices rank
/// by ascending id. The first key of a side is therefore its best order.
/// Keys of different sides never compare equal: all bids sort before all asks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityKey {
    side: Side,
    price: Price,
    id: OrderId,
}

impl PriorityKey {
    pub fn for_order(order: &Order) -> Self {
        Self {
            side: order.side,
            price: order.price,
            id: order.id,
        }
    }
}

impl Ord for PriorityKey {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_price = match self.side {
            Side::Buy => other.price.cmp(&self.price),
            Side::Sell => self.price.cmp(&other.price),
        };
        self.side
            .cmp(&other.side)
            .then(by_price)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for PriorityKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ============================================================================
// Order Book Side
// ============================================================================

/// One side (bids or asks) of a symbol's book, best order first
#[derive(Debug)]
pub struct OrderBookSide {
    pub side: Side,
    orders: BTreeMap<PriorityKey, Order>,
}

impl OrderBookSide {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            orders: BTreeMap::new(),
        }
    }

    /// Rest an order on this side.
    ///
    /// Orders of the wrong side or with nothing left to fill are not stored.
    pub fn add_order(&mut self, order: Order) -> bool {
        if order.side != self.side || order.is_filled() {
            return false;
        }
        self.orders.insert(PriorityKey::for_order(&order), order);
        true
    }

    /// Top-of-book order
    pub fn best(&self) -> Option<&Order> {
        self.orders.values().next()
    }

    /// Top-of-book order for in-place fills. Price and id are part of the
    /// sort key and must not be changed through this reference.
    pub fn best_mut(&mut self) -> Option<&mut Order> {
        self.orders.values_mut().next()
    }

    /// Remove and return the top-of-book order
    pub fn pop_best(&mut self) -> Option<Order> {
        self.orders.pop_first().map(|(_, order)| order)
    }

    pub fn best_price(&self) -> Option<Price> {
        self.best().map(|order| order.price)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Resting orders in priority order
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.values()
    }

    /// Remaining quantity aggregated per price, keyed by price.
    /// A level saturates at `Quantity::MAX`.
    pub fn depth_by_price(&self) -> BTreeMap<Price, Quantity> {
        let mut levels: BTreeMap<Price, Quantity> = BTreeMap::new();
        for order in self.orders.values() {
            let level = levels.entry(order.price).or_insert(0);
            *level = level.saturating_add(order.remaining_quantity());
        }
        levels
    }

    /// Saturates at `Quantity::MAX`
    pub fn total_quantity(&self) -> Quantity {
        self.orders
            .values()
            .map(Order::remaining_quantity)
            .fold(0, Quantity::saturating_add)
    }
}

// ============================================================================
// Symbol Book
// ============================================================================

/// Result of running one incoming order through a symbol book
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    /// Incoming order state after matching
    pub order: OrderView,
    /// Trades in execution order
    pub trades: Vec<Trade>,
    /// Whether the unfilled remainder was placed on the book
    pub rested: bool,
}

/// Bid and ask sides for one symbol
#[derive(Debug)]
pub struct SymbolBook {
    symbol: Arc<str>,
    pub bids: OrderBookSide,
    pub asks: OrderBookSide,
}

impl SymbolBook {
    pub fn new(symbol: Arc<str>) -> Self {
        Self {
            symbol,
            bids: OrderBookSide::new(Side::Buy),
            asks: OrderBookSide::new(Side::Sell),
        }
    }

    pub fn symbol(&self) -> &Arc<str> {
        &self.symbol
    }

    /// Match `incoming` against the opposite side, then rest any remainder on
    /// its own side. A fully filled incoming order is dropped.
    pub fn execute(
        &mut self,
        algorithm: &dyn MatchingAlgorithm,
        mut incoming: Order,
    ) -> ExecutionReport {
        let (opposite, same) = match incoming.side {
            Side::Buy => (&mut self.asks, &mut self.bids),
            Side::Sell => (&mut self.bids, &mut self.asks),
        };

        let trades = algorithm.match_order(&mut incoming, opposite);
        let order = OrderView::from(&incoming);
        let rested = same.add_order(incoming);

        ExecutionReport {
            order,
            trades,
            rested,
        }
    }

    pub fn best_bid(&self) -> Option<&Order> {
        self.bids.best()
    }

    pub fn best_ask(&self) -> Option<&Order> {
        self.asks.best()
    }

    /// True when both sides are populated and best bid >= best ask
    pub fn is_crossed(&self) -> bool {
        match (self.bids.best_price(), self.asks.best_price()) {
            (Some(bid), Some(ask)) => bid >= ask,
            _ => false,
        }
    }

    pub fn snapshot(&self) -> OrderBookSnapshot {
        let bids = self.bids.depth_by_price();
        let asks = self.asks.depth_by_price();

        let mut levels: BTreeMap<Price, PriceLevel> = BTreeMap::new();
        for (price, quantity) in bids {
            levels
                .entry(price)
                .or_insert_with(|| PriceLevel::empty(price))
                .bid_quantity = quantity;
        }
        for (price, quantity) in asks {
            levels
                .entry(price)
                .or_insert_with(|| PriceLevel::empty(price))
                .ask_quantity = quantity;
        }

        OrderBookSnapshot::new(
            self.symbol.to_string(),
            levels.into_values().rev().collect(),
            self.bids.best_price(),
            self.asks.best_price(),
        )
    }
}

// ============================================================================
// Order Book Snapshot
// ============================================================================

/// Remaining quantity resting at one price. Zero means no orders on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PriceLevel {
    pub price: Price,
    pub bid_quantity: Quantity,
    pub ask_quantity: Quantity,
}

impl PriceLevel {
    fn empty(price: Price) -> Self {
        Self {
            price,
            bid_quantity: 0,
            ask_quantity: 0,
        }
    }
}

/// Immutable snapshot of one symbol's book
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderBookSnapshot {
    pub symbol: String,
    /// Union of bid and ask price levels, highest price first
    pub levels: Vec<PriceLevel>,
    pub best_bid: Option<Price>,
    pub best_ask: Option<Price>,
    /// Current spread (ask - bid)
    pub spread: Option<Decimal>,
    /// Mid price
    pub mid_price: Option<Decimal>,
}

impl OrderBookSnapshot {
    pub fn new(
        symbol: String,
        levels: Vec<PriceLevel>,
        best_bid: Option<Price>,
        best_ask: Option<Price>,
    ) -> Self {
        let (spread, mid_price) = match (best_bid, best_ask) {
            (Some(bid), Some(ask)) => {
                let spread = ask.checked_sub(bid);
                // bid + half the spread stays in range where bid + ask may not
                let mid = spread
                    .and_then(|spread| spread.checked_div(Decimal::TWO))
                    .and_then(|half| bid.checked_add(half));
                (spread, mid)
            },
            _ => (None, None),
        };

        Self {
            symbol,
            levels,
            best_bid,
            best_ask,
            spread,
            mid_price,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Saturates at `Quantity::MAX`
    pub fn total_bid_quantity(&self) -> Quantity {
        self.levels
            .iter()
            .map(|level| level.bid_quantity)
            .fold(0, Quantity::saturating_add)
    }

    /// Saturates at `Quantity::MAX`
    pub fn total_ask_quantity(&self) -> Quantity {
        self.levels
            .iter()
            .map(|level| level.ask_quantity)
            .fold(0, Quantity::saturating_add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderIdGenerator;
    use crate::engine::PriceTimePriority;

    fn order(ids: &OrderIdGenerator, side: Side, price: i64, quantity: Quantity) -> Order {
        Order::new(ids, side, Arc::from("SONY"), Decimal::from(price), quantity)
    }

    #[test]
    fn test_bid_priority() {
        let ids = OrderIdGenerator::new();
        let mut bids = OrderBookSide::new(Side::Buy);

        let low = order(&ids, Side::Buy, 99, 1);
        let first_high = order(&ids, Side::Buy, 100, 1);
        let second_high = order(&ids, Side::Buy, 100, 1);
        let expected = [first_high.id, second_high.id, low.id];

        bids.add_order(second_high);
        bids.add_order(low);
        bids.add_order(first_high);

        let ranked: Vec<OrderId> = bids.iter().map(|o| o.id).collect();
        assert_eq!(ranked, expected);
        assert_eq!(bids.best_price(), Some(Decimal::from(100)));
    }

    #[test]
    fn test_ask_priority() {
        let ids = OrderIdGenerator::new();
        let mut asks = OrderBookSide::new(Side::Sell);

        let high = order(&ids, Side::Sell, 101, 1);
        let first_low = order(&ids, Side::Sell, 100, 1);
        let second_low = order(&ids, Side::Sell, 100, 1);
        let expected = [first_low.id, second_low.id, high.id];

        asks.add_order(high);
        asks.add_order(second_low);
        asks.add_order(first_low);

        let ranked: Vec<OrderId> = asks.iter().map(|o| o.id).collect();
        assert_eq!(ranked, expected);
        assert_eq!(asks.pop_best().map(|o| o.id), Some(expected[0]));
        assert_eq!(asks.len(), 2);
    }

    #[test]
    fn test_priority_keys_of_different_sides() {
        let ids = OrderIdGenerator::new();
        let bid = PriorityKey::for_order(&order(&ids, Side::Buy, 100, 1));
        let ask = PriorityKey::for_order(&order(&ids, Side::Sell, 100, 1));
        let same_id_ask = PriorityKey {
            side: Side::Sell,
            ..bid
        };

        assert_ne!(bid, same_id_ask);
        assert_ne!(bid.cmp(&same_id_ask), Ordering::Equal);
        assert_eq!(bid.cmp(&ask), Ordering::Less);
        assert_eq!(ask.cmp(&bid), Ordering::Greater);
        assert_eq!(bid.cmp(&bid), Ordering::Equal);
    }

    #[test]
    fn test_side_rejects_wrong_side_and_filled_orders() {
        let ids = OrderIdGenerator::new();
        let mut asks = OrderBookSide::new(Side::Sell);

        assert!(!asks.add_order(order(&ids, Side::Buy, 100, 1)));

        let mut filled = order(&ids, Side::Sell, 100, 1);
        filled.fill(1);
        assert!(!asks.add_order(filled));
        assert!(asks.is_empty());
    }

    #[test]
    fn test_execute_rests_unmatched_order() {
        let ids = OrderIdGenerator::new();
        let mut book = SymbolBook::new(Arc::from("SONY"));

        let execution = book.execute(&PriceTimePriority::new(), order(&ids, Side::Buy, 50, 10));

        assert!(execution.trades.is_empty());
        assert!(execution.rested);
        assert_eq!(book.best_bid().map(|o| o.remaining_quantity()), Some(10));
        assert!(book.best_ask().is_none());
    }

    #[test]
    fn test_execute_drops_filled_incoming() {
        let ids = OrderIdGenerator::new();
        let mut book = SymbolBook::new(Arc::from("SONY"));
        let algo = PriceTimePriority::new();

        book.execute(&algo, order(&ids, Side::Sell, 100, 50));
        let execution = book.execute(&algo, order(&ids, Side::Buy, 100, 30));

        assert_eq!(execution.trades.len(), 1);
        assert!(!execution.rested);
        assert!(book.bids.is_empty());
        assert_eq!(book.asks.total_quantity(), 20);
        assert!(!book.is_crossed());
    }

    #[test]
    fn test_snapshot_levels() {
        let ids = OrderIdGenerator::new();
        let mut book = SymbolBook::new(Arc::from("SONY"));
        let algo = PriceTimePriority::new();

        book.execute(&algo, order(&ids, Side::Buy, 99, 10));
        book.execute(&algo, order(&ids, Side::Buy, 99, 5));
        book.execute(&algo, order(&ids, Side::Buy, 98, 7));
        book.execute(&algo, order(&ids, Side::Sell, 101, 3));
        book.execute(&algo, order(&ids, Side::Sell, 100, 4));

        let snapshot = book.snapshot();
        let prices: Vec<Price> = snapshot.levels.iter().map(|l| l.price).collect();
        assert_eq!(
            prices,
            vec![
                Decimal::from(101),
                Decimal::from(100),
                Decimal::from(99),
                Decimal::from(98)
            ]
        );
        assert_eq!(snapshot.levels[2].bid_quantity, 15);
        assert_eq!(snapshot.levels[2].ask_quantity, 0);
        assert_eq!(snapshot.levels[0].ask_quantity, 3);
        assert_eq!(snapshot.best_bid, Some(Decimal::from(99)));
        assert_eq!(snapshot.best_ask, Some(Decimal::from(100)));
        assert_eq!(snapshot.spread, Some(Decimal::from(1)));
        assert_eq!(snapshot.mid_price, Some(Decimal::new(995, 1)));
        assert_eq!(snapshot.total_bid_quantity(), 22);
        assert_eq!(snapshot.total_ask_quantity(), 7);
    }

    #[test]
    fn test_snapshot_depth_saturates() {
        let ids = OrderIdGenerator::new();
        let mut book = SymbolBook::new(Arc::from("X"));
        let algo = PriceTimePriority::new();

        book.execute(&algo, order(&ids, Side::Buy, 10, Quantity::MAX));
        book.execute(&algo, order(&ids, Side::Buy, 10, 1));
        book.execute(&algo, order(&ids, Side::Buy, 9, 1));

        assert_eq!(book.bids.total_quantity(), Quantity::MAX);
        let snapshot = book.snapshot();
        assert_eq!(snapshot.levels[0].bid_quantity, Quantity::MAX);
        assert_eq!(snapshot.levels[1].bid_quantity, 1);
        assert_eq!(snapshot.total_bid_quantity(), Quantity::MAX);
    }

    #[test]
    fn test_mid_price_near_decimal_max() {
        let bid = Decimal::MAX - Decimal::ONE;
        let snapshot =
            OrderBookSnapshot::new("X".to_string(), Vec::new(), Some(bid), Some(Decimal::MAX));

        assert_eq!(snapshot.spread, Some(Decimal::ONE));
        // Rounded to fit the decimal range when the exact mid does not
        if let Some(mid) = snapshot.mid_price {
            assert!(mid >= bid && mid <= Decimal::MAX);
        }
    }

    #[test]
    fn test_snapshot_of_empty_book() {
        let book = SymbolBook::new(Arc::from("TM"));
        let snapshot = book.snapshot();

        assert_eq!(snapshot.symbol, "TM");
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.spread, None);
        assert_eq!(snapshot.mid_price, None);
    }
}
