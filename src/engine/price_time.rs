// ============================================================================
// Price/Time Priority Matching Algorithm (FIFO)
// ============================================================================

use crate::domain::{Order, OrderBookSide, Trade};
use crate::interfaces::MatchingAlgorithm;

/// Price/Time Priority (FIFO) matching algorithm
///
/// The incoming order walks the opposite side best-first. Every execution is
/// priced at the resting order's limit. A resting order that is only partly
/// consumed ends the pass.
///
/// # Example
/// ```text
/// Book:  Sell 5 @ 10 (#1)
///        Sell 5 @ 10 (#2)
///
/// Incoming: Buy 5 @ 10
/// Result: 5 @ 10 against #1, #2 untouched
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct PriceTimePriority;

impl PriceTimePriority {
    pub fn new() -> Self {
        Self
    }
}

impl MatchingAlgorithm for PriceTimePriority {
    fn match_order(
        &self,
        incoming_order: &mut Order,
        opposite_side: &mut OrderBookSide,
    ) -> Vec<Trade> {
        let mut trades = Vec::new();

        while incoming_order.remaining_quantity() > 0 {
            let Some(resting) = opposite_side.best_mut() else {
                break;
            };

            if !self.prices_cross(incoming_order, resting.price) {
                break;
            }

            let trade_quantity = incoming_order
                .remaining_quantity()
                .min(resting.remaining_quantity());

            if !(resting.fill(trade_quantity) && incoming_order.fill(trade_quantity)) {
                // min() of two positive remainders always fits both orders
                tracing::error!(
                    resting = %resting.id,
                    incoming = %incoming_order.id,
                    trade_quantity,
                    "fill rejected during matching"
                );
                break;
            }

            let trade = Trade::new(
                incoming_order.symbol.to_string(),
                resting.id,
                incoming_order.id,
                incoming_order.side,
                resting.price,
                trade_quantity,
            );
            tracing::trace!("{}", trade);
            trades.push(trade);

            if resting.is_filled() {
                opposite_side.pop_best();
            } else {
                // Partial fill of the resting order: stop this pass
                break;
            }
        }

        trades
    }

    fn name(&self) -> &str {
        "PriceTime"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrderIdGenerator, Side};
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn order(ids: &OrderIdGenerator, side: Side, price: i64, quantity: i64) -> Order {
        Order::new(ids, side, Arc::from("Z"), Decimal::from(price), quantity)
    }

    #[test]
    fn test_price_time_fifo_order() {
        let ids = OrderIdGenerator::new();
        let algo = PriceTimePriority::new();
        let mut asks = OrderBookSide::new(Side::Sell);

        let sell1 = order(&ids, Side::Sell, 10, 5);
        let sell2 = order(&ids, Side::Sell, 10, 5);
        let (first, second) = (sell1.id, sell2.id);
        asks.add_order(sell1);
        asks.add_order(sell2);

        let mut buy = order(&ids, Side::Buy, 10, 5);
        let trades = algo.match_order(&mut buy, &mut asks);

        assert_eq!(trades.len(), 1);
        // Should match with first order (sell1) due to FIFO
        assert_eq!(trades[0].maker_order_id, first);
        assert_eq!(asks.len(), 1);
        assert_eq!(asks.best().map(|o| (o.id, o.remaining_quantity())), Some((second, 5)));
    }

    #[test]
    fn test_price_priority_and_resting_price() {
        let ids = OrderIdGenerator::new();
        let algo = PriceTimePriority::new();
        let mut asks = OrderBookSide::new(Side::Sell);

        asks.add_order(order(&ids, Side::Sell, 100, 10));
        let cheaper = order(&ids, Side::Sell, 99, 10);
        let cheaper_id = cheaper.id;
        asks.add_order(cheaper);

        let mut buy = order(&ids, Side::Buy, 100, 20);
        let trades = algo.match_order(&mut buy, &mut asks);

        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].maker_order_id, cheaper_id);
        assert_eq!(trades[0].price, Decimal::from(99));
        assert_eq!(trades[1].price, Decimal::from(100));
        assert!(buy.is_filled());
        assert!(asks.is_empty());
    }

    #[test]
    fn test_incoming_sell_executes_at_bid_price() {
        let ids = OrderIdGenerator::new();
        let algo = PriceTimePriority::new();
        let mut bids = OrderBookSide::new(Side::Buy);

        bids.add_order(order(&ids, Side::Buy, 105, 4));

        let mut sell = order(&ids, Side::Sell, 100, 4);
        let trades = algo.match_order(&mut sell, &mut bids);

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].price, Decimal::from(105));
        assert_eq!(trades[0].aggressor_side, Side::Sell);
    }

    #[test]
    fn test_price_time_partial_fill() {
        let ids = OrderIdGenerator::new();
        let algo = PriceTimePriority::new();
        let mut asks = OrderBookSide::new(Side::Sell);

        asks.add_order(order(&ids, Side::Sell, 100, 1));

        // Buy more than available
        let mut buy = order(&ids, Side::Buy, 100, 2);
        let trades = algo.match_order(&mut buy, &mut asks);

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].quantity, 1);
        assert_eq!(buy.remaining_quantity(), 1);
        assert_eq!(buy.filled_quantity(), 1);
        assert!(asks.is_empty());
    }

    #[test]
    fn test_partial_resting_fill_stops_pass() {
        let ids = OrderIdGenerator::new();
        let algo = PriceTimePriority::new();
        let mut asks = OrderBookSide::new(Side::Sell);

        asks.add_order(order(&ids, Side::Sell, 100, 50));
        asks.add_order(order(&ids, Side::Sell, 100, 50));

        let mut buy = order(&ids, Side::Buy, 100, 30);
        let trades = algo.match_order(&mut buy, &mut asks);

        assert_eq!(trades.len(), 1);
        assert_eq!(asks.len(), 2);
        assert_eq!(asks.best().map(Order::remaining_quantity), Some(20));
    }

    #[test]
    fn test_no_cross_no_trade() {
        let ids = OrderIdGenerator::new();
        let algo = PriceTimePriority::new();
        let mut bids = OrderBookSide::new(Side::Buy);

        bids.add_order(order(&ids, Side::Buy, 50, 10));

        let mut sell = order(&ids, Side::Sell, 60, 10);
        let trades = algo.match_order(&mut sell, &mut bids);

        assert!(trades.is_empty());
        assert_eq!(sell.remaining_quantity(), 10);
        assert_eq!(bids.len(), 1);
    }
}
