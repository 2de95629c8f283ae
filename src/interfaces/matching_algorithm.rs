// ============================================================================
// Matching Algorithm Interface
// Defines the contract between a symbol book and its matching loop
// ============================================================================

use crate::domain::{Order, OrderBookSide, Price, Side, Trade};

/// Strategy interface for matching an incoming order against one book side.
///
/// Implementations mutate fill state on both the incoming order and the
/// resting orders they touch, and must remove every resting order they fill
/// completely. Resting the incoming remainder is the caller's job.
pub trait MatchingAlgorithm: Send + Sync {
    /// Match an incoming order against the opposite side of the book
    ///
    /// # Arguments
    /// * `incoming_order` - The new order to match
    /// * `opposite_side` - The opposite side of the order book
    ///
    /// # Returns
    /// Trades generated from matching, in execution order
    fn match_order(
        &self,
        incoming_order: &mut Order,
        opposite_side: &mut OrderBookSide,
    ) -> Vec<Trade>;

    /// Get the algorithm name for logging
    fn name(&self) -> &str;

    /// Whether an incoming limit order crosses a resting price
    fn prices_cross(&self, incoming: &Order, book_price: Price) -> bool {
        match incoming.side {
            Side::Buy => book_price <= incoming.price,
            Side::Sell => book_price >= incoming.price,
        }
    }
}
