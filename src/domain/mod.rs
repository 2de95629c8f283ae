// ============================================================================
// Domain Models Module
// Contains all core domain entities and value objects
// ============================================================================

pub mod config;
pub mod order;
pub mod order_book;
pub mod trade;

pub use config::{EngineConfig, SymbolCase, DEFAULT_RECENT_TRADES_WINDOW};
pub use order::{
    Order, OrderId, OrderIdGenerator, OrderInput, OrderStatus, OrderView, Price, Quantity, Side,
};
pub use order_book::{
    ExecutionReport, OrderBookSide, OrderBookSnapshot, PriceLevel, PriorityKey, SymbolBook,
};
pub use trade::Trade;
