// ============================================================================
// Limit Order Exchange Library
// Multi-symbol limit order matching with price-time priority
// ============================================================================

//! # Limit Order Exchange
//!
//! A single-venue limit order matching engine.
//!
//! ## Features
//!
//! - **Per-symbol order books** created on first use, never torn down
//! - **Price-time priority** matching, executions priced at the resting order
//! - **Trade log** in execution order and a **net position** ledger per symbol
//! - **Concurrent submission**: one lock per symbol book, symbols run in parallel
//! - **Event handlers** for logging or feeding rendering collaborators
//!
//! ## Example
//!
//! ```rust
//! use limit_order_exchange::prelude::*;
//! use rust_decimal::Decimal;
//!
//! let engine = MatchingEngine::default();
//!
//! engine
//!     .submit_order(OrderInput::sell("SONY", 50, Decimal::from(100)))
//!     .unwrap();
//! let report = engine
//!     .submit_order(OrderInput::buy("SONY", 30, Decimal::from(100)))
//!     .unwrap();
//!
//! assert_eq!(report.trades.len(), 1);
//! assert_eq!(report.order.status, OrderStatus::Filled);
//!
//! let best_ask = engine.best_ask("SONY").unwrap().unwrap();
//! assert_eq!(best_ask.remaining_quantity, 20);
//! assert_eq!(engine.positions()["SONY"], -30);
//! ```

pub mod domain;
pub mod engine;
pub mod error;
pub mod interfaces;

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::{
        EngineConfig, ExecutionReport, Order, OrderBookSnapshot, OrderId, OrderIdGenerator,
        OrderInput, OrderStatus, OrderView, Price, PriceLevel, Quantity, Side, SymbolBook,
        SymbolCase, Trade,
    };
    pub use crate::engine::{
        create_from_config, MatchingEngine, MatchingEngineBuilder, PriceTimePriority, TradeLedger,
    };
    pub use crate::error::{EngineError, EngineResult};
    pub use crate::interfaces::{
        ChannelEventHandler, EventHandler, LoggingEventHandler, MatchingAlgorithm,
        NoOpEventHandler, OrderEvent,
    };
}
