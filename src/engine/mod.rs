// ============================================================================
// Engine Module
// Contains the core matching engine business logic
// ============================================================================

mod ledger;
mod matching_engine;
mod price_time;

pub mod factory;

pub use factory::{create_from_config, MatchingEngineBuilder};
pub use ledger::TradeLedger;
pub use matching_engine::MatchingEngine;
pub use price_time::PriceTimePriority;
