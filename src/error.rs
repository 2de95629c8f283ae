// ============================================================================
// Engine Errors
// Caller-input errors reported by the matching engine
// ============================================================================

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors returned by the matching engine.
///
/// Every variant is detected before any order id is drawn or any book, trade
/// log or position is touched, so the engine stays usable after a rejection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Order quantity was zero or negative
    #[error("invalid quantity {0}: quantity must be positive")]
    InvalidQuantity(i64),

    /// Limit price was zero or negative
    #[error("invalid price {0}: price must be positive")]
    InvalidPrice(Decimal),

    /// Symbol was empty or blank
    #[error("invalid symbol: symbol must not be empty")]
    InvalidSymbol,

    /// Filling the order completely would push the symbol's net position
    /// past the `i64` range
    #[error("position limit: {quantity} {symbol} against net position {position} would overflow")]
    PositionOverflow {
        symbol: String,
        position: i64,
        quantity: i64,
    },

    /// Read-only query for a symbol that has never received an order
    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),

    /// Engine configuration failed validation
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
