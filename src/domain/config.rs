// ============================================================================
// Engine Configuration
// ============================================================================

use crate::error::{EngineError, EngineResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of trades returned by `MatchingEngine::default_recent_trades`
pub const DEFAULT_RECENT_TRADES_WINDOW: usize = 10;

/// How symbols are normalised before they reach a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SymbolCase {
    /// Symbols are used exactly as given (after trimming whitespace)
    #[default]
    Preserve,
    /// Symbols are upper-cased, so "sony" and "SONY" share one book
    Uppercase,
}

impl SymbolCase {
    pub fn normalize(&self, symbol: &str) -> String {
        let trimmed = symbol.trim();
        match self {
            SymbolCase::Preserve => trimmed.to_string(),
            SymbolCase::Uppercase => trimmed.to_uppercase(),
        }
    }
}

/// Configuration for a matching engine
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EngineConfig {
    /// Trades returned by the default recent-trades query
    pub recent_trades_window: usize,

    /// Symbol normalisation applied to submissions and queries
    pub symbol_case: SymbolCase,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self {
            recent_trades_window: DEFAULT_RECENT_TRADES_WINDOW,
            symbol_case: SymbolCase::Preserve,
        }
    }

    /// Console-style preset: case-insensitive symbols
    pub fn console() -> Self {
        Self::new().with_symbol_case(SymbolCase::Uppercase)
    }

    /// Builder method: Set the default recent-trades window
    pub fn with_recent_trades_window(mut self, window: usize) -> Self {
        self.recent_trades_window = window;
        self
    }

    /// Builder method: Set symbol normalisation
    pub fn with_symbol_case(mut self, symbol_case: SymbolCase) -> Self {
        self.symbol_case = symbol_case;
        self
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.recent_trades_window == 0 {
            return Err(EngineError::InvalidConfig(
                "recent trades window must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
