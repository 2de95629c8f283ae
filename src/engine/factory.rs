// ============================================================================
// Matching Engine Factory
// Creates matching engines with proper configuration
// ============================================================================

use crate::domain::{EngineConfig, SymbolCase};
use crate::engine::{MatchingEngine, PriceTimePriority};
use crate::error::EngineResult;
use crate::interfaces::{EventHandler, MatchingAlgorithm, NoOpEventHandler};
use std::sync::Arc;

/// Creates a price/time matching engine from configuration
///
/// # Example
/// ```
/// use limit_order_exchange::prelude::*;
/// use std::sync::Arc;
///
/// let engine = create_from_config(EngineConfig::console(), Arc::new(NoOpEventHandler))
///     .unwrap();
/// assert_eq!(engine.algorithm_name(), "PriceTime");
/// ```
pub fn create_from_config(
    config: EngineConfig,
    event_handler: Arc<dyn EventHandler>,
) -> EngineResult<MatchingEngine> {
    config.validate()?;

    Ok(MatchingEngine::new(
        config,
        Box::new(PriceTimePriority::new()),
        event_handler,
    ))
}

/// Builder for creating matching engines with fluent API
///
/// # Example
/// ```
/// use limit_order_exchange::prelude::*;
/// use std::sync::Arc;
///
/// let engine = MatchingEngineBuilder::new()
///     .uppercase_symbols()
///     .with_recent_trades_window(20)
///     .with_event_handler(Arc::new(LoggingEventHandler))
///     .build()
///     .unwrap();
/// assert_eq!(engine.config().recent_trades_window, 20);
/// ```
pub struct MatchingEngineBuilder {
    config: EngineConfig,
    algorithm: Box<dyn MatchingAlgorithm>,
    event_handler: Arc<dyn EventHandler>,
}

impl MatchingEngineBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            algorithm: Box::new(PriceTimePriority::new()),
            event_handler: Arc::new(NoOpEventHandler),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Upper-case symbols on submission and query
    pub fn uppercase_symbols(mut self) -> Self {
        self.config.symbol_case = SymbolCase::Uppercase;
        self
    }

    /// Set the default recent-trades window
    pub fn with_recent_trades_window(mut self, window: usize) -> Self {
        self.config.recent_trades_window = window;
        self
    }

    /// Use a different matching algorithm
    pub fn with_algorithm(mut self, algorithm: Box<dyn MatchingAlgorithm>) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_event_handler(mut self, event_handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = event_handler;
        self
    }

    /// Build the matching engine
    pub fn build(self) -> EngineResult<MatchingEngine> {
        self.config.validate()?;
        Ok(MatchingEngine::new(
            self.config,
            self.algorithm,
            self.event_handler,
        ))
    }

    /// Get the configuration without building (for inspection)
    pub fn get_config(&self) -> &EngineConfig {
        &self.config
    }
}

impl Default for MatchingEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Order, OrderBookSide, OrderInput, Trade};
    use crate::error::EngineError;
    use rust_decimal::Decimal;

    struct RestOnly;

    impl MatchingAlgorithm for RestOnly {
        fn match_order(&self, _: &mut Order, _: &mut OrderBookSide) -> Vec<Trade> {
            Vec::new()
        }

        fn name(&self) -> &str {
            "RestOnly"
        }
    }

    #[test]
    fn test_create_from_config() {
        let engine =
            create_from_config(EngineConfig::default(), Arc::new(NoOpEventHandler)).unwrap();
        assert_eq!(engine.algorithm_name(), "PriceTime");
        assert_eq!(engine.config(), &EngineConfig::default());
    }

    #[test]
    fn test_create_from_invalid_config() {
        let config = EngineConfig::default().with_recent_trades_window(0);
        let result = create_from_config(config, Arc::new(NoOpEventHandler));
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_builder_pattern() {
        let builder = MatchingEngineBuilder::new()
            .uppercase_symbols()
            .with_recent_trades_window(5);
        assert_eq!(builder.get_config().symbol_case, SymbolCase::Uppercase);

        let engine = builder.build().unwrap();
        assert_eq!(engine.config().recent_trades_window, 5);
    }

    #[test]
    fn test_builder_custom_algorithm() {
        let engine = MatchingEngineBuilder::new()
            .with_algorithm(Box::new(RestOnly))
            .build()
            .unwrap();
        assert_eq!(engine.algorithm_name(), "RestOnly");

        engine.submit_order(OrderInput::sell("X", 1, Decimal::from(10))).unwrap();
        let report = engine.submit_order(OrderInput::buy("X", 1, Decimal::from(10))).unwrap();

        // The book still rests what the algorithm left unfilled
        assert!(report.trades.is_empty());
        assert!(report.rested);
    }
}
