// ============================================================================
// Matching Engine
// Routes orders to per-symbol books and keeps the trade/position ledger
// ============================================================================

use crate::domain::{
    EngineConfig, ExecutionReport, Order, OrderBookSnapshot, OrderIdGenerator, OrderInput,
    OrderView, Side, SymbolBook, Trade,
};
use crate::engine::{PriceTimePriority, TradeLedger};
use crate::error::{EngineError, EngineResult};
use crate::interfaces::{EventHandler, MatchingAlgorithm, NoOpEventHandler, OrderEvent};
use chrono::Utc;
use crossbeam_skiplist::SkipMap;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Multi-symbol matching engine
///
/// Books are created on the first order for a symbol and never removed. Each
/// book sits behind its own mutex, held for the whole match-then-rest step,
/// so submissions on different symbols proceed in parallel.
pub struct MatchingEngine {
    config: EngineConfig,

    /// Symbol -> book, iterated in ascending symbol order
    books: SkipMap<String, Arc<Mutex<SymbolBook>>>,

    /// Trade log and net positions
    ledger: Mutex<TradeLedger>,

    /// Pluggable matching algorithm
    algorithm: Box<dyn MatchingAlgorithm>,

    /// Event handler for processing events
    event_handler: Arc<dyn EventHandler>,

    /// Order id source shared by every symbol
    order_ids: OrderIdGenerator,
}

impl MatchingEngine {
    /// Create a new matching engine
    pub fn new(
        config: EngineConfig,
        algorithm: Box<dyn MatchingAlgorithm>,
        event_handler: Arc<dyn EventHandler>,
    ) -> Self {
        Self {
            config,
            books: SkipMap::new(),
            ledger: Mutex::new(TradeLedger::new()),
            algorithm,
            event_handler,
            order_ids: OrderIdGenerator::new(),
        }
    }

    /// Validate and submit an order.
    ///
    /// Any error is returned before an id is drawn or a book is created.
    /// Events are delivered while the book lock is held, so per-symbol
    /// event order matches execution order.
    pub fn submit_order(&self, input: OrderInput) -> EngineResult<ExecutionReport> {
        let symbol = match self.validate_order(&input) {
            Ok(symbol) => symbol,
            Err(err) => return Err(self.reject(&input.symbol, err)),
        };

        let book = self.book_or_create(symbol);
        let mut book = book.lock();

        // A new book has a zero position, so this only rejects for known symbols
        if let Err(err) = self.check_position_headroom(book.symbol(), &input) {
            return Err(self.reject(&input.symbol, err));
        }

        let order = Order::new(
            &self.order_ids,
            input.side,
            Arc::clone(book.symbol()),
            input.price,
            input.quantity,
        );
        tracing::debug!(order = %order, algorithm = self.algorithm.name(), "order submitted");

        let report = book.execute(self.algorithm.as_ref(), order);
        if !report.trades.is_empty() {
            self.ledger.lock().record_all(report.trades.iter().cloned());
        }

        self.event_handler.on_events(Self::events_for(&report));

        Ok(report)
    }

    /// Highest-priority resting buy order
    pub fn best_bid(&self, symbol: &str) -> EngineResult<Option<OrderView>> {
        let book = self.book(symbol)?;
        let book = book.lock();
        Ok(book.best_bid().map(OrderView::from))
    }

    /// Highest-priority resting sell order
    pub fn best_ask(&self, symbol: &str) -> EngineResult<Option<OrderView>> {
        let book = self.book(symbol)?;
        let book = book.lock();
        Ok(book.best_ask().map(OrderView::from))
    }

    /// Aggregated price levels for one symbol, or for every known symbol
    pub fn snapshot(&self, symbol: Option<&str>) -> EngineResult<Vec<OrderBookSnapshot>> {
        match symbol {
            Some(symbol) => Ok(vec![self.book(symbol)?.lock().snapshot()]),
            None => Ok(self
                .books
                .iter()
                .map(|entry| entry.value().lock().snapshot())
                .collect()),
        }
    }

    /// Last `n` trades, oldest first
    pub fn recent_trades(&self, n: usize) -> Vec<Trade> {
        self.ledger.lock().recent(n).to_vec()
    }

    /// Last trades using the configured window
    pub fn default_recent_trades(&self) -> Vec<Trade> {
        self.recent_trades(self.config.recent_trades_window)
    }

    pub fn all_trades(&self) -> Vec<Trade> {
        self.ledger.lock().all().to_vec()
    }

    pub fn trade_count(&self) -> usize {
        self.ledger.lock().len()
    }

    /// Net position of every symbol that has traded, sorted by symbol
    pub fn positions(&self) -> BTreeMap<String, i64> {
        self.ledger.lock().positions().clone()
    }

    /// Net position of a known symbol (zero until it trades)
    pub fn position(&self, symbol: &str) -> EngineResult<i64> {
        let book = self.book(symbol)?;
        let symbol = book.lock().symbol().to_string();
        Ok(self.ledger.lock().position(&symbol).unwrap_or(0))
    }

    /// Every resting order of a known symbol: bids best first, then asks best first
    pub fn resting_orders(&self, symbol: &str) -> EngineResult<Vec<OrderView>> {
        let book = self.book(symbol)?;
        let book = book.lock();
        Ok(book
            .bids
            .iter()
            .chain(book.asks.iter())
            .map(OrderView::from)
            .collect())
    }

    /// Symbols with a book, in ascending order
    pub fn symbols(&self) -> Vec<String> {
        self.books.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn algorithm_name(&self) -> &str {
        self.algorithm.name()
    }

    // ========================================================================
    // Private methods
    // ========================================================================

    fn validate_order(&self, input: &OrderInput) -> EngineResult<String> {
        if input.quantity <= 0 {
            return Err(EngineError::InvalidQuantity(input.quantity));
        }

        if input.price <= Decimal::ZERO {
            return Err(EngineError::InvalidPrice(input.price));
        }

        let symbol = self.config.symbol_case.normalize(&input.symbol);
        if symbol.is_empty() {
            return Err(EngineError::InvalidSymbol);
        }

        Ok(symbol)
    }

    /// Worst case for the ledger is a complete fill, which moves the
    /// position by the full order quantity.
    fn check_position_headroom(&self, symbol: &str, input: &OrderInput) -> EngineResult<()> {
        let position = self.ledger.lock().position(symbol).unwrap_or(0);
        let worst_case = match input.side {
            Side::Buy => position.checked_sub(input.quantity),
            Side::Sell => position.checked_add(input.quantity),
        };

        match worst_case {
            Some(_) => Ok(()),
            None => Err(EngineError::PositionOverflow {
                symbol: symbol.to_string(),
                position,
                quantity: input.quantity,
            }),
        }
    }

    fn reject(&self, symbol: &str, err: EngineError) -> EngineError {
        tracing::warn!(symbol = %symbol, error = %err, "order rejected");
        self.event_handler.on_event(OrderEvent::OrderRejected {
            symbol: symbol.to_string(),
            reason: err.to_string(),
            timestamp: Utc::now(),
        });
        err
    }

    fn book(&self, symbol: &str) -> EngineResult<Arc<Mutex<SymbolBook>>> {
        let symbol = self.config.symbol_case.normalize(symbol);
        self.books
            .get(symbol.as_str())
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(EngineError::UnknownSymbol(symbol))
    }

    fn book_or_create(&self, symbol: String) -> Arc<Mutex<SymbolBook>> {
        if let Some(entry) = self.books.get(symbol.as_str()) {
            return Arc::clone(entry.value());
        }

        let created = Arc::new(Mutex::new(SymbolBook::new(Arc::from(symbol.as_str()))));
        let entry = self.books.get_or_insert(symbol, Arc::clone(&created));
        if Arc::ptr_eq(entry.value(), &created) {
            tracing::debug!(symbol = %entry.key(), "created order book");
        }
        Arc::clone(entry.value())
    }

    fn events_for(report: &ExecutionReport) -> Vec<OrderEvent> {
        let order = &report.order;
        let timestamp = Utc::now();
        let mut events = Vec::with_capacity(report.trades.len() + 3);

        events.push(OrderEvent::OrderAccepted {
            order_id: order.id,
            symbol: order.symbol.clone(),
            side: order.side,
            price: order.price,
            quantity: order.quantity,
            timestamp,
        });

        for trade in &report.trades {
            events.push(OrderEvent::OrderMatched {
                trade: trade.clone(),
                timestamp,
            });
        }

        if order.remaining_quantity == 0 {
            events.push(OrderEvent::OrderFilled {
                order_id: order.id,
                total_filled: order.filled_quantity,
                timestamp,
            });
        } else if order.filled_quantity > 0 {
            events.push(OrderEvent::OrderPartiallyFilled {
                order_id: order.id,
                filled_quantity: order.filled_quantity,
                remaining_quantity: order.remaining_quantity,
                timestamp,
            });
        }

        if report.rested {
            events.push(OrderEvent::OrderAddedToBook {
                order_id: order.id,
                price: order.price,
                quantity: order.remaining_quantity,
                timestamp,
            });
        }

        events
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new(
            EngineConfig::default(),
            Box::new(PriceTimePriority::new()),
            Arc::new(NoOpEventHandler),
        )
    }
}
