// ============================================================================
// Trade Ledger
// Append-only trade log and per-symbol net position
// ============================================================================

use std::collections::BTreeMap;

use crate::domain::{Side, Trade};

/// Trade log in execution order plus one signed running position per symbol.
///
/// An incoming Buy lowers the symbol's position by the executed quantity, an
/// incoming Sell raises it. Positions saturate at the `i64` bounds; the
/// engine rejects orders that could reach them before they match.
#[derive(Debug, Default)]
pub struct TradeLedger {
    trades: Vec<Trade>,
    positions: BTreeMap<String, i64>,
}

impl TradeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, trade: Trade) {
        let delta = match trade.aggressor_side {
            Side::Buy => -trade.quantity,
            Side::Sell => trade.quantity,
        };

        match self.positions.get_mut(trade.symbol.as_str()) {
            Some(position) => *position = position.saturating_add(delta),
            None => {
                self.positions.insert(trade.symbol.clone(), delta);
            },
        }

        self.trades.push(trade);
    }

    pub fn record_all(&mut self, trades: impl IntoIterator<Item = Trade>) {
        for trade in trades {
            self.record(trade);
        }
    }

    /// Last `n` trades, oldest first
    pub fn recent(&self, n: usize) -> &[Trade] {
        let start = self.trades.len().saturating_sub(n);
        &self.trades[start..]
    }

    pub fn all(&self) -> &[Trade] {
        &self.trades
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn position(&self, symbol: &str) -> Option<i64> {
        self.positions.get(symbol).copied()
    }

    pub fn positions(&self) -> &BTreeMap<String, i64> {
        &self.positions
    }
}
