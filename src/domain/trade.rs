// ============================================================================
// Trade Domain Model
// ============================================================================

use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

use super::{OrderId, Price, Quantity, Side};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents one execution between an incoming order and a resting order
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Trade {
    /// Unique trade identifier
    pub id: Uuid,

    /// Trading symbol
    pub symbol: String,

    /// Order ID of the passive order (resting in book)
    pub maker_order_id: OrderId,

    /// Order ID of the aggressive order (incoming)
    pub taker_order_id: OrderId,

    /// Side of the incoming order
    pub aggressor_side: Side,

    /// Execution price, always the resting order's limit
    pub price: Price,

    /// Executed quantity
    pub quantity: Quantity,

    /// Trade timestamp
    pub timestamp: DateTime<Utc>,
}

impl Trade {
    pub fn new(
        symbol: String,
        maker_order_id: OrderId,
        taker_order_id: OrderId,
        aggressor_side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            symbol,
            maker_order_id,
            taker_order_id,
            aggressor_side,
            price,
            quantity,
            timestamp: Utc::now(),
        }
    }

    /// Price times quantity
    pub fn notional_value(&self) -> Price {
        self.price * Price::from(self.quantity)
    }

    pub fn buy_order_id(&self) -> OrderId {
        match self.aggressor_side {
            Side::Buy => self.taker_order_id,
            Side::Sell => self.maker_order_id,
        }
    }

    pub fn sell_order_id(&self) -> OrderId {
        match self.aggressor_side {
            Side::Buy => self.maker_order_id,
            Side::Sell => self.taker_order_id,
        }
    }
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (taker, maker) = match self.aggressor_side {
            Side::Buy => ("Buy", "Sell"),
            Side::Sell => ("Sell", "Buy"),
        };
        write!(
            f,
            "TRADE: {} {} {}@{} ({} #{}, {} #{})",
            self.symbol,
            self.aggressor_side,
            self.quantity,
            self.price,
            taker,
            self.taker_order_id,
            maker,
            self.maker_order_id
        )
    }
}
