// ============================================================================
// Event Handler Interface
// Defines the contract for handling order and trade events
// ============================================================================

use crate::domain::{OrderId, Price, Quantity, Side, Trade};
use chrono::{DateTime, Utc};
use crossbeam::channel::{self, Receiver, Sender};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Events emitted by the matching engine
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OrderEvent {
    /// Order validated and assigned an id
    OrderAccepted {
        order_id: OrderId,
        symbol: String,
        side: Side,
        price: Price,
        quantity: Quantity,
        timestamp: DateTime<Utc>,
    },

    /// Order rejected before it reached a book
    OrderRejected {
        symbol: String,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    /// Order matched, trade generated
    OrderMatched {
        trade: Trade,
        timestamp: DateTime<Utc>,
    },

    /// Incoming order partially filled
    OrderPartiallyFilled {
        order_id: OrderId,
        filled_quantity: Quantity,
        remaining_quantity: Quantity,
        timestamp: DateTime<Utc>,
    },

    /// Incoming order fully filled
    OrderFilled {
        order_id: OrderId,
        total_filled: Quantity,
        timestamp: DateTime<Utc>,
    },

    /// Order remainder added to book
    OrderAddedToBook {
        order_id: OrderId,
        price: Price,
        quantity: Quantity,
        timestamp: DateTime<Utc>,
    },
}

/// Event handler trait for processing matching engine events
/// Implementations can handle logging, rendering, notifications, etc.
///
/// The engine delivers a submission's events while that symbol's book is
/// still locked, so events for one symbol arrive in execution order. A
/// handler must not submit orders or query the same engine from inside
/// `on_event`; hand the event off (e.g. over a channel) instead.
pub trait EventHandler: Send + Sync {
    /// Handle an order event
    fn on_event(&self, event: OrderEvent);

    /// Batch event handler (optional optimization)
    fn on_events(&self, events: Vec<OrderEvent>) {
        for event in events {
            self.on_event(event);
        }
    }
}

/// No-op event handler for testing
pub struct NoOpEventHandler;

impl EventHandler for NoOpEventHandler {
    fn on_event(&self, _event: OrderEvent) {
        // Do nothing
    }
}

/// Logging event handler
pub struct LoggingEventHandler;

impl EventHandler for LoggingEventHandler {
    fn on_event(&self, event: OrderEvent) {
        match &event {
            OrderEvent::OrderMatched { trade, .. } => tracing::info!("{}", trade),
            OrderEvent::OrderRejected { symbol, reason, .. } => {
                tracing::warn!(%symbol, %reason, "order rejected")
            },
            _ => tracing::debug!("Matching engine event: {:?}", event),
        }
    }
}

/// Forwards events over an unbounded channel to another thread
pub struct ChannelEventHandler {
    sender: Sender<OrderEvent>,
}

impl ChannelEventHandler {
    /// Create a handler together with the receiving end of its channel
    pub fn new() -> (Self, Receiver<OrderEvent>) {
        let (sender, receiver) = channel::unbounded();
        (Self { sender }, receiver)
    }
}

impl EventHandler for ChannelEventHandler {
    fn on_event(&self, event: OrderEvent) {
        // A dropped receiver just means nobody is listening any more
        if self.sender.send(event).is_err() {
            tracing::trace!("event receiver dropped");
        }
    }
}
