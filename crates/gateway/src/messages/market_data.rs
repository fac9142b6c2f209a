//! Market data message types

use chrono::{DateTime, Utc};
use hermes_core::{Side, Trade};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Incremental change in resting quantity at a price level
///
/// `unfilledQuantity` is a signed string delta: negative for fills
/// (partial or full), positive for newly rested quantity. Consumers fold
/// these into their book views without full snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDelta {
    pub symbol: String,
    pub side: Side,
    pub price: Decimal,
    pub unfilled_quantity: String,
}

impl BookDelta {
    /// Create a delta from a signed quantity change
    pub fn new(symbol: impl Into<String>, side: Side, price: Decimal, delta: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            price,
            unfilled_quantity: delta.to_string(),
        }
    }

    /// Returns true if this delta reduces resting quantity
    pub fn is_reduction(&self) -> bool {
        self.unfilled_quantity.starts_with('-')
    }
}

/// Candle-seed update consumed by downstream candle builders
///
/// One per trade, plus periodic keep-alives carrying the `-1` price
/// sentinel to mark "no trade this period".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandleUpdate {
    pub symbol: String,
    /// Execution price as a string; "-1" for keep-alives
    pub price: String,
    /// Execution time as epoch seconds
    pub trade_time: i64,
}

impl CandleUpdate {
    /// Seed update derived from a trade
    pub fn from_trade(trade: &Trade) -> Self {
        Self {
            symbol: trade.symbol.clone(),
            price: trade.price.to_string(),
            trade_time: trade.trade_time.timestamp(),
        }
    }

    /// Keep-alive with the "no trade this period" sentinel
    pub fn keep_alive(symbol: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            symbol: symbol.into(),
            price: "-1".to_string(),
            trade_time: at.timestamp(),
        }
    }

    /// Returns true for the "no trade this period" sentinel
    pub fn is_keep_alive(&self) -> bool {
        self.price == "-1"
    }
}
