use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{OrderId, Side};

/// Unique identifier for a trade
pub type TradeId = String;

/// Trade resulting from matching two orders
///
/// Immutable once created. The price is always the resting (maker) side's
/// price; price improvement accrues to the taker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: TradeId,
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    pub symbol: String,
    pub price: Decimal,
    pub quantity: Decimal,
    pub trade_time: DateTime<Utc>,
    /// The order that was actively matching when the trade occurred
    pub taker_order_id: OrderId,
    /// The taker's side
    pub direction: Side,
}

impl Trade {
    /// Create a new trade with explicit timestamp
    #[allow(clippy::too_many_arguments)]
    pub fn new_with_time(
        id: impl Into<TradeId>,
        buy_order_id: impl Into<OrderId>,
        sell_order_id: impl Into<OrderId>,
        symbol: impl Into<String>,
        price: Decimal,
        quantity: Decimal,
        taker_order_id: impl Into<OrderId>,
        direction: Side,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            buy_order_id: buy_order_id.into(),
            sell_order_id: sell_order_id.into(),
            symbol: symbol.into(),
            price,
            quantity,
            trade_time: timestamp,
            taker_order_id: taker_order_id.into(),
            direction,
        }
    }

    /// Returns the notional value of the trade (price * quantity)
    pub fn notional(&self) -> Decimal {
        self.price * self.quantity
    }
}
