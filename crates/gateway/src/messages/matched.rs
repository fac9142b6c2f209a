//! Matched-order envelope for the persistence channel

use hermes_core::{Order, Trade};
use serde::{Deserialize, Serialize};

use crate::error::GatewayResult;

/// One matched-order event: both order snapshots plus the trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeOrdersMessage {
    pub buy_order: Order,
    pub sell_order: Order,
    pub trade: Trade,
}

impl TradeOrdersMessage {
    pub fn new(buy_order: Order, sell_order: Order, trade: Trade) -> Self {
        Self {
            buy_order,
            sell_order,
            trade,
        }
    }
}

/// Envelope multiplexing message kinds on the matched-order channel
///
/// `data` holds the JSON-encoded payload for the given `type`; consumers
/// ignore kinds they do not understand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: String,
}

impl MatchedMessage {
    /// Discriminator for matched trade+order events
    pub const TRADE_ORDER: &'static str = "TRADE_ORDER";

    /// Wrap a matched-order event
    pub fn trade_order(message: &TradeOrdersMessage) -> GatewayResult<Self> {
        Ok(Self {
            kind: Self::TRADE_ORDER.to_string(),
            data: serde_json::to_string(message)?,
        })
    }

    /// Unwrap a matched-order event; `None` for any other message kind
    pub fn decode_trade_order(&self) -> GatewayResult<Option<TradeOrdersMessage>> {
        if self.kind != Self::TRADE_ORDER {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&self.data)?))
    }
}
