use serde::{Deserialize, Serialize};

/// Order types supported by the matching core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Execute at specified price or better; remainder rests in the book
    Limit,
    /// Execute immediately against the book; remainder is discarded
    Market,
    /// Limit-family order armed at a stop price
    StopLoss,
    /// Limit-family order armed at a take-profit price
    TakeProfit,
}

impl OrderType {
    /// Returns true for order types that may rest in the book
    ///
    /// Everything except Market: stop-loss and take-profit orders behave
    /// like limit orders once they reach the engine.
    pub fn is_limit_family(&self) -> bool {
        match self {
            OrderType::Limit | OrderType::StopLoss | OrderType::TakeProfit => true,
            OrderType::Market => false,
        }
    }
}
