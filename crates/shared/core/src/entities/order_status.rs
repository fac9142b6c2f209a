use serde::{Deserialize, Serialize};

/// Order lifecycle status
///
/// Pending -> PartiallyFilled -> Completed, or Cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order has been accepted but nothing has traded yet
    Pending,
    /// Order has traded against at least one opponent but has quantity left
    PartiallyFilled,
    /// Order has no unfilled quantity left
    Completed,
    /// Order was cancelled before completing
    Cancelled,
}

impl OrderStatus {
    /// Returns true if the order is in a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Returns true if the order may still trade
    pub fn is_open(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::PartiallyFilled)
    }
}
