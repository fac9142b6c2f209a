//! Transport configuration

/// Subjects for logical message routing
///
/// Even with tokio channels, we use logical subject names for:
/// - Clear message categorization
/// - Easy migration to a broker-backed transport later
/// - Debugging and logging
pub struct Subjects;

impl Subjects {
    // Inbound (clients → engine)

    /// New order submissions, single or batched
    pub const NEW_ORDERS: &'static str = "new_orders";

    // Outbound (engine → consumers)

    /// Trade tape, one message per trade
    pub const RECENT_TRADES: &'static str = "recent-trades";

    /// Candle-seed updates, one message per trade plus keep-alives
    pub const KLINE_UPDATES: &'static str = "kline-updates";

    /// Per-user order updates, keyed by owner identifier
    pub const USER_ORDER_UPDATES: &'static str = "user-order-updates";

    /// Matched-order envelopes for the persistence pipeline
    pub const MATCHED_ORDERS: &'static str = "matched_orders";

    /// Book deltas for a specific symbol: `order-book-delta-btcusdt`
    pub fn book_delta(symbol: &str) -> String {
        format!("order-book-delta-{}", symbol.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subjects() {
        assert_eq!(Subjects::book_delta("BTCUSDT"), "order-book-delta-btcusdt");
        assert_eq!(Subjects::RECENT_TRADES, "recent-trades");
    }
}
