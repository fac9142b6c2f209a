//! In-memory trade store
//!
//! Reference [`TradeStore`] used by tests and the demo runner. Orders are
//! upserted by identifier with all mutable fields overwritten; trades are
//! insert-only and a duplicate trade identifier is a constraint error.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use hermes_core::{Order, Trade};
use hermes_ports::{StoreError, StoreResult, TradeStore};

pub struct MemoryTradeStore {
    orders: DashMap<String, Order>,
    trades: DashMap<String, Trade>,
    failing: AtomicBool,
}

impl MemoryTradeStore {
    pub fn new() -> Self {
        Self {
            orders: DashMap::new(),
            trades: DashMap::new(),
            failing: AtomicBool::new(false),
        }
    }

    /// Make every save fail with `StoreError::Unavailable` (test hook)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    pub fn order(&self, id: &str) -> Option<Order> {
        self.orders.get(id).map(|entry| entry.clone())
    }

    pub fn trade(&self, id: &str) -> Option<Trade> {
        self.trades.get(id).map(|entry| entry.clone())
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    pub fn trade_count(&self) -> usize {
        self.trades.len()
    }
}

impl Default for MemoryTradeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TradeStore for MemoryTradeStore {
    async fn save_orders_and_trades(
        &self,
        buy_orders: Vec<Order>,
        sell_orders: Vec<Order>,
        trades: Vec<Trade>,
    ) -> StoreResult<()> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable("injected failure".to_string()));
        }

        for trade in &trades {
            if self.trades.contains_key(&trade.id) {
                return Err(StoreError::Constraint(format!(
                    "duplicate trade {}",
                    trade.id
                )));
            }
        }

        for order in buy_orders.into_iter().chain(sell_orders) {
            self.orders.insert(order.id.clone(), order);
        }
        for trade in trades {
            self.trades.insert(trade.id.clone(), trade);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use hermes_core::{OrderType, Side};
    use rust_decimal_macros::dec;

    fn order(id: &str) -> Order {
        Order::new(id, "u-1", "BTCUSDT", Side::Buy, OrderType::Limit, Some(dec!(1)), dec!(1))
    }

    fn trade(id: &str) -> Trade {
        Trade::new_with_time(
            id,
            "1",
            "2",
            "BTCUSDT",
            dec!(1),
            dec!(1),
            "1",
            Side::Buy,
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn upsert_overwrites_order_rows() {
        let store = MemoryTradeStore::new();
        store
            .save_orders_and_trades(vec![order("1")], vec![], vec![])
            .await
            .unwrap();

        let mut updated = order("1");
        updated.apply_fill(dec!(1), Utc::now());
        store
            .save_orders_and_trades(vec![updated.clone()], vec![], vec![])
            .await
            .unwrap();

        assert_eq!(store.order_count(), 1);
        assert_eq!(store.order("1").unwrap(), updated);
    }

    #[tokio::test]
    async fn duplicate_trade_is_a_constraint_error() {
        let store = MemoryTradeStore::new();
        store
            .save_orders_and_trades(vec![], vec![], vec![trade("9")])
            .await
            .unwrap();

        let err = store
            .save_orders_and_trades(vec![], vec![], vec![trade("9")])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
    }
}
