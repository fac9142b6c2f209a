use async_trait::async_trait;
use hermes_core::{Order, Trade};

use crate::error::StoreResult;

/// Port for the durable order/trade store
///
/// One call persists a whole coalesced batch as a single atomic unit:
/// order snapshots are upserted by identifier (all mutable fields
/// overwritten), trades are insert-only. Either everything in the batch
/// lands or nothing does.
#[async_trait]
pub trait TradeStore: Send + Sync {
    /// Persist one batch of order snapshots and trades
    async fn save_orders_and_trades(
        &self,
        buy_orders: Vec<Order>,
        sell_orders: Vec<Order>,
        trades: Vec<Trade>,
    ) -> StoreResult<()>;
}
