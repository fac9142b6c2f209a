//! Coalescing batch persistence
//!
//! A single task owns the batch outright and receives matched-order
//! envelopes over a channel, so every read-modify-write on the batch is
//! naturally serialized - no lock, and no separate "pending work" flag:
//! the batch's own emptiness decides whether a tick flushes.
//!
//! Repeated snapshots of the same order coalesce at ingest time
//! (last-writer-wins by arrival order), so an order touched by many
//! fills within one batch window persists as exactly one row.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::mem;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use hermes_core::{Order, Trade};
use hermes_gateway::MatchedMessage;
use hermes_ports::TradeStore;
use log::{debug, error, info};
use tokio::sync::mpsc;
use tokio::time::{Duration, interval};

/// Flush thresholds
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Flush once this many distinct order snapshots are pending
    pub batch_size: usize,
    /// Flush any non-empty batch at least this often
    pub flush_interval: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            flush_interval: Duration::from_secs(1),
        }
    }
}

/// Operational counters, shared with monitoring
#[derive(Debug, Default)]
pub struct PipelineStats {
    received: AtomicU64,
    dropped: AtomicU64,
    batches: AtomicU64,
    failed_batches: AtomicU64,
    persisted_orders: AtomicU64,
    persisted_trades: AtomicU64,
}

impl PipelineStats {
    pub fn received(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn batches(&self) -> u64 {
        self.batches.load(Ordering::Relaxed)
    }

    pub fn failed_batches(&self) -> u64 {
        self.failed_batches.load(Ordering::Relaxed)
    }

    pub fn persisted_orders(&self) -> u64 {
        self.persisted_orders.load(Ordering::Relaxed)
    }

    pub fn persisted_trades(&self) -> u64 {
        self.persisted_trades.load(Ordering::Relaxed)
    }
}

/// Single-owner batching task in front of the durable store
pub struct PersistencePipeline {
    store: Arc<dyn TradeStore>,
    config: BatchConfig,
    rx: mpsc::UnboundedReceiver<MatchedMessage>,
    buy_orders: HashMap<String, Order>,
    sell_orders: HashMap<String, Order>,
    trades: Vec<Trade>,
    stats: Arc<PipelineStats>,
}

impl PersistencePipeline {
    /// Create the pipeline over a matched-order receiver
    ///
    /// Returns the pipeline (to be `run` on its own task) and the shared
    /// stats handle.
    pub fn new(
        store: Arc<dyn TradeStore>,
        config: BatchConfig,
        rx: mpsc::UnboundedReceiver<MatchedMessage>,
    ) -> (Self, Arc<PipelineStats>) {
        let stats = Arc::new(PipelineStats::default());
        (
            Self {
                store,
                config,
                rx,
                buy_orders: HashMap::new(),
                sell_orders: HashMap::new(),
                trades: Vec::new(),
                stats: stats.clone(),
            },
            stats,
        )
    }

    /// Run until every producer handle is dropped
    ///
    /// A final flush drains whatever is pending before stopping.
    pub async fn run(mut self) {
        info!(
            "persistence pipeline started (batch_size={}, flush every {:?})",
            self.config.batch_size, self.config.flush_interval
        );
        let mut ticker = interval(self.config.flush_interval);

        loop {
            tokio::select! {
                received = self.rx.recv() => match received {
                    Some(envelope) => {
                        self.ingest(envelope);
                        // Size threshold is checked synchronously at ingest
                        if self.distinct_snapshots() >= self.config.batch_size {
                            self.flush().await;
                        }
                    }
                    None => {
                        if !self.is_empty() {
                            self.flush().await;
                        }
                        break;
                    }
                },
                _ = ticker.tick() => {
                    if !self.is_empty() {
                        self.flush().await;
                    }
                }
            }
        }
        info!("persistence pipeline stopped");
    }

    fn ingest(&mut self, envelope: MatchedMessage) {
        self.stats.received.fetch_add(1, Ordering::Relaxed);

        let message = match envelope.decode_trade_order() {
            Ok(Some(message)) => message,
            Ok(None) => {
                debug!("ignoring {} envelope", envelope.kind);
                return;
            }
            Err(e) => {
                // Malformed at the source; retrying cannot help
                error!("dropping undecodable matched-order event: {}", e);
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                return;
            }
        };

        merge_order(&mut self.buy_orders, message.buy_order);
        merge_order(&mut self.sell_orders, message.sell_order);
        self.trades.push(message.trade);
    }

    fn distinct_snapshots(&self) -> usize {
        self.buy_orders.len() + self.sell_orders.len()
    }

    fn is_empty(&self) -> bool {
        self.buy_orders.is_empty() && self.sell_orders.is_empty() && self.trades.is_empty()
    }

    /// Persist and clear the whole batch
    ///
    /// The batch is cleared even when the store fails: the pipeline does
    /// not retry, it surfaces the failure to monitoring and moves on.
    async fn flush(&mut self) {
        let buy_orders: Vec<Order> = mem::take(&mut self.buy_orders).into_values().collect();
        let sell_orders: Vec<Order> = mem::take(&mut self.sell_orders).into_values().collect();
        let trades = mem::take(&mut self.trades);

        let order_count = buy_orders.len() + sell_orders.len();
        let trade_count = trades.len();

        match self
            .store
            .save_orders_and_trades(buy_orders, sell_orders, trades)
            .await
        {
            Ok(()) => {
                self.stats.batches.fetch_add(1, Ordering::Relaxed);
                self.stats
                    .persisted_orders
                    .fetch_add(order_count as u64, Ordering::Relaxed);
                self.stats
                    .persisted_trades
                    .fetch_add(trade_count as u64, Ordering::Relaxed);
                debug!(
                    "flushed {} order snapshot(s) and {} trade(s)",
                    order_count, trade_count
                );
            }
            Err(e) => {
                self.stats.failed_batches.fetch_add(1, Ordering::Relaxed);
                error!(
                    "batch persist failed ({} orders, {} trades): {}",
                    order_count, trade_count, e
                );
            }
        }
    }
}

/// Coalesce a snapshot into the batch
///
/// A later arrival overwrites the fill state of an earlier one for the
/// same order; identity fields stay as first seen.
fn merge_order(map: &mut HashMap<String, Order>, incoming: Order) {
    match map.entry(incoming.id.clone()) {
        Entry::Occupied(mut occupied) => {
            let existing = occupied.get_mut();
            existing.filled_quantity = incoming.filled_quantity;
            existing.unfilled_quantity = incoming.unfilled_quantity;
            existing.status = incoming.status;
            existing.updated_at = incoming.updated_at;
        }
        Entry::Vacant(vacant) => {
            vacant.insert(incoming);
        }
    }
}
