//! Per-symbol order routing
//!
//! The book is a read-modify-write structure with no optimistic retry,
//! so two matching runs must never touch the same symbol concurrently.
//! The router gives each symbol one sequential worker task; submitting
//! an order is a channel send to its symbol's worker.

use std::sync::Arc;

use dashmap::DashMap;
use hermes_core::Order;
use log::{error, info};
use tokio::sync::mpsc;

use crate::error::{EngineError, EngineResult};
use crate::matcher::MatchingEngine;

/// Routes incoming orders to one sequential matching worker per symbol
pub struct OrderRouter {
    engine: Arc<MatchingEngine>,
    workers: DashMap<String, mpsc::Sender<Order>>,
    worker_capacity: usize,
}

impl OrderRouter {
    pub fn new(engine: Arc<MatchingEngine>, worker_capacity: usize) -> Self {
        Self {
            engine,
            workers: DashMap::new(),
            worker_capacity,
        }
    }

    /// Submit an order to its symbol's worker, spawning it on first use
    ///
    /// Orders for one symbol are matched strictly in submission order.
    pub async fn submit(&self, order: Order) -> EngineResult<()> {
        let tx = self
            .workers
            .entry(order.symbol.clone())
            .or_insert_with(|| self.spawn_worker(&order.symbol))
            .clone();

        tx.send(order)
            .await
            .map_err(|_| EngineError::ChannelClosed("symbol worker".to_string()))
    }

    fn spawn_worker(&self, symbol: &str) -> mpsc::Sender<Order> {
        let (tx, mut rx) = mpsc::channel::<Order>(self.worker_capacity);
        let engine = self.engine.clone();
        let symbol = symbol.to_string();

        tokio::spawn(async move {
            info!("matching worker started for {}", symbol);
            while let Some(order) = rx.recv().await {
                let order_id = order.id.clone();
                // A failed order aborts without partial state; the next
                // order proceeds independently.
                if let Err(e) = engine.handle_new_order(order).await {
                    error!("order {} aborted: {}", order_id, e);
                }
            }
            info!("matching worker stopped for {}", symbol);
        });

        tx
    }
}
