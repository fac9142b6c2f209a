//! Inbound order feed
//!
//! Drains raw JSON payloads (one order, or a batched array of orders)
//! from a channel, decodes them, and routes each order in array order.
//! Malformed payloads are logged and dropped without touching the
//! engine.

use std::sync::Arc;

use hermes_engine::OrderRouter;
use hermes_gateway::ingest;
use log::error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub fn spawn_order_feed(
    router: Arc<OrderRouter>,
    mut rx: mpsc::Receiver<String>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            let orders = match ingest::decode_new_orders(&payload) {
                Ok(orders) => orders,
                Err(e) => {
                    error!("dropping malformed new-order payload: {}", e);
                    continue;
                }
            };
            for order in orders {
                if let Err(e) = router.submit(order).await {
                    error!("failed to route order: {}", e);
                }
            }
        }
    })
}
