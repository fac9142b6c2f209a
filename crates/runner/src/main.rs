//! Hermes demo entrypoint
//!
//! Starts the full matching core, attaches logging consumers to every
//! outbound stream, and pushes a short scripted order flow through the
//! inbound path: rest liquidity, cross it with a limit order, then
//! submit one batched payload ending in a market sweep.

mod bootstrap;
mod feed;

use hermes_core::{Order, OrderType, Side};
use hermes_engine::{OutboundChannels, SnowflakeSequence};
use hermes_gateway::transport::Subscriber;
use hermes_ports::SequenceSource;
use log::info;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::mpsc;
use tokio::time::{Duration, sleep};

use bootstrap::{System, SystemConfig};

fn json_order(
    ids: &SnowflakeSequence,
    user: &str,
    symbol: &str,
    side: Side,
    order_type: OrderType,
    price: Option<Decimal>,
    quantity: Decimal,
) -> String {
    let order = Order::new(ids.next_id(), user, symbol, side, order_type, price, quantity);
    serde_json::to_string(&order).expect("order serializes")
}

fn attach_stream_loggers(channels: OutboundChannels) {
    let OutboundChannels {
        mut trades,
        mut candles,
        mut deltas,
        mut order_updates,
    } = channels;

    tokio::spawn(async move {
        while let Ok(trade) = trades.next().await {
            info!(
                "tape: {} {} @ {} taker={}",
                trade.symbol, trade.quantity, trade.price, trade.taker_order_id
            );
        }
    });
    tokio::spawn(async move {
        while let Ok(update) = candles.next().await {
            info!("candle: {} price={} t={}", update.symbol, update.price, update.trade_time);
        }
    });
    tokio::spawn(async move {
        while let Ok(delta) = deltas.next().await {
            info!(
                "delta: {} {:?} {} -> {}",
                delta.symbol, delta.side, delta.price, delta.unfilled_quantity
            );
        }
    });
    tokio::spawn(async move {
        while let Ok(update) = order_updates.next().await {
            info!(
                "order update for {}: {} {:?} filled={}/{}",
                update.user_id, update.id, update.status, update.filled_quantity, update.quantity
            );
        }
    });
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let System {
        router,
        store,
        stats,
        channels,
    } = bootstrap::start(SystemConfig {
        candle_interval: Duration::from_secs(5),
        ..SystemConfig::default()
    });
    attach_stream_loggers(channels);

    let (inbound_tx, inbound_rx) = mpsc::channel(64);
    feed::spawn_order_feed(router, inbound_rx);

    let ids = SnowflakeSequence::new(7);

    // Rest liquidity on both sides, then cross the spread
    for payload in [
        json_order(&ids, "alice", "BTCUSDT", Side::Sell, OrderType::Limit, Some(dec!(50100)), dec!(2)),
        json_order(&ids, "alice", "BTCUSDT", Side::Sell, OrderType::Limit, Some(dec!(50050)), dec!(1)),
        json_order(&ids, "bob", "BTCUSDT", Side::Buy, OrderType::Limit, Some(dec!(49900)), dec!(3)),
        json_order(&ids, "carol", "BTCUSDT", Side::Buy, OrderType::Limit, Some(dec!(50060)), dec!(1.5)),
    ] {
        inbound_tx.send(payload).await.expect("feed alive");
    }

    // Batched payload: two orders processed in array order, ending in a
    // market sweep whose remainder is discarded
    let batch = format!(
        "[{},{}]",
        json_order(&ids, "dave", "ETHUSDT", Side::Sell, OrderType::Limit, Some(dec!(3000)), dec!(5)),
        json_order(&ids, "erin", "ETHUSDT", Side::Buy, OrderType::Market, None, dec!(2)),
    );
    inbound_tx.send(batch).await.expect("feed alive");

    // Let matching, notifications, and the periodic flush settle
    sleep(Duration::from_secs(2)).await;

    info!(
        "persisted {} order row(s) and {} trade row(s) over {} batch(es)",
        store.order_count(),
        store.trade_count(),
        stats.batches(),
    );
}
