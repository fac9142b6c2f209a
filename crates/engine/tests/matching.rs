//! End-to-end matching behavior against the book store

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use hermes_core::{Order, OrderStatus, OrderType, Side, Trade};
use hermes_engine::{MatchingEngine, Notifier, OrderBookStore, OutboundChannels, SnowflakeSequence};
use hermes_gateway::MatchedMessage;
use hermes_gateway::transport::Subscriber;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::mpsc;

struct Harness {
    engine: MatchingEngine,
    book: Arc<OrderBookStore>,
    channels: OutboundChannels,
    matched_rx: mpsc::UnboundedReceiver<MatchedMessage>,
}

fn harness() -> Harness {
    let book = Arc::new(OrderBookStore::new());
    let (notifier, channels, matched_rx) = Notifier::channel(64);
    let engine = MatchingEngine::new(
        book.clone(),
        Arc::new(SnowflakeSequence::new(1)),
        notifier,
    );
    Harness {
        engine,
        book,
        channels,
        matched_rx,
    }
}

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

fn limit(id: &str, side: Side, price: Decimal, qty: Decimal, t: i64) -> Order {
    Order::new_with_time(
        id,
        format!("u-{id}"),
        "BTCUSDT",
        side,
        OrderType::Limit,
        Some(price),
        qty,
        at(t),
    )
}

fn market(id: &str, side: Side, qty: Decimal) -> Order {
    Order::new(id, format!("u-{id}"), "BTCUSDT", side, OrderType::Market, None, qty)
}

#[tokio::test]
async fn market_buy_matches_best_priced_earliest_ask() {
    let h = harness();
    h.engine.handle_new_order(limit("a", Side::Sell, dec!(100), dec!(1), 1)).await.unwrap();
    h.engine.handle_new_order(limit("b", Side::Sell, dec!(99), dec!(1), 2)).await.unwrap();
    h.engine.handle_new_order(limit("c", Side::Sell, dec!(99), dec!(1), 3)).await.unwrap();

    let trades = h.engine.handle_new_order(market("t", Side::Buy, dec!(1))).await.unwrap();

    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].sell_order_id, "b");
    assert_eq!(trades[0].price, dec!(99));
    assert_eq!(h.book.depth("BTCUSDT", Side::Sell), 2);
}

#[tokio::test]
async fn equal_price_bids_fill_in_time_priority() {
    let h = harness();
    h.engine.handle_new_order(limit("b1", Side::Buy, dec!(50), dec!(3), 1)).await.unwrap();
    h.engine.handle_new_order(limit("b2", Side::Buy, dec!(50), dec!(2), 2)).await.unwrap();

    let trades = h.engine.handle_new_order(limit("s", Side::Sell, dec!(50), dec!(4), 3)).await.unwrap();

    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].buy_order_id, "b1");
    assert_eq!(trades[0].quantity, dec!(3));
    assert_eq!(trades[1].buy_order_id, "b2");
    assert_eq!(trades[1].quantity, dec!(1));

    // The later bid stays with one unit unfilled
    let bids = h.book.resting_orders("BTCUSDT", Side::Buy).unwrap();
    assert_eq!(bids.len(), 1);
    assert_eq!(bids[0].id, "b2");
    assert_eq!(bids[0].unfilled_quantity, dec!(1));
    assert_eq!(bids[0].filled_quantity, dec!(1));
    assert_eq!(bids[0].status, OrderStatus::PartiallyFilled);
    assert!(bids[0].accounting_balanced());

    // The incoming ask is fully filled and never rests
    assert_eq!(h.book.depth("BTCUSDT", Side::Sell), 0);
}

#[tokio::test]
async fn non_crossing_limit_order_rests_unfilled() {
    let mut h = harness();
    h.engine.handle_new_order(limit("a", Side::Sell, dec!(12), dec!(5), 1)).await.unwrap();

    let trades = h.engine.handle_new_order(limit("b", Side::Buy, dec!(10), dec!(7), 2)).await.unwrap();

    assert!(trades.is_empty());
    let bids = h.book.resting_orders("BTCUSDT", Side::Buy).unwrap();
    assert_eq!(bids.len(), 1);
    assert_eq!(bids[0].unfilled_quantity, bids[0].quantity);
    assert_eq!(bids[0].status, OrderStatus::Pending);

    // Two positive deltas: one per rested order, in submission order
    let first = h.channels.deltas.try_next().unwrap().unwrap();
    let second = h.channels.deltas.try_next().unwrap().unwrap();
    assert_eq!(first.side, Side::Sell);
    assert_eq!(first.unfilled_quantity, "5");
    assert_eq!(second.side, Side::Buy);
    assert_eq!(second.unfilled_quantity, "7");
}

#[tokio::test]
async fn market_order_remainder_is_discarded_not_rested() {
    let h = harness();
    h.engine.handle_new_order(limit("a", Side::Sell, dec!(100), dec!(4), 1)).await.unwrap();
    h.engine.handle_new_order(limit("b", Side::Sell, dec!(101), dec!(2), 2)).await.unwrap();

    let trades = h.engine.handle_new_order(market("t", Side::Buy, dec!(10))).await.unwrap();

    let filled: Decimal = trades.iter().map(|t| t.quantity).sum();
    assert_eq!(filled, dec!(6));
    assert_eq!(h.book.depth("BTCUSDT", Side::Sell), 0);
    // The remainder (4) is gone: nothing rests on the buy side either
    assert_eq!(h.book.depth("BTCUSDT", Side::Buy), 0);
}

#[tokio::test]
async fn trade_price_is_always_the_resting_side_price() {
    let h = harness();
    h.engine.handle_new_order(limit("a", Side::Sell, dec!(100), dec!(1), 1)).await.unwrap();

    // Aggressive buy at 105 gets price improvement to 100
    let trades = h.engine.handle_new_order(limit("b", Side::Buy, dec!(105), dec!(1), 2)).await.unwrap();
    assert_eq!(trades[0].price, dec!(100));
    assert_eq!(trades[0].taker_order_id, "b");
    assert_eq!(trades[0].direction, Side::Buy);

    // And symmetrically for an aggressive sell into a resting bid
    h.engine.handle_new_order(limit("c", Side::Buy, dec!(98), dec!(1), 3)).await.unwrap();
    let trades = h.engine.handle_new_order(limit("d", Side::Sell, dec!(95), dec!(1), 4)).await.unwrap();
    assert_eq!(trades[0].price, dec!(98));
    assert_eq!(trades[0].taker_order_id, "d");
    assert_eq!(trades[0].direction, Side::Sell);
}

#[tokio::test]
async fn fills_publish_tape_candles_deltas_and_updates_in_order() {
    let mut h = harness();
    h.engine.handle_new_order(limit("a", Side::Sell, dec!(100), dec!(2), 1)).await.unwrap();
    let trades = h.engine.handle_new_order(limit("b", Side::Buy, dec!(100), dec!(1), 2)).await.unwrap();

    let trade: Trade = h.channels.trades.try_next().unwrap().unwrap();
    assert_eq!(trade, trades[0]);

    let seed = h.channels.candles.try_next().unwrap().unwrap();
    assert_eq!(seed.price, "100");
    assert_eq!(seed.trade_time, trade.trade_time.timestamp());

    // Resting delta for "a", then the fill's negative delta for "a"
    let rest_delta = h.channels.deltas.try_next().unwrap().unwrap();
    assert_eq!(rest_delta.unfilled_quantity, "2");
    let fill_delta = h.channels.deltas.try_next().unwrap().unwrap();
    assert_eq!(fill_delta.unfilled_quantity, "-1");
    assert_eq!(fill_delta.side, Side::Sell);

    // Order updates: "a" on submit, then "a" after the fill, then "b"
    let first = h.channels.order_updates.try_next().unwrap().unwrap();
    assert_eq!(first.id, "a");
    let second = h.channels.order_updates.try_next().unwrap().unwrap();
    assert_eq!(second.id, "a");
    assert_eq!(second.status, OrderStatus::PartiallyFilled);
    let third = h.channels.order_updates.try_next().unwrap().unwrap();
    assert_eq!(third.id, "b");
    assert_eq!(third.status, OrderStatus::Completed);
}

#[tokio::test]
async fn matched_events_pair_both_final_snapshots_with_the_trade() {
    let mut h = harness();
    h.engine.handle_new_order(limit("a", Side::Sell, dec!(100), dec!(3), 1)).await.unwrap();
    h.engine.handle_new_order(limit("b", Side::Buy, dec!(100), dec!(2), 2)).await.unwrap();

    let envelope = h.matched_rx.recv().await.unwrap();
    assert_eq!(envelope.kind, MatchedMessage::TRADE_ORDER);
    let event = envelope.decode_trade_order().unwrap().unwrap();

    assert_eq!(event.trade.quantity, dec!(2));
    assert_eq!(event.buy_order.id, "b");
    assert_eq!(event.buy_order.status, OrderStatus::Completed);
    assert_eq!(event.sell_order.id, "a");
    assert_eq!(event.sell_order.filled_quantity, dec!(2));
    assert_eq!(event.sell_order.unfilled_quantity, dec!(1));
    assert!(event.buy_order.accounting_balanced());
    assert!(event.sell_order.accounting_balanced());
}

#[tokio::test]
async fn partially_filled_maker_loses_time_priority_after_replace() {
    let h = harness();
    h.engine.handle_new_order(limit("a", Side::Sell, dec!(100), dec!(5), 1)).await.unwrap();
    h.engine.handle_new_order(limit("b", Side::Sell, dec!(100), dec!(1), 2)).await.unwrap();

    // Partially fill "a"; it re-ranks behind "b" at the same price
    h.engine.handle_new_order(market("t1", Side::Buy, dec!(2))).await.unwrap();
    let asks = h.book.resting_orders("BTCUSDT", Side::Sell).unwrap();
    let ids: Vec<_> = asks.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);

    // The next taker therefore hits "b" first
    let trades = h.engine.handle_new_order(market("t2", Side::Buy, dec!(1))).await.unwrap();
    assert_eq!(trades[0].sell_order_id, "b");
}

#[tokio::test]
async fn limit_order_without_price_is_rejected_without_side_effects() {
    let h = harness();
    let mut bad = limit("x", Side::Buy, dec!(1), dec!(1), 1);
    bad.price = None;

    assert!(h.engine.handle_new_order(bad).await.is_err());
    assert_eq!(h.book.depth("BTCUSDT", Side::Buy), 0);
}
