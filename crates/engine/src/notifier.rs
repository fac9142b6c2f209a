//! Outbound notification fan-out
//!
//! Thin adapter between the matching engine and its consumers: the trade
//! tape, candle builders, book-view maintainers, per-user order streams,
//! and the persistence pipeline. A missing consumer never stalls
//! matching; failed publishes are logged and dropped.

use hermes_core::{Order, Price, Quantity, Side, Trade};
use hermes_gateway::messages::{BookDelta, CandleUpdate, OrderDto};
use hermes_gateway::transport::{Publisher, Subjects, channel::{ChannelPublisher, ChannelSubscriber}};
use hermes_gateway::{MatchedMessage, TradeOrdersMessage};
use log::{debug, error};
use tokio::sync::mpsc;

/// Subscriber ends of the outbound streams, handed to consumers at wiring
/// time
pub struct OutboundChannels {
    pub trades: ChannelSubscriber<Trade>,
    pub candles: ChannelSubscriber<CandleUpdate>,
    pub deltas: ChannelSubscriber<BookDelta>,
    pub order_updates: ChannelSubscriber<OrderDto>,
}

/// Publisher side of every outbound stream
pub struct Notifier {
    trades: ChannelPublisher<Trade>,
    candles: ChannelPublisher<CandleUpdate>,
    deltas: ChannelPublisher<BookDelta>,
    order_updates: ChannelPublisher<OrderDto>,
    matched: mpsc::UnboundedSender<MatchedMessage>,
}

impl Notifier {
    /// Create the notifier plus the subscriber ends and the receiver end
    /// of the persistence channel
    pub fn channel(
        capacity: usize,
    ) -> (
        Self,
        OutboundChannels,
        mpsc::UnboundedReceiver<MatchedMessage>,
    ) {
        let (trades, trades_rx) = ChannelPublisher::pair(capacity);
        let (candles, candles_rx) = ChannelPublisher::pair(capacity);
        let (deltas, deltas_rx) = ChannelPublisher::pair(capacity);
        let (order_updates, order_updates_rx) = ChannelPublisher::pair(capacity);
        let (matched, matched_rx) = mpsc::unbounded_channel();

        (
            Self {
                trades,
                candles,
                deltas,
                order_updates,
                matched,
            },
            OutboundChannels {
                trades: trades_rx,
                candles: candles_rx,
                deltas: deltas_rx,
                order_updates: order_updates_rx,
            },
            matched_rx,
        )
    }

    /// Another handle to the candle stream (used by the keep-alive task)
    pub fn candle_publisher(&self) -> ChannelPublisher<CandleUpdate> {
        self.candles.clone()
    }

    /// Publish a trade to the tape and seed the candle stream
    pub async fn trade_executed(&self, trade: &Trade) {
        if let Err(e) = self.trades.publish(trade).await {
            debug!("no consumer on {}: {}", Subjects::RECENT_TRADES, e);
        }
        let seed = CandleUpdate::from_trade(trade);
        if let Err(e) = self.candles.publish(&seed).await {
            debug!("no consumer on {}: {}", Subjects::KLINE_UPDATES, e);
        }
    }

    /// Publish a change in resting quantity at a price level
    pub async fn book_delta(&self, symbol: &str, side: Side, price: Price, delta: Quantity) {
        let message = BookDelta::new(symbol, side, price, delta);
        if let Err(e) = self.deltas.publish(&message).await {
            debug!("no consumer on {}: {}", Subjects::book_delta(symbol), e);
        }
    }

    /// Publish an order state change on the per-user stream
    pub async fn order_update(&self, order: &Order) {
        let dto = OrderDto::from(order);
        if let Err(e) = self.order_updates.publish(&dto).await {
            debug!("no consumer on {}: {}", Subjects::USER_ORDER_UPDATES, e);
        }
    }

    /// Hand a matched-order event to the persistence pipeline
    pub fn matched_order(&self, message: &TradeOrdersMessage) {
        let envelope = match MatchedMessage::trade_order(message) {
            Ok(envelope) => envelope,
            Err(e) => {
                error!("failed to encode matched-order event: {}", e);
                return;
            }
        };
        if self.matched.send(envelope).is_err() {
            error!("persistence pipeline is gone, dropping matched-order event");
        }
    }
}
