//! Price-time priority matching
//!
//! One incoming order is processed to completion against the book's best
//! opposite-side entries. Market orders sweep without a price check and
//! discard any remainder; limit-family orders stop at the first
//! non-crossing opponent and rest the remainder.

use std::sync::Arc;

use chrono::Utc;
use hermes_core::{Order, OrderType, Side, Trade};
use hermes_gateway::TradeOrdersMessage;
use hermes_ports::SequenceSource;
use log::{debug, info};
use rust_decimal::Decimal;

use crate::book::OrderBookStore;
use crate::error::{EngineError, EngineResult};
use crate::notifier::Notifier;

/// The matching engine for all symbols
///
/// `handle_new_order` must not run concurrently for the same symbol; the
/// [`OrderRouter`](crate::router::OrderRouter) serializes submissions per
/// symbol.
pub struct MatchingEngine {
    book: Arc<OrderBookStore>,
    sequence: Arc<dyn SequenceSource>,
    notifier: Notifier,
}

impl MatchingEngine {
    pub fn new(
        book: Arc<OrderBookStore>,
        sequence: Arc<dyn SequenceSource>,
        notifier: Notifier,
    ) -> Self {
        Self {
            book,
            sequence,
            notifier,
        }
    }

    /// Shared view of the book (read-only outside the matching path)
    pub fn book(&self) -> &OrderBookStore {
        &self.book
    }

    /// Match one incoming order to completion
    ///
    /// Returns the trades produced, in match order. On error nothing
    /// further is applied: the failing step surfaces to the caller and
    /// the incoming order is not rested.
    pub async fn handle_new_order(&self, mut order: Order) -> EngineResult<Vec<Trade>> {
        // Limit-family orders need a price to check crossing against;
        // market orders sweep unconditionally.
        let price_limit = match order.order_type {
            OrderType::Market => None,
            OrderType::Limit | OrderType::StopLoss | OrderType::TakeProfit => Some(
                order
                    .price
                    .ok_or_else(|| EngineError::MissingPrice(order.id.clone()))?,
            ),
        };

        debug!(
            "matching order {}: {} {:?} {:?} qty={} price={:?}",
            order.id, order.symbol, order.side, order.order_type, order.quantity, order.price
        );

        // (opponent snapshot after its fill, trade) per match
        let mut fills: Vec<(Order, Trade)> = Vec::new();

        while order.unfilled_quantity > Decimal::ZERO {
            let Some((mut opponent, token)) = self.book.best_opponent(&order.symbol, order.side)?
            else {
                break;
            };

            let opponent_price = opponent.price.ok_or_else(|| {
                EngineError::Invariant(format!("resting order {} has no price", opponent.id))
            })?;

            if let Some(limit) = price_limit {
                let crosses = match order.side {
                    Side::Buy => opponent_price <= limit,
                    Side::Sell => opponent_price >= limit,
                };
                if !crosses {
                    break;
                }
            }

            let matched_quantity = order.unfilled_quantity.min(opponent.unfilled_quantity);
            if matched_quantity <= Decimal::ZERO {
                return Err(EngineError::Invariant(format!(
                    "resting order {} with no unfilled quantity",
                    opponent.id
                )));
            }

            let now = Utc::now();
            order.apply_fill(matched_quantity, now);
            opponent.apply_fill(matched_quantity, now);

            // The resting side always sets the execution price; price
            // improvement accrues to the taker.
            let (buy_order_id, sell_order_id) = match order.side {
                Side::Buy => (order.id.clone(), opponent.id.clone()),
                Side::Sell => (opponent.id.clone(), order.id.clone()),
            };
            let trade = Trade::new_with_time(
                self.sequence.next_id(),
                buy_order_id,
                sell_order_id,
                order.symbol.clone(),
                opponent_price,
                matched_quantity,
                order.id.clone(),
                order.side,
                now,
            );

            self.notifier.trade_executed(&trade).await;

            if opponent.unfilled_quantity.is_zero() {
                self.book.remove(&opponent, &token);
            } else {
                self.book.replace(&opponent, &token)?;
            }

            self.notifier
                .book_delta(&opponent.symbol, opponent.side, opponent_price, -matched_quantity)
                .await;
            self.notifier.order_update(&opponent).await;

            fills.push((opponent, trade));
        }

        // Rest the unfilled remainder of a limit-family order and publish
        // its update; a market order's remainder is discarded silently.
        if let Some(price) = price_limit {
            if order.unfilled_quantity > Decimal::ZERO {
                self.book.insert(&order)?;
                self.notifier
                    .book_delta(&order.symbol, order.side, price, order.unfilled_quantity)
                    .await;
            }
            self.notifier.order_update(&order).await;
        }

        if !fills.is_empty() {
            info!(
                "order {} produced {} trade(s), {} unfilled",
                order.id,
                fills.len(),
                order.unfilled_quantity
            );
        }

        let trades: Vec<Trade> = fills.iter().map(|(_, trade)| trade.clone()).collect();
        for (opponent, trade) in fills {
            let (buy_order, sell_order) = match order.side {
                Side::Buy => (order.clone(), opponent),
                Side::Sell => (opponent, order.clone()),
            };
            self.notifier
                .matched_order(&TradeOrdersMessage::new(buy_order, sell_order, trade));
        }

        Ok(trades)
    }
}
