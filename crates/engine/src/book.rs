//! Per-symbol order-book store
//!
//! Each symbol has two sides ordered by a priority score derived from
//! (price, modification time, side). Entries are stored in their
//! serialized form: the serialized snapshot *is* the entry's identity,
//! so removal and replacement take an [`EntryToken`] captured at read
//! time rather than recomputing anything from the order's current
//! (possibly mutated) fields.
//!
//! The store itself does no locking beyond the symbol map; the router
//! guarantees a single writer per symbol.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use hermes_core::{Order, Price, Side};
use rust_decimal::Decimal;

use crate::error::{BookError, BookResult};

/// Price is scaled by 10^7 before the timestamp term is added, so price
/// always dominates and equal-price entries rank by modification time.
const PRICE_PRECISION: u32 = 7;

/// Priority score for a resting order
///
/// `price * 10^7 + sign(side) * modified_millis` with a negative sign
/// for bids. One ascending ordering then serves both sides: the best ask
/// is the minimum score, the best bid the maximum, and equal-price ties
/// go to the earlier modification time on either side.
fn priority_score(price: Price, side: Side, modified_at: DateTime<Utc>) -> Decimal {
    let factor = Decimal::from(10i64.pow(PRICE_PRECISION));
    let millis = Decimal::from(modified_at.timestamp_millis());
    let sign = match side {
        Side::Buy => Decimal::NEGATIVE_ONE,
        Side::Sell => Decimal::ONE,
    };
    price * factor + sign * millis
}

/// Ordered identity of one stored entry: score first, serialized form as
/// the tiebreaker (mirroring a sorted-set member)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct BookKey {
    score: Decimal,
    raw: String,
}

/// Identity of a resting entry, captured at read time
///
/// The token pins the entry's pre-mutation serialized form and score.
/// Mutating the order first and then trying to locate it by value would
/// miss the stored entry; the token makes the snapshot discipline
/// explicit.
#[derive(Debug, Clone)]
pub struct EntryToken {
    side: Side,
    key: BookKey,
}

#[derive(Debug, Default)]
struct SymbolBook {
    bids: BTreeSet<BookKey>,
    asks: BTreeSet<BookKey>,
}

impl SymbolBook {
    fn side_mut(&mut self, side: Side) -> &mut BTreeSet<BookKey> {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    fn side(&self, side: Side) -> &BTreeSet<BookKey> {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    /// Best entry for a side: minimum score for asks, maximum for bids
    fn best(&self, side: Side) -> Option<&BookKey> {
        match side {
            Side::Buy => self.bids.iter().next_back(),
            Side::Sell => self.asks.iter().next(),
        }
    }
}

/// Per-symbol, two-sided collection of resting orders
pub struct OrderBookStore {
    books: DashMap<String, SymbolBook>,
}

impl OrderBookStore {
    pub fn new() -> Self {
        Self {
            books: DashMap::new(),
        }
    }

    /// Best resting order on the *opposite* side of `taker_side`
    ///
    /// Returns the parsed order plus the token identifying its stored
    /// entry; the entry itself is not removed. A stored entry that fails
    /// to parse aborts the caller's unit of work.
    pub fn best_opponent(
        &self,
        symbol: &str,
        taker_side: Side,
    ) -> BookResult<Option<(Order, EntryToken)>> {
        let maker_side = taker_side.opposite();
        let key = match self.books.get(symbol) {
            Some(book) => book.best(maker_side).cloned(),
            None => None,
        };

        match key {
            None => Ok(None),
            Some(key) => {
                let order: Order = serde_json::from_str(&key.raw)?;
                Ok(Some((
                    order,
                    EntryToken {
                        side: maker_side,
                        key,
                    },
                )))
            }
        }
    }

    /// Rest an order at its current priority score
    ///
    /// Precondition: the order has unfilled quantity and a limit price.
    pub fn insert(&self, order: &Order) -> BookResult<()> {
        if order.unfilled_quantity <= Decimal::ZERO {
            return Err(BookError::NoRestingQuantity(order.id.clone()));
        }
        let price = order
            .price
            .ok_or_else(|| BookError::MissingPrice(order.id.clone()))?;

        let key = BookKey {
            score: priority_score(price, order.side, order.modified_at),
            raw: serde_json::to_string(order)?,
        };
        self.books
            .entry(order.symbol.clone())
            .or_default()
            .side_mut(order.side)
            .insert(key);
        Ok(())
    }

    /// Remove the entry identified by `token`
    ///
    /// Removing an absent entry is a no-op.
    pub fn remove(&self, order: &Order, token: &EntryToken) {
        if let Some(mut book) = self.books.get_mut(&order.symbol) {
            book.side_mut(token.side).remove(&token.key);
        }
    }

    /// Swap the entry identified by `token` for the order's current state
    /// at its freshly computed score
    ///
    /// The new state is serialized before the old entry is touched, so a
    /// codec failure leaves the book unchanged.
    pub fn replace(&self, order: &Order, token: &EntryToken) -> BookResult<()> {
        if order.unfilled_quantity <= Decimal::ZERO {
            return Err(BookError::NoRestingQuantity(order.id.clone()));
        }
        let price = order
            .price
            .ok_or_else(|| BookError::MissingPrice(order.id.clone()))?;
        let new_key = BookKey {
            score: priority_score(price, order.side, order.modified_at),
            raw: serde_json::to_string(order)?,
        };

        let mut book = self.books.entry(order.symbol.clone()).or_default();
        let side = book.side_mut(token.side);
        side.remove(&token.key);
        side.insert(new_key);
        Ok(())
    }

    /// Number of resting entries on one side of a symbol's book
    pub fn depth(&self, symbol: &str, side: Side) -> usize {
        self.books
            .get(symbol)
            .map(|book| book.side(side).len())
            .unwrap_or(0)
    }

    /// All resting orders on one side, best first
    pub fn resting_orders(&self, symbol: &str, side: Side) -> BookResult<Vec<Order>> {
        let Some(book) = self.books.get(symbol) else {
            return Ok(Vec::new());
        };
        let entries = book.side(side);
        let iter: Box<dyn Iterator<Item = &BookKey>> = match side {
            Side::Buy => Box::new(entries.iter().rev()),
            Side::Sell => Box::new(entries.iter()),
        };
        iter.map(|key| serde_json::from_str(&key.raw).map_err(BookError::from))
            .collect()
    }
}

impl Default for OrderBookStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use hermes_core::OrderType;
    use rust_decimal_macros::dec;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn resting(id: &str, side: Side, price: Decimal, qty: Decimal, t: i64) -> Order {
        Order::new_with_time(
            id,
            "u-1",
            "BTCUSDT",
            side,
            OrderType::Limit,
            Some(price),
            qty,
            at(t),
        )
    }

    #[test]
    fn best_ask_is_lowest_price_then_earliest_time() {
        let store = OrderBookStore::new();
        store.insert(&resting("a", Side::Sell, dec!(100), dec!(1), 1)).unwrap();
        store.insert(&resting("b", Side::Sell, dec!(99), dec!(1), 2)).unwrap();
        store.insert(&resting("c", Side::Sell, dec!(99), dec!(1), 3)).unwrap();

        let (best, _) = store.best_opponent("BTCUSDT", Side::Buy).unwrap().unwrap();
        assert_eq!(best.id, "b");
    }

    #[test]
    fn best_bid_is_highest_price_then_earliest_time() {
        let store = OrderBookStore::new();
        store.insert(&resting("a", Side::Buy, dec!(50), dec!(3), 1)).unwrap();
        store.insert(&resting("b", Side::Buy, dec!(50), dec!(2), 2)).unwrap();
        store.insert(&resting("c", Side::Buy, dec!(49), dec!(5), 0)).unwrap();

        let (best, _) = store.best_opponent("BTCUSDT", Side::Sell).unwrap().unwrap();
        assert_eq!(best.id, "a");
    }

    #[test]
    fn removal_uses_the_pre_mutation_token() {
        let store = OrderBookStore::new();
        store.insert(&resting("a", Side::Sell, dec!(100), dec!(2), 1)).unwrap();

        let (mut order, token) = store.best_opponent("BTCUSDT", Side::Buy).unwrap().unwrap();
        // Mutate before removing - the token still identifies the entry
        order.apply_fill(dec!(2), Utc::now());
        store.remove(&order, &token);

        assert_eq!(store.depth("BTCUSDT", Side::Sell), 0);
    }

    #[test]
    fn removing_an_absent_entry_is_a_noop() {
        let store = OrderBookStore::new();
        store.insert(&resting("a", Side::Sell, dec!(100), dec!(2), 1)).unwrap();
        let (order, token) = store.best_opponent("BTCUSDT", Side::Buy).unwrap().unwrap();

        store.remove(&order, &token);
        store.remove(&order, &token);
        assert_eq!(store.depth("BTCUSDT", Side::Sell), 0);
    }

    #[test]
    fn replace_re_ranks_behind_same_price_peers() {
        let store = OrderBookStore::new();
        store.insert(&resting("a", Side::Sell, dec!(99), dec!(5), 1)).unwrap();
        store.insert(&resting("b", Side::Sell, dec!(99), dec!(1), 2)).unwrap();

        // Partially fill "a" and replace it under a later modification time
        let (mut a, token) = store.best_opponent("BTCUSDT", Side::Buy).unwrap().unwrap();
        assert_eq!(a.id, "a");
        a.apply_fill(dec!(2), at(10));
        store.replace(&a, &token).unwrap();

        let ordered = store.resting_orders("BTCUSDT", Side::Sell).unwrap();
        let ids: Vec<_> = ordered.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(ordered[1].unfilled_quantity, dec!(3));
    }

    #[test]
    fn insert_rejects_exhausted_or_priceless_orders() {
        let store = OrderBookStore::new();

        let mut exhausted = resting("a", Side::Buy, dec!(50), dec!(1), 1);
        exhausted.apply_fill(dec!(1), Utc::now());
        assert!(matches!(
            store.insert(&exhausted),
            Err(BookError::NoRestingQuantity(_))
        ));

        let priceless = Order::new_with_time(
            "m",
            "u-1",
            "BTCUSDT",
            Side::Buy,
            OrderType::Market,
            None,
            dec!(1),
            at(0),
        );
        assert!(matches!(store.insert(&priceless), Err(BookError::MissingPrice(_))));
    }

    #[test]
    fn sides_and_symbols_are_independent() {
        let store = OrderBookStore::new();
        store.insert(&resting("a", Side::Buy, dec!(50), dec!(1), 1)).unwrap();

        assert!(store.best_opponent("BTCUSDT", Side::Buy).unwrap().is_none());
        assert!(store.best_opponent("ETHUSDT", Side::Sell).unwrap().is_none());
        assert!(store.best_opponent("BTCUSDT", Side::Sell).unwrap().is_some());
    }
}
