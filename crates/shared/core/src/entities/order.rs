use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{OrderStatus, OrderType, Side};

/// Unique identifier for an order
///
/// Identifiers are issued by an external sequence source and are opaque
/// to the matching core.
pub type OrderId = String;

/// Full order details
///
/// Fill accounting invariant: `filled_quantity + unfilled_quantity ==
/// quantity` at all times, and `status == Completed` exactly when
/// `unfilled_quantity` is zero.
///
/// JSON uses camelCase field names (`filledQuantity`, `modifiedAt`, ...)
/// so serialized orders match the venue wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// Owner of the order, used to key per-user update streams
    pub user_id: String,
    /// The trading pair, e.g. "BTCUSDT"
    pub symbol: String,
    /// Limit price; absent for market orders
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub price: Option<Decimal>,
    /// Original quantity at submission
    pub quantity: Decimal,
    pub filled_quantity: Decimal,
    pub unfilled_quantity: Decimal,
    pub side: Side,
    pub order_type: OrderType,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub stop_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub take_profit_price: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    /// Last time any field changed
    pub updated_at: DateTime<Utc>,
    /// Last time the book-ranking state changed; part of the priority score
    pub modified_at: DateTime<Utc>,
}

impl Order {
    /// Create a new order with explicit timestamp
    #[allow(clippy::too_many_arguments)]
    pub fn new_with_time(
        id: impl Into<OrderId>,
        user_id: impl Into<String>,
        symbol: impl Into<String>,
        side: Side,
        order_type: OrderType,
        price: Option<Decimal>,
        quantity: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            symbol: symbol.into(),
            price,
            quantity,
            filled_quantity: Decimal::ZERO,
            unfilled_quantity: quantity,
            side,
            order_type,
            status: OrderStatus::Pending,
            stop_price: None,
            take_profit_price: None,
            created_at: timestamp,
            updated_at: timestamp,
            modified_at: timestamp,
        }
    }

    /// Create a new order using current system time
    pub fn new(
        id: impl Into<OrderId>,
        user_id: impl Into<String>,
        symbol: impl Into<String>,
        side: Side,
        order_type: OrderType,
        price: Option<Decimal>,
        quantity: Decimal,
    ) -> Self {
        Self::new_with_time(id, user_id, symbol, side, order_type, price, quantity, Utc::now())
    }

    /// Validate the order based on order type requirements
    pub fn validate(&self) -> bool {
        match self.order_type {
            OrderType::Market => true,
            OrderType::Limit => self.price.is_some(),
            OrderType::StopLoss => self.price.is_some() && self.stop_price.is_some(),
            OrderType::TakeProfit => self.price.is_some() && self.take_profit_price.is_some(),
        }
    }

    /// Apply a fill of `quantity` to this order
    ///
    /// Updates fill accounting, recomputes the status, and stamps both the
    /// update time and the modification time (the latter re-ranks a resting
    /// order when it is replaced in the book).
    pub fn apply_fill(&mut self, quantity: Decimal, at: DateTime<Utc>) {
        debug_assert!(quantity > Decimal::ZERO);
        debug_assert!(quantity <= self.unfilled_quantity);

        self.filled_quantity += quantity;
        self.unfilled_quantity -= quantity;
        self.status = if self.unfilled_quantity.is_zero() {
            OrderStatus::Completed
        } else {
            OrderStatus::PartiallyFilled
        };
        self.updated_at = at;
        self.modified_at = at;
    }

    /// Returns true if the order is completely filled
    pub fn is_filled(&self) -> bool {
        self.unfilled_quantity.is_zero()
    }

    /// Returns true if fill accounting balances
    pub fn accounting_balanced(&self) -> bool {
        self.filled_quantity + self.unfilled_quantity == self.quantity
            && self.unfilled_quantity >= Decimal::ZERO
    }
}
