//! Per-user order update messages

use chrono::{DateTime, FixedOffset, Utc};
use hermes_core::{Order, OrderStatus, OrderType, Side};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fixed display offset for public timestamps
fn display_offset() -> FixedOffset {
    FixedOffset::east_opt(8 * 3600).expect("static utc offset")
}

/// Public order DTO published on the per-user update stream
///
/// Carries the same data as the domain [`Order`], but timestamps are
/// re-anchored to a fixed +08:00 offset for display and the price field
/// is always present (null for market orders).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub id: String,
    /// Routing key for downstream partitioning
    pub user_id: String,
    pub symbol: String,
    pub price: Option<Decimal>,
    pub quantity: Decimal,
    pub filled_quantity: Decimal,
    pub unfilled_quantity: Decimal,
    pub side: Side,
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
    pub modified_at: DateTime<FixedOffset>,
}

impl From<&Order> for OrderDto {
    fn from(order: &Order) -> Self {
        let offset = display_offset();
        let anchor = |t: DateTime<Utc>| t.with_timezone(&offset);

        Self {
            id: order.id.clone(),
            user_id: order.user_id.clone(),
            symbol: order.symbol.clone(),
            price: order.price,
            quantity: order.quantity,
            filled_quantity: order.filled_quantity,
            unfilled_quantity: order.unfilled_quantity,
            side: order.side,
            order_type: order.order_type,
            status: order.status,
            created_at: anchor(order.created_at),
            updated_at: anchor(order.updated_at),
            modified_at: anchor(order.modified_at),
        }
    }
}
