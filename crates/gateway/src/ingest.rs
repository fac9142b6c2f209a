//! Inbound order decoding
//!
//! New orders arrive as JSON, either one order per message or a batched
//! array of orders. Both forms route to the same matching semantics; a
//! batch is processed in array order.

use hermes_core::Order;
use serde_json::Value;

use crate::error::GatewayResult;

/// Decode an inbound payload into orders, preserving array order
///
/// A malformed payload (or any malformed element of a batch) fails the
/// whole unit of work; the caller logs and drops it.
pub fn decode_new_orders(payload: &str) -> GatewayResult<Vec<Order>> {
    let value: Value = serde_json::from_str(payload)?;
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(Into::into))
            .collect(),
        other => Ok(vec![serde_json::from_value(other)?]),
    }
}
