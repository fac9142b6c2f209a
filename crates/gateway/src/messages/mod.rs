//! Wire message types for gateway communication
//!
//! JSON shapes mirror the venue's public streams: camelCase field names,
//! decimal values as strings, enum values in SCREAMING_SNAKE_CASE.

pub mod market_data;
pub mod matched;
pub mod order;

pub use market_data::{BookDelta, CandleUpdate};
pub use matched::{MatchedMessage, TradeOrdersMessage};
pub use order::OrderDto;
