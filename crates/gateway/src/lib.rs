//! Hermes Gateway
//!
//! Gateway layer for the Hermes matching core. Provides:
//! - Transport abstraction (tokio broadcast channels, with traits for
//!   future transports)
//! - Wire message types for the outbound streams (trade tape, candle
//!   updates, book deltas, per-user order updates) and the persistence
//!   envelope
//! - Inbound order decoding (single and batched payloads)
//!
//! ## Architecture
//!
//! ```text
//! Inbound JSON (new_orders)
//!         │
//!    ┌────▼────┐
//!    │ Gateway │ decode → Order
//!    └────┬────┘
//!         │
//!    Matching Engine
//!         │ Channels:
//!         │ recent-trades, kline-updates, order-book-delta-{symbol},
//!         │ user-order-updates, matched_orders
//!    ┌────▼────┐
//!    │Consumers│ (tape, candles, book views, persistence)
//!    └─────────┘
//! ```
//!
//! ## Transport
//!
//! Currently uses tokio channels for single-process operation. The
//! `Publisher`/`Subscriber` traits allow plugging in a broker-backed
//! transport when needed.

pub mod error;
pub mod ingest;
pub mod messages;
pub mod transport;

// Re-export commonly used types
pub use error::{GatewayError, TransportError};
pub use messages::{
    market_data::{BookDelta, CandleUpdate},
    matched::{MatchedMessage, TradeOrdersMessage},
    order::OrderDto,
};
pub use transport::{
    Publisher, Subjects, Subscriber,
    channel::{ChannelPublisher, ChannelSubscriber},
};
