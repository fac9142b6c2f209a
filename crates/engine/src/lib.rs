//! Hermes Engine
//!
//! The matching core: a per-symbol order-book store, the price-time
//! priority matching engine, the outbound notifier, and the sequential
//! per-symbol order router.
//!
//! ## Control flow
//!
//! ```text
//! incoming order
//!       │
//!  ┌────▼─────┐   one worker per symbol; the book is never
//!  │  Router  │   mutated by two matching runs at once
//!  └────┬─────┘
//!  ┌────▼─────┐   reads/writes OrderBookStore,
//!  │ Matching │   draws trade IDs from the SequenceSource,
//!  │  Engine  │   emits to the Notifier
//!  └────┬─────┘
//!       │ trade tape / candle seeds / book deltas / order updates
//!       │ matched-order envelopes → persistence pipeline
//! ```

pub mod book;
pub mod candle;
pub mod error;
pub mod matcher;
pub mod notifier;
pub mod router;
pub mod sequence;

// Re-export commonly used types
pub use book::{EntryToken, OrderBookStore};
pub use candle::{CandleConfig, spawn_keep_alive};
pub use error::{BookError, BookResult, EngineError, EngineResult};
pub use matcher::MatchingEngine;
pub use notifier::{Notifier, OutboundChannels};
pub use router::OrderRouter;
pub use sequence::SnowflakeSequence;
