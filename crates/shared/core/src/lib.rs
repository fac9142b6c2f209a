//! Hermes Core Domain
//!
//! Pure domain types for the Hermes matching core.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{Order, OrderId, OrderStatus, OrderType, Side, Trade, TradeId};
pub use values::{Price, Quantity, Symbol, Timestamp};
