//! Hermes Persistence
//!
//! Reconciles matched state into durable storage without losing or
//! duplicating fills: a single-owner pipeline task coalesces repeated
//! order snapshots and flushes bounded batches to a [`TradeStore`].
//!
//! [`TradeStore`]: hermes_ports::TradeStore

pub mod batch;
pub mod memory;

pub use batch::{BatchConfig, PersistencePipeline, PipelineStats};
pub use memory::MemoryTradeStore;
