//! Hermes Ports
//!
//! Port definitions (traits) for the Hermes matching core.
//! These define the boundaries between the matching engine and the
//! infrastructure it collaborates with: the external ID issuer and the
//! durable order/trade store.

mod error;
mod sequence;
mod store;

pub use error::{StoreError, StoreResult};
pub use sequence::SequenceSource;
pub use store::TradeStore;
