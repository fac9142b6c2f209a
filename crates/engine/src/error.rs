use thiserror::Error;

/// Errors from the order-book store
#[derive(Error, Debug)]
pub enum BookError {
    /// A stored entry (or an order being stored) failed to round-trip
    /// through its serialized form
    #[error("book entry codec failure: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("cannot rest order {0}: no unfilled quantity")]
    NoRestingQuantity(String),

    #[error("cannot rest order {0}: no limit price")]
    MissingPrice(String),
}

pub type BookResult<T> = std::result::Result<T, BookError>;

/// Errors from the matching engine
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("order book error: {0}")]
    Book(#[from] BookError),

    /// A state the matching algorithm should have made impossible
    #[error("invariant violation: {0}")]
    Invariant(String),

    #[error("order {0} has no limit price")]
    MissingPrice(String),

    #[error("channel closed: {0}")]
    ChannelClosed(String),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
