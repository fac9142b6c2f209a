use thiserror::Error;

/// Errors surfaced by durable store implementations
///
/// The core does not retry on these; redelivery policy belongs to the
/// caller's transport.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("internal store error: {0}")]
    Internal(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
