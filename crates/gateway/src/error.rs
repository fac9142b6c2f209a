//! Error types for the gateway crate

use thiserror::Error;

/// Transport-level errors
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Send failed: {0}")]
    Send(String),

    #[error("Channel closed")]
    ChannelClosed,

    #[error("No live subscribers")]
    NoSubscribers,
}

/// Gateway-level errors (decoding and message conversion)
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Message conversion error: {0}")]
    Conversion(String),
}

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;
