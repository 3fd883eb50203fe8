//! Error types for the Lightify client
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using LightifyError
pub type Result<T> = std::result::Result<T, LightifyError>;

/// Unified error type for Lightify operations
#[derive(Debug, Error)]
pub enum LightifyError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to connect to bridge at {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Frame read error: {0}")]
    FrameRead(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Correlation Errors
    // -------------------------------------------------------------------------
    #[error("No pending request for correlation id {0}")]
    UnmatchedCorrelationId(u32),

    #[error("Timed out after {waited_ms} ms waiting for reply to request {correlation_id}")]
    Timeout { correlation_id: u32, waited_ms: u64 },

    #[error("Too many pending requests (max {0})")]
    TooManyPending(usize),

    #[error("Connection to bridge is closed")]
    ConnectionClosed,

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    // -------------------------------------------------------------------------
    // Input / Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
