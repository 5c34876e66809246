//! Error types for the RouterOS client
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using RouterOsError
pub type Result<T> = std::result::Result<T, RouterOsError>;

/// Unified error type for RouterOS client operations
#[derive(Debug, Error)]
pub enum RouterOsError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connection closed by peer")]
    ConnectionClosed,

    #[error("Connection is broken by an earlier transport failure")]
    ConnectionBroken,

    // -------------------------------------------------------------------------
    // Framing Errors
    // -------------------------------------------------------------------------
    #[error("Incomplete word: expected {expected} bytes, read {read}")]
    Framing { expected: usize, read: usize },

    #[error("Invalid length prefix byte: 0x{0:02x}")]
    InvalidLengthPrefix(u8),

    #[error("Word too large: {len} bytes (max {max})")]
    WordTooLarge { len: u64, max: u64 },

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Login challenge missing from reply")]
    MissingChallenge,

    #[error("Invalid login challenge: {0}")]
    InvalidChallenge(#[from] hex::FromHexError),

    #[error("Login rejected: {0}")]
    LoginRejected(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("Key not found: {0}")]
    NotFound(String),

    // -------------------------------------------------------------------------
    // Lifecycle / Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Client is not connected")]
    NotConnected,

    #[error("Client is already connected")]
    AlreadyConnected,

    #[error("Client is closed")]
    Closed,

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl RouterOsError {
    /// True for reply lookups that leave the connection usable
    pub fn is_lookup(&self) -> bool {
        matches!(self, RouterOsError::NotFound(_))
    }

    /// True when the error leaves the connection unusable
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RouterOsError::Io(_)
                | RouterOsError::ConnectionClosed
                | RouterOsError::ConnectionBroken
                | RouterOsError::Framing { .. }
                | RouterOsError::InvalidLengthPrefix(_)
                | RouterOsError::WordTooLarge { .. }
        )
    }
}
