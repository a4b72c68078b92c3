//! Error types for the hasta wire codec

use crate::types::Side;

/// Result type alias
pub type Result<T> = std::result::Result<T, WireError>;

/// Reasons a datagram could not be decoded.
///
/// All of these are recoverable: the receiver drops the datagram and keeps
/// its previous hand state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WireError {
    /// Payload bytes are not UTF-8
    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Token count is not one or two whole hand groups
    #[error("expected 8 or 16 fields, got {count}")]
    TokenCount {
        /// Number of non-trailing tokens in the payload
        count: usize,
    },

    /// A numeric field failed to parse or was not finite
    #[error("invalid number: {0:?}")]
    InvalidNumber(String),

    /// The same side appeared twice in one datagram
    #[error("{0} hand appears twice in one message")]
    DuplicateSide(Side),
}
