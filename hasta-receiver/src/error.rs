//! Error types for the hasta receiver
//!
//! Only setup can fail. Datagram problems are counted in
//! [`ReceiverStats`](crate::ReceiverStats) and never surface here.

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Receiver error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// UDP socket could not be bound
    #[error("Failed to bind UDP socket to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Config file could not be parsed
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Config could not be serialized
    #[error("Config write error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}
