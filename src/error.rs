//! Simulation-specific error types.
//!
//! Nothing inside a tick returns an error: configuration problems are
//! downgraded to defaults by the loader and malformed peer messages are
//! dropped.  These types exist so the edges (config loading, message
//! decoding) can report *why* before the caller degrades gracefully.
//!
//! ## Usage
//!
//! ```rust
//! use skirmish::error::SimResult;
//! use skirmish::net::NetMessage;
//!
//! fn decode(payload: &str) -> SimResult<NetMessage> {
//!     NetMessage::decode(payload)
//! }
//! ```

use std::fmt;

/// Top-level error enum for the skirmish simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// The config file exists but could not be read.
    ConfigIo {
        /// Path that was attempted.
        path: String,
        /// OS-level reason.
        message: String,
    },

    /// The config document is not valid TOML.
    ConfigParse {
        /// Parser diagnostic.
        message: String,
    },

    /// An inbound peer payload could not be decoded.
    MalformedMessage {
        /// Decoder diagnostic.
        message: String,
    },

    /// A well-formed peer message arrived that this role never accepts
    /// (e.g. a world snapshot sent to the host).
    UnexpectedMessage {
        /// Message kind, for logging.
        kind: &'static str,
        /// Role that rejected it.
        role: &'static str,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::ConfigIo { path, message } => {
                write!(f, "failed to read config '{}': {}", path, message)
            }
            SimError::ConfigParse { message } => {
                write!(f, "failed to parse config: {}", message)
            }
            SimError::MalformedMessage { message } => {
                write!(f, "malformed peer message: {}", message)
            }
            SimError::UnexpectedMessage { kind, role } => {
                write!(f, "'{}' message is not accepted by the {}", kind, role)
            }
        }
    }
}

impl std::error::Error for SimError {}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;
