//! Error types for the protocol layer.
//!
//! The `Display` strings of the inbound-side variants are client-facing:
//! the dispatcher sends them verbatim inside `ERROR` events, so they must
//! stay stable.

/// Errors that can occur while encoding or decoding wire events.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The inbound frame is not valid JSON, or is JSON of the wrong
    /// shape (missing `event` tag, malformed `data` payload).
    #[error("Invalid message format")]
    InvalidFormat,

    /// The frame parsed cleanly but its `event` tag names no known kind.
    /// The offending tag is kept for logging, not for the client.
    #[error("Unknown event")]
    UnknownEvent {
        /// The unrecognized `event` tag as received.
        kind: String,
    },

    /// Serialization of an outbound event failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),
}
