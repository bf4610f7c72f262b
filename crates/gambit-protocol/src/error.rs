//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding wire messages.
///
/// A decode failure is the only way client text is rejected before it
/// reaches a game: the connection handler turns it into a
/// `MALFORMED_COMMAND` error for that one client.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust value into text).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, a missing or unknown
    /// `commandType`, missing fields, or an off-board square.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
