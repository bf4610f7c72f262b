//! Codec trait and implementations for turning messages into text frames.
//!
//! The transport moves opaque text; the codec decides what that text looks
//! like. Everything above the codec works with typed values only.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes Rust values to text frames and decodes them back.
///
/// `Send + Sync + 'static` because one codec instance is shared by every
/// connection task the server spawns.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into one text frame.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if the value cannot be represented
    /// in this format.
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError>;

    /// Parses one text frame.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the text is malformed or does not
    /// match `T`.
    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// Behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use gambit_protocol::{Codec, Command, CommandEnvelope, GameId, JsonCodec};
///
/// let codec = JsonCodec;
/// let text = r#"{"commandType":"LEAVE","authToken":"t","gameID":9}"#;
///
/// let envelope: CommandEnvelope = codec.decode(text).unwrap();
/// assert_eq!(envelope.game_id, GameId(9));
/// assert_eq!(envelope.command, Command::Leave);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{CommandEnvelope, ErrorKind, ServerMessage};

    #[test]
    fn test_json_codec_encodes_server_message() {
        let text = JsonCodec
            .encode(&ServerMessage::error(ErrorKind::GameOver, "game is over"))
            .unwrap();
        assert!(text.contains("\"serverMessageType\":\"ERROR\""));
        assert!(text.contains("\"kind\":\"GAME_OVER\""));
    }

    #[test]
    fn test_json_codec_decode_garbage_is_decode_error() {
        let result: Result<CommandEnvelope, _> = JsonCodec.decode("not json at all");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_json_codec_decode_missing_field_is_decode_error() {
        let result: Result<CommandEnvelope, _> =
            JsonCodec.decode(r#"{"commandType":"CONNECT","gameID":1}"#);
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }
}
