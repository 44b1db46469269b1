pub mod client;
pub mod server;

use crate::errors::ProtocolError;

/// Decodes a single JSON event, ignoring surrounding whitespace and the line terminator.
pub(crate) fn decode_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, ProtocolError> {
    let text = std::str::from_utf8(bytes).map_err(|_| ProtocolError::InvalidUtf8)?;
    let text = text.trim();
    if text.is_empty() {
        return Err(ProtocolError::EmptyPayload);
    }

    serde_json::from_str(text).map_err(|e| ProtocolError::DeserializationError(e.to_string()))
}

pub(crate) fn encode_json<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, ProtocolError> {
    serde_json::to_vec(value).map_err(|e| ProtocolError::SerializationError(e.to_string()))
}
