use thiserror::Error;

/// Errors that can occur while encoding, decoding or delivering session events.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("serialization error: {0}")]
    SerializationError(String),
    #[error("deserialization error: {0}")]
    DeserializationError(String),
    #[error("empty event payload")]
    EmptyPayload,
    #[error("event payload is not valid UTF-8")]
    InvalidUtf8,
    #[error("event sink closed: {0}")]
    SinkClosed(String),
}
