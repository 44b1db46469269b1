use errors::ProtocolError;

pub mod errors;
pub mod events;
pub mod sink;
pub mod tools;

pub use events::client::{ClientEvent, ContentPart, ConversationItem, SessionConfig};
pub use events::server::{FunctionCall, OutputItem, Response, ServerEvent, SessionError};
pub use sink::EventSink;
pub use tools::{Param, ToolDeclaration};

/// Encoding of a session event as it travels over the transport.
///
/// Events are JSON objects; framing (one event per line) is the caller's concern.
pub trait Serializable {
    fn to_bytes(&self) -> std::result::Result<Vec<u8>, ProtocolError>;

    fn from_bytes(bytes: &[u8]) -> std::result::Result<Self, ProtocolError>
    where
        Self: Sized;
}
