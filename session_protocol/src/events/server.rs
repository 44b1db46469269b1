use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{decode_json, encode_json};
use crate::{errors::ProtocolError, Serializable};

/// An event delivered by the AI session, discriminated by its `type` field.
///
/// Only the event types the panel reacts to are modelled; every other type
/// decodes to [`ServerEvent::Other`] so unknown traffic never breaks the stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    #[serde(rename = "session.created")]
    SessionCreated {
        #[serde(default)]
        session: Value,
    },
    #[serde(rename = "session.updated")]
    SessionUpdated {
        #[serde(default)]
        session: Value,
    },
    #[serde(rename = "response.done")]
    ResponseDone { response: Response },
    #[serde(rename = "error")]
    Error { error: SessionError },
    #[serde(other)]
    Other,
}

/// A completed model response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Response {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub output: Vec<OutputItem>,
}

/// One entry of a response's output list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutputItem {
    #[serde(rename = "function_call")]
    FunctionCall(FunctionCall),
    #[serde(other)]
    Other,
}

/// A request from the model to run one of the registered tools.
///
/// `arguments` is the JSON-encoded argument object exactly as the session sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub call_id: String,
    #[serde(default)]
    pub arguments: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionError {
    #[serde(default)]
    pub message: String,
}

impl FunctionCall {
    pub fn new(name: &str, call_id: &str, arguments: &str) -> Self {
        Self {
            name: name.to_string(),
            call_id: call_id.to_string(),
            arguments: arguments.to_string(),
        }
    }
}

impl ServerEvent {
    /// Returns the function calls carried by a `response.done` event, in output order.
    pub fn function_calls(&self) -> Vec<&FunctionCall> {
        match self {
            ServerEvent::ResponseDone { response } => response
                .output
                .iter()
                .filter_map(|item| match item {
                    OutputItem::FunctionCall(call) => Some(call),
                    OutputItem::Other => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Builds a `response.done` event from a list of function calls.
    pub fn response_with_calls(calls: Vec<FunctionCall>) -> Self {
        ServerEvent::ResponseDone {
            response: Response {
                id: None,
                output: calls.into_iter().map(OutputItem::FunctionCall).collect(),
            },
        }
    }

    pub fn session_created() -> Self {
        ServerEvent::SessionCreated {
            session: Value::Null,
        }
    }
}

impl Serializable for ServerEvent {
    fn to_bytes(&self) -> Result<Vec<u8>, ProtocolError> {
        encode_json(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, ProtocolError> {
        decode_json(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_session_created() {
        let bytes = br#"{"type":"session.created","event_id":"evt_1","session":{"id":"sess_1"}}"#;
        let event = ServerEvent::from_bytes(bytes).unwrap();

        assert!(matches!(event, ServerEvent::SessionCreated { .. }));
    }

    #[test]
    fn decodes_function_calls_from_response_done() {
        let bytes = br#"{
            "type": "response.done",
            "response": {
                "id": "resp_1",
                "output": [
                    {"type": "message", "role": "assistant", "content": []},
                    {"type": "function_call", "name": "fly_to_location", "call_id": "call_1",
                     "arguments": "{\"longitude\":-122.42,\"latitude\":37.77}"},
                    {"type": "function_call", "name": "clear_markers", "call_id": "call_2", "arguments": "{}"}
                ]
            }
        }"#;

        let event = ServerEvent::from_bytes(bytes).unwrap();
        let calls = event.function_calls();

        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].name, "fly_to_location");
        assert_eq!(calls[0].call_id, "call_1");
        assert_eq!(calls[0].arguments, r#"{"longitude":-122.42,"latitude":37.77}"#);
        assert_eq!(calls[1].name, "clear_markers");
    }

    #[test]
    fn unknown_event_types_decode_as_other() {
        let event =
            ServerEvent::from_bytes(br#"{"type":"response.audio.delta","delta":"AAA="}"#).unwrap();

        assert_eq!(event, ServerEvent::Other);
        assert!(event.function_calls().is_empty());
    }

    #[test]
    fn decodes_error_event() {
        let event =
            ServerEvent::from_bytes(br#"{"type":"error","error":{"message":"bad request"}}"#)
                .unwrap();

        match event {
            ServerEvent::Error { error } => assert_eq!(error.message, "bad request"),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn rejects_empty_and_malformed_payloads() {
        assert!(matches!(
            ServerEvent::from_bytes(b"  \n"),
            Err(ProtocolError::EmptyPayload)
        ));
        assert!(matches!(
            ServerEvent::from_bytes(b"{not json"),
            Err(ProtocolError::DeserializationError(_))
        ));
        assert!(matches!(
            ServerEvent::from_bytes(&[0xff, 0xfe]),
            Err(ProtocolError::InvalidUtf8)
        ));
    }
}
