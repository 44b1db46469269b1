use serde::{Deserialize, Serialize};

use super::{decode_json, encode_json};
use crate::{errors::ProtocolError, tools::ToolDeclaration, Serializable};

/// An event sent from the panel to the AI session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    /// Declares the callable tools and the operating instructions.
    #[serde(rename = "session.update")]
    SessionUpdate { session: SessionConfig },
    /// Adds an item to the conversation: a user context message or a tool result.
    #[serde(rename = "conversation.item.create")]
    ConversationItemCreate { item: ConversationItem },
    /// Asks the session to continue generating a response.
    #[serde(rename = "response.create")]
    ResponseCreate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub instructions: String,
    pub tools: Vec<ToolDeclaration>,
    pub tool_choice: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConversationItem {
    #[serde(rename = "message")]
    Message {
        role: String,
        content: Vec<ContentPart>,
    },
    #[serde(rename = "function_call_output")]
    FunctionCallOutput { call_id: String, output: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentPart {
    #[serde(rename = "input_text")]
    InputText { text: String },
}

impl ClientEvent {
    pub fn session_update(instructions: &str, tools: Vec<ToolDeclaration>) -> Self {
        ClientEvent::SessionUpdate {
            session: SessionConfig {
                instructions: instructions.to_string(),
                tools,
                tool_choice: "auto".to_string(),
            },
        }
    }

    /// A free-text message attributed to the user.
    pub fn user_text(text: &str) -> Self {
        ClientEvent::ConversationItemCreate {
            item: ConversationItem::Message {
                role: "user".to_string(),
                content: vec![ContentPart::InputText {
                    text: text.to_string(),
                }],
            },
        }
    }

    /// The JSON-encoded result of the function call identified by `call_id`.
    pub fn function_output(call_id: &str, output: String) -> Self {
        ClientEvent::ConversationItemCreate {
            item: ConversationItem::FunctionCallOutput {
                call_id: call_id.to_string(),
                output,
            },
        }
    }

    /// Text of a user message, if this event is one.
    pub fn user_text_content(&self) -> Option<&str> {
        match self {
            ClientEvent::ConversationItemCreate {
                item: ConversationItem::Message { content, .. },
            } => content.iter().map(|ContentPart::InputText { text }| text.as_str()).next(),
            _ => None,
        }
    }

    /// Correlation id and output of a function result, if this event is one.
    pub fn function_output_parts(&self) -> Option<(&str, &str)> {
        match self {
            ClientEvent::ConversationItemCreate {
                item: ConversationItem::FunctionCallOutput { call_id, output },
            } => Some((call_id.as_str(), output.as_str())),
            _ => None,
        }
    }
}

impl Serializable for ClientEvent {
    fn to_bytes(&self) -> Result<Vec<u8>, ProtocolError> {
        encode_json(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, ProtocolError> {
        decode_json(bytes)
    }
}
