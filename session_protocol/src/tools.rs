use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// A function the AI session may call, declared with a JSON-schema parameter object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDeclaration {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// A single typed property of a tool's parameter object.
pub struct Param<'a> {
    pub name: &'a str,
    pub kind: &'a str,
    pub description: &'a str,
    pub required: bool,
}

impl<'a> Param<'a> {
    pub fn required(name: &'a str, kind: &'a str, description: &'a str) -> Self {
        Self {
            name,
            kind,
            description,
            required: true,
        }
    }

    pub fn optional(name: &'a str, kind: &'a str, description: &'a str) -> Self {
        Self {
            name,
            kind,
            description,
            required: false,
        }
    }
}

impl ToolDeclaration {
    /// Declares a function tool whose parameters form a flat object schema.
    pub fn function(name: &str, description: &str, params: &[Param]) -> Self {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in params {
            properties.insert(
                param.name.to_string(),
                json!({ "type": param.kind, "description": param.description }),
            );
            if param.required {
                required.push(Value::String(param.name.to_string()));
            }
        }

        Self {
            tool_type: "function".to_string(),
            name: name.to_string(),
            description: description.to_string(),
            parameters: json!({
                "type": "object",
                "properties": Value::Object(properties),
                "required": Value::Array(required),
            }),
        }
    }
}
