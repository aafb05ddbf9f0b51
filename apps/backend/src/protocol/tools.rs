//! The typed tool set exposed through `tools/list` and `tools/call`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::AppError;
use crate::errors::domain::DomainError;
use crate::services::{GameCoordinator, PlayerStatus};

pub const REGISTER_PLAYER: &str = "register_player";
pub const GET_STATUS: &str = "get_status";
pub const SEND_MESSAGE: &str = "send_message";
pub const REGISTER_SUPPORT: &str = "register_support";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterPlayerArgs {
    pub player_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GetStatusArgs {
    pub private_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SendMessageArgs {
    pub private_id: String,
    pub recipient_player_name: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterSupportArgs {
    pub private_id: String,
    pub player_to_support: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    RegisterPlayer(RegisterPlayerArgs),
    GetStatus(GetStatusArgs),
    SendMessage(SendMessageArgs),
    RegisterSupport(RegisterSupportArgs),
}

/// `tools/call` params before the tool name is resolved.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ToolCallError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: &'static str, reason: String },
}

fn decode<T: DeserializeOwned>(tool: &'static str, arguments: Value) -> Result<T, ToolCallError> {
    serde_json::from_value(arguments).map_err(|e| ToolCallError::InvalidArguments {
        tool,
        reason: e.to_string(),
    })
}

impl ToolCall {
    pub fn parse(name: &str, arguments: Option<Value>) -> Result<Self, ToolCallError> {
        let arguments = match arguments {
            Some(Value::Null) | None => Value::Object(serde_json::Map::new()),
            Some(args) => args,
        };
        match name {
            REGISTER_PLAYER => Ok(Self::RegisterPlayer(decode(REGISTER_PLAYER, arguments)?)),
            GET_STATUS => Ok(Self::GetStatus(decode(GET_STATUS, arguments)?)),
            SEND_MESSAGE => Ok(Self::SendMessage(decode(SEND_MESSAGE, arguments)?)),
            REGISTER_SUPPORT => Ok(Self::RegisterSupport(decode(REGISTER_SUPPORT, arguments)?)),
            other => Err(ToolCallError::UnknownTool(other.to_owned())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::RegisterPlayer(_) => REGISTER_PLAYER,
            Self::GetStatus(_) => GET_STATUS,
            Self::SendMessage(_) => SEND_MESSAGE,
            Self::RegisterSupport(_) => REGISTER_SUPPORT,
        }
    }

    pub fn execute(&self, game: &GameCoordinator) -> Result<PlayerStatus, DomainError> {
        match self {
            Self::RegisterPlayer(args) => game.register_player(&args.player_name),
            Self::GetStatus(args) => game.get_status(&args.private_id),
            Self::SendMessage(args) => {
                game.send_message(&args.private_id, &args.recipient_player_name, &args.message)
            }
            Self::RegisterSupport(args) => {
                game.register_support(&args.private_id, &args.player_to_support)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

fn string_props(props: &[(&str, &str)]) -> Value {
    let properties: serde_json::Map<String, Value> = props
        .iter()
        .map(|(name, description)| {
            (
                (*name).to_owned(),
                json!({"type": "string", "description": description}),
            )
        })
        .collect();
    let required: Vec<&str> = props.iter().map(|(name, _)| *name).collect();
    json!({"type": "object", "properties": properties, "required": required})
}

pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: REGISTER_PLAYER,
            description: "Register your agent to join the Alliance negotiation game.",
            input_schema: string_props(&[("player_name", "Your unique player name")]),
        },
        ToolDefinition {
            name: GET_STATUS,
            description: "Get your current game status and the state of the game.",
            input_schema: string_props(&[(
                "private_id",
                "Your private ID from register_player()",
            )]),
        },
        ToolDefinition {
            name: SEND_MESSAGE,
            description: "Send a private message to another player to negotiate alliances.",
            input_schema: string_props(&[
                ("private_id", "Your private ID"),
                ("recipient_player_name", "Name of the player to send the message to"),
                ("message", "Your message text"),
            ]),
        },
        ToolDefinition {
            name: REGISTER_SUPPORT,
            description: "Choose which player to support this round.",
            input_schema: string_props(&[
                ("private_id", "Your private ID"),
                ("player_to_support", "Name of the player you want to support"),
            ]),
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolContent {
    Json { json: Value },
    Text { text: String },
}

/// Body of a `tools/call` result. Tool failures travel here with
/// `is_error` set, not as JSON-RPC errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    pub is_error: bool,
}

impl ToolResult {
    pub fn success<T: Serialize>(payload: &T) -> Result<Self, serde_json::Error> {
        let json = serde_json::to_value(payload)?;
        let text = serde_json::to_string_pretty(&json)?;
        Ok(Self {
            content: vec![ToolContent::Json { json }, ToolContent::Text { text }],
            is_error: false,
        })
    }

    pub fn failure(err: &AppError) -> Self {
        Self {
            content: vec![
                ToolContent::Text {
                    text: format!("Error: {}", err.detail()),
                },
                ToolContent::Json {
                    json: json!({"code": err.code(), "detail": err.detail()}),
                },
            ],
            is_error: true,
        }
    }
}
