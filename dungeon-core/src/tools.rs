//! Dungeon tools exposed to the caller.
//!
//! Every tool has a typed request struct. `#[derive(Tool)]` turns the struct
//! into the advertised definition and serde turns the caller's arguments
//! into the struct, so malformed input is rejected before any game state is
//! touched.

use crate::dice::DicePool;
use crate::session::GameSession;
use crate::Tool;
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};
use thiserror::Error;

/// Upper bound on dice per roll.
pub const MAX_DICE: i64 = 1000;

// ============================================================================
// Definitions
// ============================================================================

/// A tool as advertised to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
    #[serde(rename = "annotations", serialize_with = "serialize_annotations")]
    pub read_only: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolAnnotations {
    read_only_hint: bool,
}

fn serialize_annotations<S: Serializer>(read_only: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    ToolAnnotations {
        read_only_hint: *read_only,
    }
    .serialize(serializer)
}

/// Say hello to the user.
#[derive(Debug, Clone, PartialEq, Tool, Deserialize)]
#[tool(name = "say_hello", read_only)]
pub struct SayHello {
    /// The name of the user to greet.
    pub name: String,
}

/// Get detailed information about a room by its name/ID.
#[derive(Debug, Clone, PartialEq, Tool, Deserialize)]
#[tool(name = "get_room_details_by_name", read_only)]
pub struct GetRoomByName {
    /// The name/ID of the room to get details for.
    pub room_name: String,
}

/// Get detailed information about a room by its coordinates.
#[derive(Debug, Clone, PartialEq, Tool, Deserialize)]
#[tool(name = "get_room_details_by_coordinates", read_only)]
pub struct GetRoomByCoordinates {
    /// The X coordinate of the room.
    #[serde(deserialize_with = "whole_number")]
    pub x: i32,
    /// The Y coordinate of the room.
    #[serde(deserialize_with = "whole_number")]
    pub y: i32,
}

/// Move the player to a specified room by name. Only allows movement to connected rooms.
#[derive(Debug, Clone, PartialEq, Tool, Deserialize)]
#[tool(name = "move_to_room_by_name")]
pub struct MoveToRoom {
    /// The name/ID of the room to move to.
    pub target_room: String,
}

/// Get the current status and information of the player.
#[derive(Debug, Clone, PartialEq, Tool, Deserialize)]
#[tool(name = "get_player_status", read_only)]
pub struct GetPlayerStatus {}

/// Display an ASCII map of the entire dungeon showing rooms, corridors, and the player's current position.
#[derive(Debug, Clone, PartialEq, Tool, Deserialize)]
#[tool(name = "display_dungeon_map", read_only)]
pub struct DisplayDungeonMap {}

/// Roll dices and return the sum of their faces.
#[derive(Debug, Clone, PartialEq, Tool, Deserialize)]
#[tool(name = "roll_dices", read_only)]
pub struct RollDices {
    /// Number of dices to roll. Defaults to 1.
    #[serde(default, deserialize_with = "optional_whole_number")]
    pub nb_dices: Option<i64>,
    /// Number of sides of each dice. Defaults to 6.
    #[serde(default, deserialize_with = "optional_whole_number")]
    pub nb_sides: Option<i64>,
    /// Dice notation such as "3d6". Takes precedence over the counts.
    pub notation: Option<String>,
}

impl RollDices {
    /// Resolve the requested pool, applying defaults and the dice limit.
    pub fn pool(&self) -> Result<DicePool, ToolError> {
        let pool = match &self.notation {
            Some(notation) => DicePool::parse(notation).map_err(|e| ToolError::InvalidParameters {
                tool: Self::tool_name().to_string(),
                message: e.to_string(),
            })?,
            None => DicePool::new(self.nb_dices.unwrap_or(1), self.nb_sides.unwrap_or(6)),
        };

        if pool.count > MAX_DICE {
            return Err(ToolError::InvalidParameters {
                tool: Self::tool_name().to_string(),
                message: format!("nb_dices must be at most {MAX_DICE}, got {}", pool.count),
            });
        }
        Ok(pool)
    }
}

// Clients may send integral floats such as `1.0` for integer parameters.
fn whole_number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let number = Number::deserialize(deserializer)?;
    integral(&number)
}

fn optional_whole_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    Option::<Number>::deserialize(deserializer)?
        .map(|number| integral(&number))
        .transpose()
}

fn integral<T: TryFrom<i64>, E: de::Error>(number: &Number) -> Result<T, E> {
    let whole = number.as_i64().or_else(|| {
        number
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    });
    let whole = whole.ok_or_else(|| E::custom(format!("expected a whole number, got {number}")))?;
    T::try_from(whole).map_err(|_| E::custom(format!("{whole} is out of range")))
}

/// Collection of dungeon tools.
pub struct DungeonTools;

impl DungeonTools {
    /// All tool definitions, in advertised order.
    pub fn all() -> Vec<ToolDefinition> {
        vec![
            SayHello::as_tool(),
            GetRoomByName::as_tool(),
            GetRoomByCoordinates::as_tool(),
            MoveToRoom::as_tool(),
            GetPlayerStatus::as_tool(),
            DisplayDungeonMap::as_tool(),
            RollDices::as_tool(),
        ]
    }
}

// ============================================================================
// Calls
// ============================================================================

/// Errors raised before a tool runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Missing required parameter: {parameter}")]
    MissingParameter { tool: String, parameter: String },

    #[error("Invalid parameters for {tool}: {message}")]
    InvalidParameters { tool: String, message: String },
}

/// A validated tool invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    SayHello(SayHello),
    GetRoomByName(GetRoomByName),
    GetRoomByCoordinates(GetRoomByCoordinates),
    MoveToRoom(MoveToRoom),
    GetPlayerStatus(GetPlayerStatus),
    DisplayDungeonMap(DisplayDungeonMap),
    RollDices(RollDices),
}

impl ToolCall {
    /// Validate `arguments` for the tool called `name`.
    ///
    /// Absent (`null`) arguments are treated as an empty object.
    pub fn parse(name: &str, arguments: Value) -> Result<Self, ToolError> {
        let arguments = match arguments {
            Value::Null => Value::Object(serde_json::Map::new()),
            other => other,
        };

        let call = match name {
            "say_hello" => ToolCall::SayHello(decode(name, arguments)?),
            "get_room_details_by_name" => ToolCall::GetRoomByName(decode(name, arguments)?),
            "get_room_details_by_coordinates" => {
                ToolCall::GetRoomByCoordinates(decode(name, arguments)?)
            }
            "move_to_room_by_name" => ToolCall::MoveToRoom(decode(name, arguments)?),
            "get_player_status" => ToolCall::GetPlayerStatus(decode(name, arguments)?),
            "display_dungeon_map" => ToolCall::DisplayDungeonMap(decode(name, arguments)?),
            "roll_dices" => {
                let request: RollDices = decode(name, arguments)?;
                request.pool()?;
                ToolCall::RollDices(request)
            }
            _ => return Err(ToolError::UnknownTool(name.to_string())),
        };
        Ok(call)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::SayHello(_) => SayHello::tool_name(),
            ToolCall::GetRoomByName(_) => GetRoomByName::tool_name(),
            ToolCall::GetRoomByCoordinates(_) => GetRoomByCoordinates::tool_name(),
            ToolCall::MoveToRoom(_) => MoveToRoom::tool_name(),
            ToolCall::GetPlayerStatus(_) => GetPlayerStatus::tool_name(),
            ToolCall::DisplayDungeonMap(_) => DisplayDungeonMap::tool_name(),
            ToolCall::RollDices(_) => RollDices::tool_name(),
        }
    }
}

fn decode<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, ToolError> {
    // Serde would otherwise fill struct fields from an array by position
    if !arguments.is_object() {
        return Err(ToolError::InvalidParameters {
            tool: tool.to_string(),
            message: format!("arguments must be an object, got {arguments}"),
        });
    }

    serde_json::from_value(arguments).map_err(|e| {
        let message = e.to_string();
        match missing_field(&message) {
            Some(parameter) => ToolError::MissingParameter {
                tool: tool.to_string(),
                parameter: parameter.to_string(),
            },
            None => ToolError::InvalidParameters {
                tool: tool.to_string(),
                message,
            },
        }
    })
}

/// Field name out of serde's "missing field `x`" message.
fn missing_field(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("missing field `")?;
    rest.split('`').next()
}

// ============================================================================
// Execution
// ============================================================================

/// Text result of a tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Run a validated call against the session.
pub fn execute_tool(session: &GameSession, call: ToolCall) -> ToolOutput {
    tracing::info!(tool = call.name(), "Tool called");

    match call {
        ToolCall::SayHello(request) => ToolOutput::text(format!("👋 Hello {} 🙂", request.name)),

        ToolCall::GetRoomByName(request) => match session.room(&request.room_name) {
            Some(location) => pretty_json(location, "room"),
            None => ToolOutput::text(format!("Room '{}' not found", request.room_name)),
        },

        ToolCall::GetRoomByCoordinates(request) => match session.room_at(request.x, request.y) {
            Some(location) => pretty_json(location, "room"),
            None => ToolOutput::text(format!(
                "No room found at coordinates [{}, {}]",
                request.x, request.y
            )),
        },

        ToolCall::MoveToRoom(request) => {
            ToolOutput::text(session.move_player(&request.target_room).to_string())
        }

        ToolCall::GetPlayerStatus(_) => pretty_json(&session.player_status(), "player"),

        ToolCall::DisplayDungeonMap(_) => ToolOutput::text(session.render_map()),

        ToolCall::RollDices(request) => match request.pool() {
            Ok(pool) => {
                tracing::info!(dice = pool.count, sides = pool.sides, "Rolling dice");
                let total = pool.roll();
                ToolOutput::text(format!(
                    "Result: {} dices with {} sides: {total}",
                    pool.count, pool.sides
                ))
            }
            Err(e) => ToolOutput::error(e.to_string()),
        },
    }
}

fn pretty_json<T: Serialize>(value: &T, what: &str) -> ToolOutput {
    match serde_json::to_string_pretty(value) {
        Ok(json) => ToolOutput::text(json),
        Err(e) => ToolOutput::error(format!("Error serializing {what} data: {e}")),
    }
}
