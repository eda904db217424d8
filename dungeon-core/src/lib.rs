//! Dungeon crawling engine behind the `mcp-dungeon` tool server.
//!
//! This crate provides:
//! - The static world graph and its YAML/JSON loader
//! - A single player and the movement validator that moves it
//! - An ASCII map renderer
//! - A dice roller
//! - Typed tool requests and their dispatch against a [`GameSession`]
//!
//! # Quick Start
//!
//! ```ignore
//! use dungeon_core::{execute_tool, GameSession, SessionConfig, ToolCall};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SessionConfig::new("data/crystal_caverns.yaml");
//!     let session = GameSession::load(&config).await?;
//!
//!     let call = ToolCall::parse("move_to_room_by_name", serde_json::json!({
//!         "target_room": "north_passage"
//!     }))?;
//!     println!("{}", execute_tool(&session, call).text);
//!     println!("{}", session.render_map());
//!     Ok(())
//! }
//! ```

// Lets `#[derive(Tool)]` output name `::dungeon_core` from inside this crate.
extern crate self as dungeon_core;

pub mod dice;
pub mod map;
pub mod movement;
pub mod persist;
pub mod player;
pub mod session;
pub mod testing;
pub mod tools;
pub mod world;

// Re-export for convenience
pub use dungeon_macros::Tool;

// Primary public API
pub use dice::{DiceError, DicePool};
pub use map::{render_map, MapSymbol};
pub use movement::{attempt_move, MoveOutcome};
pub use persist::PersistError;
pub use player::Player;
pub use session::{GameSession, SessionConfig, SessionError};
pub use tools::{execute_tool, DungeonTools, ToolCall, ToolDefinition, ToolError, ToolOutput};
pub use world::{Coordinates, Dungeon, DungeonError, Location, LocationType, Size};
