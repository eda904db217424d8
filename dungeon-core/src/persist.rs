//! Dungeon and player files.
//!
//! Files ending in `.json` are read and written as JSON, anything else as
//! YAML. A dungeon is validated on load and never written back; a player can
//! be saved and a sample player can be generated.

use crate::player::Player;
use crate::world::{Dungeon, DungeonError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use tokio::fs;

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid dungeon: {0}")]
    InvalidDungeon(#[from] DungeonError),
}

/// Default output path of [`generate_player_sample`] when none is given.
pub const SAMPLE_PLAYER_FILE: &str = "player_sample.yaml";

/// On-disk encoding of a dungeon or player file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Json,
}

impl FileFormat {
    /// Pick the format from the file extension, defaulting to YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => FileFormat::Json,
            _ => FileFormat::Yaml,
        }
    }

    fn decode<T: DeserializeOwned>(self, content: &str) -> Result<T, PersistError> {
        Ok(match self {
            FileFormat::Yaml => serde_yaml::from_str(content)?,
            FileFormat::Json => serde_json::from_str(content)?,
        })
    }

    fn encode<T: Serialize>(self, value: &T) -> Result<String, PersistError> {
        Ok(match self {
            FileFormat::Yaml => serde_yaml::to_string(value)?,
            FileFormat::Json => serde_json::to_string_pretty(value)?,
        })
    }
}

/// Parse and validate a dungeon definition.
///
/// Locations with an empty id take the key they are stored under. Hard
/// structural errors fail the load; out-of-bounds coordinates and an
/// unresolved entrance or exit are only logged.
pub fn parse_dungeon(content: &str, format: FileFormat) -> Result<Dungeon, PersistError> {
    let mut dungeon: Dungeon = format.decode(content)?;
    dungeon.fill_missing_ids();
    dungeon.validate()?;

    for location in dungeon.out_of_bounds() {
        tracing::warn!(
            location = %location.id,
            coordinates = %location.coordinates,
            width = dungeon.size.width,
            height = dungeon.size.height,
            "Location lies outside the map and will not be drawn"
        );
    }
    if dungeon.entrance().is_none() {
        tracing::warn!(entrance = %dungeon.entrance_room, "Entrance room does not resolve");
    }
    if dungeon.exit().is_none() {
        tracing::warn!(exit = %dungeon.exit_room, "Exit room does not resolve");
    }

    Ok(dungeon)
}

/// Load a dungeon from a YAML or JSON file.
pub async fn load_dungeon(path: impl AsRef<Path>) -> Result<Dungeon, PersistError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).await?;
    let dungeon = parse_dungeon(&content, FileFormat::from_path(path))?;

    tracing::info!(
        path = %path.display(),
        name = %dungeon.name,
        locations = dungeon.locations.len(),
        "Loaded dungeon"
    );
    Ok(dungeon)
}

/// Load a player from a YAML or JSON file.
pub async fn load_player(path: impl AsRef<Path>) -> Result<Player, PersistError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).await?;
    let player: Player = FileFormat::from_path(path).decode(&content)?;

    tracing::info!(path = %path.display(), name = %player.name, "Loaded player");
    Ok(player)
}

/// Save a player, encoded according to the file extension.
pub async fn save_player(player: &Player, path: impl AsRef<Path>) -> Result<(), PersistError> {
    let path = path.as_ref();
    let content = FileFormat::from_path(path).encode(player)?;
    fs::write(path, content).await?;
    Ok(())
}

/// Write [`Player::sample`] to `path` and return it.
pub async fn generate_player_sample(path: impl AsRef<Path>) -> Result<Player, PersistError> {
    let path = path.as_ref();
    let player = Player::sample();
    save_player(&player, path).await?;

    tracing::info!(path = %path.display(), "Generated sample player file");
    Ok(player)
}
