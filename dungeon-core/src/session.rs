//! GameSession - the state every tool call operates on.
//!
//! Holds the loaded dungeon and the one player for the lifetime of the
//! process. The dungeon is shared read-only; the player sits behind a mutex
//! so that a move validates and commits under a single lock.

use crate::map;
use crate::movement::{self, MoveOutcome};
use crate::persist::{self, PersistError};
use crate::player::Player;
use crate::world::{Dungeon, Location};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Errors from GameSession operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),
}

/// Where a session loads its state from.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Dungeon definition file.
    pub dungeon_file: PathBuf,

    /// Player file. The default player is used when absent.
    pub player_file: Option<PathBuf>,
}

impl SessionConfig {
    pub fn new(dungeon_file: impl Into<PathBuf>) -> Self {
        Self {
            dungeon_file: dungeon_file.into(),
            player_file: None,
        }
    }

    /// Set the player file.
    pub fn with_player_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.player_file = Some(path.into());
        self
    }
}

/// A running game: one dungeon, one player.
#[derive(Debug)]
pub struct GameSession {
    dungeon: Arc<Dungeon>,
    player: Mutex<Player>,
}

impl GameSession {
    /// Build a session and place the player at its location's coordinates.
    pub fn new(dungeon: Dungeon, mut player: Player) -> Self {
        if player.sync_coordinates(&dungeon) {
            tracing::info!(
                player = %player.name,
                location = %player.current_location,
                coordinates = %player.coordinates,
                "Placed player"
            );
        } else {
            tracing::warn!(
                player = %player.name,
                location = %player.current_location,
                "Player location not found in dungeon, coordinates left unchanged"
            );
        }

        Self {
            dungeon: Arc::new(dungeon),
            player: Mutex::new(player),
        }
    }

    /// Load the dungeon and player named by `config`.
    pub async fn load(config: &SessionConfig) -> Result<Self, SessionError> {
        let dungeon = persist::load_dungeon(&config.dungeon_file).await?;
        let player = match &config.player_file {
            Some(path) => persist::load_player(path).await?,
            None => {
                tracing::info!("No player file given, using default player");
                Player::default()
            }
        };
        Ok(Self::new(dungeon, player))
    }

    /// The shared world graph.
    pub fn dungeon(&self) -> &Arc<Dungeon> {
        &self.dungeon
    }

    fn lock_player(&self) -> MutexGuard<'_, Player> {
        // A panic while holding the lock cannot leave the player half
        // moved, so the poisoned state is still consistent.
        self.player.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up a location by id.
    pub fn room(&self, id: &str) -> Option<&Location> {
        self.dungeon.location(id)
    }

    /// Look up a location by coordinates; the first in id order wins.
    pub fn room_at(&self, x: i32, y: i32) -> Option<&Location> {
        self.dungeon.location_at(x, y)
    }

    /// Try to move the player to `target`.
    pub fn move_player(&self, target: &str) -> MoveOutcome {
        let mut player = self.lock_player();
        let outcome = movement::attempt_move(&self.dungeon, &mut player, target);

        if outcome.is_moved() {
            tracing::info!(player = %player.name, %outcome, "Player moved");
        } else {
            tracing::debug!(player = %player.name, %outcome, "Move rejected");
        }
        outcome
    }

    /// Snapshot of the player.
    pub fn player_status(&self) -> Player {
        self.lock_player().clone()
    }

    /// Render the ASCII map for the current state.
    pub fn render_map(&self) -> String {
        let player = self.lock_player();
        map::render_map(&self.dungeon, &player)
    }

    /// Write the current player to `path`.
    pub async fn save_player(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let player = self.player_status();
        persist::save_player(&player, path).await?;
        Ok(())
    }
}
