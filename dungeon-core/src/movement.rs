//! Movement between connected locations.
//!
//! [`attempt_move`] is the only code path that changes where the player is.
//! Every rejection is an ordinary [`MoveOutcome`] variant so callers can
//! report exactly why a move did not happen.

use crate::player::Player;
use crate::world::{Coordinates, Dungeon};
use serde::Serialize;
use std::fmt;

/// Result of a movement request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MoveOutcome {
    /// `player` now stands in `to`.
    Moved {
        player: String,
        from: String,
        to: String,
        coordinates: Coordinates,
    },
    /// The target id names no location.
    NoSuchRoom { target: String },
    /// The player is already in the target.
    AlreadyThere { room: String },
    /// The player's own location does not resolve.
    InvalidCurrentLocation { current: String },
    /// The current location has no edge to the target.
    NotConnected { target: String, current: String },
}

impl MoveOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, MoveOutcome::Moved { .. })
    }
}

impl fmt::Display for MoveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveOutcome::Moved {
                player,
                to,
                coordinates,
                ..
            } => write!(f, "Player {player} moved to {to} at coordinates {coordinates}"),
            MoveOutcome::NoSuchRoom { target } => write!(f, "Room '{target}' does not exist"),
            MoveOutcome::AlreadyThere { room } => {
                write!(f, "Player is already in room '{room}'")
            }
            MoveOutcome::InvalidCurrentLocation { current } => {
                write!(f, "Current player location '{current}' is invalid")
            }
            MoveOutcome::NotConnected { target, current } => write!(
                f,
                "Cannot move to '{target}' - not connected to current room '{current}'"
            ),
        }
    }
}

/// Try to move `player` to `target_id`.
///
/// Checks run in a fixed order and the first failure wins:
/// unknown target, already there, broken current location, missing edge.
/// On success the location and coordinates are written together.
pub fn attempt_move(dungeon: &Dungeon, player: &mut Player, target_id: &str) -> MoveOutcome {
    let Some(target) = dungeon.location(target_id) else {
        return MoveOutcome::NoSuchRoom {
            target: target_id.to_string(),
        };
    };

    if player.current_location == target_id {
        return MoveOutcome::AlreadyThere {
            room: target_id.to_string(),
        };
    }

    let Some(current) = dungeon.location(&player.current_location) else {
        return MoveOutcome::InvalidCurrentLocation {
            current: player.current_location.clone(),
        };
    };

    if !current.connects_to(target_id) {
        return MoveOutcome::NotConnected {
            target: target_id.to_string(),
            current: player.current_location.clone(),
        };
    }

    let from = std::mem::replace(&mut player.current_location, target.id.clone());
    player.coordinates = target.coordinates;

    MoveOutcome::Moved {
        player: player.name.clone(),
        from,
        to: target.id.clone(),
        coordinates: target.coordinates,
    }
}
