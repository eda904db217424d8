//! The single adventurer exploring the dungeon.

use crate::world::{Coordinates, Dungeon, Item};
use serde::{Deserialize, Serialize};

/// Location a freshly created player starts in.
pub const DEFAULT_START: &str = "entrance_cave";

/// Player state.
///
/// `coordinates` mirrors the coordinates of `current_location` and is only
/// ever written together with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    /// Archetype tag such as "warrior" or "adventurer".
    #[serde(rename = "type", default)]
    pub archetype: String,
    #[serde(default)]
    pub level: i32,
    #[serde(default)]
    pub hit_points: i32,
    #[serde(default)]
    pub max_hit_points: i32,
    #[serde(default)]
    pub attack_power: i32,
    #[serde(default)]
    pub defense: i32,
    #[serde(default)]
    pub experience: i32,
    #[serde(default)]
    pub gold: i32,
    pub current_location: String,
    #[serde(default)]
    pub coordinates: Coordinates,
    #[serde(default)]
    pub inventory: Vec<Item>,
    #[serde(default)]
    pub status: String,
}

impl Player {
    /// Create a player with zeroed stats standing in `location`.
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            avatar: String::new(),
            archetype: String::new(),
            level: 0,
            hit_points: 0,
            max_hit_points: 0,
            attack_power: 0,
            defense: 0,
            experience: 0,
            gold: 0,
            current_location: location.into(),
            coordinates: Coordinates::default(),
            inventory: Vec::new(),
            status: String::new(),
        }
    }

    /// A fully statted warrior, written out by `--generate-player`.
    pub fn sample() -> Self {
        Self {
            name: "Hero".to_string(),
            avatar: "🗡️".to_string(),
            archetype: "warrior".to_string(),
            level: 1,
            hit_points: 100,
            max_hit_points: 100,
            attack_power: 15,
            defense: 10,
            experience: 0,
            gold: 50,
            current_location: DEFAULT_START.to_string(),
            coordinates: Coordinates::new(0, 0),
            inventory: vec![Item::new("potion", 2).with_healing(25)],
            status: "healthy".to_string(),
        }
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = avatar.into();
        self
    }

    pub fn with_archetype(mut self, archetype: impl Into<String>) -> Self {
        self.archetype = archetype.into();
        self
    }

    /// Copy the coordinates of the current location into the player.
    ///
    /// Returns `false` and leaves the player untouched when the current
    /// location does not exist in `dungeon`.
    pub fn sync_coordinates(&mut self, dungeon: &Dungeon) -> bool {
        match dungeon.location(&self.current_location) {
            Some(location) => {
                self.coordinates = location.coordinates;
                true
            }
            None => false,
        }
    }
}

/// Used when no player file is given.
impl Default for Player {
    fn default() -> Self {
        Player::new("Bob", DEFAULT_START)
            .with_avatar("😝")
            .with_archetype("adventurer")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::crystal_caverns;

    #[test]
    fn test_default_player() {
        let player = Player::default();
        assert_eq!(player.name, "Bob");
        assert_eq!(player.archetype, "adventurer");
        assert_eq!(player.current_location, DEFAULT_START);
        assert!(player.inventory.is_empty());
    }

    #[test]
    fn test_sample_player_carries_potions() {
        let player = Player::sample();
        assert_eq!(player.level, 1);
        assert_eq!(player.inventory.len(), 1);
        assert_eq!(player.inventory[0].healing_level, 25);
        assert_eq!(player.inventory[0].quantity, 2);
    }

    #[test]
    fn test_archetype_serializes_as_type() {
        let value = serde_json::to_value(Player::default()).unwrap();
        assert_eq!(value["type"], "adventurer");
        assert_eq!(value["coordinates"], serde_json::json!([0, 0]));
    }

    #[test]
    fn test_sync_coordinates() {
        let dungeon = crystal_caverns();
        let mut player = Player::new("Scout", "crystal_hall");

        assert!(player.sync_coordinates(&dungeon));
        assert_eq!(
            player.coordinates,
            dungeon.location("crystal_hall").unwrap().coordinates
        );
    }

    #[test]
    fn test_sync_coordinates_unknown_location_is_noop() {
        let dungeon = crystal_caverns();
        let mut player = Player::new("Lost", "the_void");
        player.coordinates = Coordinates::new(7, 7);

        assert!(!player.sync_coordinates(&dungeon));
        assert_eq!(player.coordinates, Coordinates::new(7, 7));
    }
}
