//! Dungeon world types.
//!
//! Contains the static world graph: locations with their coordinates,
//! occupants and outgoing connections, plus the dungeon that owns them.
//! The graph is built once at load time and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Structural problems that make a dungeon definition unusable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DungeonError {
    #[error("Location stored under '{key}' declares id '{id}'")]
    IdMismatch { key: String, id: String },

    #[error("Location '{from}' connects to unknown location '{to}'")]
    DanglingConnection { from: String, to: String },
}

// ============================================================================
// Geometry
// ============================================================================

/// Integer grid position, serialized as `[x, y]`.
///
/// Row 0 is the bottom of the printed map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coordinates(pub i32, pub i32);

impl Coordinates {
    pub const fn new(x: i32, y: i32) -> Self {
        Self(x, y)
    }

    pub const fn x(&self) -> i32 {
        self.0
    }

    pub const fn y(&self) -> i32 {
        self.1
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.0, self.1)
    }
}

/// Map bounds in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether `coordinates` fall inside `[0, width) x [0, height)`.
    pub fn contains(&self, coordinates: Coordinates) -> bool {
        let (x, y) = (coordinates.x(), coordinates.y());
        x >= 0 && y >= 0 && (x as i64) < self.width as i64 && (y as i64) < self.height as i64
    }
}

// ============================================================================
// Occupants
// ============================================================================

/// A non-player character standing in a location.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Npc {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Loot lying in a location or carried by a monster.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Treasure {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub value: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Monster {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub difficulty_level: i32,
    #[serde(default)]
    pub hit_points: i32,
    #[serde(default)]
    pub treasure: Treasure,
}

/// A stack of items, either on the floor or in the player's inventory.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub healing_level: i32,
    #[serde(default)]
    pub quantity: i32,
}

impl Item {
    pub fn new(kind: impl Into<String>, quantity: i32) -> Self {
        Self {
            kind: kind.into(),
            healing_level: 0,
            quantity,
        }
    }

    pub fn with_healing(mut self, healing_level: i32) -> Self {
        self.healing_level = healing_level;
        self
    }
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}

// ============================================================================
// Locations
// ============================================================================

/// What kind of place a location is.
///
/// Unknown strings are kept verbatim so that a dungeon file survives a
/// round trip even when it uses types this crate does not draw specially.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LocationType {
    Room,
    Corridor,
    Other(String),
}

impl LocationType {
    pub fn as_str(&self) -> &str {
        match self {
            LocationType::Room => "room",
            LocationType::Corridor => "corridor",
            LocationType::Other(s) => s,
        }
    }
}

impl From<String> for LocationType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "room" => LocationType::Room,
            "corridor" => LocationType::Corridor,
            _ => LocationType::Other(s),
        }
    }
}

impl From<LocationType> for String {
    fn from(location_type: LocationType) -> Self {
        match location_type {
            LocationType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the dungeon graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Unique key; may be left empty in a file and filled from the map key.
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub location_type: LocationType,
    pub coordinates: Coordinates,
    #[serde(default)]
    pub description: String,
    /// Outgoing edges. Not necessarily mirrored by the destination.
    #[serde(default)]
    pub connections: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npc: Option<Npc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Item>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treasure: Option<Treasure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monster: Option<Monster>,
}

impl Location {
    pub fn new(id: impl Into<String>, location_type: LocationType, coordinates: Coordinates) -> Self {
        Self {
            id: id.into(),
            location_type,
            coordinates,
            description: String::new(),
            connections: Vec::new(),
            npc: None,
            items: Vec::new(),
            treasure: None,
            monster: None,
        }
    }

    pub fn room(id: impl Into<String>, x: i32, y: i32) -> Self {
        Self::new(id, LocationType::Room, Coordinates::new(x, y))
    }

    pub fn corridor(id: impl Into<String>, x: i32, y: i32) -> Self {
        Self::new(id, LocationType::Corridor, Coordinates::new(x, y))
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_connections<I, S>(mut self, connections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.connections = connections.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_npc(mut self, npc: Npc) -> Self {
        self.npc = Some(npc);
        self
    }

    pub fn with_treasure(mut self, treasure: Treasure) -> Self {
        self.treasure = Some(treasure);
        self
    }

    pub fn with_monster(mut self, monster: Monster) -> Self {
        self.monster = Some(monster);
        self
    }

    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.items = items;
        self
    }

    /// Membership test on the outgoing edges.
    pub fn connects_to(&self, id: &str) -> bool {
        self.connections.iter().any(|c| c == id)
    }
}

// ============================================================================
// Dungeon
// ============================================================================

/// The complete world graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dungeon {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub size: Size,
    #[serde(default)]
    pub entrance_room: String,
    #[serde(default)]
    pub exit_room: String,
    /// Keyed by location id; ordered so that scans are deterministic.
    #[serde(default)]
    pub locations: BTreeMap<String, Location>,
}

impl Dungeon {
    pub fn new(name: impl Into<String>, size: Size) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            size,
            entrance_room: String::new(),
            exit_room: String::new(),
            locations: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_entrance(mut self, id: impl Into<String>) -> Self {
        self.entrance_room = id.into();
        self
    }

    pub fn with_exit(mut self, id: impl Into<String>) -> Self {
        self.exit_room = id.into();
        self
    }

    /// Add a location, replacing any previous one with the same id.
    pub fn with_location(mut self, location: Location) -> Self {
        self.locations.insert(location.id.clone(), location);
        self
    }

    /// Exact lookup by id.
    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.get(id)
    }

    /// First location (in id order) sitting at `(x, y)`.
    pub fn location_at(&self, x: i32, y: i32) -> Option<&Location> {
        let target = Coordinates::new(x, y);
        self.locations.values().find(|l| l.coordinates == target)
    }

    pub fn entrance(&self) -> Option<&Location> {
        self.location(&self.entrance_room)
    }

    pub fn exit(&self) -> Option<&Location> {
        self.location(&self.exit_room)
    }

    /// Locations whose coordinates fall outside the map bounds.
    pub fn out_of_bounds(&self) -> impl Iterator<Item = &Location> + '_ {
        self.locations
            .values()
            .filter(move |l| !self.size.contains(l.coordinates))
    }

    /// Give every location with an empty id the key it is stored under.
    pub fn fill_missing_ids(&mut self) {
        for (key, location) in self.locations.iter_mut() {
            if location.id.is_empty() {
                location.id = key.clone();
            }
        }
    }

    /// Check the structural invariants of the graph.
    ///
    /// Ids must match their keys and every connection must resolve.
    /// Bounds and entrance/exit are not checked; see [`Dungeon::out_of_bounds`].
    pub fn validate(&self) -> Result<(), DungeonError> {
        for (key, location) in &self.locations {
            if &location.id != key {
                return Err(DungeonError::IdMismatch {
                    key: key.clone(),
                    id: location.id.clone(),
                });
            }
            if let Some(missing) = location
                .connections
                .iter()
                .find(|c| !self.locations.contains_key(c.as_str()))
            {
                return Err(DungeonError::DanglingConnection {
                    from: key.clone(),
                    to: missing.clone(),
                });
            }
        }
        Ok(())
    }
}
