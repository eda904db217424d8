//! Testing utilities for the dungeon server.
//!
//! Fixture worlds and players shared by unit tests, integration tests and
//! the server crate's router tests.

use crate::player::Player;
use crate::world::{Dungeon, Item, Location, LocationType, Monster, Npc, Size, Treasure};

/// Three cells in a row: A(0,0) -> [B], B(1,0) -> [A, C], C(2,0) -> [B].
pub fn corridor_dungeon() -> Dungeon {
    Dungeon::new("Corridor", Size::new(3, 1))
        .with_description("Three rooms in a line")
        .with_entrance("A")
        .with_exit("C")
        .with_location(Location::room("A", 0, 0).with_connections(["B"]))
        .with_location(Location::corridor("B", 1, 0).with_connections(["A", "C"]))
        .with_location(Location::room("C", 2, 0).with_connections(["B"]))
}

/// A 6x6 cave system with every kind of occupant.
///
/// Same world as `data/crystal_caverns.yaml`. Coordinates are unique and
/// `exit_tunnel` is reachable only one way.
pub fn crystal_caverns() -> Dungeon {
    Dungeon::new("Crystal Caverns", Size::new(6, 6))
        .with_description("A network of glittering caves beneath the mountain")
        .with_entrance("entrance_cave")
        .with_exit("exit_tunnel")
        .with_location(
            Location::room("entrance_cave", 1, 0)
                .with_description("A damp cave mouth lit by daylight from above")
                .with_connections(["north_passage"])
                .with_npc(Npc {
                    kind: "miner".to_string(),
                    name: "Old Tobin".to_string(),
                    description: "A retired miner who knows every tunnel".to_string(),
                }),
        )
        .with_location(
            Location::corridor("north_passage", 1, 1)
                .with_description("A narrow passage with dripping walls")
                .with_connections(["entrance_cave", "crystal_hall"]),
        )
        .with_location(
            Location::room("crystal_hall", 1, 2)
                .with_description("Huge crystals hum softly in the dark")
                .with_connections(["north_passage", "east_tunnel", "goblin_den"])
                .with_treasure(Treasure {
                    kind: "gem".to_string(),
                    value: 120,
                }),
        )
        .with_location(
            Location::room("goblin_den", 1, 3)
                .with_description("Bones and broken crates litter the floor")
                .with_connections(["crystal_hall"])
                .with_monster(Monster {
                    kind: "goblin".to_string(),
                    name: "Snagtooth".to_string(),
                    description: "A wiry goblin clutching a rusty blade".to_string(),
                    difficulty_level: 2,
                    hit_points: 18,
                    treasure: Treasure {
                        kind: "gold".to_string(),
                        value: 30,
                    },
                }),
        )
        .with_location(
            Location::corridor("east_tunnel", 2, 2)
                .with_description("A low tunnel sloping down to the east")
                .with_connections(["crystal_hall", "underground_lake"]),
        )
        .with_location(
            Location::room("underground_lake", 3, 2)
                .with_description("Still black water stretches out of sight")
                .with_connections(["east_tunnel", "exit_tunnel"])
                .with_items(vec![
                    Item::new("potion", 1).with_healing(20),
                    Item::new("rope", 1),
                ]),
        )
        .with_location(
            Location::room("exit_tunnel", 4, 3)
                .with_description("A collapsed tunnel; there is no way back"),
        )
        .with_location(
            Location::new(
                "sealed_shrine",
                LocationType::Other("shrine".to_string()),
                crate::world::Coordinates::new(4, 5),
            )
            .with_description("An altar behind a wall of solid rock"),
        )
}

/// A player named `Tester` standing in `location`, coordinates synced.
pub fn player_at(dungeon: &Dungeon, location: &str) -> Player {
    let mut player = Player::new("Tester", location);
    player.sync_coordinates(dungeon);
    player
}
