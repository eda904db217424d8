//! ASCII map rendering.
//!
//! Projects the dungeon and the player onto a fixed grid of three-character
//! cells. Logical row 0 is printed last, so the map reads like a Cartesian
//! plot rather than a screen buffer.

use crate::player::Player;
use crate::world::{Dungeon, Location, LocationType};

/// Cell content where no location is drawn.
pub const EMPTY_CELL: &str = "   ";

/// Symbol drawn for a location.
///
/// Variants are declared in precedence order: when several apply to one
/// location, the earliest wins. Two locations sharing a cell are resolved the
/// same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MapSymbol {
    Player,
    Entrance,
    Exit,
    Monster,
    Npc,
    Treasure,
    Room,
    Corridor,
    Unknown,
}

impl MapSymbol {
    /// Every symbol, in legend order.
    pub const ALL: [MapSymbol; 9] = [
        MapSymbol::Player,
        MapSymbol::Entrance,
        MapSymbol::Exit,
        MapSymbol::Monster,
        MapSymbol::Npc,
        MapSymbol::Treasure,
        MapSymbol::Room,
        MapSymbol::Corridor,
        MapSymbol::Unknown,
    ];

    pub fn glyph(self) -> &'static str {
        match self {
            MapSymbol::Player => "[P]",
            MapSymbol::Entrance => "[E]",
            MapSymbol::Exit => "[X]",
            MapSymbol::Monster => "[M]",
            MapSymbol::Npc => "[N]",
            MapSymbol::Treasure => "[T]",
            MapSymbol::Room => "[R]",
            MapSymbol::Corridor => " - ",
            MapSymbol::Unknown => " ? ",
        }
    }

    pub fn meaning(self) -> &'static str {
        match self {
            MapSymbol::Player => "Player Position",
            MapSymbol::Entrance => "Entrance",
            MapSymbol::Exit => "Exit",
            MapSymbol::Monster => "Monster",
            MapSymbol::Npc => "NPC",
            MapSymbol::Treasure => "Treasure",
            MapSymbol::Room => "Room",
            MapSymbol::Corridor => "Corridor",
            MapSymbol::Unknown => "Unknown",
        }
    }

    /// Pick the symbol for `location`, independent of map iteration order.
    pub fn for_location(location: &Location, dungeon: &Dungeon, player: &Player) -> Self {
        if location.id == player.current_location {
            MapSymbol::Player
        } else if !dungeon.entrance_room.is_empty() && location.id == dungeon.entrance_room {
            MapSymbol::Entrance
        } else if !dungeon.exit_room.is_empty() && location.id == dungeon.exit_room {
            MapSymbol::Exit
        } else if location.monster.is_some() {
            MapSymbol::Monster
        } else if location.npc.is_some() {
            MapSymbol::Npc
        } else if location.treasure.is_some() {
            MapSymbol::Treasure
        } else {
            match location.location_type {
                LocationType::Room => MapSymbol::Room,
                LocationType::Corridor => MapSymbol::Corridor,
                LocationType::Other(_) => MapSymbol::Unknown,
            }
        }
    }
}

/// Grid of symbols indexed by printed row, then column.
struct MapGrid {
    cells: Vec<Vec<Option<MapSymbol>>>,
}

impl MapGrid {
    fn project(dungeon: &Dungeon, player: &Player) -> Self {
        let width = dungeon.size.width as usize;
        let height = dungeon.size.height as usize;
        let mut cells = vec![vec![None; width]; height];

        for location in dungeon.locations.values() {
            if !dungeon.size.contains(location.coordinates) {
                tracing::debug!(
                    location = %location.id,
                    coordinates = %location.coordinates,
                    "Skipping location outside map bounds"
                );
                continue;
            }
            let column = location.coordinates.x() as usize;
            let row = height - 1 - location.coordinates.y() as usize;
            let symbol = MapSymbol::for_location(location, dungeon, player);

            let cell = &mut cells[row][column];
            if cell.map_or(true, |existing| symbol < existing) {
                *cell = Some(symbol);
            }
        }

        Self { cells }
    }
}

/// Render the full map with header, legend and player summary.
pub fn render_map(dungeon: &Dungeon, player: &Player) -> String {
    let grid = MapGrid::project(dungeon, player);
    let height = grid.cells.len();
    let mut output = String::new();

    output.push_str(&format!("\n=== {} Map ===\n", dungeon.name));
    output.push_str(&format!(
        "Size: {}x{}\n\n",
        dungeon.size.width, dungeon.size.height
    ));

    output.push_str("    ");
    for x in 0..dungeon.size.width {
        output.push_str(&format!("{x:2} "));
    }
    output.push('\n');

    // Printed top to bottom, labelled with the logical row
    for (row, cells) in grid.cells.iter().enumerate() {
        let label = height - 1 - row;
        output.push_str(&format!("{label:2}  "));
        for cell in cells {
            output.push_str(cell.map_or(EMPTY_CELL, MapSymbol::glyph));
        }
        output.push('\n');
    }

    output.push_str("\nLegend:\n");
    for symbol in MapSymbol::ALL {
        output.push_str(&format!("{} - {}\n", symbol.glyph(), symbol.meaning()));
    }

    output.push_str(&format!(
        "\nPlayer: {} at {} {}\n",
        player.name, player.current_location, player.coordinates
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{corridor_dungeon, crystal_caverns, player_at};
    use crate::world::{Location, Monster, Npc, Size, Treasure};

    /// Grid body line printed with the given row label.
    fn grid_line(map: &str, label: usize) -> &str {
        let prefix = format!("{label:2}  ");
        map.lines()
            .find(|line| line.starts_with(&prefix))
            .expect("row present")
    }

    #[test]
    fn test_rows_are_flipped() {
        let dungeon = Dungeon::new("Tower", Size::new(1, 3))
            .with_location(Location::room("ground", 0, 0))
            .with_location(Location::corridor("stairs", 0, 1))
            .with_location(Location::room("roof", 0, 2).with_npc(Npc::default()));
        let player = Player::new("Nobody", "elsewhere");

        let map = render_map(&dungeon, &player);
        let body: Vec<&str> = map
            .lines()
            .skip_while(|l| !l.starts_with("     0"))
            .skip(1)
            .take(3)
            .collect();

        assert_eq!(body, vec![" 2  [N]", " 1   - ", " 0  [R]"]);
    }

    #[test]
    fn test_column_header() {
        let dungeon = Dungeon::new("Wide", Size::new(3, 1));
        let map = render_map(&dungeon, &Player::default());
        assert!(map.contains("\n     0  1  2 \n"));
    }

    #[test]
    fn test_player_beats_entrance() {
        let dungeon = crystal_caverns();
        let player = player_at(&dungeon, "entrance_cave");

        let entrance = dungeon.entrance().unwrap();
        assert_eq!(
            MapSymbol::for_location(entrance, &dungeon, &player),
            MapSymbol::Player
        );

        let map = render_map(&dungeon, &player);
        let row = grid_line(&map, entrance.coordinates.y() as usize);
        assert!(row.contains("[P]"));
        assert!(!map.lines().any(|l| l.contains("[E]") && !l.contains("Entrance")));
    }

    #[test]
    fn test_symbol_precedence() {
        let dungeon = Dungeon::new("Stack", Size::new(5, 1))
            .with_entrance("gate")
            .with_exit("door")
            .with_location(
                Location::corridor("gate", 0, 0).with_monster(Monster::default()),
            )
            .with_location(Location::room("door", 1, 0).with_npc(Npc::default()))
            .with_location(
                Location::room("lair", 2, 0)
                    .with_monster(Monster::default())
                    .with_npc(Npc::default())
                    .with_treasure(Treasure::default()),
            )
            .with_location(
                Location::room("vault", 3, 0)
                    .with_npc(Npc::default())
                    .with_treasure(Treasure::default()),
            )
            .with_location(Location::room("cache", 4, 0).with_treasure(Treasure::default()));
        let player = Player::new("Nobody", "elsewhere");

        let symbol = |id: &str| {
            MapSymbol::for_location(dungeon.location(id).unwrap(), &dungeon, &player)
        };
        assert_eq!(symbol("gate"), MapSymbol::Entrance);
        assert_eq!(symbol("door"), MapSymbol::Exit);
        assert_eq!(symbol("lair"), MapSymbol::Monster);
        assert_eq!(symbol("vault"), MapSymbol::Npc);
        assert_eq!(symbol("cache"), MapSymbol::Treasure);
    }

    #[test]
    fn test_unknown_type_placeholder() {
        let dungeon = Dungeon::new("Odd", Size::new(1, 1)).with_location(Location::new(
            "chasm",
            LocationType::Other("chasm".to_string()),
            crate::world::Coordinates::new(0, 0),
        ));
        let map = render_map(&dungeon, &Player::new("Nobody", "elsewhere"));
        assert!(map.contains(" 0   ? \n"));
    }

    #[test]
    fn test_out_of_bounds_locations_are_skipped() {
        let dungeon = Dungeon::new("Edge", Size::new(2, 2))
            .with_location(Location::room("inside", 0, 0))
            .with_location(Location::room("east", 2, 0))
            .with_location(Location::room("north", 0, 2))
            .with_location(Location::room("south", 0, -1));
        let map = render_map(&dungeon, &Player::new("Nobody", "elsewhere"));

        let room_cells = map
            .lines()
            .filter(|l| !l.starts_with("[R]"))
            .map(|l| l.matches("[R]").count())
            .sum::<usize>();
        assert_eq!(room_cells, 1);
    }

    #[test]
    fn test_missing_entrance_and_exit_degrade() {
        let dungeon = Dungeon::new("Plain", Size::new(1, 1))
            .with_entrance("missing")
            .with_location(Location::room("only", 0, 0));
        let map = render_map(&dungeon, &Player::new("Nobody", "elsewhere"));
        assert!(map.contains(" 0  [R]\n"));
    }

    #[test]
    fn test_shared_cell_keeps_highest_precedence() {
        let dungeon = Dungeon::new("Crowded", Size::new(1, 1))
            .with_location(Location::room("a_room", 0, 0))
            .with_location(Location::room("b_den", 0, 0).with_monster(Monster::default()));
        let map = render_map(&dungeon, &Player::new("Nobody", "elsewhere"));
        assert!(map.contains(" 0  [M]\n"));
    }

    #[test]
    fn test_legend_lists_every_symbol() {
        let map = render_map(&corridor_dungeon(), &Player::default());
        let legend: Vec<&str> = map
            .lines()
            .skip_while(|l| *l != "Legend:")
            .skip(1)
            .take(MapSymbol::ALL.len())
            .collect();

        assert_eq!(legend.len(), MapSymbol::ALL.len());
        assert_eq!(legend[0], "[P] - Player Position");
        assert_eq!(legend[7], " -  - Corridor");
        assert_eq!(legend[8], " ?  - Unknown");
    }

    #[test]
    fn test_summary_line() {
        let dungeon = corridor_dungeon();
        let player = player_at(&dungeon, "B");
        let map = render_map(&dungeon, &player);
        assert!(map.ends_with("\nPlayer: Tester at B [1, 0]\n"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let dungeon = crystal_caverns();
        let player = player_at(&dungeon, "crystal_hall");
        assert_eq!(render_map(&dungeon, &player), render_map(&dungeon, &player));
    }

    #[test]
    fn test_render_does_not_mutate() {
        let dungeon = crystal_caverns();
        let player = player_at(&dungeon, "crystal_hall");
        let (dungeon_before, player_before) = (dungeon.clone(), player.clone());

        let _ = render_map(&dungeon, &player);
        assert_eq!(dungeon, dungeon_before);
        assert_eq!(player, player_before);
    }

    #[test]
    fn test_empty_map() {
        let dungeon = Dungeon::new("Void", Size::new(0, 0));
        let map = render_map(&dungeon, &Player::default());
        assert!(map.contains("Size: 0x0"));
        assert!(map.contains("Legend:"));
    }
}
