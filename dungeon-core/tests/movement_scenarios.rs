//! End-to-end movement scenarios through the public API.
//!
//! Run with: `cargo test -p dungeon-core --test movement_scenarios`

use dungeon_core::testing::{corridor_dungeon, crystal_caverns, player_at};
use dungeon_core::{attempt_move, Coordinates, GameSession, MoveOutcome, Player};

// =============================================================================
// THREE ROOM CORRIDOR
// =============================================================================

#[test]
fn test_corridor_walkthrough() {
    let dungeon = corridor_dungeon();
    let mut player = player_at(&dungeon, "A");

    assert_eq!(
        attempt_move(&dungeon, &mut player, "C"),
        MoveOutcome::NotConnected {
            target: "C".to_string(),
            current: "A".to_string(),
        }
    );
    assert_eq!(
        attempt_move(&dungeon, &mut player, "B"),
        MoveOutcome::Moved {
            player: player.name.clone(),
            from: "A".to_string(),
            to: "B".to_string(),
            coordinates: Coordinates::new(1, 0),
        }
    );
    assert_eq!(
        attempt_move(&dungeon, &mut player, "C"),
        MoveOutcome::Moved {
            player: player.name.clone(),
            from: "B".to_string(),
            to: "C".to_string(),
            coordinates: Coordinates::new(2, 0),
        }
    );
    assert_eq!(player.coordinates, Coordinates::new(2, 0));
}

#[test]
fn test_coordinates_always_match_location() {
    let dungeon = corridor_dungeon();
    let mut player = player_at(&dungeon, "A");

    for target in ["C", "B", "B", "Z", "A", "C", "B", "C"] {
        attempt_move(&dungeon, &mut player, target);
        let here = dungeon.location(&player.current_location).unwrap();
        assert_eq!(player.coordinates, here.coordinates, "after move to {target}");
    }
}

// =============================================================================
// CRYSTAL CAVERNS
// =============================================================================

#[test]
fn test_walk_to_exit() {
    let session = GameSession::new(crystal_caverns(), Player::default());

    let route = [
        "north_passage",
        "crystal_hall",
        "east_tunnel",
        "underground_lake",
        "exit_tunnel",
    ];
    for step in route {
        assert!(session.move_player(step).is_moved(), "step to {step}");
    }

    let player = session.player_status();
    assert_eq!(player.current_location, "exit_tunnel");
    assert_eq!(player.coordinates, Coordinates::new(4, 3));

    // The exit tunnel collapses behind the player
    assert!(matches!(
        session.move_player("underground_lake"),
        MoveOutcome::NotConnected { .. }
    ));
}

#[test]
fn test_map_follows_player() {
    let session = GameSession::new(crystal_caverns(), Player::default());
    let before = session.render_map();
    assert!(before.contains(" 0     [P]"));

    session.move_player("north_passage");
    let after = session.render_map();

    assert!(after.contains(" 1     [P]"));
    // Entrance symbol reappears once the player leaves
    assert!(after.contains(" 0     [E]"));
    assert_ne!(before, after);
}

#[test]
fn test_rejected_moves_leave_map_unchanged() {
    let session = GameSession::new(crystal_caverns(), Player::default());
    let before = session.render_map();

    session.move_player("goblin_den");
    session.move_player("entrance_cave");
    session.move_player("the_moon");

    assert_eq!(session.render_map(), before);
}
