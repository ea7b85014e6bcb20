//! End-to-end tests for game sessions: conservation, rotation and departure.

use quirky_game::invariants::{Invariant, TileConservation};
use quirky_game::{
    Board, COPIES_PER_PIECE, Color, DEFAULT_ORIGIN, GameError, GamePiece, GameSession, HAND_SIZE,
    Piece, PlacementError, Shape, TurnOutcome, TurnPlacements, place,
};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

fn session_with(players: &[&str], seed: u64) -> GameSession {
    let mut session = GameSession::with_seed("rules", DEFAULT_ORIGIN, seed);
    for p in players {
        session.join(p).expect("join");
    }
    session
}

fn active(session: &GameSession) -> String {
    session.active_player().expect("active player").name().clone()
}

fn total_tiles(session: &GameSession, piece: Piece) -> u32 {
    let in_hands: usize = session
        .players()
        .iter()
        .map(|p| p.hand().iter().filter(|h| **h == piece).count())
        .sum();
    let on_board = session
        .board_pieces()
        .iter()
        .filter(|gp| gp.piece == piece)
        .count();
    session.bag().count(&piece) + (in_hands + on_board) as u32
}

#[test]
fn test_rotation_follows_join_order() {
    let mut session = session_with(&["a", "b", "c"], 1);
    let mut seen = vec![active(&session)];
    for _ in 0..6 {
        let current = active(&session);
        session.end_turn(&current).unwrap();
        seen.push(active(&session));
    }
    assert_eq!(seen, ["a", "b", "c", "a", "b", "c", "a"]);
}

#[test]
fn test_new_active_player_is_replenished() {
    let mut session = session_with(&["a", "b"], 2);

    // b plays one tile out of turn order; placement does not check the turn.
    let tile = session.hand("b").unwrap()[0];
    session.place_tile("b", tile, 90, 90).unwrap();
    assert_eq!(session.hand("b").unwrap().len(), HAND_SIZE - 1);

    session.end_turn("a").unwrap();
    assert_eq!(active(&session), "b");
    assert_eq!(session.hand("b").unwrap().len(), HAND_SIZE);
}

#[test]
fn test_replenish_stops_at_empty_bag() {
    // 18 players hold all 108 tiles.
    let names: Vec<String> = (0..18).map(|i| format!("p{i}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let mut session = session_with(&refs, 3);
    assert!(session.bag().is_empty());

    let tile = session.hand("p1").unwrap()[0];
    session.place_tile("p1", tile, 0, 0).unwrap();

    let extra = session.join("late");
    assert_eq!(extra, Ok(()));
    assert_eq!(session.hand("late").unwrap().len(), 0);

    session.end_turn("p0").unwrap();
    assert_eq!(active(&session), "p1");
    assert_eq!(session.hand("p1").unwrap().len(), HAND_SIZE - 1);
}

#[test]
fn test_stale_end_turn_is_a_no_op() {
    let mut session = session_with(&["a", "b"], 4);
    let outcome = session.end_turn("b").unwrap();
    assert_eq!(outcome, TurnOutcome::Ignored);
    assert_eq!(active(&session), "a");
}

#[test]
fn test_active_player_departure_advances_turn() {
    let mut session = session_with(&["a", "b", "c"], 5);
    session.end_turn("a").unwrap();
    assert_eq!(active(&session), "b");

    let tile = session.hand("b").unwrap()[0];
    session.place_tile("b", tile, 90, 90).unwrap();

    let departure = session.leave("b").unwrap();
    assert_eq!(
        departure.turn,
        TurnOutcome::Passed {
            from: "b".into(),
            to: "c".into()
        }
    );
    assert!(!departure.now_empty);
    assert_eq!(active(&session), "c");
    assert!(session.turn_placements().is_empty());
    assert!(session.player("b").is_none());
    assert!(session.check_invariants().is_ok());
}

#[test]
fn test_last_player_departure_wraps_to_first() {
    let mut session = session_with(&["a", "b", "c"], 6);
    session.end_turn("a").unwrap();
    session.end_turn("b").unwrap();
    assert_eq!(active(&session), "c");

    session.leave("c").unwrap();
    assert_eq!(active(&session), "a");
}

#[test]
fn test_inactive_departure_keeps_turn() {
    let mut session = session_with(&["a", "b", "c"], 7);
    let departure = session.leave("b").unwrap();
    assert_eq!(departure.turn, TurnOutcome::Ignored);
    assert_eq!(active(&session), "a");

    session.end_turn("a").unwrap();
    assert_eq!(active(&session), "c");
}

#[test]
fn test_everyone_leaving_empties_session() {
    let mut session = session_with(&["a", "b"], 8);
    assert!(!session.leave("a").unwrap().now_empty);
    assert!(session.leave("b").unwrap().now_empty);
    assert!(session.is_empty());
    assert_eq!(session.bag().len(), 108);
}

#[test]
fn test_duplicate_join_rejected() {
    let mut session = session_with(&["a"], 9);
    assert_eq!(
        session.join("a"),
        Err(GameError::PlayerAlreadyExists("a".into()))
    );
    assert_eq!(session.players().len(), 1);
}

#[test]
fn test_conservation_under_random_play() {
    let mut session = session_with(&["a", "b", "c"], 10);
    let mut rng = Pcg64Mcg::seed_from_u64(99);
    let mut next_name = 0;

    for _ in 0..400 {
        let players: Vec<String> = session.players().iter().map(|p| p.name().clone()).collect();
        match rng.gen_range(0..10) {
            0 if players.len() > 1 => {
                let who = &players[rng.gen_range(0..players.len())];
                session.leave(who).unwrap();
            }
            1 => {
                next_name += 1;
                let _ = session.join(&format!("n{next_name}"));
            }
            2 | 3 => {
                let who = active(&session);
                session.end_turn(&who).unwrap();
            }
            _ => {
                let who = active(&session);
                let hand = session.hand(&who).unwrap().to_vec();
                if hand.is_empty() {
                    continue;
                }
                let tile = hand[rng.gen_range(0..hand.len())];
                let row = 90 + rng.gen_range(-3..=3);
                let column = 90 + rng.gen_range(-3..=3);
                let before = session.board_pieces().len();
                match session.place_tile(&who, tile, row, column) {
                    Ok(points) => {
                        assert!(points >= 1);
                        assert_eq!(session.board_pieces().len(), before + 1);
                    }
                    Err(GameError::InvalidPlacement(_)) => {
                        assert_eq!(session.board_pieces().len(), before);
                    }
                    Err(other) => panic!("unexpected error: {other}"),
                }
            }
        }

        assert!(TileConservation::holds(&session));
        assert_eq!(session.check_invariants(), Ok(()));
    }

    for piece in Piece::all() {
        assert_eq!(total_tiles(&session, piece), COPIES_PER_PIECE);
    }
}

#[test]
fn test_scoring_scenario_on_shared_board() {
    let mut board = Board::new();
    let mut turn = TurnPlacements::new();
    let circle = |color| Piece::new(Shape::Circle, color);

    assert_eq!(
        place(&mut board, &mut turn, GamePiece::new(circle(Color::Red), 90, 90)),
        Ok(1)
    );
    turn.clear();
    assert_eq!(
        place(&mut board, &mut turn, GamePiece::new(circle(Color::Blue), 90, 91)),
        Ok(2)
    );
    assert_eq!(
        place(&mut board, &mut turn, GamePiece::new(circle(Color::Green), 90, 92)),
        Ok(2)
    );
    assert_eq!(
        place(&mut board, &mut turn, GamePiece::new(circle(Color::Green), 91, 92)),
        Err(PlacementError::IncompatibleAdjacent(GamePiece::new(
            circle(Color::Green),
            90,
            92
        )))
    );
    assert_eq!(board.len(), 3);
}
