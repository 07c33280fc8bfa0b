//! Integration tests for gobble
//!
//! Rule-engine scenarios are set up either by playing moves through
//! `apply_move` or by parsing a board diagram (`B`, `W`, `.`), which places
//! stones directly without applying any rule.

use assert_matches::assert_matches;

use gobble::board::{Board, Color, MoveError};
use gobble::mcts::{ROOT, SearchConfig, SearchTree, TreeNode, tree_search};
use gobble::position::{Move, Position};
use gobble::scoring::{evaluate_position, evaluate_winner};

// =============================================================================
// Helper functions for setting up test positions
// =============================================================================

/// Build a position from a diagram, with empty history and no ko.
fn setpos(diagram: &str) -> Position {
    Position::from_board(diagram.parse::<Board>().expect("valid diagram"))
}

/// Play (row, col, color) moves in order, panicking on any rejection.
fn play_all(pos: &mut Position, moves: &[(isize, isize, Color)]) {
    for &(r, c, color) in moves {
        if let Err(e) = pos.apply_move(r, c, color) {
            panic!("illegal setup move ({r}, {c}) {color}: {e}");
        }
    }
}

/// Ko shape: White at (1,1) captures the black stone at (1,2).
fn ko_position() -> Position {
    setpos(
        ".BW..
         B.BW.
         .BW..
         .....
         .....",
    )
}

fn seeded(iterations: usize, seed: u64) -> SearchConfig {
    SearchConfig {
        iterations,
        seed: Some(seed),
        ..SearchConfig::default()
    }
}

// =============================================================================
// Basic moves
// =============================================================================

#[test]
fn test_initial_board_is_empty() {
    let pos = Position::new();
    assert_eq!(pos.board().empty_points().count(), 25);
    assert_eq!(pos.board().size(), 5);
}

#[test]
fn test_valid_move() {
    let mut pos = Position::new();
    let outcome = pos.apply_move(2, 2, Color::Black).unwrap();
    assert_eq!(outcome.captures(), 0);
    assert_eq!(outcome.message(), "");
    assert_eq!(pos.board().get((2, 2)), Some(Color::Black));
}

#[test]
fn test_out_of_bounds_move() {
    let mut pos = Position::new();
    pos.apply_move(0, 0, Color::Black).unwrap();
    let before = pos.clone();

    for (r, c) in [(-1, 0), (5, 5), (0, -1), (2, 7)] {
        let err = pos.apply_move(r, c, Color::White).unwrap_err();
        assert_eq!(err, MoveError::OutOfBounds);
        assert_eq!(err.to_string(), "Move out of bounds.");
        assert_eq!(pos, before);
    }
}

#[test]
fn test_occupied_spot() {
    let mut pos = Position::new();
    pos.apply_move(2, 2, Color::Black).unwrap();
    let before = pos.clone();

    let err = pos.apply_move(2, 2, Color::White).unwrap_err();
    assert_eq!(err.to_string(), "Spot not empty.");
    assert_eq!(pos, before);
}

// =============================================================================
// Captures and suicide
// =============================================================================

#[test]
fn test_basic_capture() {
    let mut pos = Position::new();
    play_all(
        &mut pos,
        &[
            (1, 1, Color::Black),
            (1, 2, Color::White),
            (2, 1, Color::White),
            (0, 1, Color::White),
        ],
    );
    let outcome = pos.apply_move(1, 0, Color::White).unwrap();
    assert_eq!(outcome.captured, vec![(1, 1)]);
    assert_eq!(outcome.message(), "captured 1 bubble(s)");
    assert_eq!(pos.board().get((1, 1)), None);
}

#[test]
fn test_capture_of_group_on_edge() {
    let mut pos = setpos(
        "BB...
         WW...
         .....
         .....
         .....",
    );
    let outcome = pos.apply_move(0, 2, Color::White).unwrap();
    assert_eq!(outcome.captures(), 2);
    assert_eq!(pos.board().count(Color::Black), 0);
    assert_eq!(pos.ko_point(), None);
}

#[test]
fn test_suicide_rule() {
    let mut pos = setpos(
        "WWW..
         W.W..
         WWW..
         .....
         .....",
    );
    let before = pos.clone();
    let err = pos.apply_move(1, 1, Color::Black).unwrap_err();
    assert_eq!(err, MoveError::Suicide);
    assert_eq!(err.to_string(), "Move is suicidal.");
    assert_eq!(pos, before);
}

#[test]
fn test_filling_own_last_liberty_is_suicide() {
    let mut pos = setpos(
        "BBW..
         .W...
         W....
         .....
         .....",
    );
    // Black's pair would lose its last liberty without capturing anything.
    assert_matches!(pos.apply_move(1, 0, Color::Black), Err(MoveError::Suicide));
    assert_matches!(pos.apply_move(1, 0, Color::White), Ok(outcome) if outcome.captures() == 2);
}

// =============================================================================
// Ko
// =============================================================================

#[test]
fn test_ko_rule() {
    let mut pos = ko_position();
    let outcome = pos.apply_move(1, 1, Color::White).unwrap();
    assert_eq!(outcome.captured, vec![(1, 2)]);
    assert_eq!(pos.ko_point(), Some((1, 2)));

    let before = pos.clone();
    let err = pos.apply_move(1, 2, Color::Black).unwrap_err();
    assert_eq!(err, MoveError::Ko);
    assert_eq!(err.to_string(), "Ko rule: Cannot immediately recapture.");
    assert_eq!(pos, before);
}

#[test]
fn test_ko_clears_after_another_move() {
    let mut pos = ko_position();
    pos.apply_move(1, 1, Color::White).unwrap();
    pos.apply_move(4, 4, Color::Black).unwrap();
    pos.apply_move(4, 0, Color::White).unwrap();
    assert_eq!(pos.ko_point(), None);

    let outcome = pos.apply_move(1, 2, Color::Black).unwrap();
    assert_eq!(outcome.captured, vec![(1, 1)]);
    assert_eq!(pos.ko_point(), Some((1, 1)));
}

#[test]
fn test_ko_clears_after_pass() {
    let mut pos = ko_position();
    pos.apply_move(1, 1, Color::White).unwrap();
    assert!(!pos.pass_turn());
    assert_eq!(pos.ko_point(), None);
    assert!(pos.apply_move(1, 2, Color::Black).is_ok());
}

#[test]
fn test_capture_resets_ko() {
    let mut pos = Position::new();
    play_all(
        &mut pos,
        &[
            (1, 1, Color::Black),
            (1, 2, Color::Black),
            (0, 1, Color::White),
            (0, 2, Color::White),
            (2, 1, Color::White),
            (2, 2, Color::White),
            (1, 3, Color::White),
        ],
    );
    pos.set_ko_point(Some((3, 3)));
    let outcome = pos.apply_move(1, 0, Color::White).unwrap();
    assert_eq!(outcome.captures(), 2);
    assert_eq!(pos.ko_point(), None);
}

#[test]
fn test_single_capture_by_group_sets_no_ko() {
    // White connects to (0,0) while capturing one stone: no ko.
    let mut pos = setpos(
        "W....
         .B...
         WW...
         .....
         .....",
    );
    pos.apply_move(0, 1, Color::White).unwrap();
    pos.apply_move(1, 2, Color::White).unwrap();
    let outcome = pos.apply_move(1, 0, Color::White).unwrap();
    assert_eq!(outcome.captured, vec![(1, 1)]);
    assert_eq!(pos.ko_point(), None);
}

// =============================================================================
// Groups, passing and undo
// =============================================================================

#[test]
fn test_group_detection() {
    let mut pos = Position::new();
    play_all(
        &mut pos,
        &[
            (1, 1, Color::Black),
            (1, 2, Color::Black),
            (2, 1, Color::Black),
        ],
    );
    let group = pos.group_and_liberties((1, 1));
    assert_eq!(group.stones.len(), 3);
    assert_eq!(group.liberties.len(), 7);
    assert_eq!(pos.group_and_liberties((4, 4)).stones.len(), 0);
}

#[test]
fn test_pass_ends_game() {
    let mut pos = Position::new();
    assert!(!pos.pass_turn());
    assert!(pos.pass_turn());
    assert!(pos.is_game_over());
}

#[test]
fn test_undo_move() {
    let mut pos = Position::new();
    pos.apply_move(2, 2, Color::Black).unwrap();
    assert!(pos.undo());
    assert_eq!(pos.board().get((2, 2)), None);
    assert!(!pos.undo());
    assert_eq!(pos, Position::new());
}

#[test]
fn test_undo_restores_capture_and_ko() {
    let mut pos = ko_position();
    pos.set_ko_point(Some((4, 4)));
    let before = pos.clone();

    pos.apply_move(1, 1, Color::White).unwrap();
    assert!(pos.undo());
    assert_eq!(pos.board(), before.board());
    assert_eq!(pos.ko_point(), Some((4, 4)));
    assert_eq!(pos, before);
}

#[test]
fn test_clone_is_independent() {
    let mut pos = Position::new();
    pos.apply_move(2, 2, Color::Black).unwrap();
    let snapshot = pos.clone();

    let mut other = pos.clone();
    other.apply_move(0, 0, Color::White).unwrap();
    other.pass_turn();

    assert_eq!(pos, snapshot);
    assert_eq!(pos.board().get((0, 0)), None);
}

#[test]
fn test_state_round_trips_through_json() {
    let mut pos = ko_position();
    pos.apply_move(1, 1, Color::White).unwrap();
    pos.pass_turn();

    let json = serde_json::to_string(&pos).unwrap();
    let restored: Position = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, pos);
    assert_eq!(restored.next_to_move(), Color::Black);
}

#[test]
fn test_state_with_malformed_board_is_rejected() {
    let json = r#"{"board":{"size":5,"cells":[]},"history":[],"ko":null,"passes":0}"#;
    assert!(serde_json::from_str::<Position>(json).is_err());
}

// =============================================================================
// Evaluation
// =============================================================================

#[test]
fn test_evaluation_function() {
    let mut pos = Position::new();
    pos.apply_move(2, 2, Color::Black).unwrap();
    pos.apply_move(1, 1, Color::White).unwrap();
    assert!(evaluate_position(pos.board(), Color::Black) > 0.0);
    assert!(evaluate_position(pos.board(), Color::White) > 0.0);
}

#[test]
fn test_evaluate_winner_favours_bigger_side() {
    let pos = setpos(
        "BBB..
         B.B..
         BBB.W
         .....
         .....",
    );
    assert!(evaluate_winner(pos.board(), Color::Black) > 0.8);
    assert!(evaluate_winner(pos.board(), Color::White) < 0.2);
}

// =============================================================================
// MCTS
// =============================================================================

#[test]
fn test_mcts_node_creation() {
    let mut pos = Position::new();
    pos.apply_move(2, 2, Color::Black).unwrap();
    let node = TreeNode::new(pos, None, None);
    assert!(node.untried.len() > 20);
    assert_eq!(node.untried.iter().filter(|m| m.to_tuple() == (-1, -1)).count(), 1);
}

#[test]
fn test_mcts_simulation() {
    let mut tree = SearchTree::new(&Position::new(), &seeded(1, 21));
    let result = tree.simulate(ROOT);
    assert!((0.0..=1.0).contains(&result));
}

#[test]
fn test_mcts_expansion_and_selection() {
    let mut tree = SearchTree::new(&Position::new(), &seeded(1, 22));
    let child = tree.expand(ROOT).unwrap();
    assert_eq!(tree.root().children.len(), 1);
    assert_eq!(tree.node(child).parent, Some(ROOT));

    tree.backpropagate(child, 1.0);
    assert_eq!(tree.select_child(ROOT), Some(child));
    assert_eq!(tree.root().wins, 0.0);
    assert_eq!(tree.node(child).wins, 1.0);
}

#[test]
fn test_backpropagate_gives_parent_complement() {
    let mut tree = SearchTree::new(&Position::new(), &seeded(1, 23));
    let child = tree.expand(ROOT).unwrap();
    for x in [0.0, 0.25, 0.9] {
        let root_before = tree.root().wins;
        let child_before = tree.node(child).wins;
        tree.backpropagate(child, x);
        assert!((tree.node(child).wins - child_before - x).abs() < 1e-9);
        assert!((tree.root().wins - root_before - (1.0 - x)).abs() < 1e-9);
    }
}

#[test]
fn test_search_returns_legal_move() {
    let mut pos = Position::new();
    pos.apply_move(2, 2, Color::Black).unwrap();
    let result = tree_search(&pos, &seeded(150, 24));
    match result.best {
        Move::Place(pt) => assert!(pos.is_legal(pt, Color::White)),
        Move::Pass => {}
    }
    assert_eq!(result.analysis.len(), 5);
    assert_eq!(result.analysis[0].mv, result.best);
    assert!(result.analysis.iter().all(|a| (0.0..=1.0).contains(&a.win_rate)));
}

#[test]
fn test_search_with_no_legal_placement_passes() {
    // Both empty cells are eyes of the black group, so White can only pass.
    let mut pos = setpos(
        ".BBBB
         BBBBB
         BBBBB
         BBBBB
         BBBB.",
    );
    pos.pass_turn();
    assert_eq!(pos.next_to_move(), Color::White);
    assert!(pos.legal_moves(Color::White).is_empty());

    let result = tree_search(&pos, &seeded(30, 25));
    assert_eq!(result.best, Move::Pass);
}

#[test]
fn test_more_iterations_build_more_confidence() {
    let best_visits = |iterations: usize| -> u32 {
        (1..=4)
            .map(|seed| {
                let result = tree_search(&Position::new(), &seeded(iterations, seed));
                result.analysis.first().map_or(0, |a| a.visits)
            })
            .sum()
    };
    assert!(best_visits(200) >= best_visits(40));
}
