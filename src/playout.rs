//! Monte Carlo playouts (random game simulation).
//!
//! A playout alternates colors from the given position, playing a uniformly
//! random legal move with probability [`PROB_ROLLOUT_MOVE`] and passing
//! otherwise. It ends after two consecutive passes or after
//! `ROLLOUT_PLY_FACTOR * N * N` plies, and the final board is scored with
//! [`evaluate_winner`].
//!
//! The pass chance applies even when captures are available, so playouts
//! somewhat underrate aggressive lines.

use fastrand::Rng;

use crate::board::Color;
use crate::constants::{PROB_ROLLOUT_MOVE, ROLLOUT_PLY_FACTOR};
use crate::position::{Move, Position};
use crate::scoring::evaluate_winner;

/// Play `pos` out to the end and return the score for `perspective` in [0, 1].
pub fn rollout(pos: &mut Position, rng: &mut Rng, perspective: Color) -> f64 {
    let max_plies = ROLLOUT_PLY_FACTOR * pos.size() * pos.size();
    let mut plies = 0;

    while pos.passes() < 2 && plies < max_plies {
        let mv = choose_random_move(pos, rng);
        if pos.play(mv).is_err() {
            // legal_moves only yields playable points
            pos.pass_turn();
        }
        plies += 1;
    }

    evaluate_winner(pos.board(), perspective)
}

/// Pick a random legal move for the side to move, or pass.
fn choose_random_move(pos: &Position, rng: &mut Rng) -> Move {
    let candidates = pos.legal_moves(pos.next_to_move());
    if candidates.is_empty() || rng.f64() >= PROB_ROLLOUT_MOVE {
        return Move::Pass;
    }
    Move::Place(candidates[rng.usize(..candidates.len())])
}
