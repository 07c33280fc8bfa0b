//! Static evaluation: influence, territory estimate and group strength.
//!
//! Influence is signed: Black stones push an empty cell positive, White
//! stones push it negative. Only stones within [`INFLUENCE_RADIUS`]
//! (Chebyshev distance) contribute, each with weight `1 / (distance + 1)`.

use std::collections::HashMap;

use crate::board::{Board, Color, Point};
use crate::constants::{INFLUENCE_RADIUS, LIBERTY_WEIGHT, TERRITORY_CREDIT, TERRITORY_THRESHOLD};

fn sign(color: Color) -> f64 {
    match color {
        Color::Black => 1.0,
        Color::White => -1.0,
    }
}

/// Influence on the cell at `p`. Occupied cells have no influence.
pub fn influence(board: &Board, p: Point) -> f64 {
    if board.get(p).is_some() {
        return 0.0;
    }
    let size = board.size();
    let (r, c) = p;
    let rows = r.saturating_sub(INFLUENCE_RADIUS)..=(r + INFLUENCE_RADIUS).min(size - 1);

    let mut total = 0.0;
    for nr in rows {
        for nc in c.saturating_sub(INFLUENCE_RADIUS)..=(c + INFLUENCE_RADIUS).min(size - 1) {
            if let Some(color) = board.get((nr, nc)) {
                let distance = r.abs_diff(nr).max(c.abs_diff(nc));
                total += sign(color) / (distance as f64 + 1.0);
            }
        }
    }
    total
}

/// Influence of every cell, row by row, for display overlays.
pub fn influence_map(board: &Board) -> Vec<Vec<f64>> {
    let size = board.size();
    (0..size)
        .map(|r| (0..size).map(|c| influence(board, (r, c))).collect())
        .collect()
}

/// Stones plus partial credit for influenced empty cells, for both colors.
fn territory(board: &Board) -> (f64, f64) {
    let mut black = 0.0;
    let mut white = 0.0;
    for p in board.points() {
        match board.get(p) {
            Some(Color::Black) => black += 1.0,
            Some(Color::White) => white += 1.0,
            None => {
                let inf = influence(board, p);
                if inf > TERRITORY_THRESHOLD {
                    black += TERRITORY_CREDIT;
                } else if inf < -TERRITORY_THRESHOLD {
                    white += TERRITORY_CREDIT;
                }
            }
        }
    }
    (black, white)
}

/// Share of the counted territory that belongs to `color`, in [0, 1].
///
/// Returns 0.5 when nothing has been counted for either side.
pub fn evaluate_winner(board: &Board, color: Color) -> f64 {
    let (black, white) = territory(board);
    let total = black + white;
    if total == 0.0 {
        return 0.5;
    }
    match color {
        Color::Black => black / total,
        Color::White => white / total,
    }
}

/// Sum of `1 + 0.1 * liberties` over the stones of `color`.
pub fn evaluate_position(board: &Board, color: Color) -> f64 {
    let mut liberties: HashMap<Point, usize> = HashMap::new();
    let mut score = 0.0;
    for p in board.points() {
        if board.get(p) != Some(color) {
            continue;
        }
        let libs = match liberties.get(&p) {
            Some(&n) => n,
            None => {
                let group = board.group_and_liberties(p);
                let n = group.liberties.len();
                liberties.extend(group.stones.into_iter().map(|s| (s, n)));
                n
            }
        };
        score += 1.0 + LIBERTY_WEIGHT * libs as f64;
    }
    score
}
