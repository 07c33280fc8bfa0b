//! Game state: board, move history, ko point and pass counter.
//!
//! This module provides the stateful half of the rules:
//! - Turn inference from the move history (Black always opens)
//! - Ko tracking for single-stone recaptures
//! - Passing and game end after two consecutive passes
//! - Undo by restoring the snapshot stored in each move record
//!
//! A `Position` owns all of its data, so `clone()` yields a fully independent
//! copy. The search relies on this to explore divergent lines of play.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Color, Group, MoveError, Point};
use crate::constants::BOARD_SIZE;

/// A move: a stone placement or a pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Place(Point),
    Pass,
}

impl Move {
    /// The (row, col) tuple with the (-1, -1) sentinel for a pass.
    pub fn to_tuple(self) -> (isize, isize) {
        match self {
            Move::Place((r, c)) => (r as isize, c as isize),
            Move::Pass => (-1, -1),
        }
    }
}

/// Formats placements 1-indexed, as shown to players.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Place((r, c)) => write!(f, "({}, {})", r + 1, c + 1),
            Move::Pass => write!(f, "pass"),
        }
    }
}

/// Everything needed to take a move back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Board before the move
    pub board: Board,
    pub mv: Move,
    pub color: Color,
    /// Opponent stones removed by the move
    pub captured: Vec<Point>,
    /// Ko point after the move
    pub ko: Option<Point>,
    /// Ko point before the move
    pub prior_ko: Option<Point>,
    /// Pass counter before the move
    pub prior_passes: u32,
}

/// Result of a successful placement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub captured: Vec<Point>,
}

impl MoveOutcome {
    pub fn captures(&self) -> usize {
        self.captured.len()
    }

    /// Short report of the move, empty when nothing was captured.
    pub fn message(&self) -> String {
        if self.captured.is_empty() {
            String::new()
        } else {
            format!("captured {} bubble(s)", self.captured.len())
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    board: Board,
    history: Vec<MoveRecord>,
    ko: Option<Point>,
    passes: u32,
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl Position {
    pub fn new() -> Self {
        Self::with_size(BOARD_SIZE)
    }

    pub fn with_size(size: usize) -> Self {
        Self::from_board(Board::new(size))
    }

    /// Start a game from an arbitrary setup with an empty history.
    pub fn from_board(board: Board) -> Self {
        Position {
            board,
            history: Vec::new(),
            ko: None,
            passes: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> usize {
        self.board.size()
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.history.last()
    }

    pub fn ko_point(&self) -> Option<Point> {
        self.ko
    }

    /// Force the ko point, e.g. when restoring a saved game.
    pub fn set_ko_point(&mut self, ko: Option<Point>) {
        self.ko = ko;
    }

    pub fn passes(&self) -> u32 {
        self.passes
    }

    pub fn group_and_liberties(&self, p: Point) -> Group {
        self.board.group_and_liberties(p)
    }

    /// Color to move next: White after a Black move, Black otherwise.
    pub fn next_to_move(&self) -> Color {
        match self.history.last() {
            Some(record) if record.color == Color::Black => Color::White,
            _ => Color::Black,
        }
    }

    /// Two consecutive passes, or no empty cell left.
    pub fn is_game_over(&self) -> bool {
        self.passes >= 2 || self.board.is_full()
    }

    /// Place a stone of `color` at (row, col).
    ///
    /// Checks bounds, occupancy and ko, then resolves captures and suicide.
    /// A single stone capturing exactly one stone sets the ko point to the
    /// captured cell; any other outcome clears it.
    ///
    /// # Errors
    /// Returns the [`MoveError`] for a rejected move. Nothing is mutated.
    pub fn apply_move(
        &mut self,
        row: isize,
        col: isize,
        color: Color,
    ) -> Result<MoveOutcome, MoveError> {
        let pt = self.board.point(row, col).ok_or(MoveError::OutOfBounds)?;
        self.place(pt, color)
    }

    fn place(&mut self, pt: Point, color: Color) -> Result<MoveOutcome, MoveError> {
        if self.board.get(pt).is_some() {
            return Err(MoveError::Occupied);
        }
        if self.ko == Some(pt) {
            return Err(MoveError::Ko);
        }

        let snapshot = self.board.clone();
        let captured = self.board.place(pt, color)?;

        let prior_ko = self.ko;
        self.ko = match captured.as_slice() {
            [single] if self.board.group_and_liberties(pt).stones.len() == 1 => Some(*single),
            _ => None,
        };

        self.history.push(MoveRecord {
            board: snapshot,
            mv: Move::Place(pt),
            color,
            captured: captured.clone(),
            ko: self.ko,
            prior_ko,
            prior_passes: self.passes,
        });
        self.passes = 0;

        Ok(MoveOutcome { captured })
    }

    /// Play a move for the side to move.
    ///
    /// A pass always succeeds and yields an outcome with no captures.
    pub fn play(&mut self, mv: Move) -> Result<MoveOutcome, MoveError> {
        match mv {
            Move::Place(pt) => self.place(pt, self.next_to_move()),
            Move::Pass => {
                self.pass_turn();
                Ok(MoveOutcome {
                    captured: Vec::new(),
                })
            }
        }
    }

    /// Pass for the side to move. Clears the ko point.
    ///
    /// Returns true once two consecutive passes have been made.
    pub fn pass_turn(&mut self) -> bool {
        self.history.push(MoveRecord {
            board: self.board.clone(),
            mv: Move::Pass,
            color: self.next_to_move(),
            captured: Vec::new(),
            ko: None,
            prior_ko: self.ko,
            prior_passes: self.passes,
        });
        self.passes += 1;
        self.ko = None;
        self.passes >= 2
    }

    /// Take back the last move. Returns false if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(record) = self.history.pop() else {
            return false;
        };
        self.board = record.board;
        self.ko = record.prior_ko;
        self.passes = record.prior_passes;
        true
    }

    /// Whether `color` may play at `pt`, tested by applying it to a scratch board.
    pub fn is_legal(&self, pt: Point, color: Color) -> bool {
        if self.board.get(pt).is_some() || self.ko == Some(pt) {
            return false;
        }
        let mut scratch = self.board.clone();
        scratch.place(pt, color).is_ok()
    }

    /// All legal placements for `color`, in row-major order.
    pub fn legal_moves(&self, color: Color) -> Vec<Point> {
        self.board
            .empty_points()
            .filter(|&pt| self.is_legal(pt, color))
            .collect()
    }

    /// Legal placements for the side to move plus one pass.
    ///
    /// Empty once the game is over.
    pub fn candidate_moves(&self) -> Vec<Move> {
        if self.is_game_over() {
            return Vec::new();
        }
        let mut moves: Vec<Move> = self
            .legal_moves(self.next_to_move())
            .into_iter()
            .map(Move::Place)
            .collect();
        moves.push(Move::Pass);
        moves
    }
}
