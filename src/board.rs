//! Square grid of stones with group, liberty and capture logic.
//!
//! The board knows nothing about turns, history or ko; it only enforces the
//! local rules of a single placement (occupancy, captures, suicide). The
//! stateful rules live in [`position`](crate::position).

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::NEIGHBORS;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Single-character symbol used in board diagrams.
    pub fn symbol(self) -> char {
        match self {
            Color::Black => 'B',
            Color::White => 'W',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "black"),
            Color::White => write!(f, "white"),
        }
    }
}

/// A board coordinate as (row, col), 0-indexed.
pub type Point = (usize, usize);

/// Reason a move was rejected. A rejected move never mutates any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("Move out of bounds.")]
    OutOfBounds,
    #[error("Spot not empty.")]
    Occupied,
    #[error("Ko rule: Cannot immediately recapture.")]
    Ko,
    #[error("Move is suicidal.")]
    Suicide,
}

/// A connected group of same-colored stones and its liberties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    pub stones: BTreeSet<Point>,
    pub liberties: BTreeSet<Point>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseBoardError {
    #[error("board diagram is empty")]
    Empty,
    #[error("row {row} has {len} cells, expected {size}")]
    RaggedRow { row: usize, len: usize, size: usize },
    #[error("unknown cell symbol {0:?}")]
    UnknownSymbol(char),
    #[error("board of size {size} needs {} cells, got {len}", .size * .size)]
    CellCount { len: usize, size: usize },
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBoard")]
pub struct Board {
    size: usize,
    cells: Vec<Option<Color>>,
}

/// Unchecked serialized form of a [`Board`].
#[derive(Deserialize)]
struct RawBoard {
    size: usize,
    cells: Vec<Option<Color>>,
}

impl TryFrom<RawBoard> for Board {
    type Error = ParseBoardError;

    fn try_from(raw: RawBoard) -> Result<Self, Self::Error> {
        let expected = raw
            .size
            .checked_mul(raw.size)
            .filter(|&n| n > 0)
            .ok_or(ParseBoardError::Empty)?;
        if raw.cells.len() != expected {
            return Err(ParseBoardError::CellCount {
                len: raw.cells.len(),
                size: raw.size,
            });
        }
        Ok(Board {
            size: raw.size,
            cells: raw.cells,
        })
    }
}

impl Board {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn idx(&self, (row, col): Point) -> usize {
        row * self.size + col
    }

    /// Convert signed coordinates into a point, or `None` if off the board.
    pub fn point(&self, row: isize, col: isize) -> Option<Point> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        (row < self.size && col < self.size).then_some((row, col))
    }

    /// Stone at `p`; off-board points read as empty.
    pub fn get(&self, p: Point) -> Option<Color> {
        if p.0 >= self.size || p.1 >= self.size {
            return None;
        }
        self.cells[self.idx(p)]
    }

    /// Overwrite a cell without applying any rule. Off-board points are ignored.
    pub fn set(&mut self, p: Point, stone: Option<Color>) {
        if p.0 < self.size && p.1 < self.size {
            let i = self.idx(p);
            self.cells[i] = stone;
        }
    }

    /// All points in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> + use<> {
        let size = self.size;
        (0..size).flat_map(move |r| (0..size).map(move |c| (r, c)))
    }

    pub fn empty_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.points().filter(|&p| self.get(p).is_none())
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Number of stones of `color` on the board.
    pub fn count(&self, color: Color) -> usize {
        self.cells.iter().filter(|&&c| c == Some(color)).count()
    }

    /// Orthogonal neighbours of `p` that lie on the board.
    pub fn neighbors(&self, p: Point) -> impl Iterator<Item = Point> + '_ {
        NEIGHBORS
            .iter()
            .filter_map(move |&(dr, dc)| self.point(p.0 as isize + dr, p.1 as isize + dc))
    }

    /// Flood-fill the group containing `p` and collect its liberties.
    ///
    /// Returns an empty group for an empty cell.
    pub fn group_and_liberties(&self, p: Point) -> Group {
        let mut group = Group::default();
        let Some(color) = self.get(p) else {
            return group;
        };

        let mut stack = vec![p];
        while let Some(pt) = stack.pop() {
            if !group.stones.insert(pt) {
                continue;
            }
            for n in self.neighbors(pt) {
                match self.get(n) {
                    None => {
                        group.liberties.insert(n);
                    }
                    Some(c) if c == color && !group.stones.contains(&n) => stack.push(n),
                    _ => {}
                }
            }
        }
        group
    }

    /// Place a stone, remove opposing groups left without liberties, and
    /// reject suicide.
    ///
    /// Returns the captured points in row-major order. On error the board is
    /// left exactly as it was.
    pub fn place(&mut self, p: Point, color: Color) -> Result<Vec<Point>, MoveError> {
        if p.0 >= self.size || p.1 >= self.size {
            return Err(MoveError::OutOfBounds);
        }
        if self.get(p).is_some() {
            return Err(MoveError::Occupied);
        }
        let idx = self.idx(p);
        self.cells[idx] = Some(color);

        let opp = color.opponent();
        let mut captured: Vec<Point> = Vec::new();
        for n in self.neighbors(p) {
            if self.get(n) == Some(opp) && !captured.contains(&n) {
                let group = self.group_and_liberties(n);
                if group.liberties.is_empty() {
                    captured.extend(group.stones);
                }
            }
        }
        for &q in &captured {
            self.set(q, None);
        }

        // Liberties are recomputed after captures, so capturing never counts as suicide.
        if self.group_and_liberties(p).liberties.is_empty() {
            for &q in &captured {
                self.set(q, Some(opp));
            }
            self.cells[idx] = None;
            return Err(MoveError::Suicide);
        }

        captured.sort_unstable();
        Ok(captured)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            for col in 0..self.size {
                let ch = self.get((row, col)).map_or('.', Color::symbol);
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Parse a diagram of `B`, `W` and `.` cells, one row per line.
///
/// Whitespace inside a row is ignored, so the output of `Display` parses back.
impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<Vec<char>> = s
            .lines()
            .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
            .filter(|row| !row.is_empty())
            .collect();
        if rows.is_empty() {
            return Err(ParseBoardError::Empty);
        }

        let size = rows.len();
        let mut board = Board::new(size);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(ParseBoardError::RaggedRow {
                    row: r,
                    len: row.len(),
                    size,
                });
            }
            for (c, &ch) in row.iter().enumerate() {
                let stone = match ch {
                    'B' | 'X' => Some(Color::Black),
                    'W' | 'O' => Some(Color::White),
                    '.' => None,
                    other => return Err(ParseBoardError::UnknownSymbol(other)),
                };
                board.set((r, c), stone);
            }
        }
        Ok(board)
    }
}
