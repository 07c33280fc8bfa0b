//! Descriptive ranking of the root's candidate moves after a search.
//!
//! The rationale attached to each candidate comes from static features of
//! the move on the resulting board (captures, connections to friendly
//! stones, open neighbours) plus a band of its win rate. It is for
//! presentation only and never feeds back into the search.

use std::fmt;

use crate::board::Point;
use crate::constants::{PROMISING_WIN_RATE, STRONG_WIN_RATE};
use crate::mcts::{SearchTree, TreeNode};
use crate::position::Move;

/// What the move does on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tactic {
    Pass,
    /// Removes this many opponent stones
    Capture(usize),
    /// Joins this many adjacent friendly stones
    Connect(usize),
    /// Lone stone with this many open neighbours
    OpenSpace(usize),
    /// Lone stone mostly touching the opponent
    Contact,
}

/// Win-rate band of a candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Confidence {
    Speculative,
    Promising,
    Strong,
}

impl Confidence {
    pub fn from_win_rate(win_rate: f64) -> Self {
        if win_rate >= STRONG_WIN_RATE {
            Confidence::Strong
        } else if win_rate >= PROMISING_WIN_RATE {
            Confidence::Promising
        } else {
            Confidence::Speculative
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rationale {
    pub tactic: Tactic,
    pub confidence: Confidence,
}

impl fmt::Display for Rationale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tactic {
            Tactic::Pass => write!(f, "passes")?,
            Tactic::Capture(n) => write!(f, "captures {n} stone(s)")?,
            Tactic::Connect(n) => write!(f, "connects to {n} friendly stone(s)")?,
            Tactic::OpenSpace(n) => write!(f, "claims open space ({n} free sides)")?,
            Tactic::Contact => write!(f, "presses against the opponent")?,
        }
        let band = match self.confidence {
            Confidence::Strong => "strong",
            Confidence::Promising => "promising",
            Confidence::Speculative => "speculative",
        };
        write!(f, ", {band}")
    }
}

/// Summary of one root candidate.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveAnalysis {
    pub mv: Move,
    pub visits: u32,
    pub win_rate: f64,
    pub rationale: Rationale,
}

impl fmt::Display for MoveAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>8} | {:>6} | {:>5.1}% | {}",
            self.mv.to_string(),
            self.visits,
            self.win_rate * 100.0,
            self.rationale
        )
    }
}

fn tactic(node: &TreeNode, pt: Point) -> Tactic {
    let board = node.state.board();
    let captured = node.state.last_move().map_or(0, |r| r.captured.len());
    if captured > 0 {
        return Tactic::Capture(captured);
    }

    let color = board.get(pt);
    let (mut friends, mut open) = (0, 0);
    for n in board.neighbors(pt) {
        match board.get(n) {
            None => open += 1,
            c if c == color => friends += 1,
            _ => {}
        }
    }

    if friends > 0 {
        Tactic::Connect(friends)
    } else if open >= 3 {
        Tactic::OpenSpace(open)
    } else {
        Tactic::Contact
    }
}

/// Describe a child node of the root.
pub fn describe(node: &TreeNode) -> Option<MoveAnalysis> {
    let mv = node.mv?;
    let win_rate = node.win_rate();
    let tactic = match mv {
        Move::Place(pt) => tactic(node, pt),
        Move::Pass => Tactic::Pass,
    };
    Some(MoveAnalysis {
        mv,
        visits: node.visits,
        win_rate,
        rationale: Rationale {
            tactic,
            confidence: Confidence::from_win_rate(win_rate),
        },
    })
}

/// The `k` most visited root children, most visited first.
pub fn analyze(tree: &SearchTree, k: usize) -> Vec<MoveAnalysis> {
    let mut children: Vec<&TreeNode> = tree.root().children.iter().map(|&c| tree.node(c)).collect();
    children.sort_by(|a, b| b.visits.cmp(&a.visits));
    children.into_iter().take(k).filter_map(describe).collect()
}
