//! Monte Carlo Tree Search (MCTS) with UCB1 selection.
//!
//! Each iteration runs the four classic phases:
//! - Selection: descend from the root through fully expanded nodes by UCB1
//! - Expansion: add one child for a random untried move
//! - Simulation: random playout from the new child
//! - Backpropagation: update visits and wins up to the root, flipping the
//!   value at every ply because the two sides want opposite outcomes
//!
//! Nodes live in an arena and refer to each other by index. Every node owns
//! its own [`Position`], so no two lines of play share mutable state.

use std::cmp::Reverse;
use std::time::{Duration, Instant};

use fastrand::Rng;
use log::{debug, trace};

use crate::analysis::{MoveAnalysis, analyze};
use crate::board::Color;
use crate::constants::{ANALYSIS_TOP_K, EXPLORATION, SIMS_STRATEGIC};
use crate::playout::rollout;
use crate::position::{Move, Position};

/// Index of a node in the search arena.
pub type NodeId = usize;

/// The root is always the first node in the arena.
pub const ROOT: NodeId = 0;

/// Parameters of a single search.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    /// Iteration budget
    pub iterations: usize,
    /// UCB1 exploration constant
    pub exploration: f64,
    /// RNG seed for reproducible searches
    pub seed: Option<u64>,
    /// Stop starting new iterations after this much time
    pub time_limit: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            iterations: SIMS_STRATEGIC,
            exploration: EXPLORATION,
            seed: None,
            time_limit: None,
        }
    }
}

/// A node in the MCTS search tree.
#[derive(Clone, Debug)]
pub struct TreeNode {
    /// The game state at this node
    pub state: Position,
    /// Back-pointer used by backpropagation
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Move that led here from the parent (`None` at the root)
    pub mv: Option<Move>,
    pub visits: u32,
    /// Accumulated value from the point of view of the player who moved into this node
    pub wins: f64,
    /// Moves from this state not yet expanded into children
    pub untried: Vec<Move>,
}

impl TreeNode {
    /// Create a node, enumerating its legal moves once.
    pub fn new(state: Position, parent: Option<NodeId>, mv: Option<Move>) -> Self {
        let untried = state.candidate_moves();
        Self {
            state,
            parent,
            children: Vec::new(),
            mv,
            visits: 0,
            wins: 0.0,
            untried,
        }
    }

    #[inline]
    pub fn win_rate(&self) -> f64 {
        if self.visits > 0 {
            self.wins / self.visits as f64
        } else {
            0.0
        }
    }

    /// The player whose move produced this state.
    pub fn mover(&self) -> Color {
        self.state.next_to_move().opponent()
    }

    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }
}

pub struct SearchTree {
    nodes: Vec<TreeNode>,
    rng: Rng,
    exploration: f64,
}

impl SearchTree {
    pub fn new(state: &Position, config: &SearchConfig) -> Self {
        let rng = config.seed.map_or_else(Rng::new, Rng::with_seed);
        Self {
            nodes: vec![TreeNode::new(state.clone(), None, None)],
            rng,
            exploration: config.exploration,
        }
    }

    pub fn root(&self) -> &TreeNode {
        &self.nodes[ROOT]
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// UCB1 score of `child`; unvisited children score infinity.
    pub fn ucb1(&self, child: NodeId) -> f64 {
        let node = &self.nodes[child];
        if node.visits == 0 {
            return f64::INFINITY;
        }
        let parent_visits = node
            .parent
            .map_or(node.visits, |p| self.nodes[p].visits)
            .max(1);
        let v = node.visits as f64;
        node.wins / v + self.exploration * ((parent_visits as f64).ln() / v).sqrt()
    }

    /// The child of `id` with the highest UCB1 score.
    pub fn select_child(&self, id: NodeId) -> Option<NodeId> {
        let children = &self.nodes[id].children;
        if let Some(&unvisited) = children.iter().find(|&&c| self.nodes[c].visits == 0) {
            return Some(unvisited);
        }
        children.iter().copied().max_by(|&a, &b| {
            self.ucb1(a)
                .partial_cmp(&self.ucb1(b))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    /// Descend from the root while nodes are fully expanded and have children.
    pub fn select(&self) -> NodeId {
        let mut id = ROOT;
        while self.nodes[id].is_fully_expanded() {
            match self.select_child(id) {
                Some(child) => id = child,
                None => break,
            }
        }
        id
    }

    /// Expand one random untried move of `id` into a new child.
    ///
    /// Returns `None` if the node has nothing left to expand.
    pub fn expand(&mut self, id: NodeId) -> Option<NodeId> {
        let untried = &mut self.nodes[id].untried;
        if untried.is_empty() {
            return None;
        }
        let pick = self.rng.usize(..untried.len());
        let mv = untried.swap_remove(pick);

        let mut state = self.nodes[id].state.clone();
        if let Err(e) = state.play(mv) {
            // Untried moves are computed from this very state, so this is unreachable.
            debug!("dropping untried move {mv}: {e}");
            return None;
        }

        let child = self.nodes.len();
        self.nodes.push(TreeNode::new(state, Some(id), Some(mv)));
        self.nodes[id].children.push(child);
        Some(child)
    }

    /// Random playout from `id`, scored for the player who moved into it.
    ///
    /// For children of the root this is the searching side, e.g. White when
    /// answering a Black move. Deeper nodes are scored for their own mover so
    /// the alternating values in [`backpropagate`](Self::backpropagate) stay consistent.
    pub fn simulate(&mut self, id: NodeId) -> f64 {
        let node = &self.nodes[id];
        let perspective = node.mover();
        let mut state = node.state.clone();
        rollout(&mut state, &mut self.rng, perspective)
    }

    /// Add `result` to `id` and alternate `1 - result` up to the root.
    pub fn backpropagate(&mut self, id: NodeId, result: f64) {
        let mut current = Some(id);
        let mut value = result;
        while let Some(nid) = current {
            let node = &mut self.nodes[nid];
            node.visits += 1;
            node.wins += value;
            value = 1.0 - value;
            current = node.parent;
        }
    }

    /// One selection / expansion / simulation / backpropagation cycle.
    pub fn iterate(&mut self) {
        let selected = self.select();
        let leaf = self.expand(selected).unwrap_or(selected);
        let result = self.simulate(leaf);
        trace!(
            "iteration: leaf {} move {:?} result {:.3}",
            leaf, self.nodes[leaf].mv, result
        );
        self.backpropagate(leaf, result);
    }

    /// The most visited child of the root (first expanded wins ties), or a
    /// pass if nothing was expanded.
    pub fn best_move(&self) -> Move {
        self.root()
            .children
            .iter()
            .map(|&c| &self.nodes[c])
            .min_by_key(|c| Reverse(c.visits))
            .and_then(|c| c.mv)
            .unwrap_or(Move::Pass)
    }
}

/// Outcome of a search.
#[derive(Clone, Debug)]
pub struct SearchResult {
    pub best: Move,
    /// Most visited root children, best first
    pub analysis: Vec<MoveAnalysis>,
    /// Iterations actually run
    pub iterations: usize,
    pub root_visits: u32,
}

/// Run MCTS from `state` and return the recommended move and its analysis.
///
/// Stops when the iteration budget is spent or, if configured, once the time
/// limit has passed. The limit is only checked between iterations.
pub fn tree_search(state: &Position, config: &SearchConfig) -> SearchResult {
    let start = Instant::now();
    let mut tree = SearchTree::new(state, config);

    let mut iterations = 0;
    while iterations < config.iterations {
        if config.time_limit.is_some_and(|limit| start.elapsed() >= limit) {
            debug!("time limit reached after {iterations} iterations");
            break;
        }
        tree.iterate();
        iterations += 1;
    }

    let best = tree.best_move();
    let analysis = analyze(&tree, ANALYSIS_TOP_K);
    debug!(
        "search done: {} iterations, {} nodes, best {} in {:?}",
        iterations,
        tree.len(),
        best,
        start.elapsed()
    );

    SearchResult {
        best,
        analysis,
        iterations,
        root_visits: tree.root().visits,
    }
}
