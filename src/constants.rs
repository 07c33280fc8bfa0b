//! Constants for board dimensions, search parameters, and evaluation weights.
//!
//! These are the defaults. Everything that varies per game (board size,
//! exploration constant, simulation budget) is carried by
//! [`Config`](crate::config::Config) and threaded explicitly into the engine.

// =============================================================================
// Board Geometry
// =============================================================================

/// Default board size (NxN).
pub const BOARD_SIZE: usize = 5;

/// Orthogonal neighbour offsets as (row, col): North, South, West, East.
pub const NEIGHBORS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

// =============================================================================
// Evaluation
// =============================================================================

/// Stones within this Chebyshev distance project influence onto an empty cell.
pub const INFLUENCE_RADIUS: usize = 2;

/// Influence magnitude an empty cell needs before it counts as territory.
pub const TERRITORY_THRESHOLD: f64 = 0.5;

/// Fractional credit for an empty cell that counts as territory.
pub const TERRITORY_CREDIT: f64 = 0.7;

/// Per-liberty bonus used by the static position heuristic.
pub const LIBERTY_WEIGHT: f64 = 0.1;

// =============================================================================
// MCTS Parameters
// =============================================================================

/// UCB1 exploration constant (sqrt 2).
pub const EXPLORATION: f64 = std::f64::consts::SQRT_2;

/// Probability that a rollout plays a random legal move instead of passing.
pub const PROB_ROLLOUT_MOVE: f64 = 0.9;

/// Rollouts stop after `ROLLOUT_PLY_FACTOR * N * N` plies.
pub const ROLLOUT_PLY_FACTOR: usize = 2;

/// Number of candidate moves reported by the move analysis.
pub const ANALYSIS_TOP_K: usize = 5;

/// Win rate at or above which a candidate is reported as strong.
pub const STRONG_WIN_RATE: f64 = 0.6;

/// Win rate at or above which a candidate is reported as promising.
pub const PROMISING_WIN_RATE: f64 = 0.5;

// =============================================================================
// Simulation Budgets (per difficulty tier)
// =============================================================================

pub const SIMS_DISCOVERY: usize = 100;
pub const SIMS_GUIDED: usize = 250;
pub const SIMS_STRATEGIC: usize = 500;
pub const SIMS_ANALYTICAL: usize = 1000;
pub const SIMS_MASTERY: usize = 2000;
