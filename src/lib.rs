//! Gobble: a miniature Go-like board game with an MCTS opponent.
//!
//! This crate provides the rule engine (captures, suicide, ko, territory
//! estimate) and a Monte Carlo Tree Search planner built on top of it.
//!
//! ## Modules
//!
//! - [`constants`] - Board dimensions and engine parameters
//! - [`board`] - Grid, groups, liberties and single-stone placement
//! - [`position`] - Game state with history, ko and passes
//! - [`scoring`] - Influence, territory estimate and group strength
//! - [`playout`] - Random game simulation for position evaluation
//! - [`mcts`] - Monte Carlo Tree Search with UCB1
//! - [`analysis`] - Ranked summary of the candidate moves
//! - [`config`] - Engine configuration
//! - [`console`] - Text command loop
//! - [`logging`] - Logger setup
//!
//! ## Example
//!
//! ```
//! use gobble::board::Color;
//! use gobble::mcts::{SearchConfig, tree_search};
//! use gobble::position::Position;
//!
//! // Create a new game and play a move
//! let mut pos = Position::new();
//! pos.apply_move(2, 2, Color::Black).unwrap();
//!
//! // Run MCTS to find White's answer
//! let config = SearchConfig { iterations: 50, seed: Some(1), ..SearchConfig::default() };
//! let result = tree_search(&pos, &config);
//! println!("White plays {}", result.best);
//! ```

pub mod analysis;
pub mod board;
pub mod config;
pub mod console;
pub mod constants;
pub mod logging;
pub mod mcts;
pub mod playout;
pub mod position;
pub mod scoring;
