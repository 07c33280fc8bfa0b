//! Engine configuration.
//!
//! A [`Config`] value is built once (defaults, optionally a JSON file, then
//! command-line overrides) and passed explicitly to whatever needs it.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, ensure};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    BOARD_SIZE, EXPLORATION, SIMS_ANALYTICAL, SIMS_DISCOVERY, SIMS_GUIDED, SIMS_MASTERY,
    SIMS_STRATEGIC,
};
use crate::mcts::SearchConfig;

/// Difficulty tier. Each tier only changes the simulation budget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Discovery,
    #[default]
    Guided,
    Strategic,
    Analytical,
    Mastery,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Discovery,
        Difficulty::Guided,
        Difficulty::Strategic,
        Difficulty::Analytical,
        Difficulty::Mastery,
    ];

    /// MCTS iterations per move at this tier.
    pub fn simulations(self) -> usize {
        match self {
            Difficulty::Discovery => SIMS_DISCOVERY,
            Difficulty::Guided => SIMS_GUIDED,
            Difficulty::Strategic => SIMS_STRATEGIC,
            Difficulty::Analytical => SIMS_ANALYTICAL,
            Difficulty::Mastery => SIMS_MASTERY,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Discovery => "discovery",
            Difficulty::Guided => "guided",
            Difficulty::Strategic => "strategic",
            Difficulty::Analytical => "analytical",
            Difficulty::Mastery => "mastery",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown difficulty {0:?} (expected discovery, guided, strategic, analytical or mastery)")]
pub struct ParseDifficultyError(String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Difficulty::ALL
            .into_iter()
            .find(|d| d.name() == lower)
            .ok_or_else(|| ParseDifficultyError(s.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub board_size: usize,
    pub difficulty: Difficulty,
    /// UCB1 exploration constant
    pub exploration: f64,
    /// Seed for reproducible searches
    pub seed: Option<u64>,
    /// Render the influence overlay with the board
    pub show_influence: bool,
    /// Per-move search deadline in milliseconds
    pub time_limit_ms: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            board_size: BOARD_SIZE,
            difficulty: Difficulty::default(),
            exploration: EXPLORATION,
            seed: None,
            show_influence: false,
            time_limit_ms: None,
        }
    }
}

impl Config {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            (2..=19).contains(&self.board_size),
            "board size must be between 2 and 19, got {}",
            self.board_size
        );
        ensure!(
            self.exploration.is_finite() && self.exploration >= 0.0,
            "exploration constant must be a non-negative number, got {}",
            self.exploration
        );
        Ok(())
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            iterations: self.difficulty.simulations(),
            exploration: self.exploration,
            seed: self.seed,
            time_limit: self.time_limit_ms.map(Duration::from_millis),
        }
    }
}
