//! Game and match configuration.
//!
//! - `GameConfig`: dice seed and doubling cube settings for a session
//! - `MatchConfig`: target score and cube availability for a match

use serde::{Deserialize, Serialize};

/// Highest value the doubling cube can reach.
pub const MAX_CUBE_VALUE: u32 = 64;

/// Session-level configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Seed for the dice stream.
    /// Same seed and same commands produce the same game.
    pub seed: u64,

    /// Whether games outside a match use the doubling cube.
    /// Inside a match, `MatchConfig::enable_doubling_cube` decides.
    pub enable_doubling_cube: bool,

    /// Cap on the cube value. Proposals at this value are refused.
    pub max_cube_value: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            enable_doubling_cube: true,
            max_cube_value: MAX_CUBE_VALUE,
        }
    }
}

impl GameConfig {
    /// Use a custom dice seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable or disable the cube for unmatched games.
    pub fn with_doubling_cube(mut self, enabled: bool) -> Self {
        self.enable_doubling_cube = enabled;
        self
    }

    /// Use a custom cube cap, clamped to `2..=MAX_CUBE_VALUE`.
    pub fn with_max_cube_value(mut self, value: u32) -> Self {
        self.max_cube_value = value.clamp(2, MAX_CUBE_VALUE);
        self
    }
}

/// Configuration of a scored series of games.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Points needed to win the match.
    pub target_score: u32,

    /// Whether the cube is in play (subject to the Crawford rule).
    pub enable_doubling_cube: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            target_score: 5,
            enable_doubling_cube: true,
        }
    }
}

impl MatchConfig {
    /// Match to `target_score` points with the cube enabled.
    pub fn new(target_score: u32) -> Self {
        Self {
            target_score: target_score.max(1),
            ..Self::default()
        }
    }

    /// Enable or disable the cube for the whole match.
    pub fn with_doubling_cube(mut self, enabled: bool) -> Self {
        self.enable_doubling_cube = enabled;
        self
    }
}
