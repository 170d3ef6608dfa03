//! The doubling cube.
//!
//! `owner` records the side that last doubled and had the double taken.
//! That side may not double again; its opponent may. A centered cube can be
//! turned by either side.
//!
//! This engine gives a taken cube to the proposer, not to the taker as in
//! standard backgammon. The rule is deliberate: after a take the side that
//! accepted is the one free to redouble next.

use serde::{Deserialize, Serialize};

use crate::core::Player;

/// Who holds the cube.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CubeOwner {
    Centered,
    Owned(Player),
}

/// Cube value and ownership.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DoublingCube {
    pub value: u32,
    pub owner: CubeOwner,
}

impl Default for DoublingCube {
    fn default() -> Self {
        Self::centered()
    }
}

impl DoublingCube {
    /// Value 1, in the middle.
    #[must_use]
    pub const fn centered() -> Self {
        Self {
            value: 1,
            owner: CubeOwner::Centered,
        }
    }

    /// Whether `player` holds the cube.
    #[must_use]
    pub fn is_held_by(&self, player: Player) -> bool {
        self.owner == CubeOwner::Owned(player)
    }

    /// Whether `player` is allowed to turn the cube, ignoring the cap.
    #[must_use]
    pub fn may_double(&self, player: Player) -> bool {
        !self.is_held_by(player)
    }

    /// Whether another double would exceed `max_value`.
    #[must_use]
    pub fn is_at_max(&self, max_value: u32) -> bool {
        self.value.saturating_mul(2) > max_value
    }

    /// The cube after `accepter` takes a double: twice the value, held by
    /// the proposer.
    #[must_use]
    pub fn accepted_by(&self, accepter: Player) -> Self {
        Self {
            value: self.value.saturating_mul(2),
            owner: CubeOwner::Owned(accepter.opponent()),
        }
    }
}
