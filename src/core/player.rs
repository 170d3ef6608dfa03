//! Player identification and per-player data storage.
//!
//! ## Player
//!
//! Backgammon is strictly two-sided. White moves from point 24 toward
//! point 1 and bears off below point 1; black moves from point 1 toward
//! point 24 and bears off above point 24.
//!
//! ## PlayerMap
//!
//! A `{white, black}` pair indexable by `Player`. Serializes as a plain
//! object with `white` and `black` fields.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One side of the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Player {
    White,
    Black,
}

impl Player {
    /// Both players, white first.
    pub const ALL: [Player; 2] = [Player::White, Player::Black];

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    /// Direction of travel along point numbers: -1 for white, +1 for black.
    #[must_use]
    pub const fn direction(self) -> i8 {
        match self {
            Player::White => -1,
            Player::Black => 1,
        }
    }

    /// Sign used for this player's checkers in the point array.
    #[must_use]
    pub const fn sign(self) -> i8 {
        match self {
            Player::White => 1,
            Player::Black => -1,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::White => write!(f, "White"),
            Player::Black => write!(f, "Black"),
        }
    }
}

/// Per-player data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use backgammon_engine::core::{Player, PlayerMap};
///
/// let mut bar: PlayerMap<u8> = PlayerMap::default();
/// bar[Player::Black] += 1;
///
/// assert_eq!(bar[Player::White], 0);
/// assert_eq!(bar[Player::Black], 1);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    pub white: T,
    pub black: T,
}

impl<T> PlayerMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(factory: impl Fn(Player) -> T) -> Self {
        Self {
            white: factory(Player::White),
            black: factory(Player::Black),
        }
    }

    /// Create a map with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            white: value.clone(),
            black: value,
        }
    }

    /// Get a reference to a player's data.
    #[must_use]
    pub fn get(&self, player: Player) -> &T {
        match player {
            Player::White => &self.white,
            Player::Black => &self.black,
        }
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: Player) -> &mut T {
        match player {
            Player::White => &mut self.white,
            Player::Black => &mut self.black,
        }
    }

    /// Iterate over (Player, &T) pairs, white first.
    pub fn iter(&self) -> impl Iterator<Item = (Player, &T)> {
        [(Player::White, &self.white), (Player::Black, &self.black)].into_iter()
    }
}

impl<T> Index<Player> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: Player) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<Player> for PlayerMap<T> {
    fn index_mut(&mut self, player: Player) -> &mut Self::Output {
        self.get_mut(player)
    }
}
