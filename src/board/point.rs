//! Board locations and checker moves.
//!
//! Points are numbered 1–24 from white's side: white travels 24 → 1 and
//! bears off below 1, black travels 1 → 24 and bears off above 24.
//! A move starts at a point or the bar and ends at a point or off the board.

use serde::{Deserialize, Serialize};

use crate::core::{DieValue, Player};

/// Number of points on the board.
pub const NUM_POINTS: usize = 24;

/// A point number in `1..=24`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Point(u8);

impl Point {
    /// Create a point, returning `None` outside `1..=24`.
    #[must_use]
    pub const fn new(number: u8) -> Option<Self> {
        if number >= 1 && number as usize <= NUM_POINTS {
            Some(Self(number))
        } else {
            None
        }
    }

    /// Create a point from a signed number, `None` when off the board.
    #[must_use]
    pub fn from_i8(number: i8) -> Option<Self> {
        u8::try_from(number).ok().and_then(Self::new)
    }

    /// The point number (1-based).
    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Index into the point array (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// All points in ascending order.
    pub fn all() -> impl DoubleEndedIterator<Item = Point> {
        (1..=NUM_POINTS as u8).map(Point)
    }

    /// Whether this point is in `player`'s home board
    /// (1–6 for white, 19–24 for black).
    #[must_use]
    pub const fn is_home(self, player: Player) -> bool {
        match player {
            Player::White => self.0 <= 6,
            Player::Black => self.0 >= 19,
        }
    }

    /// Pips `player` still needs to bear a checker off from here.
    #[must_use]
    pub const fn distance_home(self, player: Player) -> u8 {
        match player {
            Player::White => self.0,
            Player::Black => 25 - self.0,
        }
    }

    /// The point where `player` enters from the bar with `die`.
    #[must_use]
    pub const fn entry(player: Player, die: DieValue) -> Point {
        match player {
            Player::White => Point(25 - die.get()),
            Player::Black => Point(die.get()),
        }
    }
}

impl TryFrom<u8> for Point {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Point::new(value).ok_or_else(|| format!("point {value} is outside 1..=24"))
    }
}

impl From<Point> for u8 {
    fn from(point: Point) -> u8 {
        point.0
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a moving checker comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Bar,
    Point(Point),
}

impl Origin {
    /// Shorthand for a point origin. Panics on an invalid point number;
    /// meant for literals in tests and examples.
    #[must_use]
    pub fn point(number: u8) -> Self {
        match Point::new(number) {
            Some(p) => Origin::Point(p),
            None => panic!("invalid point number {number}"),
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::Bar => write!(f, "bar"),
            Origin::Point(p) => write!(f, "{p}"),
        }
    }
}

/// Where a moving checker lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    Point(Point),
    Off,
}

impl Destination {
    /// Shorthand for a point destination. Panics on an invalid point
    /// number; meant for literals in tests and examples.
    #[must_use]
    pub fn point(number: u8) -> Self {
        match Point::new(number) {
            Some(p) => Destination::Point(p),
            None => panic!("invalid point number {number}"),
        }
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Destination::Off => write!(f, "off"),
            Destination::Point(p) => write!(f, "{p}"),
        }
    }
}

/// One checker moved by one die.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Origin,
    pub to: Destination,
    pub die_used: DieValue,
}

impl Move {
    #[must_use]
    pub const fn new(from: Origin, to: Destination, die_used: DieValue) -> Self {
        Self { from, to, die_used }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.from, self.to)
    }
}
