//! Die values and dice rolls.

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

/// Dice still to be played this turn. Never more than four (doubles).
pub type RemainingDice = SmallVec<[DieValue; 4]>;

/// A single die face in `1..=6`.
///
/// Construction is validated, so every `DieValue` in the engine is in range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DieValue(u8);

impl DieValue {
    /// All six faces in ascending order.
    pub const ALL: [DieValue; 6] = [
        DieValue(1),
        DieValue(2),
        DieValue(3),
        DieValue(4),
        DieValue(5),
        DieValue(6),
    ];

    /// Create a die value, returning `None` outside `1..=6`.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value >= 1 && value <= 6 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// The face value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for DieValue {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        DieValue::new(value).ok_or_else(|| format!("die value {value} is outside 1..=6"))
    }
}

impl From<DieValue> for u8 {
    fn from(die: DieValue) -> u8 {
        die.0
    }
}

impl std::fmt::Display for DieValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Two dice as rolled. Faces keep the order they were thrown in, but two
/// rolls showing the same faces compare equal.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct DiceRoll {
    pub die1: DieValue,
    pub die2: DieValue,
}

impl DiceRoll {
    #[must_use]
    pub const fn new(die1: DieValue, die2: DieValue) -> Self {
        Self { die1, die2 }
    }

    /// Build a roll from raw faces, `None` if either is out of range.
    ///
    /// ```
    /// use backgammon_engine::core::DiceRoll;
    ///
    /// let roll = DiceRoll::from_values(3, 1).unwrap();
    /// assert!(!roll.is_double());
    /// assert!(DiceRoll::from_values(0, 4).is_none());
    /// ```
    #[must_use]
    pub fn from_values(die1: u8, die2: u8) -> Option<Self> {
        Some(Self::new(DieValue::new(die1)?, DieValue::new(die2)?))
    }

    #[must_use]
    pub fn is_double(&self) -> bool {
        self.die1 == self.die2
    }

    /// Higher face of the two.
    #[must_use]
    pub fn high(&self) -> DieValue {
        self.die1.max(self.die2)
    }

    /// Lower face of the two.
    #[must_use]
    pub fn low(&self) -> DieValue {
        self.die1.min(self.die2)
    }

    /// The dice this roll entitles the mover to play: four of a kind on
    /// doubles, otherwise the two faces in rolled order.
    #[must_use]
    pub fn moves(&self) -> RemainingDice {
        if self.is_double() {
            smallvec![self.die1; 4]
        } else {
            smallvec![self.die1, self.die2]
        }
    }
}

impl PartialEq for DiceRoll {
    fn eq(&self, other: &Self) -> bool {
        self.high() == other.high() && self.low() == other.low()
    }
}

impl Eq for DiceRoll {}

impl std::hash::Hash for DiceRoll {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.high().hash(state);
        self.low().hash(state);
    }
}

impl std::fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.die1, self.die2)
    }
}
