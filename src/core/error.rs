//! Command failures.
//!
//! Every rejected command yields a `CommandError` and leaves the state
//! untouched. `kind()` gives a stable tag for callers that dispatch on the
//! failure; `Display` is the human-readable message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::dice::DieValue;
use super::player::Player;
use super::state::Phase;
use crate::board::{Move, Point};

/// The specific rule a rejected move breaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum IllegalMoveReason {
    #[error("no checker of yours on point {0}")]
    NoCheckerAtOrigin(Point),

    #[error("you have no checker on the bar")]
    NothingOnBar,

    #[error("checkers on the bar must enter before any other move")]
    BarPriority,

    #[error("die {0} is not among the remaining dice")]
    DieNotAvailable(DieValue),

    #[error("a {0} does not move the checker to that destination")]
    WrongDistance(DieValue),

    #[error("point {0} is blocked by two or more opposing checkers")]
    Blocked(Point),

    #[error("cannot bear off until all checkers are in the home board")]
    NotAllHome,

    #[error("a checker on a higher point must use the {0} first")]
    MustBearOffFarthest(DieValue),

    #[error("only one die can be played and it must be the higher die ({0})")]
    HigherDieRequired(DieValue),

    #[error("another play uses more of the dice")]
    MustUseAllDice,

    #[error("move is not legal in this position")]
    NotLegal,
}

/// Why a double cannot be offered or answered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DoubleRejection {
    #[error("the doubling cube is not in use for this game")]
    CubeDisabled,

    #[error("doubling is disabled in the Crawford game")]
    CrawfordGame,

    #[error("{0} holds the cube and cannot double")]
    HoldsCube(Player),

    #[error("the cube is already at its maximum of {0}")]
    AtMaximum(u32),

    #[error("a double is already pending")]
    ProposalPending,

    #[error("there is no double to answer")]
    NoProposal,
}

/// Stable failure tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidCommandForPhase,
    IllegalMove,
    NotPlayersTurn,
    NothingToUndo,
    NoCurrentPlayer,
    MovesRemaining,
    DoubleNotAllowed,
    DoublePending,
    MatchNotInProgress,
}

/// A rejected command.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("cannot {command} during the {phase} phase")]
    InvalidCommandForPhase { command: &'static str, phase: Phase },

    #[error("illegal move {mv}: {reason}")]
    IllegalMove { mv: Move, reason: IllegalMoveReason },

    #[error("it is {expected}'s turn, not {actual}'s")]
    NotPlayersTurn { expected: Player, actual: Player },

    #[error("no moves to undo this turn")]
    NothingToUndo,

    #[error("no player is on turn yet")]
    NoCurrentPlayer,

    #[error("cannot end the turn: {remaining} dice left and a legal move is available")]
    MovesRemaining { remaining: usize },

    #[error("double not allowed: {0}")]
    DoubleNotAllowed(DoubleRejection),

    #[error("a double is pending and must be accepted or declined first")]
    DoublePending,

    #[error("no match is in progress")]
    MatchNotInProgress,
}

impl CommandError {
    /// The failure tag.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommandError::InvalidCommandForPhase { .. } => ErrorKind::InvalidCommandForPhase,
            CommandError::IllegalMove { .. } => ErrorKind::IllegalMove,
            CommandError::NotPlayersTurn { .. } => ErrorKind::NotPlayersTurn,
            CommandError::NothingToUndo => ErrorKind::NothingToUndo,
            CommandError::NoCurrentPlayer => ErrorKind::NoCurrentPlayer,
            CommandError::MovesRemaining { .. } => ErrorKind::MovesRemaining,
            CommandError::DoubleNotAllowed(_) => ErrorKind::DoubleNotAllowed,
            CommandError::DoublePending => ErrorKind::DoublePending,
            CommandError::MatchNotInProgress => ErrorKind::MatchNotInProgress,
        }
    }

    /// Plain `{kind, message}` form for callers outside the engine.
    #[must_use]
    pub fn to_failure(&self) -> Failure {
        Failure {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

/// Serializable failure payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
}
