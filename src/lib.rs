//! # backgammon-engine
//!
//! A deterministic rules and state engine for backgammon: board, dice,
//! legal moves, turn sequencing, the doubling cube and match scoring.
//!
//! ## Design Principles
//!
//! 1. **Immutable by Replacement**: A `GameState` is never edited in place.
//!    Every accepted command yields a new state through a single reducer.
//!
//! 2. **Replayable**: Each accepted command is logged as `GameAction`s that
//!    carry their dice. Folding the log from a fresh state reproduces the
//!    game exactly, with no RNG involved.
//!
//! 3. **Total Commands**: A command either commits completely or returns a
//!    `CommandError` and changes nothing. Only a broken internal invariant
//!    panics.
//!
//! ## Architecture
//!
//! - **White-Relative Board**: Positions are stored from white's side.
//!   Per-player views are a pure transform in `perspective`.
//!
//! - **Persistent Data Structures**: The logs are `im` vectors, so whole
//!   states clone in O(1) for speculative batches and snapshots.
//!
//! ## Modules
//!
//! - `core`: Players, dice, RNG, configuration, actions, state, errors
//! - `board`: Points, moves, and the board with its appliers
//! - `rules`: Move generation, the higher-die rule, victory classification
//! - `cube`: Doubling cube and match scoring with the Crawford rule
//! - `engine`: Reducer, validated commands, replay and summaries
//! - `session`: State holder exposing the command surface
//! - `perspective`: Per-player board views
//! - `snapshot`: Binary snapshots of a session

pub mod core;
pub mod board;
pub mod rules;
pub mod cube;
pub mod engine;
pub mod session;
pub mod perspective;
pub mod snapshot;

// Re-export commonly used types
pub use crate::core::{
    Player, PlayerMap,
    DiceRoll, DieValue, RemainingDice,
    GameRng, GameRngState,
    GameConfig, MatchConfig, MAX_CUBE_VALUE,
    GameAction,
    GameResult, GameState, Phase, PlayedMove, TurnSummary, VictoryType,
    CommandError, DoubleRejection, ErrorKind, Failure, IllegalMoveReason,
};

pub use crate::board::{
    Board, BoardError, Destination, Move, Origin, Point, CHECKERS_PER_PLAYER, NUM_POINTS,
};

pub use crate::rules::{
    filter_moves_by_die, get_required_moves, get_valid_moves, legal_moves,
    MoveDestination, RequiredMoves, ValidMove,
};

pub use crate::cube::{CubeOwner, DoublingCube, GameRecord, MatchPhase, MatchState};

pub use crate::engine::{
    apply_action, replay, CommandResult, Committed, MoveOutcome, OpeningRoll, RollOutcome,
};

pub use crate::session::Session;

pub use crate::snapshot::{SessionSnapshot, SnapshotError};
