//! Core engine types: players, dice, RNG, configuration, actions, state, errors.
//!
//! These are the building blocks every other module shares. Nothing here
//! knows the movement rules; see `rules` and `engine` for those.

pub mod player;
pub mod dice;
pub mod rng;
pub mod config;
pub mod action;
pub mod state;
pub mod error;

pub use player::{Player, PlayerMap};
pub use dice::{DiceRoll, DieValue, RemainingDice};
pub use rng::{GameRng, GameRngState};
pub use config::{GameConfig, MatchConfig, MAX_CUBE_VALUE};
pub use action::GameAction;
pub use state::{GameResult, GameState, Phase, PlayedMove, TurnSummary, VictoryType};
pub use error::{CommandError, DoubleRejection, ErrorKind, Failure, IllegalMoveReason};
