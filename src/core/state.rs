//! Game state: the single source of truth for one game.
//!
//! ## GameState
//!
//! Immutable by replacement: commands never edit a state in place, they
//! produce the next one through the reducer. The two logs (`history` and
//! `action_history`) only grow until an explicit reset.
//!
//! Uses `im` persistent vectors for the logs so a whole state clones in
//! O(1), which keeps speculative batches and snapshots cheap.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::action::GameAction;
use super::dice::{DiceRoll, DieValue, RemainingDice};
use super::player::Player;
use crate::board::{Board, Move};
use crate::cube::DoublingCube;

/// Stage of the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    NotStarted,
    RollingForFirst,
    Rolling,
    Moving,
    GameOver,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::NotStarted => "not started",
            Phase::RollingForFirst => "rolling for first",
            Phase::Rolling => "rolling",
            Phase::Moving => "moving",
            Phase::GameOver => "game over",
        };
        f.write_str(name)
    }
}

/// How decisively a game was won.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VictoryType {
    Single,
    Gammon,
    Backgammon,
}

impl VictoryType {
    /// Points multiplier: 1, 2 or 3.
    #[must_use]
    pub const fn multiplier(self) -> u32 {
        match self {
            VictoryType::Single => 1,
            VictoryType::Gammon => 2,
            VictoryType::Backgammon => 3,
        }
    }
}

/// Winner of a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameResult {
    pub winner: Player,
    pub victory_type: VictoryType,
}

/// A move as played, with whether it hit. Kept for undo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayedMove {
    #[serde(rename = "move")]
    pub mv: Move,
    pub hit: bool,
}

/// Summary of one completed turn.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnSummary {
    pub turn_number: u32,
    pub player: Player,
    pub dice: Option<DiceRoll>,
    pub moves: Vec<PlayedMove>,
}

/// Complete state of one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,

    /// Side to act. `None` before the game starts.
    pub current_player: Option<Player>,

    pub phase: Phase,

    /// Dice rolled this turn (the opening pair on the first turn).
    pub dice_roll: Option<DiceRoll>,

    /// Dice not yet played this turn.
    pub remaining_moves: RemainingDice,

    /// Turn counter, 1 on the first turn.
    pub turn_number: u32,

    /// Moves played so far this turn, oldest first. The undo stack.
    pub moves_this_turn: Vector<PlayedMove>,

    pub result: Option<GameResult>,

    /// Completed turns.
    pub history: Vector<TurnSummary>,

    /// Every accepted action, in order.
    pub action_history: Vector<GameAction>,

    /// `None` when the cube is not in play for this game.
    pub doubling_cube: Option<DoublingCube>,

    /// Side with an unanswered double.
    pub double_proposed_by: Option<Player>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// A game that has not started: standard board, nobody on turn.
    #[must_use]
    pub fn new() -> Self {
        Self {
            board: Board::standard(),
            current_player: None,
            phase: Phase::NotStarted,
            dice_roll: None,
            remaining_moves: RemainingDice::new(),
            turn_number: 0,
            moves_this_turn: Vector::new(),
            result: None,
            history: Vector::new(),
            action_history: Vector::new(),
            doubling_cube: None,
            double_proposed_by: None,
        }
    }

    /// A game in progress at an arbitrary position, `player` to roll.
    ///
    /// Used to set up positions for analysis and tests; the action log
    /// starts empty, so replaying it does not reproduce such a state.
    #[must_use]
    pub fn with_position(board: Board, player: Player) -> Self {
        Self {
            board,
            current_player: Some(player),
            phase: Phase::Rolling,
            turn_number: 1,
            ..Self::new()
        }
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Stake of the game: the cube value, or 1 without a cube.
    #[must_use]
    pub fn cube_value(&self) -> u32 {
        self.doubling_cube.map_or(1, |cube| cube.value)
    }

    /// Distinct die values still to play, highest first.
    #[must_use]
    pub fn distinct_remaining(&self) -> Vec<DieValue> {
        let mut dice: Vec<DieValue> = self.remaining_moves.to_vec();
        dice.sort_unstable_by(|a, b| b.cmp(a));
        dice.dedup();
        dice
    }

    /// The most recent action, if any.
    #[must_use]
    pub fn last_action(&self) -> Option<&GameAction> {
        self.action_history.last()
    }
}
