//! Game actions: the entries of the append-only event log.
//!
//! Every accepted command becomes one or more `GameAction`s. The reducer in
//! `engine::reducer` folds them into the next `GameState`, so the log alone
//! replays a game. Dice values live in the actions themselves; nothing in
//! the log depends on RNG state.

use serde::{Deserialize, Serialize};

use super::dice::{DiceRoll, DieValue};
use super::player::Player;
use crate::board::{Destination, Move, Origin};

/// One recorded event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameAction {
    /// Opening roll resolved; the winner plays both opening dice.
    #[serde(rename = "game_start")]
    GameStarted {
        first_player: Player,
        white_roll: DieValue,
        black_roll: DieValue,
        cube_enabled: bool,
    },

    /// First player chosen directly; that player rolls normally.
    FirstPlayerSet { player: Player, cube_enabled: bool },

    #[serde(rename = "dice_roll")]
    DiceRolled {
        player: Player,
        roll: DiceRoll,
        turn_forfeited: bool,
    },

    #[serde(rename = "piece_move")]
    PieceMoved {
        player: Player,
        from: Origin,
        to: Destination,
        die_used: DieValue,
        hit: bool,
    },

    /// The most recent move of the turn taken back.
    #[serde(rename = "undo_move")]
    MoveUndone {
        player: Player,
        from: Origin,
        to: Destination,
        die_used: DieValue,
        hit: bool,
    },

    #[serde(rename = "turn_end")]
    TurnEnded { player: Player },

    #[serde(rename = "propose_double")]
    DoubleProposed { player: Player },

    /// `player` is the side that took the double.
    #[serde(rename = "accept_double")]
    DoubleAccepted { player: Player },

    /// `player` is the side that passed and lost the game.
    #[serde(rename = "decline_double")]
    DoubleDeclined { player: Player },
}

impl GameAction {
    /// The side the action belongs to.
    #[must_use]
    pub fn player(&self) -> Player {
        match *self {
            GameAction::GameStarted { first_player, .. } => first_player,
            GameAction::FirstPlayerSet { player, .. }
            | GameAction::DiceRolled { player, .. }
            | GameAction::PieceMoved { player, .. }
            | GameAction::MoveUndone { player, .. }
            | GameAction::TurnEnded { player }
            | GameAction::DoubleProposed { player }
            | GameAction::DoubleAccepted { player }
            | GameAction::DoubleDeclined { player } => player,
        }
    }

    /// Record of `player` playing `mv`.
    #[must_use]
    pub fn piece_moved(player: Player, mv: Move, hit: bool) -> Self {
        GameAction::PieceMoved {
            player,
            from: mv.from,
            to: mv.to,
            die_used: mv.die_used,
            hit,
        }
    }

    /// The move carried by a `PieceMoved` or `MoveUndone` action.
    #[must_use]
    pub fn checker_move(&self) -> Option<Move> {
        match *self {
            GameAction::PieceMoved { from, to, die_used, .. }
            | GameAction::MoveUndone { from, to, die_used, .. } => {
                Some(Move::new(from, to, die_used))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player() {
        let action = GameAction::DoubleAccepted { player: Player::Black };
        assert_eq!(action.player(), Player::Black);

        let start = GameAction::GameStarted {
            first_player: Player::White,
            white_roll: DieValue::new(5).unwrap(),
            black_roll: DieValue::new(2).unwrap(),
            cube_enabled: true,
        };
        assert_eq!(start.player(), Player::White);
    }

    #[test]
    fn test_checker_move() {
        let mv = Move::new(Origin::point(8), Destination::point(5), DieValue::new(3).unwrap());
        let action = GameAction::piece_moved(Player::White, mv, false);
        assert_eq!(action.checker_move(), Some(mv));
        assert_eq!(GameAction::TurnEnded { player: Player::White }.checker_move(), None);
    }

    #[test]
    fn test_action_serialization() {
        let action = GameAction::TurnEnded { player: Player::White };
        let json = serde_json::to_string(&action).unwrap();
        assert_eq!(json, r#"{"turn_end":{"player":"white"}}"#);

        let mv = Move::new(Origin::Bar, Destination::point(3), DieValue::new(3).unwrap());
        let moved = GameAction::piece_moved(Player::Black, mv, true);
        let json = serde_json::to_string(&moved).unwrap();
        let back: GameAction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, moved);
    }
}
