//! Replay and summaries of the action log.
//!
//! Because dice values are recorded in the actions, `replay` needs no RNG:
//! folding a game's `action_history` from a fresh state reproduces it
//! exactly. Summaries use the usual `8/5 6/5*` notation.

use super::reducer::apply_action;
use crate::core::{GameAction, GameState, PlayedMove, TurnSummary};

/// Fold `actions` into a fresh state.
#[must_use]
pub fn replay<'a>(actions: impl IntoIterator<Item = &'a GameAction>) -> GameState {
    actions
        .into_iter()
        .fold(GameState::new(), |state, action| apply_action(&state, action))
}

/// The state after the first `count` actions of `state`'s log.
#[must_use]
pub fn replay_to(state: &GameState, count: usize) -> GameState {
    replay(state.action_history.iter().take(count))
}

/// Whether the log reproduces `state`.
#[must_use]
pub fn replays_to(state: &GameState) -> bool {
    replay(state.action_history.iter()) == *state
}

/// One move in notation, starred when it hit.
#[must_use]
pub fn format_played(played: &PlayedMove) -> String {
    if played.hit {
        format!("{}*", played.mv)
    } else {
        played.mv.to_string()
    }
}

/// Moves of a turn in notation, space separated.
#[must_use]
pub fn format_moves(moves: &[PlayedMove]) -> String {
    moves.iter().map(format_played).collect::<Vec<_>>().join(" ")
}

/// `"Turn 3: Black 6-4: 24/18 13/9"`, or `"... (no move)"` for a dance.
#[must_use]
pub fn summarize_turn(turn: &TurnSummary) -> String {
    let dice = turn.dice.map_or_else(|| "-".to_string(), |d| d.to_string());
    let moves = if turn.moves.is_empty() {
        "(no move)".to_string()
    } else {
        format_moves(&turn.moves)
    };
    format!("Turn {}: {} {}: {}", turn.turn_number, turn.player, dice, moves)
}

/// Every completed turn of the game, one line each.
#[must_use]
pub fn summarize_game(state: &GameState) -> Vec<String> {
    state.history.iter().map(summarize_turn).collect()
}

/// A short line describing one action.
#[must_use]
pub fn describe_action(action: &GameAction) -> String {
    match *action {
        GameAction::GameStarted {
            first_player,
            white_roll,
            black_roll,
            ..
        } => format!("Opening roll White {white_roll}, Black {black_roll}: {first_player} starts"),
        GameAction::FirstPlayerSet { player, .. } => format!("{player} starts"),
        GameAction::DiceRolled {
            player,
            roll,
            turn_forfeited,
        } => {
            if turn_forfeited {
                format!("{player} rolls {roll} and cannot move")
            } else {
                format!("{player} rolls {roll}")
            }
        }
        GameAction::PieceMoved { player, hit, .. } => match action.checker_move() {
            Some(mv) => format!("{player} plays {}", format_played(&PlayedMove { mv, hit })),
            None => format!("{player} moves"),
        },
        GameAction::MoveUndone { player, .. } => match action.checker_move() {
            Some(mv) => format!("{player} takes back {mv}"),
            None => format!("{player} takes back a move"),
        },
        GameAction::TurnEnded { player } => format!("{player} ends the turn"),
        GameAction::DoubleProposed { player } => format!("{player} doubles"),
        GameAction::DoubleAccepted { player } => format!("{player} takes"),
        GameAction::DoubleDeclined { player } => format!("{player} passes"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Destination, Move, Origin};
    use crate::core::{DiceRoll, DieValue, GameRng, Player};
    use crate::engine::commands::{
        perform_end_turn, perform_moves, perform_roll_dice, perform_set_first_player,
    };

    fn die(v: u8) -> DieValue {
        DieValue::new(v).unwrap()
    }

    fn one_turn() -> GameState {
        let mut rng = GameRng::new(9);
        let state = perform_set_first_player(&GameState::new(), Player::White, true).unwrap().state;
        let state = perform_roll_dice(&state, &mut rng, DiceRoll::from_values(3, 1)).unwrap().state;
        let moves = [
            Move::new(Origin::point(8), Destination::point(5), die(3)),
            Move::new(Origin::point(6), Destination::point(5), die(1)),
        ];
        let state = perform_moves(&state, &moves).unwrap().state;
        perform_end_turn(&state).unwrap().state
    }

    #[test]
    fn test_replay_reproduces_state() {
        let state = one_turn();
        assert!(replays_to(&state));
        assert_eq!(replay(state.action_history.iter()), state);
    }

    #[test]
    fn test_replay_to_prefix() {
        let state = one_turn();
        let after_roll = replay_to(&state, 2);
        assert_eq!(after_roll.remaining_moves.len(), 2);
        assert_eq!(replay_to(&state, 0), GameState::new());
    }

    #[test]
    fn test_summaries() {
        let state = one_turn();
        assert_eq!(summarize_game(&state), vec!["Turn 1: White 3-1: 8/5 6/5".to_string()]);

        let hit = PlayedMove {
            mv: Move::new(Origin::Bar, Destination::point(20), die(5)),
            hit: true,
        };
        assert_eq!(format_played(&hit), "bar/20*");
    }

    #[test]
    fn test_describe_action() {
        let action = GameAction::DiceRolled {
            player: Player::Black,
            roll: DiceRoll::from_values(6, 6).unwrap(),
            turn_forfeited: true,
        };
        assert_eq!(describe_action(&action), "Black rolls 6-6 and cannot move");
        assert_eq!(
            describe_action(&GameAction::DoubleDeclined { player: Player::White }),
            "White passes"
        );
    }
}
