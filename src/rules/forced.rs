//! Forced-move precedence and move validation.
//!
//! A player must use as many of the remaining dice as the position allows.
//! A first move after which fewer dice can be played than some other
//! sequence would play is not legal. Bearing off the last checker counts as
//! using the whole roll.
//!
//! With two different dice and both unplayed, a player who can play either
//! die alone but not both in any order must play the higher one. When only
//! one die can be played at all there is nothing to choose, and with
//! doubles every die is the same, so no die is required.

use serde::{Deserialize, Serialize};

use super::movegen::{
    destination_for, die_is_playable, get_valid_moves, moves_for_die, target_of, ValidMove,
};
use super::victory::has_won;
use crate::board::{Board, Destination, Move, Origin, Point};
use crate::core::{DieValue, GameState, IllegalMoveReason, Phase, Player, RemainingDice};

/// The die the mover is obliged to use, if any.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredMoves {
    pub required_die: Option<DieValue>,
}

/// Whether some order of play uses both `first` and `second`.
fn can_play_both(board: &Board, player: Player, first: DieValue, second: DieValue) -> bool {
    moves_for_die(board, player, first).iter().any(|mv| {
        board
            .apply_move(mv, player)
            .map(|(next, _)| die_is_playable(&next, player, second))
            .unwrap_or(false)
    })
}

/// Most dice from `dice` that can be played in sequence from `board`.
fn max_dice_playable(board: &Board, player: Player, dice: &[DieValue]) -> usize {
    let mut best = 0;
    let mut tried: RemainingDice = RemainingDice::new();
    for &die in dice {
        if tried.contains(&die) {
            continue;
        }
        tried.push(die);
        for mv in moves_for_die(board, player, die) {
            best = best.max(dice_used_by(board, player, dice, &mv));
            if best == dice.len() {
                return best;
            }
        }
    }
    best
}

/// Dice used by a sequence that starts with `mv` and then plays as many of
/// the rest as possible.
fn dice_used_by(board: &Board, player: Player, dice: &[DieValue], mv: &Move) -> usize {
    let next = match board.apply_move(mv, player) {
        Ok((next, _)) => next,
        Err(_) => return 0,
    };
    if has_won(&next, player) {
        return dice.len();
    }
    let mut rest: RemainingDice = dice.iter().copied().collect();
    if let Some(idx) = rest.iter().position(|&d| d == mv.die_used) {
        rest.remove(idx);
    }
    1 + max_dice_playable(&next, player, &rest)
}

/// Drop first moves that would leave a playable die unused.
fn keep_maximal(state: &GameState, player: Player, valid: Vec<ValidMove>) -> Vec<ValidMove> {
    let dice = state.remaining_moves.as_slice();
    let most = max_dice_playable(&state.board, player, dice);
    if most <= 1 {
        return valid;
    }
    valid
        .into_iter()
        .filter_map(|group| {
            let destinations: Vec<_> = group
                .destinations
                .into_iter()
                .filter(|d| {
                    let mv = Move::new(group.from, d.to, d.die_value);
                    dice_used_by(&state.board, player, dice, &mv) == most
                })
                .collect();
            (!destinations.is_empty()).then(|| ValidMove {
                from: group.from,
                destinations,
            })
        })
        .collect()
}

/// Apply the higher-die rule to the dice still to play.
#[must_use]
pub fn get_required_moves(state: &GameState) -> RequiredMoves {
    let player = match (state.phase, state.current_player) {
        (Phase::Moving, Some(player)) => player,
        _ => return RequiredMoves::default(),
    };

    let (high, low) = match state.remaining_moves.as_slice() {
        [a, b] if a != b => ((*a).max(*b), (*a).min(*b)),
        _ => return RequiredMoves::default(),
    };

    let board = &state.board;
    if !die_is_playable(board, player, high) || !die_is_playable(board, player, low) {
        return RequiredMoves::default();
    }
    if can_play_both(board, player, high, low) || can_play_both(board, player, low, high) {
        return RequiredMoves::default();
    }

    RequiredMoves {
        required_die: Some(high),
    }
}

/// Keep only destinations reached with `die`; origins left empty are dropped.
#[must_use]
pub fn filter_moves_by_die(moves: &[ValidMove], die: DieValue) -> Vec<ValidMove> {
    moves
        .iter()
        .filter_map(|group| {
            let destinations: Vec<_> = group
                .destinations
                .iter()
                .filter(|d| d.die_value == die)
                .copied()
                .collect();
            (!destinations.is_empty()).then(|| ValidMove {
                from: group.from,
                destinations,
            })
        })
        .collect()
}

/// The moves the player on turn may actually make: valid moves narrowed
/// to the required die when there is one, and otherwise to those that keep
/// the most dice playable.
#[must_use]
pub fn legal_moves(state: &GameState) -> Vec<ValidMove> {
    let valid = get_valid_moves(state);
    if let Some(die) = get_required_moves(state).required_die {
        return filter_moves_by_die(&valid, die);
    }
    match (state.phase, state.current_player) {
        (Phase::Moving, Some(player)) => keep_maximal(state, player, valid),
        _ => valid,
    }
}

/// Whether the player on turn has any move at all.
#[must_use]
pub fn has_any_legal_move(state: &GameState) -> bool {
    let player = match (state.phase, state.current_player) {
        (Phase::Moving, Some(player)) => player,
        _ => return false,
    };
    state
        .distinct_remaining()
        .into_iter()
        .any(|die| die_is_playable(&state.board, player, die))
}

/// Whether `mv` is among `legal_moves(state)`.
#[must_use]
pub fn is_legal(state: &GameState, mv: &Move) -> bool {
    legal_moves(state)
        .iter()
        .any(|group| group.moves().any(|m| m == *mv))
}

/// Name the rule an illegal move breaks.
///
/// Checks run from the most basic (wrong source) to the most subtle
/// (higher die required), so the first failing rule is reported.
#[must_use]
pub fn explain_rejection(state: &GameState, mv: &Move) -> IllegalMoveReason {
    let player = match state.current_player {
        Some(player) => player,
        None => return IllegalMoveReason::NotLegal,
    };
    let board = &state.board;
    let die = mv.die_used;

    match mv.from {
        Origin::Bar if board.bar[player] == 0 => return IllegalMoveReason::NothingOnBar,
        Origin::Point(_) if board.bar[player] > 0 => return IllegalMoveReason::BarPriority,
        Origin::Point(p) if board.count_for(player, p) == 0 => {
            return IllegalMoveReason::NoCheckerAtOrigin(p)
        }
        _ => {}
    }

    if !state.remaining_moves.contains(&die) {
        return IllegalMoveReason::DieNotAvailable(die);
    }

    let expected = match mv.from {
        Origin::Bar => Destination::Point(Point::entry(player, die)),
        Origin::Point(p) => target_of(player, p, die),
    };
    if expected != mv.to {
        return IllegalMoveReason::WrongDistance(die);
    }

    match (mv.from, mv.to) {
        (_, Destination::Point(p)) if !board.is_open_for(player, p) => {
            return IllegalMoveReason::Blocked(p)
        }
        (_, Destination::Off) if !board.all_checkers_home(player) => {
            return IllegalMoveReason::NotAllHome
        }
        (Origin::Point(p), Destination::Off)
            if die.get() > p.distance_home(player)
                && destination_for(board, player, mv.from, die).is_none() =>
        {
            return IllegalMoveReason::MustBearOffFarthest(die)
        }
        _ => {}
    }

    if let Some(required) = get_required_moves(state).required_die {
        if required != die {
            return IllegalMoveReason::HigherDieRequired(required);
        }
    }

    if get_valid_moves(state).iter().any(|group| group.moves().any(|m| m == *mv)) {
        return IllegalMoveReason::MustUseAllDice;
    }

    IllegalMoveReason::NotLegal
}
