//! The reducer: fold one recorded action into the next state.
//!
//! `apply_action` is total for every action the command layer admits. It
//! does no validation of its own beyond the board's occupancy checks, and
//! an action that breaks the board (or leaves a side without fifteen
//! checkers) means the command layer let through something it should not
//! have. That is a bug, and the reducer panics rather than carry on with a
//! corrupt position.

use crate::board::{Board, Move};
use crate::core::{
    DiceRoll, DieValue, GameAction, GameResult, GameState, Phase, PlayedMove, Player,
    RemainingDice, TurnSummary, VictoryType,
};
use crate::cube::DoublingCube;
use crate::rules;

/// Apply `action` to `state`, returning the new state.
///
/// # Panics
///
/// Panics when the action contradicts the state it is applied to.
#[must_use]
pub fn apply_action(state: &GameState, action: &GameAction) -> GameState {
    let mut next = state.clone();

    match *action {
        GameAction::GameStarted {
            first_player,
            white_roll,
            black_roll,
            cube_enabled,
        } => {
            begin(&mut next, first_player, cube_enabled);
            next.phase = Phase::Moving;
            let opening = DiceRoll::new(white_roll, black_roll);
            next.dice_roll = Some(opening);
            next.remaining_moves = [white_roll, black_roll].into_iter().collect();
        }

        GameAction::FirstPlayerSet { player, cube_enabled } => {
            begin(&mut next, player, cube_enabled);
            next.phase = Phase::Rolling;
        }

        GameAction::DiceRolled { player, roll, .. } => {
            expect_mover(&next, player, action);
            next.phase = Phase::Moving;
            next.dice_roll = Some(roll);
            next.remaining_moves = roll.moves();
        }

        GameAction::PieceMoved { player, hit, .. } => {
            expect_mover(&next, player, action);
            let mv = checker_move(action);
            let (board, did_hit) = next
                .board
                .apply_move(&mv, player)
                .unwrap_or_else(|err| panic!("reducer: {err} (action {action:?})"));
            if did_hit != hit {
                panic!("reducer: recorded hit={hit} but the board says {did_hit} for {mv}");
            }

            next.board = board;
            take_die(&mut next.remaining_moves, mv.die_used);
            next.moves_this_turn.push_back(PlayedMove { mv, hit });

            if let Some(result) = rules::game_result(&next.board) {
                if result.winner != player {
                    panic!("reducer: {player} moved but {} won", result.winner);
                }
                close_turn(&mut next, player);
                finish(&mut next, result);
            }
        }

        GameAction::MoveUndone { player, hit, .. } => {
            expect_mover(&next, player, action);
            let mv = checker_move(action);
            match next.moves_this_turn.pop_back() {
                Some(last) if last == (PlayedMove { mv, hit }) => {}
                other => panic!("reducer: cannot undo {mv}, last move this turn is {other:?}"),
            }
            next.board = next
                .board
                .unapply_move(&mv, player, hit)
                .unwrap_or_else(|err| panic!("reducer: {err} (action {action:?})"));
            next.remaining_moves = unplayed_dice(next.dice_roll, &next.moves_this_turn);
        }

        GameAction::TurnEnded { player } => {
            expect_mover(&next, player, action);
            close_turn(&mut next, player);
            next.current_player = Some(player.opponent());
            next.phase = Phase::Rolling;
            next.turn_number += 1;
        }

        GameAction::DoubleProposed { player } => {
            expect_mover(&next, player, action);
            next.double_proposed_by = Some(player);
        }

        GameAction::DoubleAccepted { player } => {
            let cube = next
                .doubling_cube
                .unwrap_or_else(|| panic!("reducer: double accepted without a cube"));
            next.doubling_cube = Some(cube.accepted_by(player));
            next.double_proposed_by = None;
        }

        GameAction::DoubleDeclined { player } => {
            next.double_proposed_by = None;
            finish(
                &mut next,
                GameResult {
                    winner: player.opponent(),
                    victory_type: VictoryType::Single,
                },
            );
        }
    }

    next.action_history.push_back(*action);

    if let Err(err) = next.board.check_invariants() {
        panic!("reducer: checker invariant broken after {action:?}: {err}");
    }
    next
}

/// Set up a fresh game with `player` on turn.
fn begin(state: &mut GameState, player: Player, cube_enabled: bool) {
    state.board = Board::standard();
    state.current_player = Some(player);
    state.turn_number = 1;
    state.doubling_cube = cube_enabled.then(DoublingCube::centered);
    state.double_proposed_by = None;
    state.result = None;
}

fn expect_mover(state: &GameState, player: Player, action: &GameAction) {
    if state.current_player != Some(player) {
        panic!(
            "reducer: {action:?} by {player} but {:?} is on turn",
            state.current_player
        );
    }
}

fn checker_move(action: &GameAction) -> Move {
    action
        .checker_move()
        .unwrap_or_else(|| panic!("reducer: {action:?} carries no move"))
}

/// Remove one die of value `die`.
fn take_die(remaining: &mut RemainingDice, die: DieValue) {
    match remaining.iter().position(|&d| d == die) {
        Some(idx) => {
            remaining.remove(idx);
        }
        None => panic!("reducer: die {die} played but only {remaining:?} remain"),
    }
}

/// The roll's dice less those spent by `played`.
fn unplayed_dice(roll: Option<DiceRoll>, played: &im::Vector<PlayedMove>) -> RemainingDice {
    let mut remaining = roll.map(|r| r.moves()).unwrap_or_default();
    for spent in played {
        take_die(&mut remaining, spent.mv.die_used);
    }
    remaining
}

/// Append the turn summary and clear per-turn state.
fn close_turn(state: &mut GameState, player: Player) {
    state.history.push_back(TurnSummary {
        turn_number: state.turn_number,
        player,
        dice: state.dice_roll,
        moves: state.moves_this_turn.iter().copied().collect(),
    });
    state.moves_this_turn.clear();
    state.remaining_moves.clear();
    state.dice_roll = None;
}

fn finish(state: &mut GameState, result: GameResult) {
    state.phase = Phase::GameOver;
    state.result = Some(result);
    tracing::info!(
        winner = %result.winner,
        victory = ?result.victory_type,
        cube = state.cube_value(),
        "game over"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Destination, Origin, NUM_POINTS};
    use crate::cube::CubeOwner;

    fn die(v: u8) -> DieValue {
        DieValue::new(v).unwrap()
    }

    fn started() -> GameState {
        apply_action(
            &GameState::new(),
            &GameAction::GameStarted {
                first_player: Player::White,
                white_roll: die(3),
                black_roll: die(1),
                cube_enabled: true,
            },
        )
    }

    #[test]
    fn test_game_started() {
        let state = started();
        assert_eq!(state.phase, Phase::Moving);
        assert_eq!(state.current_player, Some(Player::White));
        assert_eq!(state.remaining_moves.as_slice(), &[die(3), die(1)]);
        assert_eq!(state.doubling_cube, Some(DoublingCube::centered()));
        assert_eq!(state.turn_number, 1);
        assert_eq!(state.action_history.len(), 1);
    }

    #[test]
    fn test_piece_moved_consumes_die() {
        let mv = Move::new(Origin::point(8), Destination::point(5), die(3));
        let state = apply_action(&started(), &GameAction::piece_moved(Player::White, mv, false));

        assert_eq!(state.remaining_moves.as_slice(), &[die(1)]);
        assert_eq!(state.moves_this_turn.len(), 1);
        assert_eq!(state.board.points[4], 1);
        assert_eq!(state.board.points[7], 2);
    }

    #[test]
    fn test_undo_restores_dice_in_roll_order() {
        let start = started();
        let first = Move::new(Origin::point(6), Destination::point(5), die(1));
        let state = apply_action(&start, &GameAction::piece_moved(Player::White, first, false));
        let undo = GameAction::MoveUndone {
            player: Player::White,
            from: first.from,
            to: first.to,
            die_used: first.die_used,
            hit: false,
        };
        let state = apply_action(&state, &undo);

        assert_eq!(state.board, start.board);
        assert_eq!(state.remaining_moves, start.remaining_moves);
        assert!(state.moves_this_turn.is_empty());
    }

    #[test]
    fn test_turn_ended() {
        let state = apply_action(&started(), &GameAction::TurnEnded { player: Player::White });
        assert_eq!(state.current_player, Some(Player::Black));
        assert_eq!(state.phase, Phase::Rolling);
        assert_eq!(state.turn_number, 2);
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.history[0].dice, DiceRoll::from_values(3, 1));
        assert!(state.remaining_moves.is_empty());
    }

    #[test]
    fn test_double_accepted_and_declined() {
        let state = apply_action(&started(), &GameAction::TurnEnded { player: Player::White });
        let state = apply_action(&state, &GameAction::DoubleProposed { player: Player::Black });
        assert_eq!(state.double_proposed_by, Some(Player::Black));

        let accepted = apply_action(&state, &GameAction::DoubleAccepted { player: Player::White });
        let cube = accepted.doubling_cube.unwrap();
        assert_eq!(cube.value, 2);
        assert_eq!(cube.owner, CubeOwner::Owned(Player::Black));
        assert_eq!(accepted.double_proposed_by, None);

        let declined = apply_action(&state, &GameAction::DoubleDeclined { player: Player::White });
        assert_eq!(declined.phase, Phase::GameOver);
        let result = declined.result.unwrap();
        assert_eq!(result.winner, Player::Black);
        assert_eq!(result.victory_type, VictoryType::Single);
        assert_eq!(declined.cube_value(), 1);
    }

    #[test]
    fn test_winning_move_ends_game() {
        let mut points = [0i8; NUM_POINTS];
        points[0] = 1;
        points[12] = -15;
        let mut board = Board::from_points(points);
        board.borne_off.white = 14;
        let mut state = GameState::with_position(board, Player::White);
        state = apply_action(
            &state,
            &GameAction::DiceRolled {
                player: Player::White,
                roll: DiceRoll::from_values(2, 1).unwrap(),
                turn_forfeited: false,
            },
        );
        let mv = Move::new(Origin::point(1), Destination::Off, die(1));
        let state = apply_action(&state, &GameAction::piece_moved(Player::White, mv, false));

        assert_eq!(state.phase, Phase::GameOver);
        assert_eq!(state.result.unwrap().victory_type, VictoryType::Gammon);
        assert_eq!(state.history.len(), 1);
        assert!(state.moves_this_turn.is_empty());
    }

    #[test]
    #[should_panic(expected = "reducer")]
    fn test_inconsistent_action_panics() {
        let mv = Move::new(Origin::point(7), Destination::point(4), die(3));
        let _ = apply_action(&started(), &GameAction::piece_moved(Player::White, mv, false));
    }
}
