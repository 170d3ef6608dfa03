//! Validated commands.
//!
//! Each `perform_*` function checks its preconditions against the current
//! state. On failure it returns a `CommandError` and the caller keeps the
//! state it had. On success it derives the actions, folds them through
//! [`apply_action`], and returns the new state together with the
//! command's output in a [`Committed`].
//!
//! ## Example
//!
//! ```
//! use backgammon_engine::core::{DiceRoll, GameRng, GameState, Phase, Player};
//! use backgammon_engine::engine::{perform_roll_dice, perform_set_first_player};
//!
//! let mut rng = GameRng::new(7);
//! let state = GameState::new();
//! let state = perform_set_first_player(&state, Player::White, true).unwrap().state;
//! let rolled = perform_roll_dice(&state, &mut rng, DiceRoll::from_values(3, 1)).unwrap();
//! assert_eq!(rolled.state.phase, Phase::Moving);
//! assert!(!rolled.output.turn_forfeited);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::reducer::apply_action;
use crate::board::Move;
use crate::core::{
    CommandError, DiceRoll, DieValue, DoubleRejection, GameAction, GameResult, GameRng, GameState,
    IllegalMoveReason, Phase, PlayedMove, Player, TurnSummary, VictoryType,
};
use crate::cube::DoublingCube;
use crate::rules::{self, ValidMove};

/// A command that went through: the new state and what the command produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Committed<T> {
    pub state: GameState,
    pub output: T,
}

pub type CommandResult<T> = Result<Committed<T>, CommandError>;

/// How the opening roll went.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningRoll {
    pub first_player: Player,
    pub white_roll: DieValue,
    pub black_roll: DieValue,
    /// Tied rolls thrown again before a winner emerged.
    pub rerolls: u32,
}

/// What a roll gave the mover.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    pub roll: DiceRoll,
    /// No legal move exists; the caller should end the turn.
    pub turn_forfeited: bool,
    pub valid_moves: Vec<ValidMove>,
}

/// Result of one checker move, with the moves now available.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    #[serde(rename = "move")]
    pub mv: Move,
    pub hit: bool,
    pub game_over: bool,
    pub valid_moves: Vec<ValidMove>,
}

// === Helpers ===

fn commit<T>(state: &GameState, actions: &[GameAction], output: T) -> Committed<T> {
    let mut next = state.clone();
    for action in actions {
        next = apply_action(&next, action);
        debug!(
            player = %action.player(),
            phase = %next.phase,
            action = ?action,
            "committed"
        );
    }
    Committed { state: next, output }
}

fn rejected(command: &'static str) -> impl Fn(CommandError) -> CommandError {
    move |error| {
        debug!(command, kind = ?error.kind(), %error, "rejected");
        error
    }
}

fn require_phase(
    state: &GameState,
    phase: Phase,
    command: &'static str,
) -> Result<(), CommandError> {
    if state.phase == phase {
        Ok(())
    } else {
        Err(CommandError::InvalidCommandForPhase {
            command,
            phase: state.phase,
        })
    }
}

/// The player on turn.
pub fn current_player(state: &GameState) -> Result<Player, CommandError> {
    state.current_player.ok_or(CommandError::NoCurrentPlayer)
}

/// Fail unless `player` is the one on turn.
pub fn ensure_turn(state: &GameState, player: Player) -> Result<(), CommandError> {
    let expected = current_player(state)?;
    if expected == player {
        Ok(())
    } else {
        Err(CommandError::NotPlayersTurn {
            expected,
            actual: player,
        })
    }
}

// === Game flow ===

/// Roll for the first turn and start the game.
///
/// Each side throws one die; ties are thrown again until they differ. The
/// higher thrower moves first, playing the two opening dice.
pub fn perform_start_game(
    state: &GameState,
    rng: &mut GameRng,
    cube_enabled: bool,
) -> CommandResult<OpeningRoll> {
    require_phase(state, Phase::NotStarted, "start the game").map_err(rejected("start_game"))?;

    let mut rerolls = 0;
    let (white_roll, black_roll) = loop {
        let white = rng.roll_die();
        let black = rng.roll_die();
        if white != black {
            break (white, black);
        }
        rerolls += 1;
        debug!(phase = %Phase::RollingForFirst, die = %white, "opening roll tied");
    };
    let first_player = if white_roll > black_roll {
        Player::White
    } else {
        Player::Black
    };

    let action = GameAction::GameStarted {
        first_player,
        white_roll,
        black_roll,
        cube_enabled,
    };
    let output = OpeningRoll {
        first_player,
        white_roll,
        black_roll,
        rerolls,
    };
    Ok(commit(state, &[action], output))
}

/// Start the game with `player` to roll, skipping the opening roll.
pub fn perform_set_first_player(
    state: &GameState,
    player: Player,
    cube_enabled: bool,
) -> CommandResult<()> {
    require_phase(state, Phase::NotStarted, "set the first player")
        .map_err(rejected("set_first_player"))?;
    Ok(commit(state, &[GameAction::FirstPlayerSet { player, cube_enabled }], ()))
}

/// Roll for the player on turn. `roll` overrides the RNG when given.
pub fn perform_roll_dice(
    state: &GameState,
    rng: &mut GameRng,
    roll: Option<DiceRoll>,
) -> CommandResult<RollOutcome> {
    let player = validate_roll(state).map_err(rejected("roll_dice"))?;

    let roll = roll.unwrap_or_else(|| rng.roll_dice());
    let mut speculative = state.clone();
    speculative.phase = Phase::Moving;
    speculative.remaining_moves = roll.moves();
    let turn_forfeited = !rules::has_any_legal_move(&speculative);

    let action = GameAction::DiceRolled {
        player,
        roll,
        turn_forfeited,
    };
    let committed = commit(state, &[action], ());
    let valid_moves = rules::legal_moves(&committed.state);
    Ok(Committed {
        state: committed.state,
        output: RollOutcome {
            roll,
            turn_forfeited,
            valid_moves,
        },
    })
}

fn validate_roll(state: &GameState) -> Result<Player, CommandError> {
    require_phase(state, Phase::Rolling, "roll the dice")?;
    let player = current_player(state)?;
    if state.double_proposed_by.is_some() {
        return Err(CommandError::DoublePending);
    }
    Ok(player)
}

/// Play one checker.
///
/// The move must be in `legal_moves`; otherwise the error names the rule
/// it breaks.
pub fn perform_move(state: &GameState, mv: Move) -> CommandResult<MoveOutcome> {
    let (player, hit) = validate_move(state, &mv).map_err(rejected("move"))?;

    let committed = commit(state, &[GameAction::piece_moved(player, mv, hit)], ());
    let game_over = committed.state.is_over();
    let valid_moves = rules::legal_moves(&committed.state);
    Ok(Committed {
        state: committed.state,
        output: MoveOutcome {
            mv,
            hit,
            game_over,
            valid_moves,
        },
    })
}

fn validate_move(state: &GameState, mv: &Move) -> Result<(Player, bool), CommandError> {
    require_phase(state, Phase::Moving, "move a checker")?;
    let player = current_player(state)?;
    let illegal = |reason| CommandError::IllegalMove { mv: *mv, reason };

    if !rules::is_legal(state, mv) {
        return Err(illegal(rules::explain_rejection(state, mv)));
    }
    let (_, hit) = state
        .board
        .apply_move(mv, player)
        .map_err(|_| illegal(IllegalMoveReason::NotLegal))?;
    Ok((player, hit))
}

/// Play several moves as one unit. Either every move is played or none is.
pub fn perform_moves(state: &GameState, moves: &[Move]) -> CommandResult<Vec<MoveOutcome>> {
    let mut scratch = state.clone();
    let mut outcomes = Vec::with_capacity(moves.len());
    for &mv in moves {
        let step = perform_move(&scratch, mv)?;
        scratch = step.state;
        outcomes.push(step.output);
    }
    Ok(Committed {
        state: scratch,
        output: outcomes,
    })
}

/// Finish the turn and pass the dice.
///
/// Refused while dice remain and one of them can still be played.
pub fn perform_end_turn(state: &GameState) -> CommandResult<TurnSummary> {
    let player = validate_end_turn(state).map_err(rejected("end_turn"))?;

    let summary = TurnSummary {
        turn_number: state.turn_number,
        player,
        dice: state.dice_roll,
        moves: state.moves_this_turn.iter().copied().collect(),
    };
    Ok(commit(state, &[GameAction::TurnEnded { player }], summary))
}

fn validate_end_turn(state: &GameState) -> Result<Player, CommandError> {
    require_phase(state, Phase::Moving, "end the turn")?;
    let player = current_player(state)?;
    if !state.remaining_moves.is_empty() && rules::has_any_legal_move(state) {
        return Err(CommandError::MovesRemaining {
            remaining: state.remaining_moves.len(),
        });
    }
    Ok(player)
}

fn undo_action(player: Player, played: PlayedMove) -> GameAction {
    GameAction::MoveUndone {
        player,
        from: played.mv.from,
        to: played.mv.to,
        die_used: played.mv.die_used,
        hit: played.hit,
    }
}

fn validate_undo(state: &GameState) -> Result<Player, CommandError> {
    require_phase(state, Phase::Moving, "undo a move")?;
    let player = current_player(state)?;
    if state.moves_this_turn.is_empty() {
        return Err(CommandError::NothingToUndo);
    }
    Ok(player)
}

/// Take back the most recent move of this turn.
pub fn perform_undo_move(state: &GameState) -> CommandResult<PlayedMove> {
    let player = validate_undo(state).map_err(rejected("undo_move"))?;
    let last = state.moves_this_turn.last().copied().ok_or(CommandError::NothingToUndo)?;
    Ok(commit(state, &[undo_action(player, last)], last))
}

/// Take back every move of this turn, most recent first.
pub fn perform_undo_all_moves(state: &GameState) -> CommandResult<Vec<PlayedMove>> {
    let player = validate_undo(state).map_err(rejected("undo_all_moves"))?;
    let undone: Vec<PlayedMove> = state.moves_this_turn.iter().rev().copied().collect();
    let actions: Vec<GameAction> = undone
        .iter()
        .map(|&played| undo_action(player, played))
        .collect();
    Ok(commit(state, &actions, undone))
}

/// A fresh game that has not started. Always allowed.
#[must_use]
pub fn reset_game() -> GameState {
    debug!("game reset");
    GameState::new()
}

// === Doubling cube ===

/// Offer a double. `player` must be on turn, not have rolled, and not hold
/// the cube. Returns the value the cube would go to.
pub fn perform_propose_double(
    state: &GameState,
    player: Player,
    max_cube_value: u32,
) -> CommandResult<u32> {
    let cube = validate_proposal(state, player, max_cube_value)
        .map_err(rejected("propose_double"))?;
    Ok(commit(
        state,
        &[GameAction::DoubleProposed { player }],
        cube.value.saturating_mul(2),
    ))
}

fn validate_proposal(
    state: &GameState,
    player: Player,
    max_cube_value: u32,
) -> Result<DoublingCube, CommandError> {
    require_phase(state, Phase::Rolling, "propose a double")?;
    ensure_turn(state, player)?;
    let deny = |reason| Err(CommandError::DoubleNotAllowed(reason));

    if state.double_proposed_by.is_some() {
        return deny(DoubleRejection::ProposalPending);
    }
    let Some(cube) = state.doubling_cube else {
        return deny(DoubleRejection::CubeDisabled);
    };
    if !cube.may_double(player) {
        return deny(DoubleRejection::HoldsCube(player));
    }
    if cube.is_at_max(max_cube_value) {
        return deny(DoubleRejection::AtMaximum(cube.value));
    }
    Ok(cube)
}

/// The side a pending double is addressed to.
fn validate_response(
    state: &GameState,
    player: Player,
    command: &'static str,
) -> Result<(), CommandError> {
    require_phase(state, Phase::Rolling, command)?;
    let proposer = state
        .double_proposed_by
        .ok_or(CommandError::DoubleNotAllowed(DoubleRejection::NoProposal))?;
    let expected = proposer.opponent();
    if player != expected {
        return Err(CommandError::NotPlayersTurn {
            expected,
            actual: player,
        });
    }
    Ok(())
}

/// Take the pending double. Play continues at twice the stake.
pub fn perform_accept_double(state: &GameState, player: Player) -> CommandResult<DoublingCube> {
    validate_response(state, player, "accept a double").map_err(rejected("accept_double"))?;
    let committed = commit(state, &[GameAction::DoubleAccepted { player }], ());
    let cube = committed.state.doubling_cube.unwrap_or_default();
    Ok(Committed {
        state: committed.state,
        output: cube,
    })
}

/// Pass the pending double, conceding a single game at the current stake.
pub fn perform_decline_double(state: &GameState, player: Player) -> CommandResult<GameResult> {
    validate_response(state, player, "decline a double").map_err(rejected("decline_double"))?;
    let result = GameResult {
        winner: player.opponent(),
        victory_type: VictoryType::Single,
    };
    Ok(commit(state, &[GameAction::DoubleDeclined { player }], result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Destination, Origin, Point, NUM_POINTS};
    use crate::core::ErrorKind;
    use crate::cube::CubeOwner;

    fn die(v: u8) -> DieValue {
        DieValue::new(v).unwrap()
    }

    fn roll(a: u8, b: u8) -> Option<DiceRoll> {
        DiceRoll::from_values(a, b)
    }

    fn white_to_roll() -> GameState {
        perform_set_first_player(&GameState::new(), Player::White, true).unwrap().state
    }

    fn rolled(a: u8, b: u8) -> GameState {
        let mut rng = GameRng::new(0);
        perform_roll_dice(&white_to_roll(), &mut rng, roll(a, b)).unwrap().state
    }

    #[test]
    fn test_start_game() {
        let mut rng = GameRng::new(42);
        let committed = perform_start_game(&GameState::new(), &mut rng, true).unwrap();
        let opening = committed.output;
        let state = committed.state;

        assert_ne!(opening.white_roll, opening.black_roll);
        assert_eq!(state.phase, Phase::Moving);
        assert_eq!(state.current_player, Some(opening.first_player));
        assert_eq!(state.board, Board::standard());
        assert_eq!(state.remaining_moves.len(), 2);
        let winner_die = match opening.first_player {
            Player::White => opening.white_roll,
            Player::Black => opening.black_roll,
        };
        assert_eq!(state.dice_roll.unwrap().high(), winner_die);
    }

    #[test]
    fn test_start_game_only_once() {
        let mut rng = GameRng::new(42);
        let state = perform_start_game(&GameState::new(), &mut rng, true).unwrap().state;
        let err = perform_start_game(&state, &mut rng, true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidCommandForPhase);
    }

    #[test]
    fn test_roll_dice_doubles_expand() {
        let state = rolled(4, 4);
        assert_eq!(state.remaining_moves.len(), 4);
        assert_eq!(state.phase, Phase::Moving);
    }

    #[test]
    fn test_roll_outside_rolling_phase() {
        let mut rng = GameRng::new(1);
        let err = perform_roll_dice(&GameState::new(), &mut rng, None).unwrap_err();
        assert_eq!(
            err,
            CommandError::InvalidCommandForPhase {
                command: "roll the dice",
                phase: Phase::NotStarted
            }
        );
    }

    #[test]
    fn test_forfeited_roll() {
        // white on the bar against a closed board
        let mut points = [0i8; NUM_POINTS];
        points[18..].fill(-2);
        points[0] = -3;
        points[5] = 14;
        let mut board = Board::from_points(points);
        board.bar.white = 1;
        let state = GameState::with_position(board, Player::White);

        let mut rng = GameRng::new(3);
        let committed = perform_roll_dice(&state, &mut rng, roll(6, 5)).unwrap();
        assert!(committed.output.turn_forfeited);
        assert!(committed.output.valid_moves.is_empty());

        let ended = perform_end_turn(&committed.state).unwrap();
        assert_eq!(ended.state.current_player, Some(Player::Black));
        assert!(ended.output.moves.is_empty());
    }

    #[test]
    fn test_move_and_outcome() {
        let state = rolled(3, 1);
        let mv = Move::new(Origin::point(8), Destination::point(5), die(3));
        let committed = perform_move(&state, mv).unwrap();

        assert!(!committed.output.hit);
        assert!(!committed.output.game_over);
        assert!(committed
            .output
            .valid_moves
            .iter()
            .all(|g| g.destinations.iter().all(|d| d.die_value == die(1))));
        assert_eq!(committed.state.remaining_moves.as_slice(), &[die(1)]);
    }

    #[test]
    fn test_illegal_move_leaves_state() {
        let state = rolled(3, 1);
        let mv = Move::new(Origin::point(13), Destination::point(12), die(1));
        let err = perform_move(&state, mv).unwrap_err();
        assert_eq!(
            err,
            CommandError::IllegalMove {
                mv,
                reason: IllegalMoveReason::Blocked(Point::new(12).unwrap())
            }
        );
        assert_eq!(err.kind(), ErrorKind::IllegalMove);
    }

    #[test]
    fn test_move_in_rolling_phase() {
        let mv = Move::new(Origin::point(8), Destination::point(5), die(3));
        let err = perform_move(&white_to_roll(), mv).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidCommandForPhase);
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let state = rolled(3, 1);
        let good = Move::new(Origin::point(8), Destination::point(5), die(3));
        let bad = Move::new(Origin::point(13), Destination::point(12), die(1));
        assert!(perform_moves(&state, &[good, bad]).is_err());

        let other = Move::new(Origin::point(6), Destination::point(5), die(1));
        let committed = perform_moves(&state, &[good, other]).unwrap();
        assert_eq!(committed.output.len(), 2);
        assert_eq!(committed.state.board.points[4], 2);
    }

    #[test]
    fn test_end_turn_with_moves_left() {
        let state = rolled(3, 1);
        let err = perform_end_turn(&state).unwrap_err();
        assert_eq!(err, CommandError::MovesRemaining { remaining: 2 });
    }

    #[test]
    fn test_undo_move_and_all() {
        let state = rolled(3, 1);
        let first = Move::new(Origin::point(8), Destination::point(5), die(3));
        let second = Move::new(Origin::point(6), Destination::point(5), die(1));
        let played = perform_moves(&state, &[first, second]).unwrap().state;

        let undone = perform_undo_move(&played).unwrap();
        assert_eq!(undone.output.mv, second);
        assert_eq!(undone.state.remaining_moves.as_slice(), &[die(1)]);

        let all = perform_undo_all_moves(&played).unwrap();
        assert_eq!(all.output.len(), 2);
        assert_eq!(all.state.board, state.board);
        assert_eq!(all.state.remaining_moves, state.remaining_moves);

        let err = perform_undo_move(&state).unwrap_err();
        assert_eq!(err, CommandError::NothingToUndo);
    }

    #[test]
    fn test_propose_accept_decline() {
        let state = white_to_roll();
        let proposed = perform_propose_double(&state, Player::White, 64).unwrap();
        assert_eq!(proposed.output, 2);

        let mut rng = GameRng::new(5);
        let err = perform_roll_dice(&proposed.state, &mut rng, None).unwrap_err();
        assert_eq!(err, CommandError::DoublePending);

        let wrong = perform_accept_double(&proposed.state, Player::White).unwrap_err();
        assert_eq!(wrong.kind(), ErrorKind::NotPlayersTurn);

        let accepted = perform_accept_double(&proposed.state, Player::Black).unwrap();
        assert_eq!(accepted.output.value, 2);
        assert_eq!(accepted.output.owner, CubeOwner::Owned(Player::White));

        let declined = perform_decline_double(&proposed.state, Player::Black).unwrap();
        assert_eq!(
            declined.output,
            GameResult {
                winner: Player::White,
                victory_type: VictoryType::Single
            }
        );
        assert!(declined.state.is_over());
    }

    #[test]
    fn test_cube_holder_cannot_double() {
        let mut state = white_to_roll();
        state.doubling_cube = Some(DoublingCube {
            value: 2,
            owner: CubeOwner::Owned(Player::White),
        });
        let err = perform_propose_double(&state, Player::White, 64).unwrap_err();
        assert_eq!(err, CommandError::DoubleNotAllowed(DoubleRejection::HoldsCube(Player::White)));
    }

    #[test]
    fn test_double_limits() {
        let mut state = white_to_roll();
        state.doubling_cube = Some(DoublingCube {
            value: 64,
            owner: CubeOwner::Owned(Player::Black),
        });
        let err = perform_propose_double(&state, Player::White, 64).unwrap_err();
        assert_eq!(err, CommandError::DoubleNotAllowed(DoubleRejection::AtMaximum(64)));

        let off = perform_set_first_player(&GameState::new(), Player::White, false).unwrap().state;
        let err = perform_propose_double(&off, Player::White, 64).unwrap_err();
        assert_eq!(err, CommandError::DoubleNotAllowed(DoubleRejection::CubeDisabled));

        let err = perform_propose_double(&white_to_roll(), Player::Black, 64).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotPlayersTurn);

        let err = perform_accept_double(&white_to_roll(), Player::Black).unwrap_err();
        assert_eq!(err, CommandError::DoubleNotAllowed(DoubleRejection::NoProposal));
    }

    #[test]
    fn test_reset_game() {
        let state = reset_game();
        assert_eq!(state, GameState::new());
    }
}
