//! The state holder: one authoritative game, the dice, and an optional match.
//!
//! `Session` owns everything a host needs between commands. Each method
//! runs the matching `perform_*` command and, on success, replaces the held
//! state with the committed one. A rejected command leaves the session as
//! it was, RNG included.
//!
//! When a match is attached, a finished game is scored into it as part of
//! the command that ended it, and `next_game` starts the following game
//! with the cube set up for it (off during the Crawford game).
//!
//! ## Example
//!
//! ```
//! use backgammon_engine::{GameConfig, MatchConfig, Phase, Session};
//!
//! let mut session = Session::with_match(GameConfig::default().with_seed(3), MatchConfig::new(3));
//! let opening = session.start_game().unwrap();
//! assert_eq!(session.state().phase, Phase::Moving);
//! assert_eq!(session.state().current_player, Some(opening.first_player));
//! assert!(!session.legal_moves().is_empty());
//! ```

use crate::board::Move;
use crate::core::{
    CommandError, DiceRoll, DoubleRejection, GameConfig, GameResult, GameRng, GameRngState,
    GameState, MatchConfig, Phase, PlayedMove, Player, TurnSummary,
};
use crate::cube::{DoublingCube, MatchState};
use crate::engine::{self, Committed, MoveOutcome, OpeningRoll, RollOutcome};
use crate::rules::{self, RequiredMoves, ValidMove};

/// A game (or match) in progress.
#[derive(Clone, Debug)]
pub struct Session {
    config: GameConfig,
    state: GameState,
    match_state: Option<MatchState>,
    rng: GameRng,
}

impl Session {
    /// A session for unscored games.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let rng = GameRng::new(config.seed);
        Self {
            config,
            state: GameState::new(),
            match_state: None,
            rng,
        }
    }

    /// A session playing a match.
    #[must_use]
    pub fn with_match(config: GameConfig, match_config: MatchConfig) -> Self {
        let mut session = Self::new(config);
        session.match_state = Some(MatchState::new(match_config));
        session
    }

    /// Resume from saved parts.
    #[must_use]
    pub fn from_parts(
        config: GameConfig,
        state: GameState,
        match_state: Option<MatchState>,
        rng: &GameRngState,
    ) -> Self {
        Self {
            config,
            state,
            match_state,
            rng: GameRng::from_state(rng),
        }
    }

    // === Queries ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn match_state(&self) -> Option<&MatchState> {
        self.match_state.as_ref()
    }

    /// RNG checkpoint for saving the session.
    #[must_use]
    pub fn rng_state(&self) -> GameRngState {
        self.rng.state()
    }

    /// The player on turn.
    pub fn current_player(&self) -> Result<Player, CommandError> {
        engine::current_player(&self.state)
    }

    /// Fail unless `player` is on turn. Hosts driving one side call this
    /// before issuing that side's commands.
    pub fn ensure_turn(&self, player: Player) -> Result<(), CommandError> {
        engine::ensure_turn(&self.state, player)
    }

    #[must_use]
    pub fn valid_moves(&self) -> Vec<ValidMove> {
        rules::get_valid_moves(&self.state)
    }

    #[must_use]
    pub fn required_moves(&self) -> RequiredMoves {
        rules::get_required_moves(&self.state)
    }

    /// Moves `make_move` will accept right now.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<ValidMove> {
        rules::legal_moves(&self.state)
    }

    /// Whether the cube is in play for a game started now.
    #[must_use]
    pub fn cube_enabled(&self) -> bool {
        match &self.match_state {
            Some(match_state) => match_state.cube_enabled(),
            None => self.config.enable_doubling_cube,
        }
    }

    // === Game commands ===

    /// Roll for first turn and start the game.
    pub fn start_game(&mut self) -> Result<OpeningRoll, CommandError> {
        self.ensure_match_in_progress()?;
        let cube_enabled = self.cube_enabled();
        let committed = engine::perform_start_game(&self.state, &mut self.rng, cube_enabled)?;
        Ok(self.accept(committed))
    }

    /// Start the game with `player` to roll.
    pub fn set_first_player(&mut self, player: Player) -> Result<(), CommandError> {
        self.ensure_match_in_progress()?;
        let cube_enabled = self.cube_enabled();
        let committed = engine::perform_set_first_player(&self.state, player, cube_enabled)?;
        Ok(self.accept(committed))
    }

    /// Roll the dice, or use `roll` when given.
    pub fn roll_dice(&mut self, roll: Option<DiceRoll>) -> Result<RollOutcome, CommandError> {
        let committed = engine::perform_roll_dice(&self.state, &mut self.rng, roll)?;
        Ok(self.accept(committed))
    }

    pub fn make_move(&mut self, mv: Move) -> Result<MoveOutcome, CommandError> {
        let committed = engine::perform_move(&self.state, mv)?;
        self.accept_scored(committed)
    }

    /// Play `moves` as one unit; none are played if any is illegal.
    pub fn make_moves(&mut self, moves: &[Move]) -> Result<Vec<MoveOutcome>, CommandError> {
        let committed = engine::perform_moves(&self.state, moves)?;
        self.accept_scored(committed)
    }

    pub fn end_turn(&mut self) -> Result<TurnSummary, CommandError> {
        let committed = engine::perform_end_turn(&self.state)?;
        Ok(self.accept(committed))
    }

    pub fn undo_move(&mut self) -> Result<PlayedMove, CommandError> {
        let committed = engine::perform_undo_move(&self.state)?;
        Ok(self.accept(committed))
    }

    pub fn undo_all_moves(&mut self) -> Result<Vec<PlayedMove>, CommandError> {
        let committed = engine::perform_undo_all_moves(&self.state)?;
        Ok(self.accept(committed))
    }

    /// Abandon the current game. The match, if any, is unaffected.
    pub fn reset_game(&mut self) {
        self.state = engine::reset_game();
    }

    // === Doubling cube ===

    /// Offer a double for the player on turn.
    pub fn propose_double(&mut self) -> Result<u32, CommandError> {
        let player = self.current_player()?;
        let crawford = self.match_state.as_ref().is_some_and(|m| m.is_crawford_game);
        let max = self.config.max_cube_value;
        let committed =
            engine::perform_propose_double(&self.state, player, max).map_err(|err| match err {
                CommandError::DoubleNotAllowed(DoubleRejection::CubeDisabled) if crawford => {
                    CommandError::DoubleNotAllowed(DoubleRejection::CrawfordGame)
                }
                other => other,
            })?;
        Ok(self.accept(committed))
    }

    /// Take the pending double on behalf of the side it was offered to.
    pub fn accept_double(&mut self) -> Result<DoublingCube, CommandError> {
        let responder = self.responder()?;
        let committed = engine::perform_accept_double(&self.state, responder)?;
        Ok(self.accept(committed))
    }

    /// Pass the pending double; the proposer wins.
    pub fn decline_double(&mut self) -> Result<GameResult, CommandError> {
        let responder = self.responder()?;
        let committed = engine::perform_decline_double(&self.state, responder)?;
        self.accept_scored(committed)
    }

    // === Match ===

    /// After a finished game, start the next one.
    pub fn next_game(&mut self) -> Result<OpeningRoll, CommandError> {
        if !self.state.is_over() {
            return Err(CommandError::InvalidCommandForPhase {
                command: "start the next game",
                phase: self.state.phase,
            });
        }
        self.ensure_match_in_progress()?;
        self.state = GameState::new();
        self.start_game()
    }

    /// Start the match over at 0-0 with a fresh game. Without a match, the
    /// current game is reset.
    pub fn reset_match(&mut self) {
        if let Some(match_state) = &self.match_state {
            self.match_state = Some(MatchState::new(match_state.config.clone()));
            tracing::debug!("match reset");
        }
        self.state = GameState::new();
    }

    // === Internals ===

    fn accept<T>(&mut self, committed: Committed<T>) -> T {
        self.state = committed.state;
        committed.output
    }

    /// Accept a command that may have ended the game, scoring it into the
    /// match when one is attached.
    fn accept_scored<T>(&mut self, committed: Committed<T>) -> Result<T, CommandError> {
        let next_match = match (&self.match_state, committed.state.result) {
            (Some(match_state), Some(result)) if !self.state.is_over() => {
                Some(match_state.record_game(&result, committed.state.cube_value())?)
            }
            _ => None,
        };
        if next_match.is_some() {
            self.match_state = next_match;
        }
        Ok(self.accept(committed))
    }

    fn ensure_match_in_progress(&self) -> Result<(), CommandError> {
        match &self.match_state {
            Some(match_state) if match_state.is_complete() => Err(CommandError::MatchNotInProgress),
            _ => Ok(()),
        }
    }

    fn responder(&self) -> Result<Player, CommandError> {
        if self.state.phase != Phase::Rolling {
            return Err(CommandError::InvalidCommandForPhase {
                command: "answer a double",
                phase: self.state.phase,
            });
        }
        self.state
            .double_proposed_by
            .map(Player::opponent)
            .ok_or(CommandError::DoubleNotAllowed(DoubleRejection::NoProposal))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Destination, Origin};
    use crate::core::{DieValue, ErrorKind, VictoryType};
    use crate::cube::CubeOwner;

    fn die(v: u8) -> DieValue {
        DieValue::new(v).unwrap()
    }

    #[test]
    fn test_start_game_uses_seed() {
        let mut a = Session::new(GameConfig::default().with_seed(11));
        let mut b = Session::new(GameConfig::default().with_seed(11));
        assert_eq!(a.start_game().unwrap(), b.start_game().unwrap());
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn test_rejected_command_leaves_session() {
        let mut session = Session::default();
        session.set_first_player(Player::White).unwrap();
        let before = session.state().clone();
        let rng_before = session.rng_state();

        let mv = Move::new(Origin::point(8), Destination::point(5), die(3));
        assert!(session.make_move(mv).is_err());
        assert!(session.end_turn().is_err());
        assert_eq!(session.state(), &before);
        assert_eq!(session.rng_state(), rng_before);
    }

    #[test]
    fn test_turn_cycle() {
        let mut session = Session::default();
        session.set_first_player(Player::White).unwrap();
        session.roll_dice(DiceRoll::from_values(3, 1)).unwrap();
        session
            .make_moves(&[
                Move::new(Origin::point(8), Destination::point(5), die(3)),
                Move::new(Origin::point(6), Destination::point(5), die(1)),
            ])
            .unwrap();
        let summary = session.end_turn().unwrap();

        assert_eq!(summary.moves.len(), 2);
        assert_eq!(session.current_player(), Ok(Player::Black));
        assert_eq!(session.state().phase, Phase::Rolling);
    }

    #[test]
    fn test_declined_double_scores_match() {
        let mut session = Session::with_match(GameConfig::default(), MatchConfig::new(3));
        session.set_first_player(Player::White).unwrap();
        assert_eq!(session.propose_double().unwrap(), 2);
        let result = session.decline_double().unwrap();

        assert_eq!(result.winner, Player::White);
        assert_eq!(result.victory_type, VictoryType::Single);
        let match_state = session.match_state().unwrap();
        assert_eq!(match_state.score.white, 1);
        assert_eq!(match_state.game_number, 2);
    }

    #[test]
    fn test_accepted_double() {
        let mut session = Session::default();
        session.set_first_player(Player::Black).unwrap();
        session.propose_double().unwrap();
        let cube = session.accept_double().unwrap();
        assert_eq!(cube.value, 2);
        assert_eq!(cube.owner, CubeOwner::Owned(Player::Black));

        // the side that doubled cannot double again
        assert_eq!(
            session.propose_double(),
            Err(CommandError::DoubleNotAllowed(DoubleRejection::HoldsCube(Player::Black)))
        );
        session.roll_dice(DiceRoll::from_values(6, 5)).unwrap();
        assert!(session.accept_double().is_err());
    }

    #[test]
    fn test_next_game_requires_game_over() {
        let mut session = Session::with_match(GameConfig::default(), MatchConfig::new(3));
        session.start_game().unwrap();
        let err = session.next_game().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidCommandForPhase);
    }

    #[test]
    fn test_crawford_game_disables_cube() {
        let mut session = Session::with_match(GameConfig::default(), MatchConfig::new(2));
        session.set_first_player(Player::White).unwrap();
        session.propose_double().unwrap();
        session.decline_double().unwrap();

        // white leads 1-0 in a match to 2: the next game is Crawford
        assert!(session.match_state().unwrap().is_crawford_game);
        session.next_game().unwrap();
        assert_eq!(session.state().doubling_cube, None);

        session.reset_game();
        session.set_first_player(Player::Black).unwrap();
        assert_eq!(
            session.propose_double(),
            Err(CommandError::DoubleNotAllowed(DoubleRejection::CrawfordGame))
        );
    }

    #[test]
    fn test_completed_match_refuses_new_games() {
        let mut session = Session::with_match(GameConfig::default(), MatchConfig::new(1));
        session.set_first_player(Player::Black).unwrap();
        session.propose_double().unwrap();
        session.decline_double().unwrap();

        assert!(session.match_state().unwrap().is_complete());
        assert_eq!(session.next_game(), Err(CommandError::MatchNotInProgress));

        session.reset_match();
        assert!(!session.match_state().unwrap().is_complete());
        assert!(session.start_game().is_ok());
    }
}
