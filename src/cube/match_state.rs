//! Multi-game match scoring with the Crawford rule.
//!
//! A `MatchState` changes only at game boundaries: `record_game` takes the
//! finished game's result and cube value and returns the next match state.
//! The first game after either side first reaches `target_score - 1` is the
//! Crawford game, in which the cube is out of play.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::{CommandError, GameResult, MatchConfig, Player, PlayerMap, VictoryType};

/// Whether the match is still being played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    InProgress,
    Completed,
}

/// Outcome of one game of the match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameRecord {
    pub winner: Player,
    pub victory_type: VictoryType,
    pub cube_value: u32,
    pub points: u32,
}

/// Score and Crawford bookkeeping for a series of games.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    pub config: MatchConfig,
    pub score: PlayerMap<u32>,
    pub phase: MatchPhase,
    pub winner: Option<Player>,
    /// 1-based number of the game being played (or last played).
    pub game_number: u32,
    pub is_crawford_game: bool,
    pub crawford_game_used: bool,
    pub game_history: Vector<GameRecord>,
}

impl MatchState {
    /// A fresh match at 0–0, game 1.
    #[must_use]
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            score: PlayerMap::default(),
            phase: MatchPhase::InProgress,
            winner: None,
            game_number: 1,
            is_crawford_game: false,
            crawford_game_used: false,
            game_history: Vector::new(),
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == MatchPhase::Completed
    }

    /// Whether the cube is in play for the current game.
    #[must_use]
    pub fn cube_enabled(&self) -> bool {
        self.config.enable_doubling_cube && !self.is_crawford_game && !self.is_complete()
    }

    /// Points `player` still needs to win the match.
    #[must_use]
    pub fn points_needed(&self, player: Player) -> u32 {
        self.config.target_score.saturating_sub(self.score[player])
    }

    /// Points a finished game is worth.
    #[must_use]
    pub fn points_for(victory_type: VictoryType, cube_value: u32) -> u32 {
        cube_value * victory_type.multiplier()
    }

    /// Score a finished game and advance to the next one.
    ///
    /// Fails with `MatchNotInProgress` once the match is complete.
    pub fn record_game(
        &self,
        result: &GameResult,
        cube_value: u32,
    ) -> Result<MatchState, CommandError> {
        if self.is_complete() {
            return Err(CommandError::MatchNotInProgress);
        }

        let mut next = self.clone();
        let points = Self::points_for(result.victory_type, cube_value);
        next.score[result.winner] += points;
        next.game_history.push_back(GameRecord {
            winner: result.winner,
            victory_type: result.victory_type,
            cube_value,
            points,
        });

        if next.score[result.winner] >= next.config.target_score {
            next.phase = MatchPhase::Completed;
            next.winner = Some(result.winner);
            next.is_crawford_game = false;
            tracing::info!(
                winner = %result.winner,
                white = next.score.white,
                black = next.score.black,
                "match complete"
            );
            return Ok(next);
        }

        next.game_number += 1;
        if self.is_crawford_game {
            next.is_crawford_game = false;
            next.crawford_game_used = true;
        } else if !next.crawford_game_used && next.points_needed(result.winner) == 1 {
            next.is_crawford_game = true;
        }

        tracing::debug!(
            game = next.game_number,
            white = next.score.white,
            black = next.score.black,
            crawford = next.is_crawford_game,
            "match advanced"
        );
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn win(winner: Player, victory_type: VictoryType) -> GameResult {
        GameResult { winner, victory_type }
    }

    #[test]
    fn test_new_match() {
        let state = MatchState::new(MatchConfig::new(5));
        assert_eq!(state.game_number, 1);
        assert_eq!(state.score, PlayerMap::default());
        assert!(state.cube_enabled());
        assert_eq!(state.points_needed(Player::White), 5);
    }

    #[test]
    fn test_points_use_cube_and_multiplier() {
        assert_eq!(MatchState::points_for(VictoryType::Single, 1), 1);
        assert_eq!(MatchState::points_for(VictoryType::Gammon, 2), 4);
        assert_eq!(MatchState::points_for(VictoryType::Backgammon, 4), 12);
    }

    #[test]
    fn test_record_game_scores_winner() {
        let state = MatchState::new(MatchConfig::new(7));
        let next = state.record_game(&win(Player::Black, VictoryType::Gammon), 2).unwrap();

        assert_eq!(next.score.black, 4);
        assert_eq!(next.score.white, 0);
        assert_eq!(next.game_number, 2);
        assert_eq!(next.game_history.len(), 1);
        assert_eq!(next.game_history[0].points, 4);
        // original untouched
        assert_eq!(state.score.black, 0);
    }

    #[test]
    fn test_match_completes_at_target() {
        let state = MatchState::new(MatchConfig::new(3));
        let next = state.record_game(&win(Player::White, VictoryType::Backgammon), 1).unwrap();

        assert!(next.is_complete());
        assert_eq!(next.winner, Some(Player::White));
        assert!(!next.cube_enabled());
        assert_eq!(
            next.record_game(&win(Player::Black, VictoryType::Single), 1),
            Err(CommandError::MatchNotInProgress)
        );
    }

    #[test]
    fn test_crawford_game_follows_reaching_match_point() {
        let state = MatchState::new(MatchConfig::new(3));

        let state = state.record_game(&win(Player::White, VictoryType::Gammon), 1).unwrap();
        assert_eq!(state.score.white, 2);
        assert!(state.is_crawford_game);
        assert!(!state.cube_enabled());

        // Crawford game played; cube comes back
        let state = state.record_game(&win(Player::Black, VictoryType::Single), 1).unwrap();
        assert!(!state.is_crawford_game);
        assert!(state.crawford_game_used);
        assert!(state.cube_enabled());

        // trailer reaching match point later does not trigger another
        let state = state.record_game(&win(Player::Black, VictoryType::Single), 1).unwrap();
        assert_eq!(state.score.black, 2);
        assert!(!state.is_crawford_game);
        assert!(state.cube_enabled());
    }

    #[test]
    fn test_cube_disabled_by_config() {
        let state = MatchState::new(MatchConfig::new(5).with_doubling_cube(false));
        assert!(!state.cube_enabled());
    }
}
