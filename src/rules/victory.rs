//! Win detection and victory classification.

use crate::board::{Board, CHECKERS_PER_PLAYER};
use crate::core::{GameResult, Player, VictoryType};

/// Whether `player` has borne off all fifteen checkers.
#[must_use]
pub fn has_won(board: &Board, player: Player) -> bool {
    board.all_checkers_home(player) && board.borne_off[player] == CHECKERS_PER_PLAYER
}

/// The side that has borne everything off, if any.
#[must_use]
pub fn winner(board: &Board) -> Option<Player> {
    Player::ALL.into_iter().find(|&p| has_won(board, p))
}

/// Classify a win by the loser's position.
///
/// A loser with nothing borne off is gammoned, and backgammoned when it
/// also still has a checker on the bar or in the winner's home board.
#[must_use]
pub fn victory_type(board: &Board, winner: Player) -> VictoryType {
    let loser = winner.opponent();
    if board.borne_off[loser] > 0 {
        VictoryType::Single
    } else if board.has_checker_in_home_or_bar(loser, winner) {
        VictoryType::Backgammon
    } else {
        VictoryType::Gammon
    }
}

/// The finished game's result, or `None` while play continues.
#[must_use]
pub fn game_result(board: &Board) -> Option<GameResult> {
    winner(board).map(|winner| GameResult {
        winner,
        victory_type: victory_type(board, winner),
    })
}
