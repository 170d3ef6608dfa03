//! Move legality.
//!
//! Everything here is a pure function of a `GameState` (or a `Board`), so it
//! works equally on the live state, a speculative copy, or a state rebuilt
//! from the action log.
//!
//! - `movegen`: single-checker moves per die, grouped by origin
//! - `forced`: the higher-die rule, the final legal move list, and
//!   explanations for rejected moves
//! - `victory`: win detection and gammon/backgammon classification

pub mod movegen;
pub mod forced;
pub mod victory;

pub use movegen::{
    can_bear_off, destination_for, die_is_playable, get_valid_moves, moves_for_die, target_of,
    MoveDestination, ValidMove,
};
pub use forced::{
    explain_rejection, filter_moves_by_die, get_required_moves, has_any_legal_move, is_legal,
    legal_moves, RequiredMoves,
};
pub use victory::{game_result, has_won, victory_type, winner};
