//! The command/result core.
//!
//! ## Layers
//!
//! - `reducer`: `apply_action`, the only place a `GameState` changes
//! - `commands`: validated `perform_*` operations that turn requests into
//!   actions, or reject them with a `CommandError`
//! - `history`: replay and human-readable summaries of the action log

pub mod reducer;
pub mod commands;
pub mod history;

pub use reducer::apply_action;
pub use commands::{
    current_player, ensure_turn, perform_accept_double, perform_decline_double, perform_end_turn,
    perform_move, perform_moves, perform_propose_double, perform_roll_dice,
    perform_set_first_player, perform_start_game, perform_undo_all_moves, perform_undo_move,
    reset_game, CommandResult, Committed, MoveOutcome, OpeningRoll, RollOutcome,
};
pub use history::{
    describe_action, format_moves, replay, replay_to, replays_to, summarize_game, summarize_turn,
};
