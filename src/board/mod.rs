//! Board model: points, bar, borne-off counters and checker moves.
//!
//! Pure data plus invariant checks. Which moves are *legal* is decided by
//! `rules`; this module only knows whether a move fits on the board.

pub mod position;
pub mod point;

pub use position::{Board, BoardError, CHECKERS_PER_PLAYER, STANDARD_POINTS};
pub use point::{Destination, Move, Origin, Point, NUM_POINTS};
