//! Doubling cube and match play.
//!
//! - `doubling`: cube value and ownership
//! - `match_state`: match score, game records, Crawford rule
//!
//! The proposal/response protocol itself (who may double and when) is
//! validated by the command layer in `engine::commands`.

pub mod doubling;
pub mod match_state;

pub use doubling::{CubeOwner, DoublingCube};
pub use match_state::{GameRecord, MatchPhase, MatchState};
