//! Binary snapshots.
//!
//! A snapshot is the bincode encoding of everything a `Session` holds:
//! configuration, game state, match state and the RNG checkpoint. The same
//! session always encodes to the same bytes, and a restored session rolls
//! the same dice the original would have.
//!
//! Snapshot bytes come from outside the engine, so `decode_session` checks
//! that the state hangs together before handing it to the command layer:
//! the board holds fifteen checkers a side, the phase agrees with the
//! player on turn and the result, the dice left equal the roll less the
//! dice already played, and this turn's moves can be taken back one by one.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{DieValue, GameConfig, GameRngState, GameState, Phase};
use crate::cube::MatchState;
use crate::session::Session;

/// Bumped when the snapshot layout changes.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot encoding failed: {0}")]
    Encode(bincode::Error),

    #[error("snapshot decoding failed: {0}")]
    Decode(bincode::Error),

    #[error("snapshot version {found} is not supported (expected {SNAPSHOT_VERSION})")]
    Version { found: u32 },

    #[error("snapshot holds an inconsistent game state: {0}")]
    Inconsistent(&'static str),
}

/// Everything needed to resume a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub version: u32,
    pub config: GameConfig,
    pub state: GameState,
    pub match_state: Option<MatchState>,
    pub rng: GameRngState,
}

impl SessionSnapshot {
    /// Capture `session`.
    #[must_use]
    pub fn capture(session: &Session) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            config: session.config().clone(),
            state: session.state().clone(),
            match_state: session.match_state().cloned(),
            rng: session.rng_state(),
        }
    }

    /// Rebuild the session this snapshot was taken from.
    #[must_use]
    pub fn restore(self) -> Session {
        Session::from_parts(self.config, self.state, self.match_state, &self.rng)
    }
}

/// Encode any serializable engine value.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, SnapshotError> {
    bincode::serialize(value).map_err(SnapshotError::Encode)
}

/// Decode a value written by [`encode`].
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SnapshotError> {
    bincode::deserialize(bytes).map_err(SnapshotError::Decode)
}

/// Encode a whole session.
pub fn encode_session(session: &Session) -> Result<Vec<u8>, SnapshotError> {
    encode(&SessionSnapshot::capture(session))
}

/// Decode a session, checking the version and the game state.
pub fn decode_session(bytes: &[u8]) -> Result<Session, SnapshotError> {
    let snapshot: SessionSnapshot = decode(bytes)?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(SnapshotError::Version {
            found: snapshot.version,
        });
    }
    check_state(&snapshot.state).map_err(SnapshotError::Inconsistent)?;
    Ok(snapshot.restore())
}

fn check_state(state: &GameState) -> Result<(), &'static str> {
    if state.board.check_invariants().is_err() {
        return Err("checker count");
    }
    if state.result.is_some() != (state.phase == Phase::GameOver) {
        return Err("result does not match the phase");
    }

    let per_turn_clear = state.remaining_moves.is_empty() && state.moves_this_turn.is_empty();
    match state.phase {
        Phase::NotStarted if state.current_player.is_none() && per_turn_clear => {}
        Phase::Rolling if state.current_player.is_some() && per_turn_clear => {}
        Phase::Moving if state.current_player.is_some() && state.dice_roll.is_some() => {}
        Phase::GameOver => {}
        _ => return Err("phase does not match the player on turn or the dice"),
    }

    if state.double_proposed_by.is_some()
        && (state.phase != Phase::Rolling || state.doubling_cube.is_none())
    {
        return Err("pending double outside the rolling phase");
    }

    if state.phase == Phase::Moving {
        check_dice(state)?;
        check_moves_unwind(state)?;
    }
    Ok(())
}

/// The dice left must be the roll less the dice this turn's moves used.
fn check_dice(state: &GameState) -> Result<(), &'static str> {
    let mut expected: Vec<DieValue> = state
        .dice_roll
        .map(|r| r.moves().to_vec())
        .unwrap_or_default();
    for played in &state.moves_this_turn {
        let idx = expected
            .iter()
            .position(|&d| d == played.mv.die_used)
            .ok_or("a move used a die that was not rolled")?;
        expected.remove(idx);
    }
    let mut remaining: Vec<DieValue> = state.remaining_moves.to_vec();
    expected.sort_unstable();
    remaining.sort_unstable();
    if expected == remaining {
        Ok(())
    } else {
        Err("remaining dice do not match the roll")
    }
}

/// Every move of this turn must come back off the board, latest first.
fn check_moves_unwind(state: &GameState) -> Result<(), &'static str> {
    let player = state.current_player.ok_or("no player on turn")?;
    let mut board = state.board;
    for played in state.moves_this_turn.iter().rev() {
        board = board
            .unapply_move(&played.mv, player, played.hit)
            .map_err(|_| "a move of this turn cannot be taken back")?;
    }
    Ok(())
}
