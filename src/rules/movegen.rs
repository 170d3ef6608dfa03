//! Single-checker move generation.
//!
//! For each die value still to play, every origin the mover may use is
//! paired with the destination that die reaches, subject to:
//!
//! 1. **Bar priority**: with a checker on the bar, only entry moves exist.
//! 2. **Blocking**: a point with two or more opposing checkers is closed.
//! 3. **Bearing off**: only with every checker home; exact rolls from the
//!    matching point, larger rolls only from the farthest checker.
//!
//! Results are merged per origin so callers can present "from here you can
//! go to ..." without regrouping.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Destination, Move, Origin, Point};
use crate::core::{DieValue, GameState, Phase, Player};

/// One reachable destination from an origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveDestination {
    pub to: Destination,
    pub die_value: DieValue,
    pub would_hit: bool,
}

/// Every destination reachable from one origin.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidMove {
    pub from: Origin,
    pub destinations: Vec<MoveDestination>,
}

impl ValidMove {
    /// The moves this entry stands for.
    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.destinations
            .iter()
            .map(move |d| Move::new(self.from, d.to, d.die_value))
    }
}

/// Where `die` takes a checker from `point`, ignoring occupancy and
/// bear-off eligibility. `Off` when it runs past the edge.
#[must_use]
pub fn target_of(player: Player, point: Point, die: DieValue) -> Destination {
    let target = point.number() as i8 + player.direction() * die.get() as i8;
    match Point::from_i8(target) {
        Some(p) => Destination::Point(p),
        None => Destination::Off,
    }
}

/// Whether `player` may bear off from `point` with `die`.
#[must_use]
pub fn can_bear_off(board: &Board, player: Player, point: Point, die: DieValue) -> bool {
    if !board.all_checkers_home(player) || board.count_for(player, point) == 0 {
        return false;
    }
    let needed = point.distance_home(player);
    match die.get().cmp(&needed) {
        std::cmp::Ordering::Equal => true,
        std::cmp::Ordering::Greater => board.farthest_checker(player) == Some(point),
        std::cmp::Ordering::Less => false,
    }
}

/// The destination `die` legally reaches from `from`, if any.
#[must_use]
pub fn destination_for(
    board: &Board,
    player: Player,
    from: Origin,
    die: DieValue,
) -> Option<Destination> {
    match from {
        Origin::Bar => {
            if board.bar[player] == 0 {
                return None;
            }
            let entry = Point::entry(player, die);
            board.is_open_for(player, entry).then_some(Destination::Point(entry))
        }
        Origin::Point(point) => {
            if board.bar[player] > 0 || board.count_for(player, point) == 0 {
                return None;
            }
            match target_of(player, point, die) {
                Destination::Point(p) => {
                    board.is_open_for(player, p).then_some(Destination::Point(p))
                }
                Destination::Off => {
                    can_bear_off(board, player, point, die).then_some(Destination::Off)
                }
            }
        }
    }
}

/// Origins `player` could move from, bar first, then points in ascending order.
fn origins(board: &Board, player: Player) -> Vec<Origin> {
    if board.bar[player] > 0 {
        return vec![Origin::Bar];
    }
    board.occupied_points(player).map(Origin::Point).collect()
}

/// All legal single moves for one die value.
#[must_use]
pub fn moves_for_die(board: &Board, player: Player, die: DieValue) -> Vec<Move> {
    origins(board, player)
        .into_iter()
        .filter_map(|from| {
            destination_for(board, player, from, die).map(|to| Move::new(from, to, die))
        })
        .collect()
}

/// Whether any single move exists for `die`.
#[must_use]
pub fn die_is_playable(board: &Board, player: Player, die: DieValue) -> bool {
    origins(board, player)
        .into_iter()
        .any(|from| destination_for(board, player, from, die).is_some())
}

/// Merge per-die moves by origin, dropping duplicates.
#[must_use]
pub fn group_by_origin(
    board: &Board,
    player: Player,
    moves: impl IntoIterator<Item = Move>,
) -> Vec<ValidMove> {
    let mut seen: FxHashSet<Move> = FxHashSet::default();
    let mut grouped: Vec<ValidMove> = Vec::new();

    for mv in moves {
        if !seen.insert(mv) {
            continue;
        }
        let would_hit = matches!(mv.to, Destination::Point(p) if board.is_blot_for(player, p));
        let dest = MoveDestination {
            to: mv.to,
            die_value: mv.die_used,
            would_hit,
        };
        match grouped.iter_mut().find(|g| g.from == mv.from) {
            Some(group) => group.destinations.push(dest),
            None => grouped.push(ValidMove {
                from: mv.from,
                destinations: vec![dest],
            }),
        }
    }

    grouped.sort_by_key(|g| g.from);
    grouped
}

/// Every legal single move for the player on turn, grouped by origin.
///
/// Each distinct remaining die is considered on its own; the higher-die
/// rule is applied separately by `get_required_moves`. Empty unless the
/// game is in the moving phase.
#[must_use]
pub fn get_valid_moves(state: &GameState) -> Vec<ValidMove> {
    let player = match (state.phase, state.current_player) {
        (Phase::Moving, Some(player)) => player,
        _ => return Vec::new(),
    };

    let moves = state
        .distinct_remaining()
        .into_iter()
        .flat_map(|die| moves_for_die(&state.board, player, die));
    group_by_origin(&state.board, player, moves)
}
