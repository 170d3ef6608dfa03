//! The board: 24 points, the bar, and borne-off checkers.
//!
//! Points hold signed counts: positive for white, negative for black, so a
//! point can never hold both colours. Every method is pure; `apply_move`
//! and `unapply_move` return new boards.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::point::{Destination, Move, Origin, Point, NUM_POINTS};
use crate::core::{Player, PlayerMap};

/// Checkers per side.
pub const CHECKERS_PER_PLAYER: u8 = 15;

/// Standard opening position, index 0 = point 1.
pub const STANDARD_POINTS: [i8; NUM_POINTS] = [
    -2, 0, 0, 0, 0, 5, 0, 3, 0, 0, 0, -5, 5, 0, 0, 0, -3, 0, -5, 0, 0, 0, 0, 2,
];

/// Why a board-level move or check failed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("invalid move {mv}: {reason}")]
    InvalidMove { mv: Move, reason: &'static str },

    #[error("{player} has {found} checkers, expected 15")]
    CheckerCount { player: Player, found: u32 },
}

/// Board position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    /// Signed checker counts, index 0 = point 1.
    pub points: [i8; NUM_POINTS],
    /// Checkers waiting to re-enter.
    pub bar: PlayerMap<u8>,
    /// Checkers removed from play.
    pub borne_off: PlayerMap<u8>,
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl Board {
    /// The standard opening position.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            points: STANDARD_POINTS,
            bar: PlayerMap::default(),
            borne_off: PlayerMap::default(),
        }
    }

    /// A board with the given points and nothing on the bar or borne off.
    ///
    /// Useful for setting up positions; callers fill in `bar` and
    /// `borne_off` so the per-colour totals come to 15.
    #[must_use]
    pub fn from_points(points: [i8; NUM_POINTS]) -> Self {
        Self {
            points,
            bar: PlayerMap::default(),
            borne_off: PlayerMap::default(),
        }
    }

    // === Queries ===

    /// Which side occupies a point, if any.
    #[must_use]
    pub fn point_owner(&self, point: Point) -> Option<Player> {
        match self.points[point.index()] {
            0 => None,
            n if n > 0 => Some(Player::White),
            _ => Some(Player::Black),
        }
    }

    /// Number of checkers on a point, whichever side owns it.
    #[must_use]
    pub fn checker_count(&self, point: Point) -> u8 {
        self.points[point.index()].unsigned_abs()
    }

    /// Number of `player`'s checkers on a point.
    #[must_use]
    pub fn count_for(&self, player: Player, point: Point) -> u8 {
        if self.point_owner(point) == Some(player) {
            self.checker_count(point)
        } else {
            0
        }
    }

    /// Whether a point is in `player`'s home board.
    #[must_use]
    pub fn is_home(player: Player, point: Point) -> bool {
        point.is_home(player)
    }

    /// Whether `player` may land on a point (fewer than two opposing checkers).
    #[must_use]
    pub fn is_open_for(&self, player: Player, point: Point) -> bool {
        self.count_for(player.opponent(), point) < 2
    }

    /// Whether a point holds exactly one opposing checker.
    #[must_use]
    pub fn is_blot_for(&self, player: Player, point: Point) -> bool {
        self.count_for(player.opponent(), point) == 1
    }

    /// Points occupied by `player`, in ascending order.
    pub fn occupied_points(&self, player: Player) -> impl Iterator<Item = Point> + '_ {
        Point::all().filter(move |&p| self.point_owner(p) == Some(player))
    }

    /// Checkers `player` still has on the 24 points.
    #[must_use]
    pub fn checkers_on_board(&self, player: Player) -> u32 {
        self.occupied_points(player)
            .map(|p| u32::from(self.checker_count(p)))
            .sum()
    }

    /// All of `player`'s checkers: points, bar and borne off.
    #[must_use]
    pub fn total_checkers(&self, player: Player) -> u32 {
        self.checkers_on_board(player)
            + u32::from(self.bar[player])
            + u32::from(self.borne_off[player])
    }

    /// True when `player` has nothing on the bar and nothing outside the
    /// home board. Borne-off checkers count as home.
    #[must_use]
    pub fn all_checkers_home(&self, player: Player) -> bool {
        self.bar[player] == 0 && self.occupied_points(player).all(|p| p.is_home(player))
    }

    /// The occupied point farthest from `player`'s bear-off edge.
    #[must_use]
    pub fn farthest_checker(&self, player: Player) -> Option<Point> {
        self.occupied_points(player).max_by_key(|p| p.distance_home(player))
    }

    /// Total pips `player` needs to bear everything off.
    #[must_use]
    pub fn pip_count(&self, player: Player) -> u32 {
        let on_board: u32 = self
            .occupied_points(player)
            .map(|p| u32::from(p.distance_home(player)) * u32::from(self.checker_count(p)))
            .sum();
        on_board + 25 * u32::from(self.bar[player])
    }

    /// Whether `player` has a checker on the bar or inside `other`'s home board.
    #[must_use]
    pub fn has_checker_in_home_or_bar(&self, player: Player, other: Player) -> bool {
        self.bar[player] > 0 || self.occupied_points(player).any(|p| p.is_home(other))
    }

    /// Verify the 15-checker invariant for both sides.
    pub fn check_invariants(&self) -> Result<(), BoardError> {
        for player in Player::ALL {
            let found = self.total_checkers(player);
            if found != u32::from(CHECKERS_PER_PLAYER) {
                return Err(BoardError::CheckerCount { player, found });
            }
        }
        Ok(())
    }

    // === Appliers ===

    /// Apply a move for `player`, returning the new board and whether an
    /// opposing blot was hit.
    ///
    /// Only board occupancy is checked here: a checker at the source, the
    /// destination not blocked. Dice distance and bear-off eligibility are
    /// the legality engine's job.
    pub fn apply_move(&self, mv: &Move, player: Player) -> Result<(Board, bool), BoardError> {
        let invalid = |reason| BoardError::InvalidMove { mv: *mv, reason };
        let mut next = *self;

        match mv.from {
            Origin::Bar => {
                if next.bar[player] == 0 {
                    return Err(invalid("no checker on the bar"));
                }
                next.bar[player] -= 1;
            }
            Origin::Point(p) => {
                if next.count_for(player, p) == 0 {
                    return Err(invalid("no checker on the source point"));
                }
                next.points[p.index()] -= player.sign();
            }
        }

        let mut hit = false;
        match mv.to {
            Destination::Off => next.borne_off[player] += 1,
            Destination::Point(p) => {
                let opponent = player.opponent();
                match next.count_for(opponent, p) {
                    0 => {}
                    1 => {
                        next.points[p.index()] = 0;
                        next.bar[opponent] += 1;
                        hit = true;
                    }
                    _ => return Err(invalid("destination is blocked")),
                }
                next.points[p.index()] += player.sign();
            }
        }

        Ok((next, hit))
    }

    /// Reverse a previously applied move. When `hit` is set the captured
    /// checker goes back from the opponent's bar to the destination.
    pub fn unapply_move(&self, mv: &Move, player: Player, hit: bool) -> Result<Board, BoardError> {
        let invalid = |reason| BoardError::InvalidMove { mv: *mv, reason };
        let mut next = *self;
        let opponent = player.opponent();

        match mv.to {
            Destination::Off => {
                if next.borne_off[player] == 0 {
                    return Err(invalid("no borne-off checker to restore"));
                }
                next.borne_off[player] -= 1;
            }
            Destination::Point(p) => {
                if next.count_for(player, p) == 0 {
                    return Err(invalid("no checker on the destination to take back"));
                }
                next.points[p.index()] -= player.sign();
                if hit {
                    if next.bar[opponent] == 0 || next.points[p.index()] != 0 {
                        return Err(invalid("hit checker cannot be restored"));
                    }
                    next.bar[opponent] -= 1;
                    next.points[p.index()] = opponent.sign();
                }
            }
        }

        match mv.from {
            Origin::Bar => next.bar[player] += 1,
            Origin::Point(p) => {
                if next.count_for(opponent, p) > 0 {
                    return Err(invalid("source point is now held by the opponent"));
                }
                next.points[p.index()] += player.sign();
            }
        }

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DieValue;

    fn die(v: u8) -> DieValue {
        DieValue::new(v).unwrap()
    }

    fn pt(n: u8) -> Point {
        Point::new(n).unwrap()
    }

    #[test]
    fn test_standard_board() {
        let board = Board::standard();
        assert!(board.check_invariants().is_ok());
        assert_eq!(board.point_owner(pt(6)), Some(Player::White));
        assert_eq!(board.point_owner(pt(1)), Some(Player::Black));
        assert_eq!(board.point_owner(pt(2)), None);
        assert_eq!(board.checker_count(pt(13)), 5);
        assert_eq!(board.pip_count(Player::White), 167);
        assert_eq!(board.pip_count(Player::Black), 167);
    }

    #[test]
    fn test_all_checkers_home() {
        let board = Board::standard();
        assert!(!board.all_checkers_home(Player::White));

        let mut points = [0i8; NUM_POINTS];
        points[0] = 5;
        points[5] = 10;
        points[23] = -15;
        let board = Board::from_points(points);
        assert!(board.all_checkers_home(Player::White));
        assert!(board.all_checkers_home(Player::Black));
        assert_eq!(board.farthest_checker(Player::White), Some(pt(6)));
    }

    #[test]
    fn test_apply_simple_move() {
        let board = Board::standard();
        let mv = Move::new(Origin::point(8), Destination::point(5), die(3));
        let (next, hit) = board.apply_move(&mv, Player::White).unwrap();

        assert!(!hit);
        assert_eq!(next.points[7], 2);
        assert_eq!(next.points[4], 1);
        // input untouched
        assert_eq!(board.points[7], 3);
        assert!(next.check_invariants().is_ok());
    }

    #[test]
    fn test_apply_hit_and_unapply() {
        let mut board = Board::standard();
        // one back checker from 24 becomes a blot on 7
        board.points[23] = 1;
        board.points[6] = 1;
        assert!(board.check_invariants().is_ok());

        let mv = Move::new(Origin::point(1), Destination::point(7), die(6));
        let (next, hit) = board.apply_move(&mv, Player::Black).unwrap();
        assert!(hit);
        assert_eq!(next.points[6], -1);
        assert_eq!(next.bar[Player::White], 1);
        assert!(next.check_invariants().is_ok());

        let restored = next.unapply_move(&mv, Player::Black, true).unwrap();
        assert_eq!(restored, board);
    }

    #[test]
    fn test_apply_rejects_blocked_destination() {
        let board = Board::standard();
        let mv = Move::new(Origin::point(13), Destination::point(12), die(1));
        let err = board.apply_move(&mv, Player::White).unwrap_err();
        assert!(matches!(err, BoardError::InvalidMove { reason: "destination is blocked", .. }));
    }

    #[test]
    fn test_apply_rejects_empty_source_and_bar() {
        let board = Board::standard();
        let from_empty = Move::new(Origin::point(2), Destination::point(1), die(1));
        assert!(board.apply_move(&from_empty, Player::White).is_err());

        let from_bar = Move::new(Origin::Bar, Destination::point(22), die(3));
        assert!(board.apply_move(&from_bar, Player::White).is_err());
    }

    #[test]
    fn test_bear_off_and_back() {
        let mut points = [0i8; NUM_POINTS];
        points[1] = 15;
        points[23] = -15;
        let board = Board::from_points(points);

        let mv = Move::new(Origin::point(2), Destination::Off, die(2));
        let (next, hit) = board.apply_move(&mv, Player::White).unwrap();
        assert!(!hit);
        assert_eq!(next.borne_off[Player::White], 1);
        assert_eq!(next.points[1], 14);

        assert_eq!(next.unapply_move(&mv, Player::White, false).unwrap(), board);
    }

    #[test]
    fn test_invariant_violation_detected() {
        let mut board = Board::standard();
        board.points[0] = -3;
        assert_eq!(
            board.check_invariants(),
            Err(BoardError::CheckerCount { player: Player::Black, found: 16 })
        );
    }
}
