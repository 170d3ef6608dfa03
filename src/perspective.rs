//! Per-player board views.
//!
//! The engine stores every position from white's side: white moves 24 to
//! 1, black 1 to 24. A host that wants each side to see itself moving
//! 24 to 1 converts at the boundary with these functions. Point `p` in
//! black's view is point `25 - p` on the board, and the viewer's checkers
//! are positive.
//!
//! Every transform here is its own inverse.

use crate::board::{Board, Destination, Move, Origin, Point, NUM_POINTS};
use crate::core::{Player, PlayerMap};

/// A point number as `viewer` sees it.
#[must_use]
pub fn point_for(viewer: Player, point: Point) -> Point {
    match viewer {
        Player::White => point,
        Player::Black => Point::new(25 - point.number()).unwrap_or(point),
    }
}

/// A move as `viewer` sees it. Also converts a viewed move back.
#[must_use]
pub fn move_for(viewer: Player, mv: Move) -> Move {
    let from = match mv.from {
        Origin::Bar => Origin::Bar,
        Origin::Point(p) => Origin::Point(point_for(viewer, p)),
    };
    let to = match mv.to {
        Destination::Off => Destination::Off,
        Destination::Point(p) => Destination::Point(point_for(viewer, p)),
    };
    Move::new(from, to, mv.die_used)
}

/// The board as `viewer` sees it, with the viewer in the white slots.
///
/// For black the points are mirrored and negated, and the bar and
/// borne-off counts swap sides. Applying it twice gives back the board.
#[must_use]
pub fn to_player_view(board: &Board, viewer: Player) -> Board {
    match viewer {
        Player::White => *board,
        Player::Black => {
            let mut points = [0i8; NUM_POINTS];
            for (idx, count) in points.iter_mut().enumerate() {
                *count = -board.points[NUM_POINTS - 1 - idx];
            }
            Board {
                points,
                bar: swap(board.bar),
                borne_off: swap(board.borne_off),
            }
        }
    }
}

/// Undo `to_player_view`.
#[must_use]
pub fn from_player_view(view: &Board, viewer: Player) -> Board {
    to_player_view(view, viewer)
}

fn swap<T: Copy>(map: PlayerMap<T>) -> PlayerMap<T> {
    PlayerMap {
        white: map.black,
        black: map.white,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DieValue;

    #[test]
    fn test_white_view_is_identity() {
        let board = Board::standard();
        assert_eq!(to_player_view(&board, Player::White), board);
        let p = Point::new(8).unwrap();
        assert_eq!(point_for(Player::White, p), p);
    }

    #[test]
    fn test_standard_board_is_symmetric() {
        let board = Board::standard();
        assert_eq!(to_player_view(&board, Player::Black), board);
    }

    #[test]
    fn test_black_view_round_trip() {
        let mut board = Board::standard();
        board.points[0] = -1;
        board.bar.black = 1;
        board.points[5] = 4;
        board.borne_off.white = 1;

        let view = to_player_view(&board, Player::Black);
        assert_eq!(view.bar.white, 1);
        assert_eq!(view.borne_off.black, 1);
        assert_eq!(view.points[23], 1);
        assert_eq!(from_player_view(&view, Player::Black), board);
    }

    #[test]
    fn test_black_move_view() {
        let six = DieValue::new(6).unwrap();
        let mv = Move::new(Origin::point(1), Destination::point(7), six);
        let viewed = move_for(Player::Black, mv);
        assert_eq!(viewed, Move::new(Origin::point(24), Destination::point(18), six));
        assert_eq!(move_for(Player::Black, viewed), mv);
    }
}
