use cozy_chess::Move;
use std::cmp::Reverse;

use crate::board::{MoveInfo, Oracle};
use crate::search::eval::piece_value;

const TT_MOVE: i32 = 4_000_000;
const CAPTURE: i32 = 2_000_000;
const PROMOTION: i32 = 1_000_000;

/// Ordering key: TT move, then captures by victim minus attacker value,
/// then promotions, then quiet moves.
pub fn move_priority(info: &MoveInfo, is_tt_move: bool) -> i32 {
    if is_tt_move { return TT_MOVE; }
    if let Some(victim) = info.victim {
        return CAPTURE + piece_value(victim) - piece_value(info.mover);
    }
    if let Some(promo) = info.promotion {
        return PROMOTION + piece_value(promo);
    }
    0
}

/// Sorts `moves` best-first in place. The result is a permutation of the input;
/// quiet moves keep the rules engine's enumeration order.
pub fn order_moves<P: Oracle>(pos: &P, moves: &mut [Move], tt_move: Option<Move>) {
    moves.sort_by_cached_key(|&m| Reverse(move_priority(&pos.describe(m), Some(m) == tt_move)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use cozy_chess::Piece;

    fn info(mover: Piece, victim: Option<Piece>, promotion: Option<Piece>) -> MoveInfo {
        MoveInfo { mover, victim, promotion }
    }

    #[test]
    fn cheap_attacker_on_rich_victim_first() {
        let pxq = move_priority(&info(Piece::Pawn, Some(Piece::Queen), None), false);
        let qxq = move_priority(&info(Piece::Queen, Some(Piece::Queen), None), false);
        let qxp = move_priority(&info(Piece::Queen, Some(Piece::Pawn), None), false);
        assert!(pxq > qxq && qxq > qxp);
    }

    #[test]
    fn classes_are_strictly_ranked() {
        let worst_capture = move_priority(&info(Piece::King, Some(Piece::Pawn), None), false);
        let best_promo = move_priority(&info(Piece::Pawn, None, Some(Piece::Queen)), false);
        let quiet = move_priority(&info(Piece::Knight, None, None), false);
        let tt = move_priority(&info(Piece::Knight, None, None), true);
        assert!(tt > worst_capture);
        assert!(worst_capture > best_promo);
        assert!(best_promo > quiet);
    }
}
