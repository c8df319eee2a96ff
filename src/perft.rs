use crate::board::Oracle;

/// Counts leaf move paths through the oracle using apply/revert (no cloning).
pub fn perft<P: Oracle>(pos: &mut P, depth: u32) -> u64 {
    if depth == 0 { return 1; }
    let moves = pos.legal_moves(false);
    if depth == 1 { return moves.len() as u64; }
    let mut nodes = 0u64;
    for mv in moves {
        let mut child = pos.play_scoped(mv);
        nodes += perft(&mut *child, depth - 1);
    }
    nodes
}

/// Per-root-move node counts, in the oracle's enumeration order.
pub fn divide<P: Oracle>(pos: &mut P, depth: u32) -> Vec<(cozy_chess::Move, u64)> {
    let moves = pos.legal_moves(false);
    let mut out = Vec::with_capacity(moves.len());
    for mv in moves {
        let mut child = pos.play_scoped(mv);
        out.push((mv, perft(&mut *child, depth.saturating_sub(1))));
    }
    out
}
