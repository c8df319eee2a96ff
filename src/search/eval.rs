use cozy_chess::{Board, Color, Piece};
use serde::{Deserialize, Serialize};

use crate::board::cozy::Position;

// Mate scoring helpers
pub const MATE_SCORE: i32 = 99_999;
pub const DRAW_SCORE: i32 = 0;
pub const MAX_PLY: i32 = 256;
/// Scores at or beyond this magnitude encode a forced mate.
pub const MATE_BOUND: i32 = MATE_SCORE - MAX_PLY;

const PIECES: [Piece; 6] = [Piece::Pawn, Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen, Piece::King];

pub fn piece_value(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => 100,
        Piece::Knight => 300,
        Piece::Bishop => 310,
        Piece::Rook => 500,
        Piece::Queen => 900,
        Piece::King => 10_000,
    }
}

/// Score of the position for the side to move.
///
/// Implementations must be deterministic and side-effect free.
pub trait Evaluator<P> {
    fn evaluate(&self, pos: &P) -> i32;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Add piece-square bonuses on top of material.
    pub pst: bool,
    /// Below this many pieces on the board the king uses its endgame table.
    pub endgame_threshold: u32,
}

impl Default for EvalConfig {
    fn default() -> Self { Self { pst: false, endgame_threshold: 10 } }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MaterialEval {
    cfg: EvalConfig,
}

impl MaterialEval {
    pub fn new(cfg: EvalConfig) -> Self { Self { cfg } }

    pub fn with_pst() -> Self { Self::new(EvalConfig { pst: true, ..EvalConfig::default() }) }

    pub fn config(&self) -> EvalConfig { self.cfg }
}

impl Evaluator<Position> for MaterialEval {
    fn evaluate(&self, pos: &Position) -> i32 {
        let board = pos.board();
        let mut score = material_eval_cp_side_agnostic(board);
        if self.cfg.pst {
            score += pst_eval_cp_side_agnostic(board, self.cfg.endgame_threshold);
        }
        if board.side_to_move() == Color::White { score } else { -score }
    }
}

fn count_piece(board: &Board, color: Color, piece: Piece) -> i32 {
    board.colored_pieces(color, piece).len() as i32
}

// Positive means White has more material.
pub fn material_eval_cp_side_agnostic(board: &Board) -> i32 {
    PIECES
        .iter()
        .map(|&p| (count_piece(board, Color::White, p) - count_piece(board, Color::Black, p)) * piece_value(p))
        .sum()
}

fn pst_eval_cp_side_agnostic(board: &Board, endgame_threshold: u32) -> i32 {
    let endgame = board.occupied().len() < endgame_threshold;
    let mut score = 0;
    for &piece in &PIECES {
        let table = table_for(piece, endgame);
        // Tables are laid out rank 8 first from White's point of view.
        for sq in board.colored_pieces(Color::White, piece) {
            score += table[sq as usize ^ 56];
        }
        for sq in board.colored_pieces(Color::Black, piece) {
            score -= table[sq as usize];
        }
    }
    score
}

fn table_for(piece: Piece, endgame: bool) -> &'static [i32; 64] {
    match piece {
        Piece::Pawn => &PAWN_TABLE,
        Piece::Knight => &KNIGHT_TABLE,
        Piece::Bishop => &BISHOP_TABLE,
        Piece::Rook => &ROOK_TABLE,
        Piece::Queen => &QUEEN_TABLE,
        Piece::King if endgame => &KING_ENDGAME_TABLE,
        Piece::King => &KING_MIDDLEGAME_TABLE,
    }
}

const PAWN_TABLE: [i32; 64] = [
    0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
    5,  5, 10, 25, 25, 10,  5,  5,
    0,  0,  0, 20, 20,  0,  0,  0,
    5, -5,-10,  0,  0,-10, -5,  5,
    5, 10, 10,-20,-20, 10, 10,  5,
    0,  0,  0,  0,  0,  0,  0,  0
];

const KNIGHT_TABLE: [i32; 64] = [
    -50,-40,-30,-30,-30,-30,-40,-50,
    -40,-20,  0,  0,  0,  0,-20,-40,
    -30,  0, 10, 15, 15, 10,  0,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30,  0, 15, 20, 20, 15,  0,-30,
    -30,  5, 10, 15, 15, 10,  5,-30,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50
];

const BISHOP_TABLE: [i32; 64] = [
    -20,-10,-10,-10,-10,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5, 10, 10,  5,  0,-10,
    -10,  5,  5, 10, 10,  5,  5,-10,
    -10,  0, 10, 10, 10, 10,  0,-10,
    -10, 10, 10, 10, 10, 10, 10,-10,
    -10,  5,  0,  0,  0,  0,  5,-10,
    -20,-10,-10,-10,-10,-10,-10,-20
];

const ROOK_TABLE: [i32; 64] = [
    0,  0,  0,  0,  0,  0,  0,  0,
    5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    0,  0,  0,  5,  5,  0,  0,  0
];

const QUEEN_TABLE: [i32; 64] = [
    -20,-10,-10, -5, -5,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5,  5,  5,  5,  0,-10,
    -5,  0,  5,  5,  5,  5,  0, -5,
    0,  0,  5,  5,  5,  5,  0, -5,
    -10,  5,  5,  5,  5,  5,  0,-10,
    -10,  0,  5,  0,  0,  0,  0,-10,
    -20,-10,-10, -5, -5,-10,-10,-20
];

const KING_MIDDLEGAME_TABLE: [i32; 64] = [
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -20,-30,-30,-40,-40,-30,-30,-20,
    -10,-20,-20,-20,-20,-20,-20,-10,
    20, 20,  0,  0,  0,  0, 20, 20,
    20, 30, 10,  0,  0, 10, 30, 20
];

const KING_ENDGAME_TABLE: [i32; 64] = [
    -50,-40,-30,-20,-20,-30,-40,-50,
    -30,-20,-10,  0,  0,-10,-20,-30,
    -30,-10, 20, 30, 30, 20,-10,-30,
    -30,-10, 30, 40, 40, 30,-10,-30,
    -30,-10, 30, 40, 40, 30,-10,-30,
    -30,-10, 20, 30, 30, 20,-10,-30,
    -30,-30,  0,  0,  0,  0,-30,-30,
    -50,-30,-30,-30,-30,-30,-30,-50
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pst_is_symmetric_at_startpos() {
        let pos = Position::startpos();
        assert_eq!(MaterialEval::with_pst().evaluate(&pos), 0);
    }

    #[test]
    fn king_prefers_center_in_endgame() {
        let center = Position::from_fen("k7/8/8/8/3K4/8/8/8 w - - 0 1").unwrap();
        let corner = Position::from_fen("k7/8/8/8/8/8/8/7K w - - 0 1").unwrap();
        let eval = MaterialEval::with_pst();
        assert!(eval.evaluate(&center) > eval.evaluate(&corner));
    }

    #[test]
    fn score_flips_with_side_to_move() {
        let white = Position::from_fen("k7/8/8/8/8/8/8/1KQ5 w - - 0 1").unwrap();
        let black = Position::from_fen("k7/8/8/8/8/8/8/1KQ5 b - - 0 1").unwrap();
        let eval = MaterialEval::default();
        assert_eq!(eval.evaluate(&white), 900);
        assert_eq!(eval.evaluate(&black), -900);
    }
}
