use cozy_chess::{Board as CozyBoard, Color, File, GameStatus, Move, Piece, Square};

use crate::board::{MoveInfo, Oracle};
use crate::error::{Error, Result};

/// A game in progress: the current board plus every earlier board, which
/// backs both move reversion and repetition detection.
#[derive(Clone, Debug)]
pub struct Position {
    board: CozyBoard,
    history: Vec<CozyBoard>,
}

impl Default for Position {
    fn default() -> Self { Self::startpos() }
}

impl Position {
    pub fn startpos() -> Self {
        Self { board: CozyBoard::default(), history: Vec::new() }
    }

    pub fn from_fen(fen: &str) -> Result<Self> {
        CozyBoard::from_fen(fen, false)
            .map(|b| Self { board: b, history: Vec::new() })
            .map_err(|e| Error::Fen(format!("{e:?}")))
    }

    pub fn board(&self) -> &CozyBoard { &self.board }

    /// Number of moves played since the position was set up.
    pub fn ply(&self) -> usize { self.history.len() }

    /// Parses a UCI move (standard `e1g1` castling notation is accepted)
    /// and plays it permanently.
    pub fn make_move_uci(&mut self, mv_uci: &str) -> Result<()> {
        let found = self.parse_uci(mv_uci).ok_or_else(|| Error::IllegalMove(mv_uci.to_string()))?;
        self.apply(found);
        Ok(())
    }

    pub fn parse_uci(&self, mv_uci: &str) -> Option<Move> {
        self.legal_moves(false).into_iter().find(|&m| self.uci(m) == mv_uci)
    }

    /// Renders a move in UCI notation, translating king-takes-rook castling
    /// into the two-square king move GUIs expect.
    pub fn uci(&self, mv: Move) -> String {
        let color = self.board.side_to_move();
        let castles = self.board.piece_on(mv.from) == Some(Piece::King)
            && self.board.colored_pieces(color, Piece::Rook).has(mv.to);
        if castles {
            let file = if mv.to.file() as u8 > mv.from.file() as u8 { File::G } else { File::C };
            let to = Square::new(file, mv.from.rank());
            return format!("{}{}", mv.from, to);
        }
        format!("{}", mv)
    }

    pub fn set_from_start_and_moves(moves: &[String]) -> Result<Self> {
        let mut pos = Self::startpos();
        for m in moves { pos.make_move_uci(m)?; }
        Ok(pos)
    }

    pub fn set_from_fen_and_moves(fen: &str, moves: &[String]) -> Result<Self> {
        let mut pos = Self::from_fen(fen)?;
        for m in moves { pos.make_move_uci(m)?; }
        Ok(pos)
    }

    fn victim(&self, mv: Move) -> Option<Piece> {
        let opp = if self.board.side_to_move() == Color::White { Color::Black } else { Color::White };
        if self.board.colors(opp).has(mv.to) {
            return self.board.piece_on(mv.to);
        }
        // En passant lands on an empty square off the pawn's file.
        let pawn = self.board.piece_on(mv.from) == Some(Piece::Pawn);
        if pawn && mv.from.file() != mv.to.file() && self.board.piece_on(mv.to).is_none() {
            return Some(Piece::Pawn);
        }
        None
    }
}

impl Oracle for Position {
    fn legal_moves(&self, captures_only: bool) -> Vec<Move> {
        let mut moves: Vec<Move> = Vec::with_capacity(64);
        self.board.generate_moves(|ml| {
            for m in ml {
                if !captures_only || self.victim(m).is_some() { moves.push(m); }
            }
            false
        });
        moves
    }

    fn apply(&mut self, mv: Move) {
        let next = {
            let mut b = self.board.clone();
            b.play(mv);
            b
        };
        self.history.push(std::mem::replace(&mut self.board, next));
    }

    fn revert(&mut self, _mv: Move) {
        if let Some(prev) = self.history.pop() { self.board = prev; }
    }

    fn in_check(&self) -> bool { !self.board.checkers().is_empty() }

    fn is_repeated_or_drawn(&self) -> bool {
        // A mate delivered on the hundredth half-move still counts as mate.
        if self.board.halfmove_clock() >= 100 && self.board.status() != GameStatus::Won { return true; }
        let key = self.board.hash();
        let window = self.board.halfmove_clock() as usize;
        // Same side to move means an even number of plies back.
        self.history.iter().rev().take(window).skip(1).step_by(2).any(|b| b.hash() == key)
    }

    fn is_checkmate(&self) -> bool { self.board.status() == GameStatus::Won }

    fn fingerprint(&self) -> u64 { self.board.hash() }

    fn side_to_move(&self) -> Color { self.board.side_to_move() }

    fn describe(&self, mv: Move) -> MoveInfo {
        MoveInfo {
            mover: self.board.piece_on(mv.from).unwrap_or(Piece::Pawn),
            victim: self.victim(mv),
            promotion: mv.promotion,
        }
    }
}
