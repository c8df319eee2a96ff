//! Boundary with the rules engine.
//!
//! The search never inspects a board directly: it asks an [`Oracle`] for legal
//! moves, plays and takes them back, and queries check/draw state and the
//! position fingerprint. [`cozy::Position`] is the default implementation.

pub mod cozy;

use cozy_chess::{Color, Move, Piece};
use std::ops::{Deref, DerefMut};

/// What a move does, as far as move ordering cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveInfo {
    pub mover: Piece,
    pub victim: Option<Piece>,
    pub promotion: Option<Piece>,
}

impl MoveInfo {
    pub fn is_capture(&self) -> bool { self.victim.is_some() }
}

pub trait Oracle {
    /// Legal moves for the side to move, in the rules engine's enumeration order.
    fn legal_moves(&self, captures_only: bool) -> Vec<Move>;

    /// Plays a legal move. Must be paired with [`Oracle::revert`].
    fn apply(&mut self, mv: Move);

    /// Takes back the most recently applied move.
    fn revert(&mut self, mv: Move);

    fn in_check(&self) -> bool;

    /// Repetition or any other rule-based draw (not stalemate).
    fn is_repeated_or_drawn(&self) -> bool;

    fn is_checkmate(&self) -> bool;

    fn fingerprint(&self) -> u64;

    fn side_to_move(&self) -> Color;

    fn describe(&self, mv: Move) -> MoveInfo;

    /// Applies `mv` and returns a guard that reverts it when dropped.
    fn play_scoped(&mut self, mv: Move) -> Played<'_, Self>
    where
        Self: Sized,
    {
        Played::new(self, mv)
    }
}

/// A move applied to an oracle for the lifetime of the guard.
///
/// Every exit path of a child exploration (cutoff, timeout, early return)
/// drops the guard, so the board is always restored before the caller resumes.
pub struct Played<'a, P: Oracle> {
    pos: &'a mut P,
    mv: Move,
}

impl<'a, P: Oracle> Played<'a, P> {
    pub fn new(pos: &'a mut P, mv: Move) -> Self {
        pos.apply(mv);
        Self { pos, mv }
    }
}

impl<P: Oracle> Deref for Played<'_, P> {
    type Target = P;
    fn deref(&self) -> &P { &*self.pos }
}

impl<P: Oracle> DerefMut for Played<'_, P> {
    fn deref_mut(&mut self) -> &mut P { &mut *self.pos }
}

impl<P: Oracle> Drop for Played<'_, P> {
    fn drop(&mut self) { self.pos.revert(self.mv); }
}
