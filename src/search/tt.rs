use cozy_chess::Move;

use crate::search::eval::MATE_BOUND;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact,
    /// Fail-high: the true score is at least `score`.
    Lower,
    /// Fail-low: the true score is at most `score`.
    Upper,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry {
    pub key: u64,
    pub best: Option<Move>,
    pub depth: u32,
    /// Mate scores are stored relative to the storing node, see [`score_to_tt`].
    pub score: i32,
    pub bound: Bound,
}

impl Entry {
    /// The score this entry proves for a node at `ply` searched to `depth`
    /// with window `(alpha, beta)`, if it is good enough to skip the search.
    pub fn usable(&self, depth: u32, alpha: i32, beta: i32, ply: i32) -> Option<i32> {
        if self.depth < depth { return None; }
        let score = score_from_tt(self.score, ply);
        match self.bound {
            Bound::Exact => Some(score),
            Bound::Lower if score >= beta => Some(score),
            Bound::Upper if score <= alpha => Some(score),
            _ => None,
        }
    }
}

/// Converts a root-relative mate score into distance-from-this-node form.
pub fn score_to_tt(score: i32, ply: i32) -> i32 {
    if score >= MATE_BOUND { score + ply } else if score <= -MATE_BOUND { score - ply } else { score }
}

/// Inverse of [`score_to_tt`] for a reader sitting at `ply`.
pub fn score_from_tt(score: i32, ply: i32) -> i32 {
    if score >= MATE_BOUND { score - ply } else if score <= -MATE_BOUND { score + ply } else { score }
}

pub const DEFAULT_ENTRIES: usize = 1 << 20;

/// Direct-mapped table: one slot per `key % capacity`, always replaced.
pub struct Tt {
    slots: Vec<Option<Entry>>,
}

impl Default for Tt {
    fn default() -> Self { Self::with_capacity(DEFAULT_ENTRIES) }
}

impl Tt {
    pub fn with_capacity(entries: usize) -> Self {
        let mut tt = Self { slots: Vec::new() };
        tt.set_capacity_entries(entries);
        tt
    }

    pub fn capacity(&self) -> usize { self.slots.len() }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
    }

    fn index(&self, key: u64) -> usize { (key % self.slots.len() as u64) as usize }

    pub fn lookup(&self, key: u64) -> Option<Entry> {
        self.slots[self.index(key)].filter(|e| e.key == key)
    }

    pub fn store(&mut self, key: u64, best: Option<Move>, depth: u32, score: i32, bound: Bound) {
        let idx = self.index(key);
        self.slots[idx] = Some(Entry { key, best, depth, score, bound });
    }

    pub fn len(&self) -> usize { self.slots.iter().filter(|s| s.is_some()).count() }

    pub fn is_empty(&self) -> bool { self.slots.iter().all(|s| s.is_none()) }

    pub fn set_capacity_entries(&mut self, cap: usize) {
        log::trace!("tt resized to {} entries", cap.max(1));
        self.slots.clear();
        self.slots.resize(cap.max(1), None);
    }

    pub fn set_capacity_mb(&mut self, mb: usize) {
        let bytes = mb.saturating_mul(1024 * 1024);
        self.set_capacity_entries(bytes / std::mem::size_of::<Option<Entry>>());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::eval::MATE_SCORE;

    #[test]
    fn mate_scores_survive_a_ply_shift() {
        // Mate found 3 plies below a node at ply 2: root-relative score is MATE - 5.
        let stored = score_to_tt(MATE_SCORE - 5, 2);
        assert_eq!(stored, MATE_SCORE - 3);
        // Read back from a transposition at ply 4 the same mate is 2 plies further away.
        assert_eq!(score_from_tt(stored, 4), MATE_SCORE - 7);
        assert_eq!(score_from_tt(score_to_tt(-MATE_SCORE + 6, 6), 1), -MATE_SCORE + 1);
    }

    #[test]
    fn ordinary_scores_are_untouched() {
        assert_eq!(score_to_tt(250, 7), 250);
        assert_eq!(score_from_tt(-250, 7), -250);
    }
}
