use cozy_chess::Move;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::board::Oracle;
use crate::config::EngineConfig;
use crate::search::eval::{Evaluator, MaterialEval, DRAW_SCORE, MATE_SCORE, MAX_PLY};
use crate::search::ordering::order_moves;
use crate::search::time::{TimeBudget, TimeContext};
use crate::search::tt::{score_to_tt, Bound, Entry, Tt};

/// Returned up the tree once the time budget is gone. Never stored, never trusted.
pub const ABORTED: i32 = MATE_SCORE + 1;

#[derive(Default, Debug, Clone)]
pub struct SearchResult {
    pub bestmove: Option<Move>,
    pub score_cp: i32,
    /// Deepest fully completed iteration.
    pub depth: u32,
    pub nodes: u64,
}

/// One engine instance: owns its transposition table and root-move slot.
pub struct Searcher<E = MaterialEval> {
    tt: Tt,
    eval: E,
    cfg: EngineConfig,
    root_best: Option<Move>,
    pub(crate) nodes: u64,
    budget: TimeBudget,
    stopped: bool,
    abort: Arc<AtomicBool>,
}

impl Default for Searcher {
    fn default() -> Self { Self::new(EngineConfig::default()) }
}

impl Searcher {
    pub fn new(cfg: EngineConfig) -> Self { Self::with_evaluator(cfg, MaterialEval::new(cfg.eval)) }
}

impl<E> Searcher<E> {
    pub fn with_evaluator(cfg: EngineConfig, eval: E) -> Self {
        Self {
            tt: Tt::with_capacity(cfg.tt_entries),
            eval,
            cfg,
            root_best: None,
            nodes: 0,
            budget: TimeBudget::unlimited(),
            stopped: false,
            abort: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn tt(&self) -> &Tt { &self.tt }

    pub fn nodes(&self) -> u64 { self.nodes }

    /// Forget everything learned so far, e.g. between games.
    pub fn clear_tt(&mut self) { self.tt.clear(); }

    pub fn set_tt_capacity_mb(&mut self, mb: usize) {
        self.tt.set_capacity_mb(mb);
        self.cfg.tt_entries = self.tt.capacity();
    }

    pub fn tt_probe<P: Oracle>(&self, pos: &P) -> Option<Entry> { self.tt.lookup(pos.fingerprint()) }

    /// Shared flag that ends the running search once set. It stays set until
    /// whoever raised it clears it again.
    pub fn stop_handle(&self) -> Arc<AtomicBool> { self.abort.clone() }

    fn begin(&mut self, budget: TimeBudget) {
        self.root_best = None;
        self.nodes = 0;
        self.budget = budget;
        self.stopped = false;
    }

    fn out_of_time(&mut self) -> bool {
        if !self.stopped && (self.budget.exhausted() || self.abort.load(Ordering::Relaxed)) {
            self.stopped = true;
        }
        self.stopped
    }

    /// Single full-window iteration at `depth` with no time limit.
    pub fn search_depth<P: Oracle>(&mut self, pos: &mut P, depth: u32) -> SearchResult
    where
        E: Evaluator<P>,
    {
        self.begin(TimeBudget::unlimited());
        let score = self.negamax(pos, -MATE_SCORE, MATE_SCORE, depth, 0);
        SearchResult { bestmove: self.root_best, score_cp: score, depth, nodes: self.nodes }
    }

    /// Iterative deepening under the budget derived from `time`.
    pub fn think<P: Oracle>(&mut self, pos: &mut P, time: &TimeContext) -> SearchResult
    where
        E: Evaluator<P>,
    {
        self.begin(time.budget(self.cfg.time_divisor));
        let max_depth = time.depth.map_or(self.cfg.max_depth, |d| d.min(self.cfg.max_depth)).max(1);
        let mut completed = 0;
        let mut last_score = 0;
        for depth in 1..=max_depth {
            let score = self.negamax(pos, -MATE_SCORE, MATE_SCORE, depth, 0);
            if self.stopped {
                debug!("depth {} aborted after {} nodes", depth, self.nodes);
                break;
            }
            completed = depth;
            last_score = score;
            debug!(
                "depth {} score {} nodes {} move {:?}",
                depth, score, self.nodes, self.root_best.map(|m| m.to_string())
            );
            if self.out_of_time() { break; }
        }

        let mut best = self.root_best;
        if best.is_none() {
            best = pos.legal_moves(false).first().copied();
            match best {
                Some(m) => warn!("no search result in time, falling back to first legal move {}", m),
                None => warn!("asked to move in a position without legal moves (checkmate: {})", pos.is_checkmate()),
            }
        }
        info!(
            "decided {:?} depth {} score {} nodes {} in {:?}",
            best.map(|m| m.to_string()), completed, last_score, self.nodes, time.elapsed()
        );
        SearchResult { bestmove: best, score_cp: last_score, depth: completed, nodes: self.nodes }
    }

    /// The move to play. `None` only for a position with no legal moves.
    pub fn decide_move<P: Oracle>(&mut self, pos: &mut P, time: &TimeContext) -> Option<Move>
    where
        E: Evaluator<P>,
    {
        self.think(pos, time).bestmove
    }

    fn negamax<P: Oracle>(&mut self, pos: &mut P, mut alpha: i32, beta: i32, mut depth: u32, ply: i32) -> i32
    where
        E: Evaluator<P>,
    {
        self.nodes += 1;
        if ply > 0 && pos.is_repeated_or_drawn() { return DRAW_SCORE; }

        // Check extension
        let in_check = pos.in_check();
        if in_check { depth += 1; }
        if depth == 0 || ply >= MAX_PLY { return self.eval.evaluate(pos); }

        let key = pos.fingerprint();
        let entry = if self.cfg.use_tt { self.tt.lookup(key) } else { None };
        if ply > 0 {
            if let Some(score) = entry.and_then(|e| e.usable(depth, alpha, beta, ply)) { return score; }
        }

        let mut moves = pos.legal_moves(false);
        if moves.is_empty() {
            // Shorter mates score higher.
            return if in_check { ply - MATE_SCORE } else { DRAW_SCORE };
        }
        // At the root the previous iteration's choice goes first, so a partial
        // iteration can only replace it with a move that scored strictly better.
        let hint = if ply == 0 { self.root_best.or(entry.and_then(|e| e.best)) } else { entry.and_then(|e| e.best) };
        order_moves(pos, &mut moves, hint);

        let orig_alpha = alpha;
        let mut best = -ABORTED;
        let mut best_move: Option<Move> = None;
        for m in moves {
            let score = {
                let mut child = pos.play_scoped(m);
                -self.negamax(&mut *child, -beta, -alpha, depth - 1, ply + 1)
            };
            if self.out_of_time() { return ABORTED; }

            if score > best {
                best = score;
                best_move = Some(m);
                if ply == 0 { self.root_best = Some(m); }
            }
            if best > alpha { alpha = best; }
            if alpha >= beta { break; }
        }

        if self.cfg.use_tt {
            let bound = if best >= beta { Bound::Lower } else if best <= orig_alpha { Bound::Upper } else { Bound::Exact };
            self.tt.store(key, best_move, depth, score_to_tt(best, ply), bound);
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::cozy::Position;

    #[test]
    fn root_entry_is_exact_after_full_window_search() {
        let mut pos = Position::startpos();
        let mut s = Searcher::new(EngineConfig { tt_entries: 1 << 12, ..EngineConfig::default() });
        let res = s.search_depth(&mut pos, 2);
        let e = s.tt_probe(&pos).expect("root entry stored");
        assert_eq!(e.bound, Bound::Exact);
        assert_eq!(e.depth, 2);
        assert_eq!(e.best, res.bestmove);
    }

    #[test]
    fn disabled_tt_stays_empty() {
        let mut pos = Position::startpos();
        let mut s = Searcher::new(EngineConfig { tt_entries: 1 << 10, use_tt: false, ..EngineConfig::default() });
        s.search_depth(&mut pos, 2);
        assert!(s.tt().is_empty());
    }
}
