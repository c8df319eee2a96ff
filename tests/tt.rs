use tempobot::search::eval::MATE_SCORE;
use tempobot::search::tt::{score_to_tt, Bound, Entry, Tt};
use tempobot::{EngineConfig, Position, Searcher};

#[test]
fn exact_entry_round_trips_at_any_shallower_depth() {
    let mut tt = Tt::with_capacity(1024);
    tt.store(0xDEAD_BEEF, None, 5, 123, Bound::Exact);
    let e = tt.lookup(0xDEAD_BEEF).expect("stored entry");
    for depth in 0..=5 {
        assert_eq!(e.usable(depth, -50, 50, 3), Some(123), "depth {depth}");
    }
    assert_eq!(e.usable(6, -50, 50, 3), None, "deeper requirement must miss");
}

#[test]
fn bounds_only_cut_outside_the_window() {
    let lower = Entry { key: 1, best: None, depth: 4, score: 80, bound: Bound::Lower };
    assert_eq!(lower.usable(4, 0, 50, 1), Some(80));
    assert_eq!(lower.usable(4, 0, 100, 1), None);

    let upper = Entry { key: 1, best: None, depth: 4, score: -20, bound: Bound::Upper };
    assert_eq!(upper.usable(4, 0, 50, 1), Some(-20));
    assert_eq!(upper.usable(4, -40, 50, 1), None);
}

#[test]
fn aliased_slot_is_not_trusted_and_is_overwritten() {
    let mut tt = Tt::with_capacity(8);
    tt.store(3, None, 2, 10, Bound::Exact);
    assert!(tt.lookup(11).is_none(), "different key in the same slot");
    tt.store(11, None, 1, 20, Bound::Upper);
    assert!(tt.lookup(3).is_none(), "store always replaces");
    assert_eq!(tt.lookup(11).map(|e| e.score), Some(20));
    assert_eq!(tt.len(), 1);
}

#[test]
fn capacity_enforced() {
    let mut tt = Tt::with_capacity(8);
    for i in 0..64u64 {
        tt.store(i, None, (i % 4) as u32, i as i32, Bound::Exact);
    }
    assert_eq!(tt.capacity(), 8);
    assert_eq!(tt.len(), 8);
    tt.clear();
    assert!(tt.is_empty());
}

#[test]
fn capacity_from_megabytes() {
    let mut tt = Tt::with_capacity(1);
    tt.set_capacity_mb(1);
    assert_eq!(tt.capacity(), (1024 * 1024) / std::mem::size_of::<Option<Entry>>());
}

#[test]
fn cached_mate_is_reoffset_for_the_reader() {
    // Stored at ply 1 as "mated right here"; read at ply 3 it is two plies further from the root.
    let mut tt = Tt::with_capacity(16);
    tt.store(7, None, 1, score_to_tt(1 - MATE_SCORE, 1), Bound::Exact);
    let e = tt.lookup(7).unwrap();
    assert_eq!(e.usable(1, -MATE_SCORE, MATE_SCORE, 3), Some(3 - MATE_SCORE));
}

#[test]
fn warm_table_keeps_mate_scores_consistent() {
    let mut pos = Position::from_fen("6k1/5ppp/8/8/8/8/8/R6K w - - 0 1").unwrap();
    let mut s = Searcher::new(EngineConfig { tt_entries: 1 << 14, ..EngineConfig::default() });
    let cold = s.search_depth(&mut pos, 4);
    let warm = s.search_depth(&mut pos, 4);
    assert_eq!(cold.score_cp, MATE_SCORE - 1);
    assert_eq!(warm.score_cp, cold.score_cp);
    assert_eq!(warm.bestmove, cold.bestmove);
    assert!(warm.nodes <= cold.nodes, "warm {} vs cold {}", warm.nodes, cold.nodes);
}
