use std::time::{Duration, Instant};
use tempobot::{EngineConfig, Oracle, Position, Searcher, TimeContext};

fn searcher() -> Searcher {
    Searcher::new(EngineConfig { tt_entries: 1 << 16, ..EngineConfig::default() })
}

#[test]
fn zero_clock_falls_back_to_first_legal_move() {
    let mut pos = Position::startpos();
    let mut s = searcher();
    let res = s.think(&mut pos, &TimeContext::new(Duration::ZERO));
    assert_eq!(res.depth, 0, "no iteration can complete without time");
    assert_eq!(res.bestmove, pos.legal_moves(false).first().copied());
}

#[test]
fn movetime_returns_quickly_with_move() {
    let mut pos = Position::startpos();
    let mut s = searcher();
    let t0 = Instant::now();
    let mv = s.decide_move(&mut pos, &TimeContext::movetime(Duration::from_millis(10)));
    let elapsed = t0.elapsed();
    let mv = mv.expect("no bestmove under movetime");
    assert!(pos.legal_moves(false).contains(&mv));
    assert!(elapsed < Duration::from_millis(300), "search exceeded time: {:?}", elapsed);
}

#[test]
fn clock_share_limits_the_decision() {
    // 3s on the clock with divisor 30 leaves ~100ms for this move.
    let mut pos = Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
    let mut s = searcher();
    let t0 = Instant::now();
    let res = s.think(&mut pos, &TimeContext::new(Duration::from_secs(3)));
    assert!(res.bestmove.is_some());
    assert!(t0.elapsed() < Duration::from_millis(600), "took {:?}", t0.elapsed());
    assert_eq!(pos.ply(), 0, "aborted search must restore the board");
}

#[test]
fn depth_limit_stops_iterations() {
    let mut pos = Position::startpos();
    let mut s = searcher();
    let res = s.think(&mut pos, &TimeContext::depth(3));
    assert_eq!(res.depth, 3);
    assert!(res.nodes > 0);
}

#[test]
fn no_legal_moves_yields_none() {
    let mut pos = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    let mut s = searcher();
    assert_eq!(s.decide_move(&mut pos, &TimeContext::depth(2)), None);
}

#[test]
fn engines_do_not_share_state() {
    let mut pos = Position::startpos();
    let mut a = searcher();
    let b = searcher();
    a.think(&mut pos, &TimeContext::depth(2));
    assert!(a.tt_probe(&pos).is_some());
    assert!(b.tt_probe(&pos).is_none());
}
