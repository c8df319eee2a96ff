use cozy_chess::Color;
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use crate::board::cozy::Position;
use crate::board::Oracle;
use crate::config::EngineConfig;
use crate::search::alphabeta::{SearchResult, Searcher};
use crate::search::eval::{MATE_BOUND, MATE_SCORE};
use crate::search::time::TimeContext;

pub struct UciEngine {
    pos: Position,
    searcher: Searcher,
}

impl Default for UciEngine {
    fn default() -> Self { Self::new(EngineConfig::default()) }
}

/// Builds the time context for `go`, picking the clock of the side to move.
pub fn parse_go(args: &str, side: Color) -> TimeContext {
    let mut wtime = None;
    let mut btime = None;
    let mut movetime = None;
    let mut depth = None;
    let mut infinite = false;
    let mut tokens = args.split_whitespace();
    while let Some(tok) = tokens.next() {
        let mut value = || tokens.next().and_then(|s| s.parse::<u64>().ok());
        match tok {
            "wtime" => wtime = value().map(Duration::from_millis),
            "btime" => btime = value().map(Duration::from_millis),
            "movetime" => movetime = value().map(Duration::from_millis),
            "depth" => depth = value().map(|d| d as u32),
            "infinite" => infinite = true,
            _ => {}
        }
    }
    let remaining = if side == Color::White { wtime } else { btime };
    let mut ctx = match (movetime, remaining) {
        (Some(mt), _) => TimeContext::movetime(mt),
        (None, Some(rem)) if !infinite => TimeContext::new(rem),
        _ => TimeContext::infinite(),
    };
    ctx.depth = depth;
    // Without any limit, fall back to a shallow fixed depth rather than hang.
    if ctx.remaining.is_none() && ctx.movetime.is_none() && ctx.depth.is_none() && !infinite {
        ctx.depth = Some(3);
    }
    ctx
}

/// Formats the score the way GUIs expect: centipawns, or moves to mate.
pub fn format_score(score: i32) -> String {
    if score.abs() >= MATE_BOUND {
        let plies = MATE_SCORE - score.abs();
        let moves = (plies + 1) / 2;
        format!("mate {}", if score > 0 { moves } else { -moves })
    } else {
        format!("cp {}", score)
    }
}

impl UciEngine {
    pub fn new(cfg: EngineConfig) -> Self { Self { pos: Position::startpos(), searcher: Searcher::new(cfg) } }

    pub fn position(&self) -> &Position { &self.pos }

    /// Raising this flag ends a running `go`; the `stop` command lowers it again.
    pub fn stop_handle(&self) -> Arc<AtomicBool> { self.searcher.stop_handle() }

    fn cmd_uci(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "id name Tempobot")?;
        writeln!(out, "id author Tempobot Team")?;
        writeln!(out, "option name Hash type spin default 64 min 1 max 16384")?;
        writeln!(out, "uciok")
    }

    fn cmd_ucinewgame(&mut self) {
        self.pos = Position::startpos();
        self.searcher.clear_tt();
    }

    fn cmd_setoption(&mut self, args: &str) {
        // setoption name Hash value <mb>
        let tokens: Vec<&str> = args.split_whitespace().collect();
        if let [_, name, _, value] = tokens.as_slice() {
            if name.eq_ignore_ascii_case("hash") {
                if let Ok(mb) = value.parse::<usize>() { self.searcher.set_tt_capacity_mb(mb.max(1)); }
            }
        }
    }

    fn cmd_position(&mut self, args: &str) {
        // Supports: 'position startpos [moves ...]' and 'position fen <fen> [moves ...]'
        let (setup, moves) = match args.split_once(" moves ") {
            Some((s, m)) => (s.trim(), m.split_whitespace().map(|s| s.to_string()).collect::<Vec<_>>()),
            None => (args.trim().trim_end_matches(" moves"), Vec::new()),
        };
        let parsed = if setup == "startpos" {
            Position::set_from_start_and_moves(&moves)
        } else if let Some(fen) = setup.strip_prefix("fen ") {
            Position::set_from_fen_and_moves(fen.trim(), &moves)
        } else {
            return;
        };
        match parsed {
            Ok(p) => self.pos = p,
            Err(e) => log::warn!("ignoring position command: {}", e),
        }
    }

    fn cmd_go(&mut self, args: &str, out: &mut impl Write) -> io::Result<()> {
        let ctx = parse_go(args, self.pos.side_to_move());
        let SearchResult { bestmove, score_cp, depth, nodes } = self.searcher.think(&mut self.pos, &ctx);
        let elapsed = ctx.elapsed().as_millis();
        writeln!(out, "info depth {} score {} nodes {} time {}", depth, format_score(score_cp), nodes, elapsed)?;
        match bestmove {
            Some(m) => writeln!(out, "bestmove {}", self.pos.uci(m)),
            None => writeln!(out, "bestmove 0000"),
        }
    }

    /// Handles one command line. Returns `false` on `quit`.
    pub fn handle(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let line = line.trim();
        match line {
            "" => {}
            "stop" => self.searcher.stop_handle().store(false, Ordering::Relaxed),
            "uci" => self.cmd_uci(out)?,
            "isready" => writeln!(out, "readyok")?,
            "ucinewgame" => self.cmd_ucinewgame(),
            "quit" => return Ok(false),
            _ => {
                if let Some(rest) = line.strip_prefix("position ") {
                    self.cmd_position(rest);
                } else if let Some(rest) = line.strip_prefix("go") {
                    self.cmd_go(rest, out)?;
                } else if let Some(rest) = line.strip_prefix("setoption ") {
                    self.cmd_setoption(rest);
                } else {
                    log::debug!("unknown command: {}", line);
                }
            }
        }
        out.flush()?;
        Ok(true)
    }

    /// Reads stdin on its own thread so `stop` reaches a search in progress.
    pub fn run_loop(&mut self) -> io::Result<()> {
        let (tx, rx) = mpsc::channel::<io::Result<String>>();
        let abort = self.stop_handle();
        thread::spawn(move || {
            for line in io::stdin().lock().lines() {
                if matches!(&line, Ok(l) if l.trim() == "stop") { abort.store(true, Ordering::Relaxed); }
                let failed = line.is_err();
                if tx.send(line).is_err() || failed { break; }
            }
        });

        let stdout = io::stdout();
        let mut out = stdout.lock();
        for line in rx {
            if !self.handle(&line?, &mut out)? { break; }
        }
        Ok(())
    }
}
