use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tempobot::perft::{divide, perft};
use tempobot::uci::{format_score, UciEngine};
use tempobot::{EngineConfig, Position, Searcher, TimeContext};

#[derive(Parser, Debug)]
#[command(author, version, about = "Time-boxed alpha-beta chess engine", long_about = None)]
struct Args {
    /// JSON engine configuration
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Speak UCI on stdin/stdout (default)
    Uci,
    /// Decide one move for a position and print it
    Go {
        /// FEN string or "startpos"
        #[arg(long, default_value = "startpos")]
        fen: String,
        /// Time left on the mover's clock in milliseconds
        #[arg(long, default_value_t = 60_000)]
        remaining_ms: u64,
        /// Stop after this depth
        #[arg(long)]
        depth: Option<u32>,
    },
    /// Count move paths to a depth
    Perft {
        #[arg(value_name = "DEPTH")]
        depth: u32,
        /// FEN string or "startpos"
        #[arg(long, default_value = "startpos")]
        fen: String,
        /// Print per-move counts
        #[arg(long, default_value_t = false)]
        divide: bool,
    },
}

fn load_position(fen: &str) -> Result<Position> {
    if fen == "startpos" { return Ok(Position::startpos()); }
    Position::from_fen(fen).with_context(|| format!("invalid FEN '{fen}'"))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let cfg = match &args.config {
        Some(path) => EngineConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => EngineConfig::default(),
    };

    match args.command.unwrap_or(Command::Uci) {
        Command::Uci => UciEngine::new(cfg).run_loop().context("uci loop")?,
        Command::Go { fen, remaining_ms, depth } => {
            let mut pos = load_position(&fen)?;
            let mut searcher = Searcher::new(cfg);
            let mut ctx = TimeContext::new(Duration::from_millis(remaining_ms));
            ctx.depth = depth;
            let res = searcher.think(&mut pos, &ctx);
            match res.bestmove {
                Some(m) => println!(
                    "bestmove={} score={} depth={} nodes={}",
                    pos.uci(m), format_score(res.score_cp), res.depth, res.nodes
                ),
                None => anyhow::bail!("no legal moves in this position"),
            }
        }
        Command::Perft { depth, fen, divide: per_move } => {
            let mut pos = load_position(&fen)?;
            let t0 = Instant::now();
            let nodes = if per_move {
                let counts = divide(&mut pos, depth);
                for (m, n) in &counts { println!("{}: {}", pos.uci(*m), n); }
                counts.iter().map(|(_, n)| n).sum::<u64>()
            } else {
                perft(&mut pos, depth)
            };
            let dt = t0.elapsed().as_secs_f64();
            let nps = if dt > 0.0 { nodes as f64 / dt } else { 0.0 };
            println!("nodes: {} elapsed: {:.3}s nps: {:.1}", nodes, dt, nps);
        }
    }
    Ok(())
}
