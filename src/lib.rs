// Time-boxed alpha-beta move search over a pluggable rules engine
pub mod board;
pub mod config;
pub mod error;
pub mod perft;
pub mod search;
pub mod uci;

pub use board::cozy::Position;
pub use board::Oracle;
pub use config::EngineConfig;
pub use error::{Error, Result};
pub use search::alphabeta::{SearchResult, Searcher};
pub use search::time::TimeContext;
