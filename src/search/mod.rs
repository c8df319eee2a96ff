pub mod alphabeta;
pub mod eval;
pub mod ordering;
pub mod time;
pub mod tt;
