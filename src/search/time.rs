use std::time::{Duration, Instant};

/// What the host knows about the clock when it asks for a move.
#[derive(Clone, Copy, Debug)]
pub struct TimeContext {
    /// Time left on the mover's clock.
    pub remaining: Option<Duration>,
    /// Fixed time for this move; overrides the share of `remaining`.
    pub movetime: Option<Duration>,
    /// Stop after this many completed iterations.
    pub depth: Option<u32>,
    pub started: Instant,
}

impl TimeContext {
    pub fn new(remaining: Duration) -> Self {
        Self { remaining: Some(remaining), movetime: None, depth: None, started: Instant::now() }
    }

    pub fn movetime(movetime: Duration) -> Self {
        Self { remaining: None, movetime: Some(movetime), depth: None, started: Instant::now() }
    }

    pub fn depth(depth: u32) -> Self {
        Self { remaining: None, movetime: None, depth: Some(depth), started: Instant::now() }
    }

    pub fn infinite() -> Self {
        Self { remaining: None, movetime: None, depth: None, started: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration { self.started.elapsed() }

    /// Wall-clock allowance for this decision, computed once.
    pub fn budget(&self, divisor: u32) -> TimeBudget {
        let limit = match (self.movetime, self.remaining) {
            (Some(mt), _) => Some(mt),
            (None, Some(rem)) => Some(rem / divisor.max(1)),
            (None, None) => None,
        };
        TimeBudget { started: self.started, limit }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct TimeBudget {
    started: Instant,
    limit: Option<Duration>,
}

impl TimeBudget {
    pub fn unlimited() -> Self { Self { started: Instant::now(), limit: None } }

    pub fn limit(&self) -> Option<Duration> { self.limit }

    pub fn exhausted(&self) -> bool {
        match self.limit {
            Some(limit) => self.started.elapsed() >= limit,
            None => false,
        }
    }
}
