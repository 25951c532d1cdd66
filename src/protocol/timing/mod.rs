//! Frequency clocks: periodic gates limiting how often a value may be
//! emitted when nothing else forces it out.
use embassy_time::{Duration, Instant};

/// Stateful timer owned by one signal or one message definition.
///
/// A clock that has never fired fires on its first check. A zero interval
/// fires on every check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyClock {
    interval: Duration,
    last_tick: Option<Instant>,
}

impl FrequencyClock {
    /// Clock that fires on its first check.
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_tick: None,
        }
    }

    /// Clock considered to have fired at `now`: the first tick comes one
    /// interval later.
    pub const fn started_at(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last_tick: Some(now),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn last_tick(&self) -> Option<Instant> {
        self.last_tick
    }

    /// Whether the clock would fire at `now`, without changing its state.
    pub fn should_tick(&self, now: Instant) -> bool {
        match self.last_tick {
            None => true,
            Some(_) if self.interval.as_ticks() == 0 => true,
            // A source going backwards saturates to zero elapsed time.
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        }
    }

    /// Record a tick at `now`.
    pub fn tick(&mut self, now: Instant) {
        self.last_tick = Some(now);
    }

    /// Fire and reset if the interval elapsed; returns whether it fired.
    pub fn conditional_tick(&mut self, now: Instant) -> bool {
        let fired = self.should_tick(now);
        if fired {
            self.tick(now);
        }
        fired
    }
}
