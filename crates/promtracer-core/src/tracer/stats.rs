//! Per-request trace record: stats level plus named timing events.

use std::time::{Duration, Instant};

/// How much the host records for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum StatsLevel {
    /// Nothing is recorded and tracers skip the request.
    Disabled,
    /// Request start/finish only.
    #[default]
    Base,
    /// Every event, including handler boundaries.
    Detailed,
}

/// Named timing events a host may record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    HttpStart,
    HttpFinish,
    ServerHandleStart,
    ServerHandleFinish,
}

impl Event {
    const COUNT: usize = 4;

    /// Minimum stats level at which the event is recorded.
    pub fn level(self) -> StatsLevel {
        match self {
            Event::HttpStart | Event::HttpFinish => StatsLevel::Base,
            Event::ServerHandleStart | Event::ServerHandleFinish => StatsLevel::Detailed,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Default)]
pub struct Stats {
    level: StatsLevel,
    events: [Option<Instant>; Event::COUNT],
}

impl Stats {
    pub fn new(level: StatsLevel) -> Self {
        Self {
            level,
            events: [None; Event::COUNT],
        }
    }

    pub fn level(&self) -> StatsLevel {
        self.level
    }

    /// Record `event` now. Returns false when the level filters it out.
    pub fn record(&mut self, event: Event) -> bool {
        self.record_at(event, Instant::now())
    }

    /// Record `event` at a given instant. Returns false when the level filters it out.
    pub fn record_at(&mut self, event: Event, at: Instant) -> bool {
        if self.level == StatsLevel::Disabled || event.level() > self.level {
            return false;
        }
        self.events[event.index()] = Some(at);
        true
    }

    pub fn event(&self, event: Event) -> Option<Instant> {
        self.events[event.index()]
    }

    /// Elapsed time between two recorded events; `None` if either is missing.
    pub fn between(&self, from: Event, to: Event) -> Option<Duration> {
        let start = self.event(from)?;
        let end = self.event(to)?;
        Some(end.saturating_duration_since(start))
    }
}

/// Trace info a host attaches to each request.
#[derive(Debug, Clone, Default)]
pub struct TraceInfo {
    stats: Stats,
}

impl TraceInfo {
    pub fn new(level: StatsLevel) -> Self {
        Self {
            stats: Stats::new(level),
        }
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut Stats {
        &mut self.stats
    }
}
