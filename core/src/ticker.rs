use core::fmt;
use core::time::Duration;
use serde::{Deserialize, Serialize};
use web_time::Instant;

/// Elapsed-time collaborator started on the first reveal and stopped when the game ends.
pub trait Ticker {
    fn start(&mut self);

    /// Must be harmless when nothing is running.
    fn stop(&mut self);

    fn reset(&mut self);
}

/// Ticker for hosts that do not show a clock.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct NoopTicker;

impl Ticker for NoopTicker {
    fn start(&mut self) {}

    fn stop(&mut self) {}

    fn reset(&mut self) {}
}

pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Whole seconds shown on the game clock, formatted as `MM:SS`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ElapsedTime(u64);

impl ElapsedTime {
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    pub const fn as_secs(self) -> u64 {
        self.0
    }
}

impl From<Duration> for ElapsedTime {
    fn from(duration: Duration) -> Self {
        Self(duration.as_secs())
    }
}

impl fmt::Display for ElapsedTime {
    /// Minutes wrap around every hour, like a `%M:%S` time format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", (self.0 / 60) % 60, self.0 % 60)
    }
}

/// Identifies one scheduled tick, ids are never reused by a stopwatch.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TickId(u64);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PendingTick {
    pub id: TickId,
    pub due: Instant,
}

/// Repeating one-second timer with at most one pending tick.
///
/// The host event loop is expected to call [`Stopwatch::fire`] once the pending tick is due (or
/// use [`Stopwatch::poll`]). Every fired tick schedules the next one, and `stop` drops the pending
/// handle so a late delivery of a cancelled tick is ignored.
#[derive(Clone, Debug)]
pub struct Stopwatch<C: Clock = SystemClock> {
    clock: C,
    started_at: Option<Instant>,
    pending: Option<PendingTick>,
    next_id: u64,
    shown: ElapsedTime,
}

impl Default for Stopwatch<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> Stopwatch<C> {
    pub const TICK_INTERVAL: Duration = Duration::from_millis(1000);

    pub fn new(clock: C) -> Self {
        Self {
            clock,
            started_at: None,
            pending: None,
            next_id: 0,
            shown: ElapsedTime::default(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_tick(&self) -> Option<PendingTick> {
        self.pending
    }

    /// Time as of the last start, tick or reset.
    pub fn shown(&self) -> ElapsedTime {
        self.shown
    }

    /// Handles a delivered tick, returning the refreshed time unless the tick is stale.
    pub fn fire(&mut self, tick: TickId) -> Option<ElapsedTime> {
        if self.pending.map(|pending| pending.id) != Some(tick) {
            log::trace!("Ignoring stale tick {:?}", tick);
            return None;
        }

        let now = self.clock.now();
        if let Some(started_at) = self.started_at {
            self.shown = now.saturating_duration_since(started_at).into();
        }
        self.schedule(now);
        Some(self.shown)
    }

    /// Fires the pending tick if it is due.
    pub fn poll(&mut self) -> Option<ElapsedTime> {
        let pending = self.pending?;
        if self.clock.now() >= pending.due {
            self.fire(pending.id)
        } else {
            None
        }
    }

    fn schedule(&mut self, now: Instant) {
        let id = TickId(self.next_id);
        self.next_id += 1;
        self.pending = Some(PendingTick {
            id,
            due: now + Self::TICK_INTERVAL,
        });
    }
}

impl<C: Clock> Ticker for Stopwatch<C> {
    fn start(&mut self) {
        let now = self.clock.now();
        log::debug!("Stopwatch started");
        self.started_at = Some(now);
        self.shown = ElapsedTime::default();
        // replaces any tick still pending from an earlier start
        self.schedule(now);
    }

    fn stop(&mut self) {
        if let Some(pending) = self.pending.take() {
            log::debug!("Stopwatch stopped at {}, cancelled {:?}", self.shown, pending.id);
        }
    }

    fn reset(&mut self) {
        self.stop();
        self.started_at = None;
        self.shown = ElapsedTime::default();
    }
}
