//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter.  One tick is one
//! simulated minute; a "day" is a configurable number of ticks after which
//! the fleet capacity is reviewed:
//!
//!   day = tick / ticks_per_day
//!
//! Day length is deliberately decoupled from the minute resolution: the
//! reference scenario runs 20-tick days so that capacity reviews happen
//! often, while visit durations are still measured in real minutes.

use std::fmt;

/// Seconds of simulated time represented by one tick.
pub const TICK_DURATION_SECS: u32 = 60;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Ticks elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── Duration helpers ─────────────────────────────────────────────────────────

/// How many ticks span `secs` seconds? (rounds up)
#[inline]
pub const fn ticks_for_secs(secs: u64) -> u64 {
    secs.div_ceil(TICK_DURATION_SECS as u64)
}

#[inline]
pub const fn ticks_for_minutes(minutes: u64) -> u64 {
    ticks_for_secs(minutes * 60)
}

#[inline]
pub const fn ticks_for_hours(hours: u64) -> u64 {
    ticks_for_secs(hours * 3_600)
}

/// Shortest visit a requester pays at a host.
pub const HALF_HOUR_TICKS: u64 = ticks_for_minutes(30);

/// Longest visit a requester pays at a host.
pub const THREE_HOUR_TICKS: u64 = ticks_for_hours(3);

/// Average daily wait above which the fleet is scaled up.
pub const ONE_HOUR_TICKS: u64 = ticks_for_hours(1);

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tick counter plus the derived day counter.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Ticks in one simulated day.  Validated non-zero by `SimConfig`.
    pub ticks_per_day: u64,
    /// The current tick, advanced by `SimClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(ticks_per_day: u64) -> Self {
        Self {
            ticks_per_day,
            current_tick: Tick::ZERO,
        }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Zero-based day index of the current tick.
    #[inline]
    pub fn day(&self) -> u64 {
        self.current_tick.0 / self.ticks_per_day
    }

    /// `true` when the current tick is a positive multiple of
    /// `ticks_per_day`, i.e. a day has just been completed.
    #[inline]
    pub fn at_day_boundary(&self) -> bool {
        self.current_tick.0 > 0 && self.current_tick.0.is_multiple_of(self.ticks_per_day)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (day {})", self.current_tick, self.day())
    }
}
