//! Simulation observer trait for progress reporting and data collection.

use td_core::Tick;

use crate::{CapacityReport, SimSnapshot, TickSummary};

/// Callbacks invoked by [`Sim::run_ticks`][crate::Sim::run_ticks] and
/// [`Sim::run_days`][crate::Sim::run_days].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct DayPrinter;
///
/// impl SimObserver for DayPrinter {
///     fn on_day_end(&mut self, report: &CapacityReport) {
///         println!("day {}: fleet {}", report.day, report.fleet_size);
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called before the tick is processed.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after the tick, including any capacity review it triggered.
    fn on_tick_end(&mut self, _summary: &TickSummary) {}

    /// Called after each day-boundary review, right after `on_tick_end`.
    fn on_day_end(&mut self, _report: &CapacityReport) {}

    /// Whether to snapshot the state reached at `tick`, i.e. right after
    /// tick `tick - 1` was processed.  Building one walks every agent, so the
    /// default is never.
    fn wants_snapshot(&self, _tick: Tick) -> bool {
        false
    }

    fn on_snapshot(&mut self, _snapshot: &SimSnapshot) {}

    /// Called once after [`Sim::run_days`][crate::Sim::run_days] finishes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
