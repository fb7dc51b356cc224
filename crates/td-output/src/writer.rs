//! The `OutputWriter` trait implemented by backend writers.

use crate::{AgentSnapshotRow, DayReportRow, OutputResult, TickSummaryRow};

/// A sink for the three output tables.
///
/// Errors surface to the observer, which stores them for
/// [`SimOutputObserver::take_error`](crate::SimOutputObserver::take_error).
pub trait OutputWriter {
    /// Write every agent row of one snapshot.
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()>;

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    fn write_day_report(&mut self, row: &DayReportRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
