//! `SimOutputObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use td_core::Tick;
use td_sim::{CapacityReport, SimObserver, SimSnapshot, TickSummary};

use crate::row::{DayReportRow, TickSummaryRow, snapshot_rows};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes tick summaries, day reports and periodic
/// agent snapshots to any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After the run returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:            W,
    /// Snapshot every this many ticks; 0 disables snapshots.
    snapshot_interval: u64,
    last_error:        Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W, snapshot_interval: u64) -> Self {
        Self {
            writer,
            snapshot_interval,
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after the run returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Flush the writer.  Only needed after `run_ticks`; `run_days` does
    /// this through `on_sim_end`.
    pub fn finish(&mut self) -> OutputResult<()> {
        self.writer.finish()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, summary: &TickSummary) {
        let result = self.writer.write_tick_summary(&TickSummaryRow::from(summary));
        self.store_err(result);
    }

    fn on_day_end(&mut self, report: &CapacityReport) {
        let result = self.writer.write_day_report(&DayReportRow::from(report));
        self.store_err(result);
    }

    fn wants_snapshot(&self, tick: Tick) -> bool {
        self.snapshot_interval > 0 && tick.0.is_multiple_of(self.snapshot_interval)
    }

    fn on_snapshot(&mut self, snapshot: &SimSnapshot) {
        let rows = snapshot_rows(snapshot);
        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
