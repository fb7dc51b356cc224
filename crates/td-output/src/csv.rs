//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `tick_summaries.csv`
//! - `day_reports.csv`
//! - `agent_snapshots.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{AgentSnapshotRow, DayReportRow, OutputResult, TickSummaryRow};

pub const TICK_SUMMARY_HEADER: [&str; 12] = [
    "tick", "day", "visit_requests", "assignments", "pickups", "drop_offs",
    "queue_len", "fleet_size", "idle_vehicles", "rides_today", "average_wait",
    "total_rides",
];

pub const DAY_REPORT_HEADER: [&str; 10] = [
    "day", "rides", "total_waiting_ticks", "average_wait", "scale_factor",
    "added", "removed", "deferred", "requeued", "fleet_size",
];

pub const AGENT_SNAPSHOT_HEADER: [&str; 8] =
    ["tick", "kind", "agent_id", "x", "y", "state", "partner", "flag"];

/// Writes simulation output to three CSV files.
pub struct CsvWriter {
    summaries: Writer<File>,
    days:      Writer<File>,
    snapshots: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open the three CSV files in it and write the
    /// header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(TICK_SUMMARY_HEADER)?;

        let mut days = Writer::from_path(dir.join("day_reports.csv"))?;
        days.write_record(DAY_REPORT_HEADER)?;

        let mut snapshots = Writer::from_path(dir.join("agent_snapshots.csv"))?;
        snapshots.write_record(AGENT_SNAPSHOT_HEADER)?;

        Ok(Self {
            summaries,
            days,
            snapshots,
            finished: false,
        })
    }
}

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.tick.to_string(),
                row.kind.as_str().to_string(),
                row.agent_id.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.state.to_string(),
                opt(row.partner),
                (row.flag as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.day.to_string(),
            row.visit_requests.to_string(),
            row.assignments.to_string(),
            row.pickups.to_string(),
            row.drop_offs.to_string(),
            row.queue_len.to_string(),
            row.fleet_size.to_string(),
            row.idle_vehicles.to_string(),
            row.rides_today.to_string(),
            opt(row.average_wait.map(|w| format!("{w:.3}"))),
            row.total_rides.to_string(),
        ])?;
        Ok(())
    }

    fn write_day_report(&mut self, row: &DayReportRow) -> OutputResult<()> {
        self.days.write_record(&[
            row.day.to_string(),
            row.rides.to_string(),
            row.total_waiting_ticks.to_string(),
            opt(row.average_wait.map(|w| format!("{w:.3}"))),
            row.scale_factor.to_string(),
            row.added.to_string(),
            row.removed.to_string(),
            row.deferred.to_string(),
            row.requeued.to_string(),
            row.fleet_size.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.summaries.flush()?;
        self.days.flush()?;
        self.snapshots.flush()?;
        Ok(())
    }
}
