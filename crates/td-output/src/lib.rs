//! `td-output`: simulation output writers for the taxi dispatch twin.
//!
//! | Backend | Files created                                                   |
//! |---------|-----------------------------------------------------------------|
//! | CSV     | `tick_summaries.csv`, `day_reports.csv`, `agent_snapshots.csv`  |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `td_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use td_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer, 20);
//! sim.run_days(30, &mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use crate::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{AgentKind, AgentSnapshotRow, DayReportRow, TickSummaryRow, snapshot_rows};
pub use writer::OutputWriter;
