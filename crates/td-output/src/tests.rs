//! Integration tests for td-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::{AGENT_SNAPSHOT_HEADER, CsvWriter, DAY_REPORT_HEADER, TICK_SUMMARY_HEADER};
    use crate::row::{AgentKind, AgentSnapshotRow, DayReportRow, TickSummaryRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn headers(dir: &TempDir, file: &str) -> Vec<String> {
        let mut rdr = csv::Reader::from_path(dir.path().join(file)).unwrap();
        rdr.headers().unwrap().iter().map(str::to_owned).collect()
    }

    fn records(dir: &TempDir, file: &str) -> Vec<csv::StringRecord> {
        let mut rdr = csv::Reader::from_path(dir.path().join(file)).unwrap();
        rdr.records().map(|r| r.unwrap()).collect()
    }

    fn summary_row(tick: u64) -> TickSummaryRow {
        TickSummaryRow {
            tick,
            day:            tick / 20,
            visit_requests: 2,
            assignments:    1,
            pickups:        1,
            drop_offs:      0,
            queue_len:      3,
            fleet_size:     5,
            idle_vehicles:  4,
            rides_today:    6,
            average_wait:   Some(12.5),
            total_rides:    40,
        }
    }

    fn day_row(day: u64, average_wait: Option<f64>) -> DayReportRow {
        DayReportRow {
            day,
            rides:               4,
            total_waiting_ticks: 300,
            average_wait,
            scale_factor:        1,
            added:               2,
            removed:             0,
            deferred:            0,
            requeued:            0,
            fleet_size:          7,
        }
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("tick_summaries.csv").exists());
        assert!(dir.path().join("day_reports.csv").exists());
        assert!(dir.path().join("agent_snapshots.csv").exists());
    }

    #[test]
    fn csv_creates_missing_directory() {
        let dir = tmp();
        let nested = dir.path().join("a").join("b");
        let _w = CsvWriter::new(&nested).unwrap();
        assert!(nested.join("day_reports.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        assert_eq!(headers(&dir, "tick_summaries.csv"), TICK_SUMMARY_HEADER);
        assert_eq!(headers(&dir, "day_reports.csv"), DAY_REPORT_HEADER);
        assert_eq!(headers(&dir, "agent_snapshots.csv"), AGENT_SNAPSHOT_HEADER);
    }

    #[test]
    fn csv_tick_summary_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&summary_row(41)).unwrap();
        w.finish().unwrap();

        let rows = records(&dir, "tick_summaries.csv");
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "41"); // tick
        assert_eq!(&rows[0][1], "2");  // day
        assert_eq!(&rows[0][6], "3");  // queue_len
        assert_eq!(&rows[0][9], "6");  // rides_today
        assert_eq!(&rows[0][10], "12.500");
        assert_eq!(&rows[0][11], "40");
    }

    #[test]
    fn csv_tick_summary_blank_average_before_first_pickup() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let row = TickSummaryRow { rides_today: 0, average_wait: None, ..summary_row(3) };
        w.write_tick_summary(&row).unwrap();
        w.finish().unwrap();

        let rows = records(&dir, "tick_summaries.csv");
        assert_eq!(&rows[0][9], "0");
        assert_eq!(&rows[0][10], "");
    }

    #[test]
    fn csv_day_report_blank_average_for_quiet_day() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_day_report(&day_row(0, Some(75.0))).unwrap();
        w.write_day_report(&day_row(1, None)).unwrap();
        w.finish().unwrap();

        let rows = records(&dir, "day_reports.csv");
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][3], "75.000");
        assert_eq!(&rows[1][3], "");
        assert_eq!(&rows[1][9], "7"); // fleet_size
    }

    #[test]
    fn csv_snapshot_rows_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let rows = [
            AgentSnapshotRow {
                tick: 5, kind: AgentKind::Vehicle, agent_id: 0, x: 1, y: 2,
                state: "to_pickup", partner: Some(3), flag: true,
            },
            AgentSnapshotRow {
                tick: 5, kind: AgentKind::Requester, agent_id: 3, x: 4, y: 4,
                state: "in_transit", partner: None, flag: false,
            },
        ];
        w.write_snapshots(&rows).unwrap();
        w.finish().unwrap();

        let read = records(&dir, "agent_snapshots.csv");
        assert_eq!(read.len(), 2);
        assert_eq!(&read[0][1], "vehicle");
        assert_eq!(&read[0][6], "3");
        assert_eq!(&read[0][7], "1");
        assert_eq!(&read[1][1], "requester");
        assert_eq!(&read[1][6], "");
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_empty_snapshot_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[]).unwrap();
    }
}

#[cfg(test)]
mod observer_tests {
    use td_core::{Position, SimConfig, Tick};
    use td_sim::{SimBuilder, SimObserver};
    use td_spatial::MoveRule;
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::observer::SimOutputObserver;
    use crate::row::{AgentKind, AgentSnapshotRow, DayReportRow, TickSummaryRow, snapshot_rows};
    use crate::writer::OutputWriter;
    use crate::{OutputError, OutputResult};

    fn reference_config() -> SimConfig {
        SimConfig {
            width:              20,
            height:             20,
            initial_vehicles:   5,
            initial_requesters: 10,
            ticks_per_day:      20,
            vehicle_speed:      1,
            seed:               8,
        }
    }

    /// Fails every write; counts calls.
    #[derive(Default)]
    struct BrokenWriter {
        calls: usize,
    }

    impl BrokenWriter {
        fn fail(&mut self, what: &str) -> OutputResult<()> {
            self.calls += 1;
            Err(OutputError::Io(std::io::Error::other(format!("{what} #{}", self.calls))))
        }
    }

    impl OutputWriter for BrokenWriter {
        fn write_snapshots(&mut self, _rows: &[AgentSnapshotRow]) -> OutputResult<()> {
            self.fail("snapshots")
        }
        fn write_tick_summary(&mut self, _row: &TickSummaryRow) -> OutputResult<()> {
            self.fail("summary")
        }
        fn write_day_report(&mut self, _row: &DayReportRow) -> OutputResult<()> {
            self.fail("day")
        }
        fn finish(&mut self) -> OutputResult<()> {
            Ok(())
        }
    }

    #[test]
    fn snapshot_interval_gates_snapshots() {
        let obs = SimOutputObserver::new(BrokenWriter::default(), 10);
        assert!(obs.wants_snapshot(Tick(0)));
        assert!(!obs.wants_snapshot(Tick(5)));
        assert!(obs.wants_snapshot(Tick(20)));

        let never = SimOutputObserver::new(BrokenWriter::default(), 0);
        assert!(!never.wants_snapshot(Tick(0)));
    }

    #[test]
    fn first_error_is_kept() {
        let mut sim = SimBuilder::new(reference_config()).build().unwrap();
        let mut obs = SimOutputObserver::new(BrokenWriter::default(), 0);
        sim.run_ticks(3, &mut obs).unwrap();

        let err = obs.take_error().expect("write error stored");
        assert!(err.to_string().contains("summary #1"), "{err}");
        assert!(obs.take_error().is_none());
        assert_eq!(obs.into_writer().calls, 3);
    }

    #[test]
    fn snapshot_rows_cover_every_agent() {
        let config = SimConfig { initial_vehicles: 1, initial_requesters: 1, ..reference_config() };
        let mut sim = SimBuilder::new(config)
            .vehicle_positions(vec![Position::new(0, 0)])
            .requester_homes(vec![Position::new(3, 0)])
            .move_rule(MoveRule::Manhattan)
            .build()
            .unwrap();
        sim.request_ride(td_core::RequesterId(0), Position::new(9, 9)).unwrap();
        sim.step().unwrap();

        let rows = snapshot_rows(&sim.snapshot(5));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].kind, AgentKind::Vehicle);
        assert_eq!(rows[0].state, "to_pickup");
        assert_eq!(rows[0].partner, Some(0));
        assert_eq!(rows[1].kind, AgentKind::Requester);
        assert_eq!((rows[1].x, rows[1].y), (3, 0));
        assert_eq!(rows[1].state, "in_transit");
        assert!(rows.iter().all(|r| r.tick == 1));
    }

    #[test]
    fn integration_csv() {
        let dir: TempDir = tempfile::tempdir().expect("create temp dir");
        let mut sim = SimBuilder::new(reference_config()).build().unwrap();
        let writer = CsvWriter::new(dir.path()).unwrap();
        let mut obs = SimOutputObserver::new(writer, 20);
        sim.run_days(2, &mut obs).unwrap();
        assert!(obs.take_error().is_none());

        let count = |file: &str| {
            csv::Reader::from_path(dir.path().join(file)).unwrap().records().count()
        };
        assert_eq!(count("tick_summaries.csv"), 40);
        assert_eq!(count("day_reports.csv"), 2);
        // Snapshots at ticks 20 and 40.  No wait can reach an hour in two
        // short days, so the fleet never grows.
        assert_eq!(sim.fleet_size(), 5);
        assert_eq!(count("agent_snapshots.csv"), 2 * (5 + 10));
    }
}
