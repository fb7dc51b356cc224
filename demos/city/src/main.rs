//! city: batch runner for the taxi dispatch twin.
//!
//! Runs the reference scenario (20 × 20 grid, 5 taxis, 10 residents, 20 ticks
//! per day) unless `--config` points at a JSON `SimConfig`.  Writes CSV output
//! and prints a per-day table plus run totals.
//!
//! ```text
//! RUST_LOG=info cargo run -p city -- --days 30 --output output/city
//! ```

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use td_core::SimConfig;
use td_output::{CsvWriter, OutputWriter, SimOutputObserver};
use td_sim::{CapacityReport, RetirePolicy, SimBuilder, SimObserver, SimSnapshot, TickSummary};
use td_spatial::MoveRule;

// ── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "city", about = "Run the grid taxi dispatch simulation for a number of days")]
struct Args {
    /// JSON file with a SimConfig; missing fields take the reference values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Days to simulate
    #[arg(long, default_value_t = 30)]
    days: u64,

    /// Override the config seed
    #[arg(long, env = "CITY_SEED")]
    seed: Option<u64>,

    /// Directory for the CSV files
    #[arg(long, default_value = "output/city")]
    output: PathBuf,

    /// Snapshot every agent every N ticks (0 disables)
    #[arg(long, default_value_t = 0)]
    snapshot_every: u64,

    /// Step geometry for vehicles
    #[arg(value_enum, long, default_value_t = Movement::Diagonal)]
    movement: Movement,

    /// Keep busy extras until they finish their ride
    #[arg(long)]
    defer_retire: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Movement {
    Diagonal,
    Manhattan,
}

impl From<Movement> for MoveRule {
    fn from(m: Movement) -> Self {
        match m {
            Movement::Diagonal  => MoveRule::Diagonal,
            Movement::Manhattan => MoveRule::Manhattan,
        }
    }
}

fn reference_config() -> SimConfig {
    SimConfig {
        width:              20,
        height:             20,
        initial_vehicles:   5,
        initial_requesters: 10,
        ticks_per_day:      20,
        vehicle_speed:      1,
        seed:               42,
    }
}

fn load_config(args: &Args) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            let value: serde_json::Value = serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?;
            // Fields missing from the file keep their reference values.
            let mut merged = serde_json::to_value(reference_config())?;
            if let (Some(base), Some(over)) = (merged.as_object_mut(), value.as_object()) {
                for (k, v) in over {
                    base.insert(k.clone(), v.clone());
                }
            }
            serde_json::from_value(merged)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => reference_config(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    Ok(config)
}

// ── Observer wrapper to collect day reports ──────────────────────────────────

struct DayTable<W: OutputWriter> {
    inner:   SimOutputObserver<W>,
    reports: Vec<CapacityReport>,
}

impl<W: OutputWriter> SimObserver for DayTable<W> {
    fn on_tick_end(&mut self, summary: &TickSummary) {
        self.inner.on_tick_end(summary);
    }

    fn on_day_end(&mut self, report: &CapacityReport) {
        self.reports.push(report.clone());
        self.inner.on_day_end(report);
    }

    fn wants_snapshot(&self, tick: td_core::Tick) -> bool {
        self.inner.wants_snapshot(tick)
    }

    fn on_snapshot(&mut self, snapshot: &SimSnapshot) {
        self.inner.on_snapshot(snapshot);
    }

    fn on_sim_end(&mut self, final_tick: td_core::Tick) {
        self.inner.on_sim_end(final_tick);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = load_config(&args)?;

    println!("=== city: grid taxi dispatch ===");
    println!(
        "Grid: {}x{}  |  Taxis: {}  |  Residents: {}  |  Days: {} x {} ticks  |  Seed: {}",
        config.width,
        config.height,
        config.initial_vehicles,
        config.initial_requesters,
        args.days,
        config.ticks_per_day,
        config.seed,
    );
    println!();

    let policy = if args.defer_retire {
        RetirePolicy::DeferUntilIdle
    } else {
        RetirePolicy::Immediate
    };
    let mut sim = SimBuilder::new(config)
        .move_rule(args.movement.into())
        .retire_policy(policy)
        .build()?;

    let writer = CsvWriter::new(&args.output)
        .with_context(|| format!("opening output in {}", args.output.display()))?;
    let mut obs = DayTable {
        inner:   SimOutputObserver::new(writer, args.snapshot_every),
        reports: Vec::new(),
    };

    let t0 = Instant::now();
    sim.run_days(args.days, &mut obs)?;
    let elapsed = t0.elapsed();
    info!("ran {} ticks in {:.3} s", sim.now().0, elapsed.as_secs_f64());

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    println!(
        "{:<5} {:>6} {:>10} {:>6} {:>6} {:>6} {:>6}",
        "Day", "Rides", "Avg wait", "Scale", "Added", "Gone", "Fleet"
    );
    println!("{}", "-".repeat(51));
    for r in &obs.reports {
        let avg = r.average_wait.map_or_else(|| "-".to_owned(), |w| format!("{w:.1}"));
        println!(
            "{:<5} {:>6} {:>10} {:>6} {:>6} {:>6} {:>6}",
            r.day,
            r.rides,
            avg,
            r.scale_factor,
            r.added.len(),
            r.removed.len(),
            r.fleet_size,
        );
    }
    println!();

    let totals = &sim.totals;
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  pickups          : {}", totals.pickups);
    println!("  drop-offs        : {}", totals.drop_offs);
    match totals.average_wait() {
        Some(w) => println!("  average wait     : {w:.2} ticks"),
        None    => println!("  average wait     : -"),
    }
    println!("  extras added     : {}", totals.vehicles_added);
    println!("  extras retired   : {}", totals.vehicles_retired);
    println!("  final fleet      : {}", sim.fleet_size());
    println!("  still queued     : {}", sim.queue.len());
    println!("  output           : {}", args.output.display());

    Ok(())
}
