//! Fluent builder for constructing a [`Sim`].

use std::collections::HashSet;

use log::debug;

use td_agent::{RequesterStore, VehicleStore};
use td_core::{AggregateStats, Position, SimClock, SimConfig, SimRng};
use td_dispatch::{Dispatcher, Matcher, NearestIdle, RequestQueue};
use td_spatial::{Grid, MoveRule};

use crate::{CapacityController, LifetimeTotals, RetirePolicy, Sim, SimError, SimResult};

/// Seed offset of the initial placement stream.
const PLACEMENT_STREAM: u64 = 1;

/// Fluent builder for [`Sim<M>`].
///
/// # Optional inputs (have defaults)
///
/// | Method                    | Default                                 |
/// |---------------------------|-----------------------------------------|
/// | `.vehicle_positions(v)`   | Uniformly random cells                  |
/// | `.requester_homes(v)`     | Uniformly random, pairwise distinct     |
/// | `.move_rule(r)`           | `MoveRule::Diagonal`                    |
/// | `.retire_policy(p)`       | `RetirePolicy::Immediate`               |
/// | `.matcher(m)`             | `NearestIdle`                           |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(SimConfig::default())
///     .move_rule(MoveRule::Manhattan)
///     .build()?;
/// sim.run_days(7, &mut NoopObserver)?;
/// ```
pub struct SimBuilder<M: Matcher = NearestIdle> {
    config:            SimConfig,
    vehicle_positions: Option<Vec<Position>>,
    requester_homes:   Option<Vec<Position>>,
    move_rule:         MoveRule,
    retire_policy:     RetirePolicy,
    matcher:           M,
}

impl SimBuilder {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            vehicle_positions: None,
            requester_homes:   None,
            move_rule:         MoveRule::default(),
            retire_policy:     RetirePolicy::default(),
            matcher:           NearestIdle,
        }
    }
}

impl<M: Matcher> SimBuilder<M> {
    /// Starting cells of the base fleet.  Must have `initial_vehicles`
    /// entries.
    pub fn vehicle_positions(mut self, positions: Vec<Position>) -> Self {
        self.vehicle_positions = Some(positions);
        self
    }

    /// Home cells.  Must have `initial_requesters` pairwise distinct entries.
    pub fn requester_homes(mut self, homes: Vec<Position>) -> Self {
        self.requester_homes = Some(homes);
        self
    }

    pub fn move_rule(mut self, rule: MoveRule) -> Self {
        self.move_rule = rule;
        self
    }

    pub fn retire_policy(mut self, policy: RetirePolicy) -> Self {
        self.retire_policy = policy;
        self
    }

    /// Replace the vehicle selection strategy.
    pub fn matcher<N: Matcher>(self, matcher: N) -> SimBuilder<N> {
        SimBuilder {
            config:            self.config,
            vehicle_positions: self.vehicle_positions,
            requester_homes:   self.requester_homes,
            move_rule:         self.move_rule,
            retire_policy:     self.retire_policy,
            matcher,
        }
    }

    /// Validate the configuration, place every agent, and return a ready
    /// [`Sim`] at tick 0.
    pub fn build(self) -> SimResult<Sim<M>> {
        let config = self.config;
        config.validate()?;

        let mut rng = SimRng::new(config.seed);
        let mut placement = rng.child(PLACEMENT_STREAM);

        // ── Resolve positions ─────────────────────────────────────────────
        let vehicle_positions = match self.vehicle_positions {
            Some(p) => {
                check_len(&p, config.initial_vehicles, "vehicle positions")?;
                p
            }
            None => (0..config.initial_vehicles)
                .map(|_| placement.cell(config.width, config.height))
                .collect(),
        };

        let homes = match self.requester_homes {
            Some(h) => {
                check_len(&h, config.initial_requesters, "requester homes")?;
                let mut seen = HashSet::with_capacity(h.len());
                if let Some(dup) = h.iter().find(|&&p| !seen.insert(p)) {
                    return Err(SimError::Config(format!("two requesters share home {dup}")));
                }
                h
            }
            None => distinct_cells(&config, &mut placement)?,
        };

        // ── Populate stores and grid ──────────────────────────────────────
        let mut grid = Grid::new(config.width, config.height);

        let mut vehicles = VehicleStore::new();
        for pos in vehicle_positions {
            grid.check(pos)?;
            let id = vehicles.spawn(pos, config.vehicle_speed);
            grid.place(id, pos)?;
        }

        let mut requesters = RequesterStore::new();
        for home in homes {
            grid.check(home)?;
            let id = requesters.spawn(home);
            grid.place(id, home)?;
        }

        debug!(
            "built {}x{} sim: {} vehicles, {} requesters, seed {}",
            config.width,
            config.height,
            vehicles.len(),
            requesters.len(),
            config.seed
        );

        Ok(Sim {
            clock:      SimClock::new(config.ticks_per_day),
            grid,
            vehicles,
            requesters,
            queue:      RequestQueue::new(),
            dispatcher: Dispatcher::new(self.matcher),
            capacity:   CapacityController::new(self.retire_policy),
            move_rule:  self.move_rule,
            stats:      AggregateStats::default(),
            totals:     LifetimeTotals::default(),
            rng,
            config,
        })
    }
}

fn check_len<T>(v: &[T], expected: usize, what: &'static str) -> SimResult<()> {
    if v.len() != expected {
        return Err(SimError::AgentCountMismatch { expected, got: v.len(), what });
    }
    Ok(())
}

/// `initial_requesters` distinct cells, sampled without replacement.
fn distinct_cells(config: &SimConfig, rng: &mut SimRng) -> SimResult<Vec<Position>> {
    let cells = usize::try_from(config.cell_count()).map_err(|_| {
        SimError::Config(format!("{} cells do not fit in memory", config.cell_count()))
    })?;
    let width = config.width as usize;
    Ok(rand::seq::index::sample(rng.inner(), cells, config.initial_requesters)
        .into_iter()
        .map(|i| Position::new((i % width) as i32, (i / width) as i32))
        .collect())
}
