//! Daily fleet review.
//!
//! At every day boundary the controller
//!
//! 1. retires the extras from earlier reviews (see [`RetirePolicy`]),
//! 2. reads the day's [`AggregateStats`] and, if the mean wait exceeds the
//!    threshold, adds `scale × vehicles_per_scale` Idle extras at random
//!    cells, where `scale = clamp(floor(mean / threshold), 1, max_scale)`,
//! 3. resets the stats.

use log::info;

use td_agent::{RequesterStore, VehicleStore};
use td_core::{AggregateStats, ONE_HOUR_TICKS, RequesterId, SimRng, Tick, VehicleId};
use td_dispatch::RequestQueue;
use td_spatial::Grid;

use crate::{SimError, SimResult};

/// What to do with an extra that is still serving a requester when it is due
/// to be retired.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RetirePolicy {
    /// Retire it anyway.  Its requester goes back to Waiting and is
    /// re-queued: at its original request time if it was still awaiting
    /// pickup, or at the vehicle's cell with a fresh request time if it was
    /// on board.
    #[default]
    Immediate,
    /// Keep it until the first later review at which it is Idle.
    DeferUntilIdle,
}

/// The mutable simulation state a review touches.
pub struct FleetContext<'a> {
    pub grid:          &'a mut Grid,
    pub vehicles:      &'a mut VehicleStore,
    pub requesters:    &'a mut RequesterStore,
    pub queue:         &'a mut RequestQueue,
    pub stats:         &'a mut AggregateStats,
    /// Speed given to newly added extras.
    pub vehicle_speed: u32,
}

/// Outcome of one review.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CapacityReport {
    /// The day that just ended (zero-based).
    pub day:                 u64,
    /// Pickups recorded during the day.
    pub rides:               u64,
    pub total_waiting_ticks: u64,
    /// `None` for a day without rides.
    pub average_wait:        Option<f64>,
    /// Zero when no extras were added.
    pub scale_factor:        u32,
    pub added:               Vec<VehicleId>,
    pub removed:             Vec<VehicleId>,
    /// Busy extras kept alive under [`RetirePolicy::DeferUntilIdle`].
    pub deferred:            Vec<VehicleId>,
    /// Requesters orphaned by a removal and put back in the queue.
    pub requeued:            Vec<RequesterId>,
    /// Fleet size after the review.
    pub fleet_size:          usize,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CapacityController {
    pub policy:             RetirePolicy,
    /// Mean wait, in ticks, above which the fleet grows.
    pub threshold_ticks:    u64,
    pub max_scale:          u32,
    pub vehicles_per_scale: usize,
}

impl Default for CapacityController {
    fn default() -> Self {
        Self {
            policy:             RetirePolicy::Immediate,
            threshold_ticks:    ONE_HOUR_TICKS,
            max_scale:          5,
            vehicles_per_scale: 2,
        }
    }
}

impl CapacityController {
    pub fn new(policy: RetirePolicy) -> Self {
        Self { policy, ..Self::default() }
    }

    /// Scale factor for a day with mean wait `average`, or 0 for no growth.
    pub fn scale_for(&self, average: Option<f64>) -> u32 {
        let threshold = self.threshold_ticks as f64;
        match average {
            Some(avg) if avg > threshold => {
                ((avg / threshold).floor() as u32).clamp(1, self.max_scale)
            }
            _ => 0,
        }
    }

    /// Run the review for the day that ended at `now`.
    pub fn review(
        &self,
        day: u64,
        now: Tick,
        ctx: FleetContext<'_>,
        rng: &mut SimRng,
    ) -> SimResult<CapacityReport> {
        let FleetContext { grid, vehicles, requesters, queue, stats, vehicle_speed } = ctx;
        let mut report = CapacityReport { day, ..CapacityReport::default() };

        // ── Retire earlier extras ─────────────────────────────────────────
        for id in vehicles.extras() {
            let orphan = vehicles
                .get(id)
                .ok_or(SimError::UnknownVehicle(id))?
                .assigned_request();
            if orphan.is_some() && self.policy == RetirePolicy::DeferUntilIdle {
                report.deferred.push(id);
                continue;
            }

            let retired = vehicles.remove(id).ok_or(SimError::UnknownVehicle(id))?;
            grid.remove(id);
            report.removed.push(id);

            if let Some(rid) = orphan {
                let r = requesters.get_mut(rid).ok_or(SimError::UnknownRequester(rid))?;
                if r.on_board {
                    r.position = retired.position;
                    grid.place(rid, retired.position)?;
                }
                r.requeue(now)?;
                queue.enqueue(r)?;
                report.requeued.push(rid);
                info!("retired {id} while serving {rid}; {rid} re-queued at {}", r.position);
            }
        }

        // ── Grow if the day was slow ──────────────────────────────────────
        report.rides               = stats.completed_rides;
        report.total_waiting_ticks = stats.total_waiting_ticks;
        report.average_wait        = stats.average_wait();
        report.scale_factor        = self.scale_for(report.average_wait);

        let count = report.scale_factor as usize * self.vehicles_per_scale;
        for _ in 0..count {
            let pos = grid.random_cell(rng);
            let id = vehicles.spawn(pos, vehicle_speed);
            if let Some(v) = vehicles.get_mut(id) {
                v.extra_since = Some(day);
            }
            grid.place(id, pos)?;
            report.added.push(id);
        }

        stats.reset();
        report.fleet_size = vehicles.len();

        info!(
            "day {day}: {} rides, mean wait {}, scale {} (+{} -{} vehicles, {} deferred), fleet {}",
            report.rides,
            report.average_wait.map_or_else(|| "n/a".to_string(), |w| format!("{w:.1}")),
            report.scale_factor,
            report.added.len(),
            report.removed.len(),
            report.deferred.len(),
            report.fleet_size,
        );
        Ok(report)
    }
}
