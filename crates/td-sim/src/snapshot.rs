//! Read-only views of the simulation handed to observers.

use td_agent::{Requester, RequesterState, Vehicle, VehicleState};
use td_core::{Position, RequesterId, Tick, VehicleId};
use td_dispatch::RequestEntry;

use crate::CapacityReport;

/// Counters for one completed tick.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickSummary {
    /// The tick that was processed.
    pub tick:            Tick,
    pub day:             u64,
    /// Visits initiated by idle requesters.
    pub visit_requests:  usize,
    /// Visits that ended and queued a return ride.
    pub visits_ended:    usize,
    pub assignments:     usize,
    pub stale_discarded: usize,
    pub pickups:         usize,
    /// Drop-offs that started a visit.
    pub visits_started:  usize,
    /// Drop-offs at home.
    pub arrivals_home:   usize,
    /// Queue length after dispatch (and after any capacity review).
    pub queue_len:       usize,
    pub fleet_size:      usize,
    pub idle_vehicles:   usize,
    /// Pickups so far in the current day, read before any review resets
    /// the day's stats.
    pub rides_today:     u64,
    /// Running mean wait of `rides_today`; `None` until the first pickup.
    pub average_wait:    Option<f64>,
    /// Drop-offs since tick 0.
    pub total_rides:     u64,
    /// Set when this tick closed a day.
    pub capacity:        Option<CapacityReport>,
}

impl TickSummary {
    pub fn drop_offs(&self) -> usize {
        self.visits_started + self.arrivals_home
    }
}

/// Totals over the whole run.  Unlike [`td_core::AggregateStats`] these are
/// never reset.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LifetimeTotals {
    pub pickups:          u64,
    pub waiting_ticks:    u64,
    pub drop_offs:        u64,
    pub vehicles_added:   u64,
    pub vehicles_retired: u64,
}

impl LifetimeTotals {
    pub fn average_wait(&self) -> Option<f64> {
        (self.pickups > 0).then(|| self.waiting_ticks as f64 / self.pickups as f64)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleView {
    pub id:              VehicleId,
    pub position:        Position,
    pub state:           VehicleState,
    pub assigned:        Option<RequesterId>,
    pub extra:           bool,
    pub rides_completed: u64,
}

impl From<&Vehicle> for VehicleView {
    fn from(v: &Vehicle) -> Self {
        Self {
            id:              v.id,
            position:        v.position,
            state:           v.state,
            assigned:        v.assigned_request(),
            extra:           v.is_extra(),
            rides_completed: v.rides_completed,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RequesterView {
    pub id:            RequesterId,
    pub home:          Position,
    pub position:      Position,
    pub state:         RequesterState,
    pub hosting:       bool,
    pub on_board:      bool,
    pub destination:   Option<Position>,
    /// The requester being visited or travelled to.
    pub host:          Option<RequesterId>,
    pub visit_timer:   i64,
    pub visits_made:   u32,
    pub visits_hosted: u32,
}

impl From<&Requester> for RequesterView {
    fn from(r: &Requester) -> Self {
        Self {
            id:            r.id,
            home:          r.home,
            position:      r.position,
            state:         r.state,
            hosting:       r.is_hosting(),
            on_board:      r.on_board,
            destination:   r.destination,
            host:          r.destination_host.map(|l| l.host),
            visit_timer:   r.visit_timer,
            visits_made:   r.visits_made,
            visits_hosted: r.visits_hosted,
        }
    }
}

/// Full state at the start of `tick`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimSnapshot {
    pub tick:         Tick,
    pub day:          u64,
    pub vehicles:     Vec<VehicleView>,
    pub requesters:   Vec<RequesterView>,
    /// Drop-offs over the whole run.
    pub total_rides:  u64,
    /// Mean wait of the current day so far.
    pub average_wait: Option<f64>,
    pub fleet_size:   usize,
    pub queue_len:    usize,
    /// Highest-priority queued entries, best first.
    pub top_queue:    Vec<RequestEntry>,
}
