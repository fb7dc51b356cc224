//! The `Sim` struct and its tick loop.

use log::debug;

use td_agent::{
    Arrival, Requester, RequesterState, RequesterStore, Vehicle, VehicleState, VehicleStore,
};
use td_core::{
    AggregateStats, HALF_HOUR_TICKS, Position, RequesterId, SimClock, SimConfig, SimRng,
    THREE_HOUR_TICKS, Tick, VehicleId,
};
use td_dispatch::{Dispatcher, Matcher, NearestIdle, RequestQueue};
use td_spatial::{Grid, MoveRule, move_toward};

use crate::{
    CapacityController, FleetContext, LifetimeTotals, RequesterView, SimError, SimObserver,
    SimResult, SimSnapshot, TickSummary, VehicleView,
};

/// Per-tick probability that an idle, non-hosting requester starts a visit.
pub const VISIT_PROBABILITY: f64 = 0.1;

/// Queue entries included in snapshots built by the run loops.
pub const SNAPSHOT_QUEUE_DEPTH: usize = 10;

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<M>` owns all simulation state and drives the tick loop:
///
/// 1. **Vehicles** (ascending id) move one tick toward their target, then
///    pick up or drop off if they reached it.
/// 2. **Requesters** (ascending id) count down visits and may start new ones.
/// 3. **Dispatch**: one pass of [`Dispatcher::dispatch_pending`].
/// 4. **Clock** advances.
/// 5. **Capacity review** if the new tick closes a day.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<M: Matcher = NearestIdle> {
    pub config: SimConfig,

    pub clock: SimClock,

    /// Occupancy index.  Vehicles are always placed; requesters are placed
    /// except while on board.
    pub grid: Grid,

    pub vehicles: VehicleStore,

    pub requesters: RequesterStore,

    pub queue: RequestQueue,

    pub dispatcher: Dispatcher<M>,

    pub capacity: CapacityController,

    pub move_rule: MoveRule,

    /// Today's wait-time accumulators, consumed by the capacity review.
    pub stats: AggregateStats,

    pub totals: LifetimeTotals,

    /// Random source used by [`step`](Self::step) and the run loops.
    pub rng: SimRng,
}

impl<M: Matcher> Sim<M> {
    // ── Public API ────────────────────────────────────────────────────────

    #[inline]
    pub fn now(&self) -> Tick {
        self.clock.current_tick
    }

    #[inline]
    pub fn day(&self) -> u64 {
        self.clock.day()
    }

    #[inline]
    pub fn fleet_size(&self) -> usize {
        self.vehicles.len()
    }

    /// Advance exactly one tick using the sim's own random source.
    pub fn step(&mut self) -> SimResult<TickSummary> {
        let mut rng = std::mem::replace(&mut self.rng, SimRng::new(self.config.seed));
        let summary = self.step_with(&mut rng);
        self.rng = rng;
        summary
    }

    /// Advance exactly one tick drawing randomness from `rng`.
    pub fn step_with(&mut self, rng: &mut SimRng) -> SimResult<TickSummary> {
        let now = self.clock.current_tick;
        let mut summary = TickSummary {
            tick: now,
            day: self.clock.day(),
            ..TickSummary::default()
        };

        // Visitors dropped off this tick start counting down next tick.
        let mut arrived = Vec::new();
        for id in self.vehicles.ids() {
            if let Some(rid) = self.step_vehicle(id, now, rng, &mut summary)? {
                arrived.push(rid);
            }
        }
        for id in 0..self.requesters.len() as u32 {
            let id = RequesterId(id);
            if arrived.contains(&id) {
                continue;
            }
            self.step_requester(id, now, rng, &mut summary)?;
        }

        let outcome = self.dispatcher.dispatch_pending(
            &mut self.queue,
            &mut self.vehicles,
            &mut self.requesters,
        )?;
        summary.assignments     = outcome.assignments.len();
        summary.stale_discarded = outcome.stale_discarded;

        summary.rides_today  = self.stats.completed_rides;
        summary.average_wait = self.stats.average_wait();

        self.clock.advance();
        if self.clock.at_day_boundary() {
            let ended = self.clock.day() - 1;
            let report = self.capacity.review(
                ended,
                self.clock.current_tick,
                FleetContext {
                    grid:          &mut self.grid,
                    vehicles:      &mut self.vehicles,
                    requesters:    &mut self.requesters,
                    queue:         &mut self.queue,
                    stats:         &mut self.stats,
                    vehicle_speed: self.config.vehicle_speed,
                },
                rng,
            )?;
            self.totals.vehicles_added   += report.added.len() as u64;
            self.totals.vehicles_retired += report.removed.len() as u64;
            summary.capacity = Some(report);
        }

        summary.queue_len     = self.queue.len();
        summary.fleet_size    = self.vehicles.len();
        summary.idle_vehicles = self.vehicles.iter().filter(|v| v.is_idle()).count();
        summary.total_rides   = self.totals.drop_offs;
        Ok(summary)
    }

    /// Run exactly `n` ticks, reporting to `observer`.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            let now = self.clock.current_tick;
            observer.on_tick_start(now);
            let summary = self.step()?;
            observer.on_tick_end(&summary);
            if let Some(report) = &summary.capacity {
                observer.on_day_end(report);
            }
            if observer.wants_snapshot(self.clock.current_tick) {
                observer.on_snapshot(&self.snapshot(SNAPSHOT_QUEUE_DEPTH));
            }
        }
        Ok(())
    }

    /// Run until `n` more day boundaries have been crossed, then call
    /// `on_sim_end`.
    pub fn run_days<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        let target = (self.clock.day() + n) * self.clock.ticks_per_day;
        let remaining = target.saturating_sub(self.clock.current_tick.0);
        self.run_ticks(remaining, observer)?;
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Send an idle requester on a ride to `destination`, outside the random
    /// visit process.  The ride carries no host.
    pub fn request_ride(&mut self, id: RequesterId, destination: Position) -> SimResult<()> {
        self.grid.check(destination)?;
        let now = self.clock.current_tick;
        let r = self
            .requesters
            .get_mut(id)
            .ok_or(SimError::UnknownRequester(id))?;
        if !r.is_available() {
            return Err(SimError::RequesterBusy(id));
        }
        r.request_ride(destination, now)?;
        self.queue.enqueue(r)?;
        debug!("{id} requested a ride to {destination} at {now}");
        Ok(())
    }

    /// Capture the current state.  `top_n` bounds the queue listing.
    pub fn snapshot(&self, top_n: usize) -> SimSnapshot {
        SimSnapshot {
            tick:         self.clock.current_tick,
            day:          self.clock.day(),
            vehicles:     self.vehicles.iter().map(VehicleView::from).collect(),
            requesters:   self.requesters.iter().map(RequesterView::from).collect(),
            total_rides:  self.totals.drop_offs,
            average_wait: self.stats.average_wait(),
            fleet_size:   self.vehicles.len(),
            queue_len:    self.queue.len(),
            top_queue:    self.queue.top(top_n),
        }
    }

    // ── Vehicle step ──────────────────────────────────────────────────────

    fn step_vehicle(
        &mut self,
        id:      VehicleId,
        now:     Tick,
        rng:     &mut SimRng,
        summary: &mut TickSummary,
    ) -> SimResult<Option<RequesterId>> {
        let vehicle = self.vehicles.get(id).ok_or(SimError::UnknownVehicle(id))?;
        let (speed, state) = (vehicle.speed, vehicle.state);
        match state {
            VehicleState::Idle => Ok(None),

            VehicleState::ToPickup(rid) => {
                let target = self.requester_position(rid)?;
                let pos = move_toward(&mut self.grid, id, target, speed, self.move_rule)?;
                self.vehicle_mut(id)?.position = pos;
                if pos != target {
                    return Ok(None);
                }

                let r = self.requesters.get_mut(rid).ok_or(SimError::UnknownRequester(rid))?;
                let wait = now.since(r.request_time);
                r.on_board = true;
                self.grid.remove(rid);
                self.vehicle_mut(id)?.pick_up()?;

                self.stats.record_pickup(wait);
                self.totals.pickups       += 1;
                self.totals.waiting_ticks += wait;
                summary.pickups += 1;
                debug!("{id} picked up {rid} at {pos} after waiting {wait} ticks");
                Ok(None)
            }

            VehicleState::ToDestination(rid) => {
                let r = self.requesters.get(rid).ok_or(SimError::UnknownRequester(rid))?;
                let target = r.destination.ok_or(SimError::MissingDestination(rid))?;
                let going_home = target == r.home;

                let pos = move_toward(&mut self.grid, id, target, speed, self.move_rule)?;
                self.vehicle_mut(id)?.position = pos;
                self.requester_mut(rid)?.position = pos;
                if pos != target {
                    return Ok(None);
                }

                self.vehicle_mut(id)?.drop_off()?;
                let visit_ticks = if going_home {
                    0
                } else {
                    rng.gen_range(HALF_HOUR_TICKS..=THREE_HOUR_TICKS)
                };
                let arrival = self.requester_mut(rid)?.arrive(pos, visit_ticks)?;
                self.grid.place(rid, pos)?;
                self.totals.drop_offs += 1;

                match arrival {
                    Arrival::Home => {
                        summary.arrivals_home += 1;
                        debug!("{id} dropped {rid} at home {pos}");
                        Ok(None)
                    }
                    Arrival::Visit { host } => {
                        summary.visits_started += 1;
                        if let Some(host) = host {
                            self.register_guest(rid, host)?;
                        }
                        debug!("{id} dropped {rid} at {pos} for a {visit_ticks}-tick visit");
                        Ok(Some(rid))
                    }
                }
            }
        }
    }

    /// Count `visitor` as a guest of `host` if the host is still at home.
    fn register_guest(&mut self, visitor: RequesterId, host: RequesterId) -> SimResult<()> {
        let h = self.requester_mut(host)?;
        if h.state != RequesterState::Idle {
            debug!("{visitor} arrived but host {host} is away ({})", h.state);
            return Ok(());
        }
        h.add_guest();
        self.requester_mut(visitor)?.mark_host_registered();
        Ok(())
    }

    // ── Requester step ────────────────────────────────────────────────────

    fn step_requester(
        &mut self,
        id:      RequesterId,
        now:     Tick,
        rng:     &mut SimRng,
        summary: &mut TickSummary,
    ) -> SimResult<()> {
        let r = self.requester_mut(id)?;
        let (state, hosting) = (r.state, r.is_hosting());
        match state {
            RequesterState::Visiting => {
                let r = self.requesters.get_mut(id).ok_or(SimError::UnknownRequester(id))?;
                if !r.tick_visit() {
                    return Ok(());
                }
                let link = r.begin_return(now)?;
                self.queue.enqueue(r)?;
                if let Some(link) = link.filter(|l| l.registered) {
                    self.requester_mut(link.host)?.remove_guest();
                }
                summary.visits_ended += 1;
                debug!("{id} finished a visit; heading home");
                Ok(())
            }

            RequesterState::Idle if !hosting => {
                if !rng.gen_bool(VISIT_PROBABILITY) {
                    return Ok(());
                }
                let hosts = self.requesters.available_hosts(id);
                let Some(&host) = rng.choose(&hosts) else {
                    return Ok(());
                };
                let host_pos = self.requester_position(host)?;
                let r = self.requesters.get_mut(id).ok_or(SimError::UnknownRequester(id))?;
                r.request_visit(host, host_pos, now)?;
                self.queue.enqueue(r)?;
                summary.visit_requests += 1;
                debug!("{id} wants to visit {host} at {host_pos}");
                Ok(())
            }

            _ => Ok(()),
        }
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    fn vehicle_mut(&mut self, id: VehicleId) -> SimResult<&mut Vehicle> {
        self.vehicles.get_mut(id).ok_or(SimError::UnknownVehicle(id))
    }

    fn requester_mut(&mut self, id: RequesterId) -> SimResult<&mut Requester> {
        self.requesters.get_mut(id).ok_or(SimError::UnknownRequester(id))
    }

    fn requester_position(&self, id: RequesterId) -> SimResult<Position> {
        self.requesters
            .get(id)
            .map(|r| r.position)
            .ok_or(SimError::UnknownRequester(id))
    }
}
