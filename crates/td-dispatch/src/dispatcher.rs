//! The per-tick dispatch pass.

use log::debug;

use td_agent::{RequesterState, RequesterStore, VehicleStore};
use td_core::{RequesterId, VehicleId};

use crate::{DispatchError, DispatchResult, Matcher, NearestIdle, RequestQueue};

/// One vehicle bound to one requester.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Assignment {
    pub vehicle:   VehicleId,
    pub requester: RequesterId,
    /// Manhattan distance from the vehicle to the pickup at binding time.
    pub distance:  u32,
}

/// What a single dispatch pass did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub assignments:     Vec<Assignment>,
    /// Entries dropped because their requester was no longer Waiting.
    pub stale_discarded: usize,
    /// `true` if the pass stopped with requests left and no idle vehicle.
    pub exhausted:       bool,
}

/// Matches queued requests to idle vehicles.
///
/// `M` picks the vehicle for each request; the default is [`NearestIdle`].
#[derive(Clone, Debug, Default)]
pub struct Dispatcher<M: Matcher = NearestIdle> {
    pub matcher: M,
}

impl<M: Matcher> Dispatcher<M> {
    pub fn new(matcher: M) -> Self {
        Self { matcher }
    }

    /// Run one dispatch pass over `queue`.
    ///
    /// Binds vehicles (Idle → ToPickup) and requesters (Waiting → InTransit)
    /// in queue order until the queue is empty or no idle vehicle is left.
    /// In the second case the blocking entry stays queued and any stale
    /// entries behind it are purged, so afterwards every queued requester is
    /// Waiting.
    pub fn dispatch_pending(
        &self,
        queue:      &mut RequestQueue,
        vehicles:   &mut VehicleStore,
        requesters: &mut RequesterStore,
    ) -> DispatchResult<DispatchOutcome> {
        let mut outcome = DispatchOutcome::default();
        let mut pool = vehicles.idle();

        while let Some(entry) = queue.pop() {
            let requester = requesters
                .get(entry.requester)
                .ok_or(DispatchError::UnknownRequester(entry.requester))?;

            if requester.state != RequesterState::Waiting {
                outcome.stale_discarded += 1;
                continue;
            }

            let pickup = requester.position;
            let Some(slot) = self.matcher.select(pickup, &pool) else {
                queue.push(entry);
                outcome.stale_discarded += queue.retain(|e| {
                    requesters
                        .get(e.requester)
                        .is_some_and(|r| r.state == RequesterState::Waiting)
                });
                outcome.exhausted = true;
                break;
            };

            let (vehicle_id, vehicle_pos) = pool.remove(slot);
            vehicles
                .get_mut(vehicle_id)
                .ok_or(DispatchError::UnknownVehicle(vehicle_id))?
                .assign(entry.requester)?;
            requesters
                .get_mut(entry.requester)
                .ok_or(DispatchError::UnknownRequester(entry.requester))?
                .assign()?;

            let distance = vehicle_pos.manhattan(pickup);
            debug!(
                "dispatcher assigned {vehicle_id} to {} ({distance} cells away)",
                entry.requester
            );
            outcome.assignments.push(Assignment {
                vehicle: vehicle_id,
                requester: entry.requester,
                distance,
            });
        }

        Ok(outcome)
    }
}
