//! Vehicle state.

use std::fmt;

use td_core::{Position, RequesterId, VehicleId};

use crate::{AgentError, AgentResult};

/// Where a vehicle is in its trip cycle.
///
/// The assigned requester lives inside the non-idle variants, which makes
/// "has an assignment iff not idle" hold by construction.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VehicleState {
    #[default]
    Idle,
    /// Driving to the requester's current position.
    ToPickup(RequesterId),
    /// Carrying the requester to its destination.
    ToDestination(RequesterId),
}

impl VehicleState {
    #[inline]
    pub fn is_idle(self) -> bool {
        matches!(self, VehicleState::Idle)
    }

    /// The requester this vehicle is serving, if any.
    #[inline]
    pub fn assigned(self) -> Option<RequesterId> {
        match self {
            VehicleState::Idle => None,
            VehicleState::ToPickup(r) | VehicleState::ToDestination(r) => Some(r),
        }
    }

    /// Label used in snapshots and CSV output.
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleState::Idle             => "idle",
            VehicleState::ToPickup(_)      => "to_pickup",
            VehicleState::ToDestination(_) => "to_destination",
        }
    }
}

impl fmt::Display for VehicleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A taxi.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vehicle {
    pub id:              VehicleId,
    pub position:        Position,
    pub state:           VehicleState,
    /// Cells traversable per tick.  Always positive.
    pub speed:           u32,
    /// Drop-offs completed over the vehicle's lifetime.
    pub rides_completed: u64,
    /// `Some(day)` for extras added by the capacity controller at the end of
    /// `day`; `None` for the base fleet.
    pub extra_since:     Option<u64>,
}

impl Vehicle {
    pub fn new(id: VehicleId, position: Position, speed: u32) -> Self {
        Self {
            id,
            position,
            state: VehicleState::Idle,
            speed,
            rides_completed: 0,
            extra_since: None,
        }
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.state.is_idle()
    }

    #[inline]
    pub fn is_extra(&self) -> bool {
        self.extra_since.is_some()
    }

    #[inline]
    pub fn assigned_request(&self) -> Option<RequesterId> {
        self.state.assigned()
    }

    /// Idle → ToPickup.
    pub fn assign(&mut self, requester: RequesterId) -> AgentResult<()> {
        if !self.is_idle() {
            return Err(AgentError::VehicleBusy(self.id));
        }
        self.state = VehicleState::ToPickup(requester);
        Ok(())
    }

    /// ToPickup → ToDestination.
    pub fn pick_up(&mut self) -> AgentResult<RequesterId> {
        match self.state {
            VehicleState::ToPickup(r) => {
                self.state = VehicleState::ToDestination(r);
                Ok(r)
            }
            VehicleState::ToDestination(_) => Err(AgentError::VehicleBusy(self.id)),
            VehicleState::Idle => Err(AgentError::VehicleIdle(self.id)),
        }
    }

    /// ToDestination → Idle.  Counts the ride.
    pub fn drop_off(&mut self) -> AgentResult<RequesterId> {
        match self.state {
            VehicleState::ToDestination(r) => {
                self.state = VehicleState::Idle;
                self.rides_completed += 1;
                Ok(r)
            }
            VehicleState::ToPickup(_) => Err(AgentError::VehicleBusy(self.id)),
            VehicleState::Idle => Err(AgentError::VehicleIdle(self.id)),
        }
    }
}
