//! Owning registries for vehicles and requesters.
//!
//! # Iteration order
//!
//! Both stores iterate in ascending id order.  For vehicles that is creation
//! order, which the dispatcher relies on to break nearest-distance ties and
//! the simulation relies on for a reproducible step order.

use std::collections::BTreeMap;

use td_core::{Position, RequesterId, VehicleId};

use crate::{Requester, Vehicle};

// ── VehicleStore ─────────────────────────────────────────────────────────────

/// The active fleet.  Ids are allocated monotonically and never reused, so a
/// retired vehicle's id can never alias a newer one.
#[derive(Clone, Debug, Default)]
pub struct VehicleStore {
    vehicles: BTreeMap<VehicleId, Vehicle>,
    next_id:  u32,
}

impl VehicleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an Idle vehicle at `position` and return its id.
    pub fn spawn(&mut self, position: Position, speed: u32) -> VehicleId {
        let id = VehicleId(self.next_id);
        self.next_id += 1;
        self.vehicles.insert(id, Vehicle::new(id, position, speed));
        id
    }

    /// Remove a vehicle from the fleet.
    pub fn remove(&mut self, id: VehicleId) -> Option<Vehicle> {
        self.vehicles.remove(&id)
    }

    #[inline]
    pub fn get(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(&id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: VehicleId) -> Option<&mut Vehicle> {
        self.vehicles.get_mut(&id)
    }

    /// Vehicles in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Vehicle> + '_ {
        self.vehicles.values()
    }

    /// Ids in creation order.
    pub fn ids(&self) -> Vec<VehicleId> {
        self.vehicles.keys().copied().collect()
    }

    /// `(id, position)` of every Idle vehicle, in creation order.
    pub fn idle(&self) -> Vec<(VehicleId, Position)> {
        self.vehicles
            .values()
            .filter(|v| v.is_idle())
            .map(|v| (v.id, v.position))
            .collect()
    }

    /// Ids of extras, in creation order.
    pub fn extras(&self) -> Vec<VehicleId> {
        self.vehicles
            .values()
            .filter(|v| v.is_extra())
            .map(|v| v.id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }
}

// ── RequesterStore ───────────────────────────────────────────────────────────

/// All residents.  Requesters live for the whole run, so the id is a plain
/// index into the backing `Vec`.
#[derive(Clone, Debug, Default)]
pub struct RequesterStore {
    requesters: Vec<Requester>,
}

impl RequesterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a requester living at `home` and return its id.
    pub fn spawn(&mut self, home: Position) -> RequesterId {
        let id = RequesterId(self.requesters.len() as u32);
        self.requesters.push(Requester::new(id, home));
        id
    }

    #[inline]
    pub fn get(&self, id: RequesterId) -> Option<&Requester> {
        self.requesters.get(id.index())
    }

    #[inline]
    pub fn get_mut(&mut self, id: RequesterId) -> Option<&mut Requester> {
        self.requesters.get_mut(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Requester> + '_ {
        self.requesters.iter()
    }

    /// Iterator over all ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = RequesterId> + '_ {
        (0..self.requesters.len() as u32).map(RequesterId)
    }

    /// Requesters other than `except` that may host a visit, ascending.
    pub fn available_hosts(&self, except: RequesterId) -> Vec<RequesterId> {
        self.requesters
            .iter()
            .filter(|r| r.id != except && r.is_available())
            .map(|r| r.id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.requesters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requesters.is_empty()
    }
}
