//! Plain data row types written by output backends.

use td_sim::{CapacityReport, SimSnapshot, TickSummary};

/// Counters for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSummaryRow {
    pub tick:           u64,
    pub day:            u64,
    pub visit_requests: u64,
    pub assignments:    u64,
    pub pickups:        u64,
    pub drop_offs:      u64,
    pub queue_len:      u64,
    pub fleet_size:     u64,
    pub idle_vehicles:  u64,
    pub rides_today:    u64,
    /// Running daily mean wait; written as an empty field before the day's
    /// first pickup.
    pub average_wait:   Option<f64>,
    pub total_rides:    u64,
}

impl From<&TickSummary> for TickSummaryRow {
    fn from(s: &TickSummary) -> Self {
        Self {
            tick:           s.tick.0,
            day:            s.day,
            visit_requests: s.visit_requests as u64,
            assignments:    s.assignments as u64,
            pickups:        s.pickups as u64,
            drop_offs:      s.drop_offs() as u64,
            queue_len:      s.queue_len as u64,
            fleet_size:     s.fleet_size as u64,
            idle_vehicles:  s.idle_vehicles as u64,
            rides_today:    s.rides_today,
            average_wait:   s.average_wait,
            total_rides:    s.total_rides,
        }
    }
}

/// One end-of-day capacity review.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayReportRow {
    pub day:                 u64,
    pub rides:               u64,
    pub total_waiting_ticks: u64,
    /// `None` for a day without rides; written as an empty field.
    pub average_wait:        Option<f64>,
    pub scale_factor:        u32,
    pub added:               u32,
    pub removed:             u32,
    pub deferred:            u32,
    pub requeued:            u32,
    pub fleet_size:          u32,
}

impl From<&CapacityReport> for DayReportRow {
    fn from(r: &CapacityReport) -> Self {
        Self {
            day:                 r.day,
            rides:               r.rides,
            total_waiting_ticks: r.total_waiting_ticks,
            average_wait:        r.average_wait,
            scale_factor:        r.scale_factor,
            added:               r.added.len() as u32,
            removed:             r.removed.len() as u32,
            deferred:            r.deferred.len() as u32,
            requeued:            r.requeued.len() as u32,
            fleet_size:          r.fleet_size as u32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    Vehicle,
    Requester,
}

impl AgentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AgentKind::Vehicle   => "vehicle",
            AgentKind::Requester => "requester",
        }
    }
}

/// One agent at one snapshot tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentSnapshotRow {
    pub tick:     u64,
    pub kind:     AgentKind,
    pub agent_id: u32,
    pub x:        i32,
    pub y:        i32,
    pub state:    &'static str,
    /// Vehicles: the requester being served.  Requesters: the host.
    pub partner:  Option<u32>,
    /// Vehicles: is an extra.  Requesters: is hosting.
    pub flag:     bool,
}

/// Flatten a snapshot into rows, vehicles first, each group in id order.
pub fn snapshot_rows(snapshot: &SimSnapshot) -> Vec<AgentSnapshotRow> {
    let tick = snapshot.tick.0;
    let vehicles = snapshot.vehicles.iter().map(|v| AgentSnapshotRow {
        tick,
        kind:     AgentKind::Vehicle,
        agent_id: v.id.0,
        x:        v.position.x,
        y:        v.position.y,
        state:    v.state.as_str(),
        partner:  v.assigned.map(|r| r.0),
        flag:     v.extra,
    });
    let requesters = snapshot.requesters.iter().map(|r| AgentSnapshotRow {
        tick,
        kind:     AgentKind::Requester,
        agent_id: r.id.0,
        x:        r.position.x,
        y:        r.position.y,
        state:    r.state.as_str(),
        partner:  r.host.map(|h| h.0),
        flag:     r.hosting,
    });
    vehicles.chain(requesters).collect()
}
