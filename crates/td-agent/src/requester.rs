//! Requester (resident) state.
//!
//! ```text
//!            initiate visit / request_ride
//!   Idle ──────────────────────────────────▶ Waiting
//!    ▲                                         │ dispatcher assigns
//!    │ arrive home                             ▼
//!    └──────────────────────────────────── InTransit
//!                                              │ arrive elsewhere
//!   Waiting ◀──── visit timer expires ──── Visiting
//! ```
//!
//! `hosting` is an overlay on `Idle`: it is `true` while at least one
//! visitor is registered at this requester's home.

use std::fmt;

use td_core::{Position, RequesterId, Tick};

use crate::{AgentError, AgentResult};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RequesterState {
    #[default]
    Idle,
    /// Enqueued, awaiting a vehicle.
    Waiting,
    /// Bound to a vehicle (awaiting pickup or riding).
    InTransit,
    /// At a non-home destination, counting down `visit_timer`.
    Visiting,
}

impl RequesterState {
    pub fn as_str(self) -> &'static str {
        match self {
            RequesterState::Idle      => "idle",
            RequesterState::Waiting   => "waiting",
            RequesterState::InTransit => "in_transit",
            RequesterState::Visiting  => "visiting",
        }
    }
}

impl fmt::Display for RequesterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The host a visitor is travelling to or staying with.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HostLink {
    pub host:       RequesterId,
    /// `true` once the host has counted this visitor as a guest.  Only then
    /// does the visitor's departure release the host.
    pub registered: bool,
}

/// What happened when a requester was dropped off.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Arrival {
    /// Back at `home`; the requester is Idle again.
    Home,
    /// Started a visit.  `host` is the requester being visited, if the trip
    /// was a social visit rather than a forced ride.
    Visit { host: Option<RequesterId> },
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Requester {
    pub id:               RequesterId,
    /// Fixed for the requester's lifetime.
    pub home:             Position,
    /// Current cell.  Follows the carrying vehicle while riding.
    pub position:         Position,
    pub state:            RequesterState,
    pub destination:      Option<Position>,
    pub destination_host: Option<HostLink>,
    /// Remaining ticks of the active visit.
    pub visit_timer:      i64,
    pub visits_made:      u32,
    pub visits_hosted:    u32,
    /// Tick at which the current wait began.
    pub request_time:     Tick,
    /// Visitors currently registered at this requester's home.
    pub guests:           u32,
    /// `true` between pickup and drop-off.
    pub on_board:         bool,
}

impl Requester {
    pub fn new(id: RequesterId, home: Position) -> Self {
        Self {
            id,
            home,
            position: home,
            state: RequesterState::Idle,
            destination: None,
            destination_host: None,
            visit_timer: 0,
            visits_made: 0,
            visits_hosted: 0,
            request_time: Tick::ZERO,
            guests: 0,
            on_board: false,
        }
    }

    #[inline]
    pub fn is_hosting(&self) -> bool {
        self.guests > 0
    }

    /// Idle and not hosting: may start a visit or be chosen as a host.
    #[inline]
    pub fn is_available(&self) -> bool {
        self.state == RequesterState::Idle && !self.is_hosting()
    }

    fn require_state(&self, want: RequesterState) -> AgentResult<()> {
        if self.state == want {
            Ok(())
        } else {
            Err(AgentError::WrongRequesterState(self.id, self.state.as_str(), want.as_str()))
        }
    }

    /// Idle → Waiting for a visit to `host` at `host_position`.
    pub fn request_visit(
        &mut self,
        host:          RequesterId,
        host_position: Position,
        now:           Tick,
    ) -> AgentResult<()> {
        self.require_state(RequesterState::Idle)?;
        self.destination      = Some(host_position);
        self.destination_host = Some(HostLink { host, registered: false });
        self.request_time     = now;
        self.state            = RequesterState::Waiting;
        Ok(())
    }

    /// Idle → Waiting for a plain ride to `destination`.
    pub fn request_ride(&mut self, destination: Position, now: Tick) -> AgentResult<()> {
        self.require_state(RequesterState::Idle)?;
        self.destination      = Some(destination);
        self.destination_host = None;
        self.request_time     = now;
        self.state            = RequesterState::Waiting;
        Ok(())
    }

    /// Waiting → InTransit.
    pub fn assign(&mut self) -> AgentResult<()> {
        self.require_state(RequesterState::Waiting)?;
        self.state = RequesterState::InTransit;
        Ok(())
    }

    /// Put an orphaned requester (its vehicle was retired) back in line.
    ///
    /// A requester still awaiting pickup keeps its original `request_time`;
    /// one that was already riding starts a fresh wait at `now` from where
    /// it was dropped.
    pub fn requeue(&mut self, now: Tick) -> AgentResult<()> {
        self.require_state(RequesterState::InTransit)?;
        if self.on_board {
            self.on_board     = false;
            self.request_time = now;
        }
        self.state = RequesterState::Waiting;
        Ok(())
    }

    /// InTransit → Visiting or Idle, depending on whether `at` is home.
    ///
    /// `visit_ticks` is only used for a visit and is sampled by the caller.
    pub fn arrive(&mut self, at: Position, visit_ticks: u64) -> AgentResult<Arrival> {
        self.require_state(RequesterState::InTransit)?;
        self.position = at;
        self.on_board = false;
        if self.destination == Some(self.home) {
            self.destination = None;
            self.state       = RequesterState::Idle;
            return Ok(Arrival::Home);
        }
        self.visit_timer  = visit_ticks as i64;
        self.visits_made += 1;
        self.state        = RequesterState::Visiting;
        Ok(Arrival::Visit { host: self.destination_host.map(|l| l.host) })
    }

    /// Record that the host accepted this visitor as a guest.
    pub fn mark_host_registered(&mut self) {
        if let Some(link) = self.destination_host.as_mut() {
            link.registered = true;
        }
    }

    /// Count down one tick of an active visit.  Returns `true` when the
    /// visit is over.
    pub fn tick_visit(&mut self) -> bool {
        if self.state != RequesterState::Visiting {
            return false;
        }
        self.visit_timer -= 1;
        self.visit_timer <= 0
    }

    /// Visiting → Waiting for the trip home.
    ///
    /// Returns the host link so the caller can release the host.
    pub fn begin_return(&mut self, now: Tick) -> AgentResult<Option<HostLink>> {
        self.require_state(RequesterState::Visiting)?;
        let link = self.destination_host.take();
        self.destination  = Some(self.home);
        self.request_time = now;
        self.visit_timer  = 0;
        self.state        = RequesterState::Waiting;
        Ok(link)
    }

    /// Register a visitor at this home.
    pub fn add_guest(&mut self) {
        self.guests        += 1;
        self.visits_hosted += 1;
    }

    /// A registered visitor has left.
    pub fn remove_guest(&mut self) {
        self.guests = self.guests.saturating_sub(1);
    }
}
