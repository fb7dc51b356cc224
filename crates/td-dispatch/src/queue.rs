//! `RequestQueue`: pending pickups ordered by effective priority.
//!
//! # Ordering
//!
//! Entries sort ascending by `(priority, request_time, visits_made,
//! requester)`, and the minimum is served first.  `priority` is the request
//! tick minus a boost for residents who have made fewer than two visits, so
//! at equal request times newcomers are served before frequent visitors:
//!
//! ```text
//! request_time = 100, visits_made = 0  →  priority  95   (served first)
//! request_time = 100, visits_made = 2  →  priority 100
//! ```
//!
//! Every field of the key is deterministic; insertion order never matters.

use std::collections::BTreeSet;

use td_agent::{Requester, RequesterState};
use td_core::{RequesterId, Tick};

use crate::{DispatchError, DispatchResult};

/// Ticks subtracted from the priority of a requester with few visits.
pub const PRIORITY_BOOST: i64 = 5;

/// Requesters with fewer visits than this receive [`PRIORITY_BOOST`].
pub const BOOST_VISIT_LIMIT: u32 = 2;

/// One queued pickup request.
///
/// Field order is the sort key; the derived `Ord` is the queue order.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RequestEntry {
    pub priority:     i64,
    pub request_time: Tick,
    pub visits_made:  u32,
    /// Final tie-break; also the handle into the requester store.
    pub requester:    RequesterId,
}

impl RequestEntry {
    pub fn new(requester: RequesterId, request_time: Tick, visits_made: u32) -> Self {
        let boost = if visits_made < BOOST_VISIT_LIMIT { PRIORITY_BOOST } else { 0 };
        Self {
            priority: request_time.0 as i64 - boost,
            request_time,
            visits_made,
            requester,
        }
    }

    /// Build the entry for a requester's current wait.
    pub fn for_requester(r: &Requester) -> Self {
        Self::new(r.id, r.request_time, r.visits_made)
    }
}

/// Ordered set of pending requests.  Holds handles only; the requester
/// store owns the requesters.
#[derive(Clone, Debug, Default)]
pub struct RequestQueue {
    entries: BTreeSet<RequestEntry>,
}

impl RequestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a Waiting requester.  Returns the entry that was inserted.
    pub fn enqueue(&mut self, requester: &Requester) -> DispatchResult<RequestEntry> {
        if requester.state != RequesterState::Waiting {
            return Err(DispatchError::NotWaiting(requester.id));
        }
        let entry = RequestEntry::for_requester(requester);
        self.entries.insert(entry);
        Ok(entry)
    }

    /// Re-insert a previously popped entry unchanged.
    pub fn push(&mut self, entry: RequestEntry) {
        self.entries.insert(entry);
    }

    /// Remove and return the highest-priority (minimum) entry.
    pub fn pop(&mut self) -> Option<RequestEntry> {
        self.entries.pop_first()
    }

    pub fn peek(&self) -> Option<&RequestEntry> {
        self.entries.first()
    }

    /// The `n` highest-priority entries, best first.  For diagnostics.
    pub fn top(&self, n: usize) -> Vec<RequestEntry> {
        self.entries.iter().take(n).copied().collect()
    }

    pub fn contains(&self, requester: RequesterId) -> bool {
        self.entries.iter().any(|e| e.requester == requester)
    }

    /// Keep only entries for which `keep` returns `true`.  Returns how many
    /// were dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(&RequestEntry) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| keep(e));
        before - self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RequestEntry> + '_ {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
