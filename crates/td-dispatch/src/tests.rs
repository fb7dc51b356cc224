//! Unit tests for td-dispatch.

use td_agent::{RequesterState, RequesterStore, VehicleState, VehicleStore};
use td_core::{Position, RequesterId, Tick, VehicleId};

use crate::{Dispatcher, Matcher, NearestIdle, RequestEntry, RequestQueue};

fn p(x: i32, y: i32) -> Position {
    Position::new(x, y)
}

/// Requesters at the given homes, each already Waiting since `Tick(0)` for a
/// ride to (0, 0).
fn waiting_requesters(homes: &[Position]) -> (RequesterStore, RequestQueue) {
    let mut people = RequesterStore::new();
    let mut queue = RequestQueue::new();
    for &home in homes {
        let id = people.spawn(home);
        let r = people.get_mut(id).unwrap();
        r.request_ride(p(0, 0), Tick(0)).unwrap();
        queue.enqueue(r).unwrap();
    }
    (people, queue)
}

// ── Queue ordering ────────────────────────────────────────────────────────────

#[cfg(test)]
mod queue {
    use super::*;

    #[test]
    fn priority_boost_for_new_visitors() {
        let fresh = RequestEntry::new(RequesterId(1), Tick(100), 0);
        let seasoned = RequestEntry::new(RequesterId(0), Tick(100), 2);
        assert_eq!(fresh.priority, 95);
        assert_eq!(seasoned.priority, 100);

        let mut q = RequestQueue::new();
        q.push(seasoned);
        q.push(fresh);
        assert_eq!(q.pop().unwrap().requester, RequesterId(1));
        assert_eq!(q.pop().unwrap().requester, RequesterId(0));
    }

    #[test]
    fn boost_outweighs_small_lateness_only() {
        // Fresh requester asked 4 ticks later: 104-5=99 < 100, still first.
        let late_fresh = RequestEntry::new(RequesterId(1), Tick(104), 1);
        let early = RequestEntry::new(RequesterId(0), Tick(100), 3);
        assert!(late_fresh < early);
        // 6 ticks later: 106-5=101 > 100.
        let later_fresh = RequestEntry::new(RequesterId(1), Tick(106), 1);
        assert!(early < later_fresh);
    }

    #[test]
    fn ties_break_on_request_time_then_visits_then_id() {
        // Same priority 100: (105, visits 0) vs (100, visits 2).
        let a = RequestEntry::new(RequesterId(9), Tick(100), 2);
        let b = RequestEntry::new(RequesterId(1), Tick(105), 0);
        assert_eq!(a.priority, b.priority);
        assert!(a < b, "earlier request time wins");

        let c = RequestEntry::new(RequesterId(4), Tick(50), 0);
        let d = RequestEntry::new(RequesterId(3), Tick(50), 1);
        assert!(c < d, "fewer visits wins");

        let e = RequestEntry::new(RequesterId(2), Tick(50), 0);
        assert!(e < c, "lower id wins");
    }

    #[test]
    fn insertion_order_is_irrelevant() {
        let entries = [
            RequestEntry::new(RequesterId(0), Tick(7), 3),
            RequestEntry::new(RequesterId(1), Tick(3), 0),
            RequestEntry::new(RequesterId(2), Tick(3), 5),
            RequestEntry::new(RequesterId(3), Tick(1), 2),
        ];
        let mut forward = RequestQueue::new();
        let mut backward = RequestQueue::new();
        for e in entries {
            forward.push(e);
        }
        for e in entries.iter().rev() {
            backward.push(*e);
        }
        assert_eq!(forward.top(4), backward.top(4));
        let order: Vec<u32> = forward.top(4).iter().map(|e| e.requester.0).collect();
        // Priorities: r1 = -2 (boosted), r3 = 1 (two visits, no boost), r2 = 3, r0 = 7.
        assert_eq!(order, vec![1, 3, 2, 0]);
    }

    #[test]
    fn boost_stops_at_two_visits() {
        assert_eq!(RequestEntry::new(RequesterId(0), Tick(10), 1).priority, 5);
        assert_eq!(RequestEntry::new(RequesterId(0), Tick(10), 2).priority, 10);
    }

    #[test]
    fn enqueue_requires_waiting() {
        let mut people = RequesterStore::new();
        let id = people.spawn(p(1, 1));
        let mut q = RequestQueue::new();
        assert!(q.enqueue(people.get(id).unwrap()).is_err());
        assert!(q.is_empty());
    }

    #[test]
    fn top_and_contains() {
        let (_, q) = waiting_requesters(&[p(1, 1), p(2, 2), p(3, 3)]);
        assert_eq!(q.len(), 3);
        assert_eq!(q.top(2).len(), 2);
        assert_eq!(q.peek().unwrap().requester, RequesterId(0));
        assert!(q.contains(RequesterId(2)));
        assert!(!q.contains(RequesterId(7)));
    }
}

// ── Matcher ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod matcher {
    use super::*;

    #[test]
    fn picks_minimum_manhattan_distance() {
        let pool = [
            (VehicleId(0), p(9, 9)),
            (VehicleId(1), p(2, 3)),
            (VehicleId(2), p(5, 5)),
        ];
        assert_eq!(NearestIdle.select(p(2, 2), &pool), Some(1));
    }

    #[test]
    fn ties_go_to_scan_order() {
        let pool = [
            (VehicleId(3), p(4, 2)),
            (VehicleId(5), p(2, 4)),
            (VehicleId(8), p(0, 2)),
        ];
        assert_eq!(NearestIdle.select(p(2, 2), &pool), Some(0));
    }

    #[test]
    fn empty_pool_selects_nothing() {
        assert_eq!(NearestIdle.select(p(0, 0), &[]), None);
    }
}

// ── Dispatch pass ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod dispatch {
    use super::*;

    #[test]
    fn binds_nearest_vehicle_and_both_states() {
        let mut fleet = VehicleStore::new();
        let far = fleet.spawn(p(9, 9), 1);
        let near = fleet.spawn(p(4, 4), 1);
        let (mut people, mut queue) = waiting_requesters(&[p(5, 5)]);

        let out = Dispatcher::new(NearestIdle)
            .dispatch_pending(&mut queue, &mut fleet, &mut people)
            .unwrap();

        assert_eq!(out.assignments.len(), 1);
        assert_eq!(out.assignments[0].vehicle, near);
        assert_eq!(out.assignments[0].distance, 2);
        assert_eq!(fleet.get(near).unwrap().state, VehicleState::ToPickup(RequesterId(0)));
        assert!(fleet.get(far).unwrap().is_idle());
        assert_eq!(people.get(RequesterId(0)).unwrap().state, RequesterState::InTransit);
        assert!(queue.is_empty());
        assert!(!out.exhausted);
    }

    #[test]
    fn each_vehicle_used_once_per_pass() {
        let mut fleet = VehicleStore::new();
        let a = fleet.spawn(p(0, 0), 1);
        let b = fleet.spawn(p(9, 9), 1);
        // Both requesters are nearest to `a`; the second gets `b`.
        let (mut people, mut queue) = waiting_requesters(&[p(1, 0), p(0, 1)]);

        let out = Dispatcher::new(NearestIdle)
            .dispatch_pending(&mut queue, &mut fleet, &mut people)
            .unwrap();

        let pairs: Vec<_> = out.assignments.iter().map(|a| (a.requester, a.vehicle)).collect();
        assert_eq!(pairs, vec![(RequesterId(0), a), (RequesterId(1), b)]);
    }

    #[test]
    fn no_idle_vehicles_leaves_queue_unchanged() {
        let mut fleet = VehicleStore::new();
        let v = fleet.spawn(p(0, 0), 1);
        fleet.get_mut(v).unwrap().assign(RequesterId(99)).unwrap();
        let (mut people, mut queue) = waiting_requesters(&[p(1, 1), p(2, 2), p(3, 3)]);
        let before = queue.top(10);

        let out = Dispatcher::new(NearestIdle)
            .dispatch_pending(&mut queue, &mut fleet, &mut people)
            .unwrap();

        assert!(out.assignments.is_empty());
        assert!(out.exhausted);
        assert_eq!(queue.top(10), before);
        assert!(people.iter().all(|r| r.state == RequesterState::Waiting));
    }

    #[test]
    fn leftover_requests_stay_queued() {
        let mut fleet = VehicleStore::new();
        fleet.spawn(p(0, 0), 1);
        let (mut people, mut queue) = waiting_requesters(&[p(1, 1), p(2, 2), p(3, 3)]);

        let out = Dispatcher::new(NearestIdle)
            .dispatch_pending(&mut queue, &mut fleet, &mut people)
            .unwrap();

        assert_eq!(out.assignments.len(), 1);
        assert!(out.exhausted);
        assert_eq!(queue.len(), 2);
        assert!(!queue.contains(RequesterId(0)));
    }

    #[test]
    fn stale_entries_are_discarded() {
        let mut fleet = VehicleStore::new();
        let v = fleet.spawn(p(0, 0), 1);
        let (mut people, mut queue) = waiting_requesters(&[p(1, 1), p(2, 2)]);
        // Requester 0 stops waiting without going through the dispatcher.
        people.get_mut(RequesterId(0)).unwrap().state = RequesterState::Idle;

        let out = Dispatcher::new(NearestIdle)
            .dispatch_pending(&mut queue, &mut fleet, &mut people)
            .unwrap();

        assert_eq!(out.stale_discarded, 1);
        assert_eq!(out.assignments.len(), 1);
        assert_eq!(out.assignments[0].requester, RequesterId(1));
        assert_eq!(out.assignments[0].vehicle, v);
    }

    #[test]
    fn stale_entries_purged_even_when_exhausted() {
        let mut fleet = VehicleStore::new();
        let (mut people, mut queue) = waiting_requesters(&[p(1, 1), p(2, 2), p(3, 3)]);
        people.get_mut(RequesterId(2)).unwrap().state = RequesterState::Idle;

        let out = Dispatcher::new(NearestIdle)
            .dispatch_pending(&mut queue, &mut fleet, &mut people)
            .unwrap();

        assert!(out.exhausted);
        assert_eq!(out.stale_discarded, 1);
        assert_eq!(queue.len(), 2);
        for e in queue.iter() {
            assert_eq!(people.get(e.requester).unwrap().state, RequesterState::Waiting);
        }
    }

    #[test]
    fn priority_order_decides_who_gets_the_only_vehicle() {
        let mut fleet = VehicleStore::new();
        fleet.spawn(p(0, 0), 1);
        let mut people = RequesterStore::new();
        let mut queue = RequestQueue::new();
        // Requester 0: frequent visitor, asked at tick 100.
        // Requester 1: newcomer, asked at tick 100, boosted ahead.
        for (home, visits) in [(p(1, 1), 2), (p(8, 8), 0)] {
            let id = people.spawn(home);
            let r = people.get_mut(id).unwrap();
            r.visits_made = visits;
            r.request_ride(p(0, 0), Tick(100)).unwrap();
            queue.enqueue(r).unwrap();
        }

        let out = Dispatcher::new(NearestIdle)
            .dispatch_pending(&mut queue, &mut fleet, &mut people)
            .unwrap();

        assert_eq!(out.assignments[0].requester, RequesterId(1));
        assert_eq!(queue.peek().unwrap().requester, RequesterId(0));
    }
}
