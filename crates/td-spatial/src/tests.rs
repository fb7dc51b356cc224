//! Unit tests for td-spatial.

use td_core::{AgentRef, Position, RequesterId, VehicleId};

use crate::{Grid, MoveRule, SpatialError, move_toward, unit_step};

fn p(x: i32, y: i32) -> Position {
    Position::new(x, y)
}

const V0: VehicleId = VehicleId(0);
const V1: VehicleId = VehicleId(1);
const R0: RequesterId = RequesterId(0);

// ── Grid ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod grid {
    use super::*;

    #[test]
    fn place_and_lookup() {
        let mut g = Grid::new(10, 10);
        g.place(V0, p(2, 3)).unwrap();
        assert_eq!(g.position_of(V0), Some(p(2, 3)));
        assert_eq!(g.occupants_at(p(2, 3)), &[AgentRef::Vehicle(V0)]);
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn cells_hold_multiple_agents_in_placement_order() {
        let mut g = Grid::new(4, 4);
        g.place(R0, p(1, 1)).unwrap();
        g.place(V1, p(1, 1)).unwrap();
        g.place(V0, p(1, 1)).unwrap();
        assert_eq!(
            g.occupants_at(p(1, 1)),
            &[AgentRef::Requester(R0), AgentRef::Vehicle(V1), AgentRef::Vehicle(V0)]
        );
    }

    #[test]
    fn place_out_of_bounds_fails() {
        let mut g = Grid::new(5, 5);
        for bad in [p(5, 0), p(0, 5), p(-1, 2), p(2, -1)] {
            let err = g.place(V0, bad).unwrap_err();
            assert_eq!(err, SpatialError::OutOfBounds { pos: bad, width: 5, height: 5 });
        }
        assert!(g.is_empty());
    }

    #[test]
    fn move_updates_both_indices() {
        let mut g = Grid::new(5, 5);
        g.place(V0, p(0, 0)).unwrap();
        g.move_to(V0, p(4, 4)).unwrap();
        assert!(g.occupants_at(p(0, 0)).is_empty());
        assert_eq!(g.occupants_at(p(4, 4)), &[AgentRef::Vehicle(V0)]);
        assert_eq!(g.position_of(V0), Some(p(4, 4)));
    }

    #[test]
    fn failed_move_leaves_agent_in_place() {
        let mut g = Grid::new(5, 5);
        g.place(V0, p(1, 1)).unwrap();
        assert!(g.move_to(V0, p(9, 9)).is_err());
        assert_eq!(g.position_of(V0), Some(p(1, 1)));
    }

    #[test]
    fn move_unplaced_agent_fails() {
        let mut g = Grid::new(5, 5);
        assert_eq!(
            g.move_to(V0, p(1, 1)),
            Err(SpatialError::NotPlaced(AgentRef::Vehicle(V0)))
        );
    }

    #[test]
    fn remove_clears_cell() {
        let mut g = Grid::new(5, 5);
        g.place(V0, p(3, 3)).unwrap();
        g.place(V1, p(3, 3)).unwrap();
        assert_eq!(g.remove(V0), Some(p(3, 3)));
        assert_eq!(g.occupants_at(p(3, 3)), &[AgentRef::Vehicle(V1)]);
        assert_eq!(g.remove(V0), None);
        assert_eq!(g.len(), 1);
    }
}

// ── Movement ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod movement {
    use super::*;

    #[test]
    fn diagonal_step_closes_both_axes() {
        assert_eq!(unit_step(p(0, 0), p(5, 3), MoveRule::Diagonal), p(1, 1));
        assert_eq!(unit_step(p(5, 0), p(5, 3), MoveRule::Diagonal), p(5, 1));
        assert_eq!(unit_step(p(4, 4), p(0, 4), MoveRule::Diagonal), p(3, 4));
        assert_eq!(unit_step(p(2, 2), p(2, 2), MoveRule::Diagonal), p(2, 2));
    }

    #[test]
    fn manhattan_step_prefers_larger_offset() {
        assert_eq!(unit_step(p(0, 0), p(5, 3), MoveRule::Manhattan), p(1, 0));
        assert_eq!(unit_step(p(0, 0), p(1, 3), MoveRule::Manhattan), p(0, 1));
        // x wins ties
        assert_eq!(unit_step(p(3, 3), p(0, 0), MoveRule::Manhattan), p(2, 3));
    }

    #[test]
    fn within_speed_jumps_to_target() {
        let mut g = Grid::new(10, 10);
        g.place(V0, p(2, 2)).unwrap();
        let at = move_toward(&mut g, V0, p(3, 3), 3, MoveRule::Diagonal).unwrap();
        assert_eq!(at, p(3, 3));
        assert_eq!(g.position_of(V0), Some(p(3, 3)));
    }

    #[test]
    fn speed_one_diagonal_takes_one_step() {
        let mut g = Grid::new(10, 10);
        g.place(V0, p(0, 0)).unwrap();
        let at = move_toward(&mut g, V0, p(5, 5), 1, MoveRule::Diagonal).unwrap();
        assert_eq!(at, p(1, 1));
    }

    #[test]
    fn never_overshoots() {
        for rule in [MoveRule::Diagonal, MoveRule::Manhattan] {
            for speed in 1..=6 {
                for (tx, ty) in [(0, 0), (9, 9), (3, 7), (9, 0), (0, 4)] {
                    let target = p(tx, ty);
                    let mut g = Grid::new(10, 10);
                    let start = p(4, 2);
                    g.place(V0, start).unwrap();
                    let before = start.chebyshev(target);
                    let at = move_toward(&mut g, V0, target, speed, rule).unwrap();
                    let after = at.chebyshev(target);
                    assert!(after <= before, "moved away from target");
                    assert!(before - after <= speed, "closed more than speed");
                    if before <= speed && rule == MoveRule::Diagonal {
                        assert_eq!(at, target, "should land on target within speed");
                    }
                    if start.manhattan(target) <= speed {
                        assert_eq!(at, target);
                    }
                }
            }
        }
    }

    #[test]
    fn repeated_ticks_converge() {
        let mut g = Grid::new(20, 20);
        g.place(V0, p(0, 0)).unwrap();
        let target = p(13, 6);
        let mut ticks = 0;
        while g.position_of(V0) != Some(target) {
            move_toward(&mut g, V0, target, 2, MoveRule::Diagonal).unwrap();
            ticks += 1;
            assert!(ticks < 20);
        }
        // 13 Chebyshev cells at 2 cells/tick → 7 ticks
        assert_eq!(ticks, 7);
    }

    #[test]
    fn manhattan_rule_ticks_equal_manhattan_distance() {
        let mut g = Grid::new(10, 10);
        g.place(V0, p(0, 0)).unwrap();
        let target = p(5, 5);
        let mut ticks = 0;
        while g.position_of(V0) != Some(target) {
            move_toward(&mut g, V0, target, 1, MoveRule::Manhattan).unwrap();
            ticks += 1;
        }
        assert_eq!(ticks, 10);
    }

    #[test]
    fn out_of_bounds_target_rejected_before_moving() {
        let mut g = Grid::new(10, 10);
        g.place(V0, p(1, 1)).unwrap();
        let err = move_toward(&mut g, V0, p(10, 1), 1, MoveRule::Diagonal).unwrap_err();
        assert!(matches!(err, SpatialError::OutOfBounds { .. }));
        assert_eq!(g.position_of(V0), Some(p(1, 1)));
    }
}
