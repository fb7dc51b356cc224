//! Finite-speed movement over the grid.
//!
//! A moving agent covers up to `speed` unit steps per tick:
//!
//! 1. If the Manhattan distance to the target is below `speed`, the agent is
//!    placed on the target directly (one grid placement).
//! 2. Otherwise it takes `speed` unit steps, stopping early on the target,
//!    and is re-placed on the grid after every step.
//!
//! Under [`MoveRule::Diagonal`] a unit step closes one cell on *each* axis
//! that still has an offset, so a tick reduces the Chebyshev distance by
//! `min(speed, distance)` and never overshoots.

use td_core::{AgentRef, Position};

use crate::{Grid, SpatialError, SpatialResult};

/// Geometry of a single unit step.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveRule {
    /// Close one cell on both axes at once while both offsets are non-zero.
    #[default]
    Diagonal,
    /// Close one cell on a single axis, larger remaining offset first
    /// (x on ties).
    Manhattan,
}

/// The cell one unit step from `from` toward `to`.  Returns `from` when the
/// two are equal.
pub fn unit_step(from: Position, to: Position, rule: MoveRule) -> Position {
    let dx = (to.x - from.x).signum();
    let dy = (to.y - from.y).signum();
    match rule {
        MoveRule::Diagonal => Position::new(from.x + dx, from.y + dy),
        MoveRule::Manhattan => {
            if from.x.abs_diff(to.x) >= from.y.abs_diff(to.y) {
                Position::new(from.x + dx, from.y)
            } else {
                Position::new(from.x, from.y + dy)
            }
        }
    }
}

/// Advance `agent` toward `target` for one tick and return its new cell.
///
/// The target is bounds-checked before any step is taken, so a failed call
/// leaves the agent where it was.
pub fn move_toward(
    grid:   &mut Grid,
    agent:  impl Into<AgentRef>,
    target: Position,
    speed:  u32,
    rule:   MoveRule,
) -> SpatialResult<Position> {
    let agent = agent.into();
    grid.check(target)?;
    let mut current = grid.position_of(agent).ok_or(SpatialError::NotPlaced(agent))?;
    if current == target {
        return Ok(current);
    }

    if current.manhattan(target) < speed {
        grid.move_to(agent, target)?;
        return Ok(target);
    }

    for _ in 0..speed {
        if current == target {
            break;
        }
        current = unit_step(current, target, rule);
        grid.move_to(agent, current)?;
    }
    Ok(current)
}
