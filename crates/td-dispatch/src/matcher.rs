//! Vehicle selection for a single request.

use td_core::{Position, VehicleId};

/// Chooses one vehicle from the pool of vehicles still free this pass.
///
/// `pool` is in creation order.  Implementations return an index into
/// `pool`, or `None` to leave the request unserved this tick.
pub trait Matcher {
    fn select(&self, pickup: Position, pool: &[(VehicleId, Position)]) -> Option<usize>;
}

/// Exhaustive scan for the minimum Manhattan distance.  Ties go to the
/// earliest vehicle in the pool, i.e. the lowest creation id.
#[derive(Copy, Clone, Debug, Default)]
pub struct NearestIdle;

impl Matcher for NearestIdle {
    fn select(&self, pickup: Position, pool: &[(VehicleId, Position)]) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for (i, &(_, pos)) in pool.iter().enumerate() {
            let d = pos.manhattan(pickup);
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((i, d));
            }
        }
        best.map(|(i, _)| i)
    }
}
