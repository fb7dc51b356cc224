//! Deterministic simulation-level RNG wrapper.
//!
//! # Determinism strategy
//!
//! The whole run draws from one `SmallRng` seeded from `SimConfig::seed`.
//! Agents are stepped in a fixed order (vehicles by id, then requesters by
//! id), so the sequence of draws, and with it the run, is reproducible
//! from the seed alone.  A driver may also own the source and pass it in per
//! tick (`Sim::step_with`).

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::Position;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// The single injectable random source.
///
/// Used only from the simulation thread.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` for a side stream (e.g. initial placement).
    /// Consumes one draw from `self`.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Choose a random element from a slice.
    /// Returns `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }

    /// A uniformly random cell of a `width × height` grid.
    ///
    /// Both dimensions must be non-zero.
    pub fn cell(&mut self, width: u32, height: u32) -> Position {
        let x = self.0.gen_range(0..width) as i32;
        let y = self.0.gen_range(0..height) as i32;
        Position::new(x, y)
    }
}
