//! Top-level simulation configuration.

use crate::{CoreError, CoreResult};

/// Everything the simulation needs at construction.
///
/// Typically loaded from a JSON file by the application crate (enable the
/// `serde` feature) and passed to `td_sim::SimBuilder`.  Defaults match the
/// reference city model: a 140 × 170 grid with 50 taxis and 470 residents.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Grid width in cells.
    pub width: u32,

    /// Grid height in cells.
    pub height: u32,

    /// Fleet size at tick 0 (excludes extras added later).
    pub initial_vehicles: usize,

    /// Number of residents.  Each gets a distinct home cell, so this may not
    /// exceed `width * height`.
    pub initial_requesters: usize,

    /// Ticks between capacity reviews.
    pub ticks_per_day: u64,

    /// Cells a vehicle may traverse per tick.
    pub vehicle_speed: u32,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width:              140,
            height:             170,
            initial_vehicles:   50,
            initial_requesters: 470,
            ticks_per_day:      100,
            vehicle_speed:      1,
            seed:               42,
        }
    }
}

impl SimConfig {
    /// Reject malformed configurations before any tick runs.
    pub fn validate(&self) -> CoreResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CoreError::Config(format!(
                "grid dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > i32::MAX as u32 || self.height > i32::MAX as u32 {
            return Err(CoreError::Config(format!(
                "grid dimensions {}x{} exceed the coordinate range",
                self.width, self.height
            )));
        }
        if self.vehicle_speed == 0 {
            return Err(CoreError::Config("vehicle speed must be positive".into()));
        }
        if self.ticks_per_day == 0 {
            return Err(CoreError::Config("ticks_per_day must be positive".into()));
        }
        if self.initial_requesters as u64 > self.cell_count() {
            return Err(CoreError::Config(format!(
                "{} requesters cannot have distinct homes on a {}-cell grid",
                self.initial_requesters,
                self.cell_count()
            )));
        }
        Ok(())
    }

    /// Total number of grid cells.
    #[inline]
    pub fn cell_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}
