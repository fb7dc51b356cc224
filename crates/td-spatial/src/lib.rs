//! `td-spatial`: the city grid and the movement model.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`grid`]     | `Grid`: bounded `Position → occupants` index              |
//! | [`movement`] | `MoveRule`, `unit_step`, `move_toward`                     |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                         |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                   |
//! |-----------|----------------------------------------------------------|
//! | `fx-hash` | Uses FxHash for the occupancy maps.                      |
//! | `serde`   | Derives `Serialize`/`Deserialize` on public types.       |

pub mod error;
pub mod grid;
pub mod movement;

#[cfg(test)]
mod tests;

pub use error::{SpatialError, SpatialResult};
pub use grid::Grid;
pub use movement::{MoveRule, move_toward, unit_step};
