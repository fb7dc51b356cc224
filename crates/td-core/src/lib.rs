//! `td-core`: foundational types for the taxi dispatch digital twin.
//!
//! This crate is a dependency of every other `td-*` crate.  It has no `td-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `VehicleId`, `RequesterId`, `AgentRef`                |
//! | [`geo`]         | `Position`, Manhattan / Chebyshev distance            |
//! | [`time`]        | `Tick`, `SimClock`, minute-based duration constants   |
//! | [`rng`]         | `SimRng` (the single injectable random source)        |
//! | [`config`]      | `SimConfig` + validation                              |
//! | [`stats`]       | `AggregateStats` (daily wait-time accumulators)       |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod stats;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::SimConfig;
pub use error::{CoreError, CoreResult};
pub use geo::Position;
pub use ids::{AgentRef, RequesterId, VehicleId};
pub use rng::SimRng;
pub use stats::AggregateStats;
pub use time::{HALF_HOUR_TICKS, ONE_HOUR_TICKS, SimClock, THREE_HOUR_TICKS, Tick};
