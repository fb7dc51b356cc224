//! `td-agent`: the two agent kinds and their owning stores.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`vehicle`]     | `Vehicle`, `VehicleState`                                 |
//! | [`requester`]   | `Requester`, `RequesterState`, `Arrival`, `HostLink`      |
//! | [`store`]       | `VehicleStore` (creation-ordered), `RequesterStore`       |
//! | [`error`]       | `AgentError`, `AgentResult<T>`                            |
//!
//! Vehicles and requesters live in separate typed collections.  Every
//! cross-reference (a vehicle's assigned requester, a visitor's host) is an
//! id handle resolved through the owning store, never a pointer.
//!
//! The transitions here are the per-agent halves of each state change.
//! Anything that touches several agents or shared state (the grid, the
//! request queue, wait-time stats) is driven by `td-sim`.

pub mod error;
pub mod requester;
pub mod store;
pub mod vehicle;


pub use error::{AgentError, AgentResult};
pub use requester::{Arrival, HostLink, Requester, RequesterState};
pub use store::{RequesterStore, VehicleStore};
pub use vehicle::{Vehicle, VehicleState};
