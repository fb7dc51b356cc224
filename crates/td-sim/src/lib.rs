//! `td-sim`: tick loop orchestrator for the taxi dispatch twin.
//!
//! # Tick loop
//!
//! ```text
//! each tick:
//!   ① Vehicles    ascending id: move toward target, then pick up / drop off
//!   ② Requesters  ascending id: visit countdown, return leg, new visits
//!   ③ Dispatch    one greedy pass over the request queue
//!   ④ Clock       advance
//!   ⑤ Capacity    if the new tick closes a day: retire extras, maybe add
//!                 more, reset the day's stats
//! ```
//!
//! Every random draw comes from one [`SimRng`](td_core::SimRng), either the
//! sim's own ([`Sim::step`]) or one passed in ([`Sim::step_with`]).  Given
//! the same config and seed a run is bit-for-bit reproducible.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use td_core::SimConfig;
//! use td_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(SimConfig::default()).build()?;
//! sim.run_days(30, &mut NoopObserver)?;
//! println!("{} rides", sim.totals.drop_offs);
//! ```

pub mod builder;
pub mod capacity;
pub mod error;
pub mod observer;
pub mod sim;
pub mod snapshot;


pub use builder::SimBuilder;
pub use capacity::{CapacityController, CapacityReport, FleetContext, RetirePolicy};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{SNAPSHOT_QUEUE_DEPTH, Sim, VISIT_PROBABILITY};
pub use snapshot::{LifetimeTotals, RequesterView, SimSnapshot, TickSummary, VehicleView};
