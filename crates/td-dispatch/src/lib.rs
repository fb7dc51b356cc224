//! `td-dispatch`: the pending-request queue and vehicle matching.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`queue`]      | `RequestEntry`, `RequestQueue` (ordered set)               |
//! | [`matcher`]    | `Matcher` trait, `NearestIdle` (Manhattan, scan order)     |
//! | [`dispatcher`] | `Dispatcher<M>`, `Assignment`, `DispatchOutcome`           |
//! | [`error`]      | `DispatchError`, `DispatchResult<T>`                       |
//!
//! # Dispatch pass
//!
//! ```text
//! pool = idle vehicles in creation order
//! loop:
//!   entry = queue.pop_min()            (None → done)
//!   requester not Waiting?             → discard (stale), continue
//!   pool empty?                        → push entry back, purge stale, stop
//!   vehicle = matcher.select(pool)     → bind, remove from pool
//! ```
//!
//! The pass is greedy: each request, in priority order, takes the nearest
//! vehicle still free.  It makes no attempt at a globally optimal matching.

pub mod dispatcher;
pub mod error;
pub mod matcher;
pub mod queue;

#[cfg(test)]
mod tests;

pub use dispatcher::{Assignment, DispatchOutcome, Dispatcher};
pub use error::{DispatchError, DispatchResult};
pub use matcher::{Matcher, NearestIdle};
pub use queue::{PRIORITY_BOOST, RequestEntry, RequestQueue};
