//! Incremental A* search over pathviz grids.
//!
//! The search is exposed as a step iterator so that a front end can animate
//! it cell by cell:
//!
//! - [`Search`] advances one step per `next()` and yields a [`SearchEvent`]
//!   (`Visited`, `PathCell`, then a terminal `Finished`).
//! - [`PathSearchEngine`] keeps at most one search alive and spaces its
//!   steps out with a [`Pacing`].
//! - [`run`] performs a whole search synchronously.
//!
//! Searches use 4-connected unit-cost moves with the [`manhattan`]
//! heuristic, and break `f`-score ties by open-list insertion order, so the
//! event sequence for a given board is fully deterministic.

mod astar;
mod distance;
mod engine;
mod error;
mod event;
mod neighbors;
mod pacing;
mod traits;

pub use astar::{Run, Search, run};
pub use distance::manhattan;
pub use engine::PathSearchEngine;
pub use error::{EndpointProblem, SearchError};
pub use event::{Outcome, SearchEvent};
pub use pacing::{DEFAULT_INTERVAL_MS, INTERVAL_STEP_MS, MIN_INTERVAL_MS, Pacing};
pub use traits::Board;
