//! The batch geocoding-and-routing pipeline.
//!
//! Takes a validated [`JobSpec`] over a tabular input, resolves every row's
//! postal code to an origin and every destination label to a place, then
//! evaluates each (row, destination) pair — great-circle distance offline or
//! a routing backend online — and returns the input table with appended
//! distance (and duration) columns.
//!
//! Evaluation is sequential and row-major: external routing backends impose
//! per-second caps, so wall-clock is dominated by round trips, and the
//! per-job [`ResolutionCache`] is what keeps duplicate origins and repeated
//! (origin, destination) pairs from burning quota.

mod cache;
mod cancel;
mod job;
mod pipeline;

pub use cache::{CacheStats, ResolutionCache, ResolvedPlace, Resolution};
pub use cancel::CancelToken;
pub use job::{JobError, JobSpec};
pub use pipeline::{NoRouting, Pipeline};
