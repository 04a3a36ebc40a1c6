//! Directions-style HTTP routing client.
//!
//! Queries an external directions service for one route between an origin
//! and a destination (coordinate or address) in a given travel mode, and
//! reduces the response to the first leg of the first route: distance in
//! metres, duration in seconds. Everything beyond those two fields is
//! ignored.

mod client;
mod error;
mod retry;
mod types;

pub use client::DirectionsClient;
pub use error::DirectionsError;
pub use types::{DirectionsResponse, WireLeg, WireRoute, WireValue};
