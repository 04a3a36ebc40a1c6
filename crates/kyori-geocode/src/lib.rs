//! Nominatim-style HTTP geocoder.
//!
//! Turns free-text queries (hospital names, addresses, `"<postal> 日本"`)
//! into coordinates and formatted addresses. Transient failures are retried
//! with jittered exponential back-off; an empty result list is a clean
//! `NotFound`, never an error worth retrying.

mod client;
mod error;
mod retry;
mod types;

pub use client::NominatimClient;
pub use error::NominatimError;
pub use types::NominatimPlace;
