//! Backend capability traits consumed by the pipeline engine.
//!
//! Concrete clients live in their own crates (`kyori-postal`,
//! `kyori-geocode`, `kyori-routing`); the engine only sees these traits and
//! the narrow error taxonomies below, which map one-to-one onto cell-level
//! [`crate::RouteCause`] values.

use thiserror::Error;

use crate::geo::GeoPoint;
use crate::postal::PostalKey;
use crate::route::{Leg, RouteParams, Waypoint};

/// What the offline directory knows about one postal key.
///
/// All fields absent means the key is unknown; the lookup itself never fails.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PostalRecord {
    pub point: Option<GeoPoint>,
    pub prefecture: Option<String>,
    pub locality: Option<String>,
}

/// Read-only, in-process postal lookup. Deterministic; no network.
pub trait PostalDirectory {
    fn lookup(&self, key: &PostalKey) -> PostalRecord;
}

/// A geocoding hit: coordinate and/or formatted address, either may be
/// absent depending on what the backend returns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Geocoded {
    pub point: Option<GeoPoint>,
    pub formatted_address: Option<String>,
}

/// Geocoding failures as the engine distinguishes them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeocodeError {
    /// The backend answered cleanly with zero results.
    #[error("no geocoding result")]
    NotFound,

    /// Transport, auth, quota, or malformed-response failure.
    #[error("geocoding backend failure: {0}")]
    Backend(String),
}

/// Free-text geocoding. Must be idempotent for identical queries within one
/// job; the engine memoises calls on that assumption.
#[allow(async_fn_in_trait)]
pub trait Geocoder {
    async fn geocode(&self, query: &str) -> Result<Geocoded, GeocodeError>;
}

/// The canonical geocoder query for a postal key.
#[must_use]
pub fn postal_query(key: &PostalKey) -> String {
    format!("{key} 日本")
}

/// Routing failures as the engine distinguishes them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoutingError {
    /// The backend returned an empty route set.
    #[error("no route found")]
    NoRoute,

    /// Transport, auth, quota, or malformed-response failure.
    #[error("routing backend failure: {0}")]
    Backend(String),
}

/// Route evaluation between two endpoints.
///
/// Returns the first leg of the first route; the engine applies the rounding
/// contract. Identical argument tuples within one job are deduplicated by
/// the engine's cache.
#[allow(async_fn_in_trait)]
pub trait RoutingClient {
    async fn route(
        &self,
        origin: &Waypoint,
        destination: &Waypoint,
        params: &RouteParams,
    ) -> Result<Leg, RoutingError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postal_query_appends_country() {
        let key = PostalKey::parse("6068507").unwrap();
        assert_eq!(postal_query(&key), "6068507 日本");
    }

    #[test]
    fn postal_query_keeps_leading_zero() {
        let key = PostalKey::parse("0600042").unwrap();
        assert_eq!(postal_query(&key), "0600042 日本");
    }
}
