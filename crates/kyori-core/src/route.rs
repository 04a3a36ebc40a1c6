//! Route outcomes, travel modes, and the contractual rounding rules.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Which resolution/evaluation backend a job runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Backend {
    /// Offline postal directory + great-circle distance. Distance only.
    OfflineHaversine,
    /// Online geocoding + routing service. Distance and duration.
    OnlineTransitRouting,
}

/// Travel mode passed through to the routing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    Driving,
    Transit,
    Walking,
    Bicycling,
}

impl Mode {
    /// Wire name used in routing request query strings.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Driving => "driving",
            Mode::Transit => "transit",
            Mode::Walking => "walking",
            Mode::Bicycling => "bicycling",
        }
    }
}

/// Departure time for schedule-dependent modes.
///
/// Transit providers reject schedule queries without a departure time, so
/// the engine defaults transit jobs to `Now` unless the job overrides it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepartureTime {
    Now,
    /// Seconds since the Unix epoch.
    Epoch(u64),
}

impl DepartureTime {
    #[must_use]
    pub fn as_wire(self) -> String {
        match self {
            DepartureTime::Now => "now".to_owned(),
            DepartureTime::Epoch(secs) => secs.to_string(),
        }
    }
}

/// Per-call routing parameters beyond the endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteParams {
    pub mode: Mode,
    pub language: Option<String>,
    pub departure_time: Option<DepartureTime>,
}

/// A routing endpoint: a coordinate or a free-text address.
///
/// When an origin resolves to both, the engine prefers the address — routing
/// providers snap addresses to the road/stop network better than raw
/// centroids.
#[derive(Debug, Clone, PartialEq)]
pub enum Waypoint {
    Point(GeoPoint),
    Address(String),
}

/// The first leg of the first route returned by a routing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leg {
    pub distance_m: u64,
    pub duration_s: u64,
}

/// Why a (row, destination) cell has no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteCause {
    /// Postal cell invalid, or the directory/geocoder had nothing for it.
    NoOrigin,
    /// The destination label never resolved.
    NoDestination,
    /// The backend answered with an empty route set.
    NoRouteFound,
    /// Transport, auth, quota, or timeout failure.
    BackendError,
    /// The job was cancelled before this cell was evaluated.
    Cancelled,
}

/// Outcome of one origin/destination evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RouteResult {
    Computed {
        /// Kilometres, rounded half-up to 2 decimals.
        distance_km: f64,
        /// Minutes, rounded to the nearest integer. Absent for the offline
        /// backend.
        duration_min: Option<u64>,
    },
    Unavailable(RouteCause),
}

impl RouteResult {
    /// Converts a backend leg to the user-visible result, applying the
    /// rounding contract.
    #[must_use]
    pub fn from_leg(leg: Leg) -> Self {
        RouteResult::Computed {
            distance_km: round_km(leg.distance_m),
            duration_min: Some(round_min(leg.duration_s)),
        }
    }

    /// A haversine result: distance only, already in raw kilometres.
    #[must_use]
    pub fn from_haversine(raw_km: f64) -> Self {
        RouteResult::Computed {
            distance_km: round_2dp(raw_km),
            duration_min: None,
        }
    }
}

/// Metres → kilometres, rounded half-up to 2 decimals.
#[must_use]
pub fn round_km(distance_m: u64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    round_2dp(distance_m as f64 / 1000.0)
}

/// Seconds → minutes, rounded half-up to the nearest integer.
#[must_use]
pub fn round_min(duration_s: u64) -> u64 {
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        (duration_s as f64 / 60.0).round() as u64
    }
}

/// Half-up rounding to 2 decimal places (`f64::round` is half-away-from-zero,
/// which coincides with half-up for the non-negative distances here).
#[must_use]
pub fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
