//! Per-job memoisation of origin, destination, and route resolutions.
//!
//! One external call at most per distinct key; failed resolutions and
//! `Unavailable` route results are cached exactly like successes so a broken
//! key cannot trigger a retry storm across rows.

use std::collections::HashMap;

use kyori_core::{GeoPoint, Mode, PostalKey, RouteCause, RouteResult};

/// A resolved origin or destination: always at least one of a coordinate and
/// a formatted address.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedPlace {
    Point(GeoPoint),
    Address(String),
    Both { point: GeoPoint, address: String },
}

impl ResolvedPlace {
    /// Builds a place from backend output; `None` when both parts are absent.
    #[must_use]
    pub fn from_parts(point: Option<GeoPoint>, address: Option<String>) -> Option<Self> {
        match (point, address) {
            (Some(point), Some(address)) => Some(Self::Both { point, address }),
            (Some(point), None) => Some(Self::Point(point)),
            (None, Some(address)) => Some(Self::Address(address)),
            (None, None) => None,
        }
    }

    #[must_use]
    pub fn point(&self) -> Option<GeoPoint> {
        match self {
            Self::Point(point) | Self::Both { point, .. } => Some(*point),
            Self::Address(_) => None,
        }
    }

    #[must_use]
    pub fn address(&self) -> Option<&str> {
        match self {
            Self::Address(address) | Self::Both { address, .. } => Some(address),
            Self::Point(_) => None,
        }
    }
}

/// Outcome of one resolution attempt, memoised per key.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Resolved(ResolvedPlace),
    /// Resolution failed; the cause flows into every dependent cell.
    Failed(RouteCause),
}

/// Route cache key: canonical origin key, verbatim destination label, mode.
type RouteKey = (String, String, Mode);

/// Running totals, logged at job end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// The only mutable state of a job run. Never shared across jobs.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    origins: HashMap<PostalKey, Resolution>,
    destinations: HashMap<String, Resolution>,
    routes: HashMap<RouteKey, RouteResult>,
    stats: CacheStats,
}

impl ResolutionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn origin(&mut self, key: &PostalKey) -> Option<Resolution> {
        Self::count(&mut self.stats, self.origins.get(key).cloned())
    }

    pub fn put_origin(&mut self, key: PostalKey, resolution: Resolution) {
        self.origins.insert(key, resolution);
    }

    pub fn destination(&mut self, label: &str) -> Option<Resolution> {
        Self::count(&mut self.stats, self.destinations.get(label).cloned())
    }

    pub fn put_destination(&mut self, label: &str, resolution: Resolution) {
        self.destinations.insert(label.to_owned(), resolution);
    }

    pub fn route(&mut self, origin_key: &str, label: &str, mode: Mode) -> Option<RouteResult> {
        let key = (origin_key.to_owned(), label.to_owned(), mode);
        Self::count(&mut self.stats, self.routes.get(&key).cloned())
    }

    pub fn put_route(&mut self, origin_key: &str, label: &str, mode: Mode, result: RouteResult) {
        self.routes
            .insert((origin_key.to_owned(), label.to_owned(), mode), result);
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    fn count<T>(stats: &mut CacheStats, value: Option<T>) -> Option<T> {
        if value.is_some() {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
        value
    }
}
