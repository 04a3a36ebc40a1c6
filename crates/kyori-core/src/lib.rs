//! Shared domain types for the kyori distance pipeline.
//!
//! This crate holds everything the backend clients and the engine agree on:
//! the canonical postal key and its normaliser, the WGS-84 coordinate type
//! and great-circle kernel, the per-cell route outcome with its rounding
//! contract, the tabular model, the backend traits, and the env-driven
//! application configuration.

pub mod backend;
pub mod columns;
pub mod config;
pub mod geo;
pub mod postal;
pub mod route;
pub mod table;

pub use backend::{Geocoded, GeocodeError, Geocoder, PostalDirectory, PostalRecord, RoutingClient, RoutingError};
pub use columns::column_names_for;
pub use config::{AppConfig, ConfigError};
pub use geo::{GeoError, GeoPoint};
pub use postal::{normalize_postal, InvalidPostal, PostalKey};
pub use route::{Backend, DepartureTime, Leg, Mode, RouteCause, RouteParams, RouteResult, Waypoint};
pub use table::{AugmentedTable, CellValue, MemoryTable, TabularStore};
