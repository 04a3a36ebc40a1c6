//! Offline Japanese postal directory.
//!
//! A read-only lookup from 7-digit postal keys to centroid coordinates and
//! address fragments, backed by a bundled Japan-Post/GeoNames-style CSV
//! extract. Entirely in-process: loading happens once at construction and
//! lookups never touch the network.

mod directory;

pub use directory::{JpPostalDirectory, PostalDataError};
