//! Nominatim search response types.
//!
//! The `search` endpoint returns a JSON array of places; latitude and
//! longitude arrive as strings and are parsed downstream.

use serde::Deserialize;

/// One place in a Nominatim `search` response.
#[derive(Debug, Deserialize)]
pub struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
}
