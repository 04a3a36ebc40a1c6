//! Directions API response types.
//!
//! Only the envelope status and the per-leg `distance.value` /
//! `duration.value` fields are modelled; the core contract ignores the rest
//! of the response.

use serde::Deserialize;

/// Top-level directions response envelope.
#[derive(Debug, Deserialize)]
pub struct DirectionsResponse {
    pub status: String,
    #[serde(default)]
    pub routes: Vec<WireRoute>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// One candidate route.
#[derive(Debug, Deserialize)]
pub struct WireRoute {
    #[serde(default)]
    pub legs: Vec<WireLeg>,
}

/// One leg of a route.
#[derive(Debug, Deserialize)]
pub struct WireLeg {
    pub distance: WireValue,
    pub duration: WireValue,
}

/// A `{ "value": n }` field; `value` is metres or seconds.
#[derive(Debug, Deserialize)]
pub struct WireValue {
    pub value: u64,
}
