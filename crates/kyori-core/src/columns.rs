//! Deterministic output-column naming.
//!
//! Consumers locate result columns without re-deriving the rule: the names
//! come from this one function, in the order the cells are emitted.

use crate::route::Backend;

/// The appended column names for one destination label.
///
/// Offline backend: a single distance column. Online backend: distance then
/// duration. The label is used verbatim, so two destinations with identical
/// labels yield identically named columns (kept in order, never merged).
#[must_use]
pub fn column_names_for(label: &str, backend: Backend) -> Vec<String> {
    match backend {
        Backend::OfflineHaversine => vec![format!("{label}までの距離(km)")],
        Backend::OnlineTransitRouting => vec![
            format!("{label}までの距離(km)"),
            format!("{label}までの時間(min)"),
        ],
    }
}
