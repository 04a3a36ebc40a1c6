//! CSV-backed implementation of [`PostalDirectory`].

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use kyori_core::{GeoPoint, PostalDirectory, PostalKey, PostalRecord};

/// Bundled extract of the Japan postal dataset.
const EMBEDDED_DATA: &str = include_str!("../data/jp_postal.csv");

#[derive(Debug, Error)]
pub enum PostalDataError {
    #[error("failed to read postal dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse postal dataset: {0}")]
    Csv(#[from] csv::Error),
}

/// One dataset row as it appears on disk.
#[derive(Debug, Deserialize)]
struct RawRow {
    postal_code: String,
    #[serde(default)]
    prefecture: Option<String>,
    #[serde(default)]
    locality: Option<String>,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
}

/// In-memory postal directory loaded from a CSV dataset.
///
/// Duplicate keys keep the first row seen; rows whose postal code is not a
/// valid 7-digit key are skipped with a warning.
pub struct JpPostalDirectory {
    records: HashMap<PostalKey, PostalRecord>,
}

impl JpPostalDirectory {
    /// Loads the bundled dataset.
    ///
    /// # Errors
    ///
    /// Returns [`PostalDataError::Csv`] if the bundled data fails to parse;
    /// this indicates a packaging defect rather than a runtime condition.
    pub fn from_embedded() -> Result<Self, PostalDataError> {
        Self::from_reader(EMBEDDED_DATA.as_bytes())
    }

    /// Loads a dataset from a CSV file on disk.
    ///
    /// # Errors
    ///
    /// Returns [`PostalDataError::Io`] if the file cannot be opened or
    /// [`PostalDataError::Csv`] on malformed rows.
    pub fn from_path(path: &Path) -> Result<Self, PostalDataError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Loads a dataset from any reader producing headered CSV.
    ///
    /// # Errors
    ///
    /// Returns [`PostalDataError::Csv`] on malformed rows.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PostalDataError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records: HashMap<PostalKey, PostalRecord> = HashMap::new();

        for row in csv_reader.deserialize::<RawRow>() {
            let row = row?;
            let Ok(key) = PostalKey::parse(&row.postal_code) else {
                tracing::warn!(postal_code = %row.postal_code, "skipping malformed dataset row");
                continue;
            };

            let point = match (row.latitude, row.longitude) {
                (Some(lat), Some(lon)) => match GeoPoint::new(lat, lon) {
                    Ok(p) => Some(p),
                    Err(e) => {
                        tracing::warn!(key = %key, error = %e, "dataset row has out-of-range coordinates");
                        None
                    }
                },
                _ => None,
            };

            // First row wins for duplicate keys.
            records.entry(key).or_insert(PostalRecord {
                point,
                prefecture: row.prefecture.filter(|s| !s.is_empty()),
                locality: row.locality.filter(|s| !s.is_empty()),
            });
        }

        tracing::debug!(entries = records.len(), "postal directory loaded");
        Ok(Self { records })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl PostalDirectory for JpPostalDirectory {
    fn lookup(&self, key: &PostalKey) -> PostalRecord {
        self.records.get(key).cloned().unwrap_or_default()
    }
}
