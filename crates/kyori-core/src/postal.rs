//! Canonical Japanese postal keys and the cell normaliser.
//!
//! Postal columns arrive in the wild as strings with ASCII or full-width
//! hyphens ("606-8507", "６０６－８５０７"), as integers stripped of leading
//! zeros by spreadsheet tooling, or as floats because the column was read as
//! numeric. [`normalize_postal`] canonicalises all of these to exactly seven
//! ASCII digits or rejects the cell.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::table::CellValue;

/// The raw postal cell could not be canonicalised to seven digits.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidPostal {
    #[error("postal cell is empty")]
    Empty,

    #[error("postal cell {0:?} does not reduce to 7 digits")]
    NotSevenDigits(String),

    #[error("numeric postal cell {0} is not a plain integer in range")]
    BadNumeric(String),
}

/// A canonical 7-digit Japanese postal code.
///
/// Always exactly seven ASCII digits; leading zeros are significant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostalKey(String);

impl PostalKey {
    /// Accepts a string that is already exactly seven ASCII digits.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPostal::NotSevenDigits`] otherwise.
    pub fn parse(s: &str) -> Result<Self, InvalidPostal> {
        if s.len() == 7 && s.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(s.to_owned()))
        } else {
            Err(InvalidPostal::NotSevenDigits(s.to_owned()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PostalKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonicalises an arbitrary postal cell into a [`PostalKey`].
///
/// Null cells are invalid. Numeric cells are stringified in plain decimal
/// (floats must carry a zero fraction — pandas-style CSV readers often load
/// postal columns as floats). Every non-digit code point is then stripped
/// and the remainder must be exactly seven ASCII digits.
///
/// An integer that lost its leading zero upstream reduces to six digits and
/// is therefore rejected rather than silently padded.
///
/// # Errors
///
/// Returns an [`InvalidPostal`] describing why the cell was rejected.
pub fn normalize_postal(cell: &CellValue) -> Result<PostalKey, InvalidPostal> {
    let raw = match cell {
        CellValue::Null => return Err(InvalidPostal::Empty),
        CellValue::Int(i) => {
            if !(0..=9_999_999).contains(i) {
                return Err(InvalidPostal::BadNumeric(i.to_string()));
            }
            i.to_string()
        }
        CellValue::Float(f) => {
            // Accept only float cells that are really integers in range.
            #[allow(clippy::cast_possible_truncation)]
            if f.is_finite() && f.fract() == 0.0 && (0.0..=9_999_999.0).contains(f) {
                format!("{}", *f as i64)
            } else {
                return Err(InvalidPostal::BadNumeric(f.to_string()));
            }
        }
        CellValue::Text(s) => s.clone(),
    };

    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() && raw.trim().is_empty() {
        return Err(InvalidPostal::Empty);
    }
    PostalKey::parse(&digits).map_err(|_| InvalidPostal::NotSevenDigits(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_owned())
    }

    #[test]
    fn plain_seven_digits() {
        assert_eq!(normalize_postal(&text("6068507")).unwrap().as_str(), "6068507");
    }

    #[test]
    fn ascii_hyphen_is_stripped() {
        assert_eq!(normalize_postal(&text("606-8507")).unwrap().as_str(), "6068507");
    }

    #[test]
    fn full_width_hyphen_is_stripped() {
        assert_eq!(normalize_postal(&text("060－0042")).unwrap().as_str(), "0600042");
    }

    #[test]
    fn full_width_digits_do_not_canonicalise() {
        // Only ASCII digits survive stripping; a full-width prefix leaves
        // too few digits behind.
        assert!(normalize_postal(&text("６０６－8507")).is_err());
    }

    #[test]
    fn postal_mark_and_whitespace_are_stripped() {
        assert_eq!(
            normalize_postal(&text("〒 530-0001\t")).unwrap().as_str(),
            "5300001"
        );
    }

    #[test]
    fn leading_zero_preserved_in_text() {
        assert_eq!(normalize_postal(&text("060-0042")).unwrap().as_str(), "0600042");
    }

    #[test]
    fn integer_cell() {
        assert_eq!(
            normalize_postal(&CellValue::Int(6_068_507)).unwrap().as_str(),
            "6068507"
        );
    }

    #[test]
    fn integer_that_lost_its_leading_zero_is_invalid() {
        // 060-0042 read as the integer 600042: six digits, no way back.
        assert!(matches!(
            normalize_postal(&CellValue::Int(600_042)),
            Err(InvalidPostal::NotSevenDigits(_))
        ));
    }

    #[test]
    fn float_cell_with_zero_fraction() {
        assert_eq!(
            normalize_postal(&CellValue::Float(6_068_507.0)).unwrap().as_str(),
            "6068507"
        );
    }

    #[test]
    fn float_cell_with_fraction_is_invalid() {
        assert!(matches!(
            normalize_postal(&CellValue::Float(6_068_507.5)),
            Err(InvalidPostal::BadNumeric(_))
        ));
    }

    #[test]
    fn nan_float_is_invalid() {
        assert!(normalize_postal(&CellValue::Float(f64::NAN)).is_err());
    }

    #[test]
    fn null_cell_is_empty() {
        assert_eq!(normalize_postal(&CellValue::Null), Err(InvalidPostal::Empty));
    }

    #[test]
    fn blank_string_is_empty() {
        assert_eq!(normalize_postal(&text("")), Err(InvalidPostal::Empty));
        assert_eq!(normalize_postal(&text("   ")), Err(InvalidPostal::Empty));
    }

    #[test]
    fn non_numeric_text_is_invalid() {
        assert!(matches!(
            normalize_postal(&text("abc")),
            Err(InvalidPostal::NotSevenDigits(_))
        ));
    }

    #[test]
    fn too_many_digits_is_invalid() {
        assert!(normalize_postal(&text("12345678")).is_err());
    }

    #[test]
    fn hyphen_insertion_round_trip() {
        // Property 3 from the acceptance suite, sampled: inserting ASCII or
        // full-width hyphens anywhere in a zero-padded key must round-trip.
        for key in [0u32, 1, 600_042, 6_068_507, 9_999_999] {
            let padded = format!("{key:07}");
            for pos in 0..=padded.len() {
                for sep in ["-", "－", " "] {
                    let mut s = padded.clone();
                    s.insert_str(pos, sep);
                    assert_eq!(
                        normalize_postal(&text(&s)).unwrap().as_str(),
                        padded,
                        "failed for {s:?}"
                    );
                }
            }
        }
    }
}
