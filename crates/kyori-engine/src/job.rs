//! Immutable job description and its construction-time validation.

use thiserror::Error;

use kyori_core::{Backend, DepartureTime, Mode, TabularStore};

/// Fatal construction errors; nothing runs when these fire.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JobError {
    #[error("postal column {0:?} not present in the input table")]
    UnknownPostalColumn(String),

    #[error("no usable destination labels (all were blank)")]
    NoDestinations,

    #[error("the online routing backend requires a routing client")]
    MissingRoutingClient,
}

/// Immutable description of one pipeline run.
///
/// Validated against the input table at construction: the postal column must
/// exist and at least one destination label must be non-blank. Blank labels
/// are dropped silently; duplicate labels are kept (their columns share a
/// name and are emitted in order).
#[derive(Debug, Clone)]
pub struct JobSpec {
    postal_column: String,
    postal_column_index: usize,
    destinations: Vec<String>,
    backend: Backend,
    mode: Mode,
    language: Option<String>,
    departure_time: Option<DepartureTime>,
}

impl JobSpec {
    /// Builds a job over `table`.
    ///
    /// # Errors
    ///
    /// - [`JobError::UnknownPostalColumn`] if `postal_column` is not a column
    ///   of `table`.
    /// - [`JobError::NoDestinations`] if every destination label is blank.
    pub fn new(
        table: &dyn TabularStore,
        postal_column: &str,
        destinations: Vec<String>,
        backend: Backend,
    ) -> Result<Self, JobError> {
        let postal_column_index = table
            .column_index(postal_column)
            .ok_or_else(|| JobError::UnknownPostalColumn(postal_column.to_owned()))?;

        let destinations: Vec<String> = destinations
            .into_iter()
            .filter(|d| !d.trim().is_empty())
            .collect();
        if destinations.is_empty() {
            return Err(JobError::NoDestinations);
        }

        Ok(Self {
            postal_column: postal_column.to_owned(),
            postal_column_index,
            destinations,
            backend,
            mode: Mode::Transit,
            language: None,
            departure_time: None,
        })
    }

    /// Travel mode for the routing backend (default: transit).
    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Response language override; the engine default applies otherwise.
    #[must_use]
    pub fn with_language(mut self, language: &str) -> Self {
        self.language = Some(language.to_owned());
        self
    }

    /// Departure time override for schedule-dependent modes.
    #[must_use]
    pub fn with_departure_time(mut self, departure_time: DepartureTime) -> Self {
        self.departure_time = Some(departure_time);
        self
    }

    #[must_use]
    pub fn postal_column(&self) -> &str {
        &self.postal_column
    }

    #[must_use]
    pub fn postal_column_index(&self) -> usize {
        self.postal_column_index
    }

    /// Destination labels in user order, blanks already dropped.
    #[must_use]
    pub fn destinations(&self) -> &[String] {
        &self.destinations
    }

    #[must_use]
    pub fn backend(&self) -> Backend {
        self.backend
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    #[must_use]
    pub fn departure_time(&self) -> Option<DepartureTime> {
        self.departure_time
    }
}

#[cfg(test)]
mod tests {
    use kyori_core::{CellValue, MemoryTable};

    use super::*;

    fn table() -> MemoryTable {
        MemoryTable::new(
            vec!["id".into(), "郵便番号".into()],
            vec![vec![CellValue::Int(1), CellValue::Text("606-8507".into())]],
        )
    }

    #[test]
    fn valid_job_constructs() {
        let t = table();
        let job = JobSpec::new(
            &t,
            "郵便番号",
            vec!["H1".into()],
            Backend::OfflineHaversine,
        )
        .unwrap();
        assert_eq!(job.postal_column_index(), 1);
        assert_eq!(job.destinations(), &["H1"]);
        assert_eq!(job.mode(), Mode::Transit);
    }

    #[test]
    fn unknown_postal_column_is_fatal() {
        let t = table();
        let err = JobSpec::new(&t, "zip", vec!["H1".into()], Backend::OfflineHaversine)
            .unwrap_err();
        assert_eq!(err, JobError::UnknownPostalColumn("zip".into()));
    }

    #[test]
    fn blank_destinations_are_dropped() {
        let t = table();
        let job = JobSpec::new(
            &t,
            "郵便番号",
            vec![String::new(), "  ".into(), "H1".into()],
            Backend::OfflineHaversine,
        )
        .unwrap();
        assert_eq!(job.destinations(), &["H1"]);
    }

    #[test]
    fn all_blank_destinations_are_fatal() {
        let t = table();
        let err = JobSpec::new(
            &t,
            "郵便番号",
            vec![String::new(), "   ".into()],
            Backend::OfflineHaversine,
        )
        .unwrap_err();
        assert_eq!(err, JobError::NoDestinations);
    }

    #[test]
    fn duplicate_labels_are_kept_in_order() {
        let t = table();
        let job = JobSpec::new(
            &t,
            "郵便番号",
            vec!["H1".into(), "H1".into()],
            Backend::OnlineTransitRouting,
        )
        .unwrap();
        assert_eq!(job.destinations(), &["H1", "H1"]);
    }

    #[test]
    fn builder_overrides_apply() {
        let t = table();
        let job = JobSpec::new(&t, "郵便番号", vec!["H1".into()], Backend::OnlineTransitRouting)
            .unwrap()
            .with_mode(Mode::Walking)
            .with_language("en")
            .with_departure_time(DepartureTime::Epoch(1_700_000_000));
        assert_eq!(job.mode(), Mode::Walking);
        assert_eq!(job.language(), Some("en"));
        assert_eq!(job.departure_time(), Some(DepartureTime::Epoch(1_700_000_000)));
    }
}
