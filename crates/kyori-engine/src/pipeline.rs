//! Orchestration: resolve destinations, resolve each row's origin, evaluate
//! every (row, destination) pair, and assemble the augmented table.

use std::time::Duration;

use kyori_core::backend::postal_query;
use kyori_core::{
    column_names_for, normalize_postal, AppConfig, AugmentedTable, Backend, CellValue,
    DepartureTime, GeocodeError, Geocoded, Geocoder, Leg, Mode, PostalDirectory, PostalKey,
    RouteCause, RouteParams, RouteResult, RoutingClient, RoutingError, TabularStore, Waypoint,
};

use crate::cache::{Resolution, ResolutionCache, ResolvedPlace};
use crate::cancel::CancelToken;
use crate::job::{JobError, JobSpec};

/// Placeholder routing client for offline pipelines.
///
/// Never called: the offline backend computes distances locally, and the
/// online backend refuses to start without a real client.
pub struct NoRouting;

impl RoutingClient for NoRouting {
    async fn route(
        &self,
        _origin: &Waypoint,
        _destination: &Waypoint,
        _params: &RouteParams,
    ) -> Result<Leg, RoutingError> {
        Err(RoutingError::Backend("no routing client configured".to_owned()))
    }
}

/// The pipeline engine.
///
/// Holds pre-built backend capabilities; clients are constructed once by the
/// caller and injected, never re-created per call. Evaluation is sequential —
/// external backends impose request caps, and memoisation keeps repeated
/// origins and (origin, destination) pairs from issuing duplicate calls.
pub struct Pipeline<D, G, R> {
    directory: D,
    geocoder: G,
    routing: Option<R>,
    language: String,
    inter_request_delay_ms: u64,
}

impl<D, G> Pipeline<D, G, NoRouting>
where
    D: PostalDirectory,
    G: Geocoder,
{
    /// A pipeline for offline-haversine jobs only.
    pub fn offline(directory: D, geocoder: G, config: &AppConfig) -> Self {
        Self::new(directory, geocoder, None, config)
    }
}

impl<D, G, R> Pipeline<D, G, R>
where
    D: PostalDirectory,
    G: Geocoder,
    R: RoutingClient,
{
    pub fn new(directory: D, geocoder: G, routing: Option<R>, config: &AppConfig) -> Self {
        Self {
            directory,
            geocoder,
            routing,
            language: config.language.clone(),
            inter_request_delay_ms: config.inter_request_delay_ms,
        }
    }

    /// Runs a job with a fresh per-job cache.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::MissingRoutingClient`] for an online job without a
    /// routing client, or [`JobError::UnknownPostalColumn`] when `table` has
    /// no column with the job's postal header. Cell-level failures never
    /// abort the job.
    pub async fn run(
        &self,
        table: &dyn TabularStore,
        job: &JobSpec,
        cancel: &CancelToken,
    ) -> Result<AugmentedTable, JobError> {
        let mut cache = ResolutionCache::new();
        self.run_with_cache(table, job, &mut cache, cancel).await
    }

    /// Runs a job against a caller-supplied cache.
    ///
    /// A pre-populated cache is honoured: every cached key — including cached
    /// failures — skips its external call entirely.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Pipeline::run`].
    pub async fn run_with_cache(
        &self,
        table: &dyn TabularStore,
        job: &JobSpec,
        cache: &mut ResolutionCache,
        cancel: &CancelToken,
    ) -> Result<AugmentedTable, JobError> {
        if job.backend() == Backend::OnlineTransitRouting && self.routing.is_none() {
            return Err(JobError::MissingRoutingClient);
        }

        // The job may have been validated against a different table; resolve
        // the postal column by name so a stale index cannot read the wrong
        // column.
        let postal_col = table
            .column_index(job.postal_column())
            .ok_or_else(|| JobError::UnknownPostalColumn(job.postal_column().to_owned()))?;

        // Destinations first, in input order. A label that fails to resolve
        // keeps its columns; every cell in them ends up Unavailable.
        let mut dest_resolutions: Vec<Resolution> = Vec::with_capacity(job.destinations().len());
        for label in job.destinations() {
            let resolution = if let Some(cached) = cache.destination(label) {
                cached
            } else if cancel.is_cancelled() {
                Resolution::Failed(RouteCause::Cancelled)
            } else {
                let resolution = self.resolve_destination(label).await;
                cache.put_destination(label, resolution.clone());
                self.pause().await;
                resolution
            };
            dest_resolutions.push(resolution);
        }

        // Row-major evaluation keeps one origin warm across all destinations.
        let dest_count = job.destinations().len();
        let mut results: Vec<Vec<RouteResult>> = Vec::with_capacity(table.row_count());
        for row in 0..table.row_count() {
            if cancel.is_cancelled() {
                results.push(vec![RouteResult::Unavailable(RouteCause::Cancelled); dest_count]);
                continue;
            }

            let postal_cell = table.cell(row, postal_col);
            let (origin_key, origin) = match normalize_postal(postal_cell) {
                Ok(key) => {
                    let resolution = self.resolve_origin(&key, job.backend(), cache, cancel).await;
                    (Some(key), resolution)
                }
                Err(e) => {
                    tracing::debug!(row, error = %e, "postal cell rejected");
                    (None, Resolution::Failed(RouteCause::NoOrigin))
                }
            };

            let mut row_results = Vec::with_capacity(dest_count);
            for (label, dest) in job.destinations().iter().zip(&dest_resolutions) {
                let result = self
                    .evaluate_cell(origin_key.as_ref(), &origin, label, dest, job, cache, cancel)
                    .await;
                row_results.push(result);
            }
            results.push(row_results);
        }

        let stats = cache.stats();
        tracing::info!(
            rows = table.row_count(),
            destinations = dest_count,
            cache_hits = stats.hits,
            cache_misses = stats.misses,
            cancelled = cancel.is_cancelled(),
            "pipeline run complete"
        );

        Ok(Self::assemble(table, job, &results))
    }

    /// Resolves a destination label through the geocoder.
    async fn resolve_destination(&self, label: &str) -> Resolution {
        match self.geocoder.geocode(label).await {
            Ok(place) => Self::geocoded_to_resolution(place, RouteCause::NoDestination),
            Err(GeocodeError::NotFound) => Resolution::Failed(RouteCause::NoDestination),
            Err(GeocodeError::Backend(e)) => {
                tracing::warn!(label, error = %e, "destination geocoding failed");
                Resolution::Failed(RouteCause::BackendError)
            }
        }
    }

    /// Resolves a row origin, consulting the cache first.
    ///
    /// Offline jobs use the postal directory (no suspension); online jobs
    /// geocode `"<postal> 日本"`. Failures are cached like successes so a bad
    /// key is resolved at most once per job.
    async fn resolve_origin(
        &self,
        key: &PostalKey,
        backend: Backend,
        cache: &mut ResolutionCache,
        cancel: &CancelToken,
    ) -> Resolution {
        if let Some(cached) = cache.origin(key) {
            return cached;
        }
        if cancel.is_cancelled() {
            // Not cached: a cancelled lookup is not a resolution outcome.
            return Resolution::Failed(RouteCause::Cancelled);
        }

        let resolution = match backend {
            Backend::OfflineHaversine => {
                let record = self.directory.lookup(key);
                let address = match (&record.prefecture, &record.locality) {
                    (None, None) => None,
                    (p, l) => Some(format!(
                        "{}{}",
                        p.as_deref().unwrap_or(""),
                        l.as_deref().unwrap_or("")
                    )),
                };
                match ResolvedPlace::from_parts(record.point, address) {
                    Some(place) => Resolution::Resolved(place),
                    None => Resolution::Failed(RouteCause::NoOrigin),
                }
            }
            Backend::OnlineTransitRouting => {
                let outcome = match self.geocoder.geocode(&postal_query(key)).await {
                    Ok(place) => Self::geocoded_to_resolution(place, RouteCause::NoOrigin),
                    Err(GeocodeError::NotFound) => Resolution::Failed(RouteCause::NoOrigin),
                    Err(GeocodeError::Backend(e)) => {
                        tracing::warn!(key = %key, error = %e, "origin geocoding failed");
                        Resolution::Failed(RouteCause::BackendError)
                    }
                };
                self.pause().await;
                outcome
            }
        };

        cache.put_origin(key.clone(), resolution.clone());
        resolution
    }

    /// Computes one (row, destination) cell.
    #[allow(clippy::too_many_arguments)]
    async fn evaluate_cell(
        &self,
        origin_key: Option<&PostalKey>,
        origin: &Resolution,
        label: &str,
        dest: &Resolution,
        job: &JobSpec,
        cache: &mut ResolutionCache,
        cancel: &CancelToken,
    ) -> RouteResult {
        let (origin_place, dest_place) = match (origin, dest) {
            (Resolution::Failed(cause), _) => return RouteResult::Unavailable(*cause),
            (_, Resolution::Failed(cause)) => return RouteResult::Unavailable(*cause),
            (Resolution::Resolved(o), Resolution::Resolved(d)) => (o, d),
        };

        match job.backend() {
            Backend::OfflineHaversine => match (origin_place.point(), dest_place.point()) {
                (Some(a), Some(b)) => RouteResult::from_haversine(a.distance_km(b)),
                (None, _) => RouteResult::Unavailable(RouteCause::NoOrigin),
                (_, None) => RouteResult::Unavailable(RouteCause::NoDestination),
            },
            Backend::OnlineTransitRouting => {
                // Origin resolution succeeded, so the postal key exists.
                let Some(key) = origin_key else {
                    return RouteResult::Unavailable(RouteCause::NoOrigin);
                };
                if let Some(cached) = cache.route(key.as_str(), label, job.mode()) {
                    return cached;
                }
                if cancel.is_cancelled() {
                    return RouteResult::Unavailable(RouteCause::Cancelled);
                }
                let Some(routing) = self.routing.as_ref() else {
                    return RouteResult::Unavailable(RouteCause::BackendError);
                };

                let params = self.route_params(job);
                let result = match routing
                    .route(&Self::waypoint(origin_place), &Self::waypoint(dest_place), &params)
                    .await
                {
                    Ok(leg) => RouteResult::from_leg(leg),
                    Err(RoutingError::NoRoute) => {
                        RouteResult::Unavailable(RouteCause::NoRouteFound)
                    }
                    Err(RoutingError::Backend(e)) => {
                        tracing::warn!(key = %key, label, error = %e, "routing call failed");
                        RouteResult::Unavailable(RouteCause::BackendError)
                    }
                };
                cache.put_route(key.as_str(), label, job.mode(), result.clone());
                self.pause().await;
                result
            }
        }
    }

    fn route_params(&self, job: &JobSpec) -> RouteParams {
        // Transit schedules depend on departure time; providers reject the
        // query without one, so transit defaults to "now".
        let departure_time = job.departure_time().or_else(|| {
            (job.mode() == Mode::Transit).then_some(DepartureTime::Now)
        });
        RouteParams {
            mode: job.mode(),
            language: Some(
                job.language()
                    .map_or_else(|| self.language.clone(), str::to_owned),
            ),
            departure_time,
        }
    }

    /// Routing endpoints prefer the formatted address when both exist.
    fn waypoint(place: &ResolvedPlace) -> Waypoint {
        match place {
            ResolvedPlace::Address(address) | ResolvedPlace::Both { address, .. } => {
                Waypoint::Address(address.clone())
            }
            ResolvedPlace::Point(point) => Waypoint::Point(*point),
        }
    }

    fn geocoded_to_resolution(place: Geocoded, empty_cause: RouteCause) -> Resolution {
        match ResolvedPlace::from_parts(place.point, place.formatted_address) {
            Some(place) => Resolution::Resolved(place),
            None => Resolution::Failed(empty_cause),
        }
    }

    /// Materialises the appended columns and copies the input table.
    fn assemble(
        table: &dyn TabularStore,
        job: &JobSpec,
        results: &[Vec<RouteResult>],
    ) -> AugmentedTable {
        let mut appended: Vec<(String, Vec<CellValue>)> = Vec::new();
        for (d, label) in job.destinations().iter().enumerate() {
            let mut names = column_names_for(label, job.backend()).into_iter();

            let distance_cells = results
                .iter()
                .map(|row| match &row[d] {
                    RouteResult::Computed { distance_km, .. } => CellValue::Float(*distance_km),
                    RouteResult::Unavailable(_) => CellValue::Null,
                })
                .collect();
            appended.push((names.next().unwrap_or_default(), distance_cells));

            if job.backend() == Backend::OnlineTransitRouting {
                let duration_cells = results
                    .iter()
                    .map(|row| match &row[d] {
                        RouteResult::Computed {
                            duration_min: Some(min),
                            ..
                        } => {
                            #[allow(clippy::cast_possible_wrap)]
                            CellValue::Int(*min as i64)
                        }
                        _ => CellValue::Null,
                    })
                    .collect();
                appended.push((names.next().unwrap_or_default(), duration_cells));
            }
        }
        AugmentedTable::assemble(table, appended)
    }

    async fn pause(&self) {
        if self.inter_request_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.inter_request_delay_ms)).await;
        }
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
