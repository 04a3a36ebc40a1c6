use std::time::Duration;

use reqwest::{Client, Url};

use kyori_core::{AppConfig, Geocoded, GeocodeError, Geocoder, GeoPoint};

use crate::error::NominatimError;
use crate::retry::retry_with_backoff;
use crate::types::NominatimPlace;

/// HTTP client for a Nominatim-style `search` endpoint.
///
/// Built once and reused for every query in a job. Use
/// [`NominatimClient::with_base_url`] to point at a mock server in tests.
pub struct NominatimClient {
    client: Client,
    base_url: Url,
    language: Option<String>,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl NominatimClient {
    /// Creates a client from the application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`NominatimError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`NominatimError::InvalidBaseUrl`] if the
    /// configured base URL does not parse.
    pub fn new(config: &AppConfig) -> Result<Self, NominatimError> {
        Self::with_base_url(
            &config.geocoder_base_url,
            config.request_timeout_secs,
            &config.user_agent,
            Some(&config.language),
            config.max_retries,
            config.retry_backoff_base_ms,
        )
    }

    /// Creates a client with an explicit base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Same conditions as [`NominatimClient::new`].
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        language: Option<&str>,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, NominatimError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let base_url = Url::parse(base_url).map_err(|e| NominatimError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            language: language.map(str::to_owned),
            max_retries,
            backoff_base_ms,
        })
    }

    /// Searches for the single best match of `query`.
    ///
    /// # Errors
    ///
    /// - [`NominatimError::NotFound`] — the service returned an empty list.
    /// - [`NominatimError::UnexpectedStatus`] — non-2xx status after retries.
    /// - [`NominatimError::Http`] — network failure after retries.
    /// - [`NominatimError::Deserialize`] — body does not match the expected
    ///   shape (not retried).
    pub async fn search(&self, query: &str) -> Result<NominatimPlace, NominatimError> {
        let url = self.build_url(query);

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let response = self.client.get(url.clone()).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(NominatimError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }

                let body = response.text().await?;
                let mut places: Vec<NominatimPlace> =
                    serde_json::from_str(&body).map_err(|e| NominatimError::Deserialize {
                        context: format!("search({query})"),
                        source: e,
                    })?;

                if places.is_empty() {
                    return Err(NominatimError::NotFound {
                        query: query.to_owned(),
                    });
                }
                Ok(places.swap_remove(0))
            }
        })
        .await
    }

    /// Builds the full request URL with percent-encoded query parameters.
    fn build_url(&self, query: &str) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", query);
            pairs.append_pair("format", "jsonv2");
            pairs.append_pair("limit", "1");
            if let Some(lang) = &self.language {
                pairs.append_pair("accept-language", lang);
            }
        }
        url
    }
}

impl Geocoder for NominatimClient {
    async fn geocode(&self, query: &str) -> Result<Geocoded, GeocodeError> {
        let place = match self.search(query).await {
            Ok(place) => place,
            Err(NominatimError::NotFound { .. }) => return Err(GeocodeError::NotFound),
            Err(e) => return Err(GeocodeError::Backend(e.to_string())),
        };

        // Nominatim sends coordinates as strings; a place whose coordinates
        // do not parse is treated as a backend fault, not as NotFound.
        let point = match (place.lat.parse::<f64>(), place.lon.parse::<f64>()) {
            (Ok(lat), Ok(lon)) => Some(
                GeoPoint::new(lat, lon)
                    .map_err(|e| GeocodeError::Backend(format!("bad coordinates: {e}")))?,
            ),
            _ => {
                return Err(GeocodeError::Backend(format!(
                    "unparseable coordinates ({}, {})",
                    place.lat, place.lon
                )))
            }
        };

        Ok(Geocoded {
            point,
            formatted_address: place.display_name,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
