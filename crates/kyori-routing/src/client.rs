use std::time::Duration;

use reqwest::{Client, Url};

use kyori_core::{AppConfig, Leg, RouteParams, RoutingClient, RoutingError, Waypoint};

use crate::error::DirectionsError;
use crate::retry::retry_with_backoff;
use crate::types::DirectionsResponse;

/// HTTP client for a Google-Directions-style routing endpoint.
///
/// Holds the HTTP client, base URL, and API key; constructed once by the
/// caller and injected into the engine as a capability. Use
/// [`DirectionsClient::with_base_url`] to point at a mock server in tests.
pub struct DirectionsClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl DirectionsClient {
    /// Creates a client from the application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DirectionsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`DirectionsError::InvalidBaseUrl`] if the
    /// configured base URL does not parse.
    pub fn new(config: &AppConfig) -> Result<Self, DirectionsError> {
        Self::with_base_url(
            &config.routing_base_url,
            config.request_timeout_secs,
            &config.user_agent,
            config.routing_api_key.as_deref(),
            config.max_retries,
            config.retry_backoff_base_ms,
        )
    }

    /// Creates a client with an explicit base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Same conditions as [`DirectionsClient::new`].
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        api_key: Option<&str>,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, DirectionsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let base_url = Url::parse(base_url).map_err(|e| DirectionsError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.map(str::to_owned),
            max_retries,
            backoff_base_ms,
        })
    }

    /// Fetches directions and reduces them to the first leg of the first
    /// route.
    ///
    /// # Errors
    ///
    /// - [`DirectionsError::ZeroResults`] — the service found no route.
    /// - [`DirectionsError::Api`] — application-level rejection (quota,
    ///   denied key, invalid request).
    /// - [`DirectionsError::UnexpectedStatus`] / [`DirectionsError::Http`] —
    ///   transport failure after retries.
    /// - [`DirectionsError::Malformed`] — body does not match the expected
    ///   shape, or the first route has no leg.
    pub async fn first_leg(
        &self,
        origin: &Waypoint,
        destination: &Waypoint,
        params: &RouteParams,
    ) -> Result<Leg, DirectionsError> {
        let url = self.build_url(origin, destination, params);

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let response = self.client.get(url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(DirectionsError::UnexpectedStatus {
                        status: status.as_u16(),
                    });
                }

                let body = response.text().await?;
                let parsed: DirectionsResponse = serde_json::from_str(&body)
                    .map_err(|e| DirectionsError::Malformed(e.to_string()))?;

                match parsed.status.as_str() {
                    "OK" => {}
                    "ZERO_RESULTS" => return Err(DirectionsError::ZeroResults),
                    other => {
                        return Err(DirectionsError::Api {
                            status: other.to_owned(),
                            message: parsed.error_message.unwrap_or_default(),
                        })
                    }
                }

                // An OK envelope with no routes is treated like ZERO_RESULTS;
                // some providers emit that combination.
                let Some(route) = parsed.routes.first() else {
                    return Err(DirectionsError::ZeroResults);
                };
                let Some(leg) = route.legs.first() else {
                    return Err(DirectionsError::Malformed(
                        "first route has no legs".to_owned(),
                    ));
                };

                Ok(Leg {
                    distance_m: leg.distance.value,
                    duration_s: leg.duration.value,
                })
            }
        })
        .await
    }

    /// Builds the request URL with percent-encoded query parameters.
    fn build_url(&self, origin: &Waypoint, destination: &Waypoint, params: &RouteParams) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("origin", &waypoint_param(origin));
            pairs.append_pair("destination", &waypoint_param(destination));
            pairs.append_pair("mode", params.mode.as_str());
            if let Some(lang) = &params.language {
                pairs.append_pair("language", lang);
            }
            if let Some(dep) = params.departure_time {
                pairs.append_pair("departure_time", &dep.as_wire());
            }
            if let Some(key) = &self.api_key {
                pairs.append_pair("key", key);
            }
        }
        url
    }
}

/// Wire form of a waypoint: `"lat,lon"` for coordinates, the address verbatim
/// otherwise.
fn waypoint_param(waypoint: &Waypoint) -> String {
    match waypoint {
        Waypoint::Point(p) => format!("{},{}", p.lat, p.lon),
        Waypoint::Address(a) => a.clone(),
    }
}

impl RoutingClient for DirectionsClient {
    async fn route(
        &self,
        origin: &Waypoint,
        destination: &Waypoint,
        params: &RouteParams,
    ) -> Result<Leg, RoutingError> {
        match self.first_leg(origin, destination, params).await {
            Ok(leg) => Ok(leg),
            Err(DirectionsError::ZeroResults) => Err(RoutingError::NoRoute),
            Err(e) => Err(RoutingError::Backend(e.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
