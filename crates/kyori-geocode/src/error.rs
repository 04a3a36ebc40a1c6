use thiserror::Error;

/// Errors returned by the Nominatim geocoder client.
#[derive(Debug, Error)]
pub enum NominatimError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-2xx status (auth, quota, 5xx).
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The service answered cleanly with zero results for the query.
    #[error("no geocoding result for {query:?}")]
    NotFound { query: String },

    /// The configured base URL is not parseable.
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
