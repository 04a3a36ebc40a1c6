use thiserror::Error;

/// Errors returned by the directions client.
#[derive(Debug, Error)]
pub enum DirectionsError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx HTTP status (auth, quota, 5xx).
    #[error("unexpected HTTP status {status} from directions service")]
    UnexpectedStatus { status: u16 },

    /// The service processed the request but found no route.
    #[error("no route between the requested endpoints")]
    ZeroResults,

    /// The service rejected the request at the application level
    /// (`REQUEST_DENIED`, `OVER_QUERY_LIMIT`, `INVALID_REQUEST`, ...).
    #[error("directions API error {status}: {message}")]
    Api { status: String, message: String },

    /// The response body could not be deserialized into the expected shape,
    /// or a route arrived without any leg.
    #[error("malformed directions response: {0}")]
    Malformed(String),

    /// The configured base URL is not parseable.
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
