//! Exponential-backoff retry for the directions client.
//!
//! Transient transport failures and 5xx statuses are retried; application
//! level answers (`ZERO_RESULTS`, quota denials, malformed bodies) are
//! propagated immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::DirectionsError;

/// Returns `true` if `err` represents a transient condition worth retrying.
fn is_retriable(err: &DirectionsError) -> bool {
    match err {
        DirectionsError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        DirectionsError::UnexpectedStatus { status } => (500..600).contains(status),
        DirectionsError::ZeroResults
        | DirectionsError::Api { .. }
        | DirectionsError::Malformed(_)
        | DirectionsError::InvalidBaseUrl { .. } => false,
    }
}

/// Executes `operation` with exponential backoff on transient errors.
///
/// The delay before the n-th retry is `backoff_base_ms * 2^(n-1)`, capped
/// at 60 s. With `max_retries = 3` the operation runs at most 4 times.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, DirectionsError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DirectionsError>>,
{
    const MAX_DELAY_MS: u64 = 60_000;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let delay_ms = backoff_base_ms
                    .saturating_mul(1u64 << (attempt - 1).min(10))
                    .min(MAX_DELAY_MS);
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "directions transient error — retrying after backoff"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    #[test]
    fn zero_results_is_not_retriable() {
        assert!(!is_retriable(&DirectionsError::ZeroResults));
    }

    #[test]
    fn api_error_is_not_retriable() {
        assert!(!is_retriable(&DirectionsError::Api {
            status: "OVER_QUERY_LIMIT".to_owned(),
            message: "quota".to_owned(),
        }));
    }

    #[test]
    fn server_error_status_is_retriable() {
        assert!(is_retriable(&DirectionsError::UnexpectedStatus { status: 502 }));
        assert!(!is_retriable(&DirectionsError::UnexpectedStatus { status: 401 }));
    }

    #[tokio::test]
    async fn does_not_retry_zero_results() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(DirectionsError::ZeroResults)
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(DirectionsError::ZeroResults)));
    }

    #[tokio::test]
    async fn retries_transient_status_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                let attempt = c.fetch_add(1, Ordering::SeqCst) + 1;
                if attempt < 2 {
                    Err(DirectionsError::UnexpectedStatus { status: 503 })
                } else {
                    Ok(7u32)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
