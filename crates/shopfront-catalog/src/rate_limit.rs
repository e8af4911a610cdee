//! Retry with exponential back-off and jitter for Storefront requests.
//!
//! Throttling (429), 5xx responses and network-level failures are retried.
//! Everything else (bad credentials, GraphQL errors, malformed bodies) is
//! returned on the first attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::CatalogError;

const MAX_DELAY_MS: u64 = 60_000;

/// Returns `true` if `err` is a transient condition worth another attempt.
pub(crate) fn is_retriable(err: &CatalogError) -> bool {
    match err {
        CatalogError::RateLimited { .. } => true,
        CatalogError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        CatalogError::UnexpectedStatus { status, .. } => (500..600).contains(status),
        CatalogError::Deserialize { .. }
        | CatalogError::GraphQl(_)
        | CatalogError::MissingData { .. }
        | CatalogError::InvalidShopDomain { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient
/// errors.
///
/// Sleeps `backoff_base_ms × 2^(attempt-1)` with ±25 % jitter between attempts,
/// capped at 60 s. A `Retry-After` carried by [`CatalogError::RateLimited`]
/// raises the delay to at least that many seconds (still capped).
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, CatalogError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CatalogError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let delay_ms = backoff_delay_ms(backoff_base_ms, attempt, &err);
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient storefront error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

fn backoff_delay_ms(backoff_base_ms: u64, attempt: u32, err: &CatalogError) -> u64 {
    let computed = backoff_base_ms.saturating_mul(1u64 << attempt.saturating_sub(1).min(10));
    let capped = computed.min(MAX_DELAY_MS);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;

    let floor_ms = match err {
        CatalogError::RateLimited {
            retry_after_secs, ..
        } => retry_after_secs.saturating_mul(1_000),
        _ => 0,
    };
    jittered.max(floor_ms).min(MAX_DELAY_MS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn rate_limited(retry_after_secs: u64) -> CatalogError {
        CatalogError::RateLimited {
            domain: "demo.myshopify.com".to_owned(),
            retry_after_secs,
        }
    }

    #[test]
    fn graphql_error_is_not_retriable() {
        assert!(!is_retriable(&CatalogError::GraphQl("bad query".to_owned())));
    }

    #[test]
    fn unauthorized_status_is_not_retriable() {
        assert!(!is_retriable(&CatalogError::UnexpectedStatus {
            status: 401,
            url: "https://demo.myshopify.com/api/2024-01/graphql.json".to_owned(),
        }));
    }

    #[test]
    fn server_error_status_is_retriable() {
        assert!(is_retriable(&CatalogError::UnexpectedStatus {
            status: 503,
            url: "https://demo.myshopify.com/api/2024-01/graphql.json".to_owned(),
        }));
    }

    #[test]
    fn rate_limited_is_retriable() {
        assert!(is_retriable(&rate_limited(1)));
    }

    #[test]
    fn retry_after_sets_a_floor_on_the_delay() {
        let delay = backoff_delay_ms(0, 1, &rate_limited(2));
        assert_eq!(delay, 2_000);
    }

    #[test]
    fn delay_is_capped() {
        let delay = backoff_delay_ms(u64::MAX, 10, &rate_limited(10_000));
        assert_eq!(delay, MAX_DELAY_MS);
    }

    #[tokio::test]
    async fn retries_on_rate_limited_then_succeeds() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                let n = cc.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(rate_limited(0))
                } else {
                    Ok::<u32, CatalogError>(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn propagates_last_error_after_exhausting_retries() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(2, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, CatalogError>(rate_limited(0))
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
        assert!(matches!(result, Err(CatalogError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn does_not_retry_missing_data() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, CatalogError>(CatalogError::MissingData {
                    context: "products".to_owned(),
                })
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(CatalogError::MissingData { .. })));
    }
}
