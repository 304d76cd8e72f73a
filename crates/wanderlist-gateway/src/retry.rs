//! Retry with exponential back-off and jitter for provider calls.
//!
//! Provider quotas are tight, so only failures that a second attempt can fix
//! are retried. Everything else is returned on the first occurrence and left
//! to the caller's own bookkeeping (for flights, the per-route attempt cap).

use std::future::Future;
use std::time::Duration;

use crate::error::GatewayError;

const MAX_DELAY_MS: u64 = 30_000;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:** timeouts, connection failures, HTTP 429 and HTTP 5xx.
///
/// **Not retriable:** other 4xx statuses, malformed bodies, bad base URLs.
pub(crate) fn is_retriable(err: &GatewayError) -> bool {
    match err {
        GatewayError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        GatewayError::RateLimited { .. } => true,
        GatewayError::UnexpectedStatus { status, .. } => *status >= 500,
        GatewayError::Deserialize { .. } | GatewayError::InvalidBaseUrl { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// The n-th retry waits `backoff_base_ms × 2ⁿ⁻¹ ± 25 %`, capped at 30 s. A
/// 429 carrying `Retry-After` waits at least that long (same cap).
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, GatewayError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GatewayError>>,
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
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let jittered = (computed as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                let requested = match &err {
                    GatewayError::RateLimited {
                        retry_after_secs: Some(secs),
                        ..
                    } => secs.saturating_mul(1_000),
                    _ => 0,
                };
                let delay_ms = jittered.max(requested).min(MAX_DELAY_MS);
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "provider transient error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
