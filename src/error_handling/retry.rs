//! Login retry strategy.

use std::time::Duration;
use tokio_retry::strategy::ExponentialBackoff;

use crate::config::{LOGIN_RETRY_FACTOR, LOGIN_RETRY_MAX_DELAY_SECS};

/// Creates the backoff schedule between login attempts.
///
/// Yields `max_attempts - 1` delays (the first attempt is not delayed):
/// `initial_delay_ms`, then doubling, capped at `LOGIN_RETRY_MAX_DELAY_SECS`.
/// An initial delay of zero retries immediately.
///
/// # Returns
///
/// A retry strategy iterator ready for use with `tokio_retry::RetryIf`.
pub fn get_login_retry_strategy(
    initial_delay_ms: u64,
    max_attempts: u32,
) -> impl Iterator<Item = Duration> {
    // ExponentialBackoff yields base^n * factor, so base carries the growth
    // and factor scales it to the requested first delay.
    ExponentialBackoff::from_millis(LOGIN_RETRY_FACTOR)
        .factor(initial_delay_ms.div_ceil(LOGIN_RETRY_FACTOR))
        .max_delay(Duration::from_secs(LOGIN_RETRY_MAX_DELAY_SECS))
        .take(max_attempts.saturating_sub(1) as usize)
}

/// Returns true for transport failures worth another attempt: timeouts,
/// connection failures, and 5xx/429 responses.
pub fn is_transient_http_error(error: &reqwest::Error) -> bool {
    if let Some(status) = error.status() {
        return status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS;
    }
    error.is_timeout() || error.is_connect() || error.is_request()
}
