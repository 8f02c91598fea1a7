use anyhow::Result;
use backoff::future::retry_notify;
use backoff::ExponentialBackoff;
use std::time::Duration;
use tracing::{info, warn};

/// Configuration for download retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub max_elapsed_time: Option<Duration>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(30),
            max_elapsed_time: Some(Duration::from_secs(60)),
        }
    }
}

impl RetryConfig {
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            initial_interval: Duration::from_secs(0),
            max_interval: Duration::from_secs(0),
            max_elapsed_time: Some(Duration::from_secs(0)),
        }
    }

    /// Create an exponential backoff from this configuration
    pub fn to_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_interval: self.initial_interval,
            max_interval: self.max_interval,
            max_elapsed_time: self.max_elapsed_time,
            ..Default::default()
        }
    }
}

/// Run `operation` until it succeeds, fails permanently, or runs out of attempts.
///
/// Errors rejected by [`is_retryable_error`] end the loop at once. The wait
/// between attempts grows exponentially as configured by `config`.
pub async fn with_retry<F, Fut, T>(
    operation_name: &str,
    config: &RetryConfig,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let attempts_allowed = config.max_retries + 1;
    let mut attempt = 0;

    let outcome = retry_notify(
        config.to_backoff(),
        || {
            attempt += 1;
            let current = attempt;
            let pending = operation();
            async move {
                pending
                    .await
                    .map_err(|e| classify(e, current, attempts_allowed))
            }
        },
        |e: anyhow::Error, wait: Duration| {
            warn!("{} failed ({}), next attempt in {:?}", operation_name, e, wait);
        },
    )
    .await;

    match &outcome {
        Ok(_) if attempt > 1 => info!("{} completed on attempt {}", operation_name, attempt),
        Err(e) if attempt > 1 => warn!("{} gave up after {} attempts: {}", operation_name, attempt, e),
        _ => {}
    }
    outcome
}

/// Decide whether a failed attempt may be repeated.
fn classify(error: anyhow::Error, attempt: u32, attempts_allowed: u32) -> backoff::Error<anyhow::Error> {
    if attempt < attempts_allowed && is_retryable_error(&error) {
        backoff::Error::transient(error)
    } else {
        backoff::Error::permanent(error)
    }
}

/// Whether a download failure is transient: timeouts, dropped connections, 5xx and 429
pub fn is_retryable_error(error: &anyhow::Error) -> bool {
    if let Some(reqwest_err) = error.downcast_ref::<reqwest::Error>() {
        return reqwest_err.is_timeout()
            || reqwest_err.is_connect()
            || reqwest_err
                .status()
                .map(|s| s.is_server_error() || s.as_u16() == 429)
                .unwrap_or(true);
    }

    if let Some(io_err) = error.downcast_ref::<std::io::Error>() {
        use std::io::ErrorKind;
        matches!(
            io_err.kind(),
            ErrorKind::ConnectionAborted
                | ErrorKind::ConnectionReset
                | ErrorKind::ConnectionRefused
                | ErrorKind::TimedOut
                | ErrorKind::Interrupted
                | ErrorKind::UnexpectedEof
        )
    } else {
        false
    }
}
