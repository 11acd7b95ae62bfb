use std::time::Duration;
use tokio::time::sleep;

/// Rate-limit backoff for HTTP 429 responses
///
/// Honors the server's `retry-after` when it parses, otherwise waits the
/// configured default. Consecutive waits are capped at `max_retries`.
#[derive(Debug)]
pub struct RateLimitBackoff {
    default_delay: u64,
    max_retries: u32,
    current_attempt: u32,
}

#[derive(Debug)]
pub struct MaxRetriesExceeded;

impl std::fmt::Display for MaxRetriesExceeded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Maximum rate-limit retries exceeded")
    }
}

impl std::error::Error for MaxRetriesExceeded {}

impl RateLimitBackoff {
    pub fn new(default_delay: u64, max_retries: u32) -> Self {
        Self {
            default_delay,
            max_retries,
            current_attempt: 0,
        }
    }

    /// Seconds to wait for a raw `retry-after` header value
    ///
    /// Only the delay-seconds form is understood; HTTP dates fall back to
    /// the default delay.
    pub fn delay_for(&self, retry_after: Option<&str>) -> u64 {
        retry_after
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(self.default_delay)
    }

    pub async fn wait(&mut self, retry_after: Option<&str>) -> Result<(), MaxRetriesExceeded> {
        if self.current_attempt >= self.max_retries {
            return Err(MaxRetriesExceeded);
        }

        if retry_after.is_some_and(|raw| raw.trim().parse::<u64>().is_err()) {
            log::warn!(
                "Unparseable retry-after '{}', using default backoff",
                retry_after.unwrap_or_default()
            );
        }

        let delay = self.delay_for(retry_after);

        log::warn!(
            "⏳ Rate limited, retry {} of {} in {}s ({} minutes)",
            self.current_attempt + 1,
            self.max_retries,
            delay,
            (delay as f64 / 60.0 * 100.0).round() / 100.0
        );

        sleep(Duration::from_secs(delay)).await;
        self.current_attempt += 1;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.current_attempt = 0;
    }

    pub fn attempts(&self) -> u32 {
        self.current_attempt
    }
}
