//! Subscan REST client
//!
//! POSTs to `<endpoint><path>` with the `x-api-key` header and follows
//! `Link: <url>; rel="next"` pagination.
//!
//! ## Result shape
//!
//! - `max_pages == Some(1)` → the first page verbatim (`Single`)
//! - one page fetched and no next link → that page verbatim (`Single`)
//! - otherwise pages are accumulated (`Collected`): array pages are
//!   concatenated, object pages appended
//!
//! HTTP failures never raise; the loop aborts and returns what was
//! accumulated so far. Network failures propagate as `UpstreamError`.

use super::backoff::RateLimitBackoff;
use super::transport::{HttpRequest, HttpTransport, UpstreamError};
use serde_json::Value;
use std::sync::Arc;

/// Payload returned by [`RestClient::make_request`]
#[derive(Debug, Clone, PartialEq)]
pub enum RestPayload {
    Single(Value),
    Collected(Vec<Value>),
}

impl RestPayload {
    /// The verbatim page, if exactly one was returned as-is
    pub fn into_single(self) -> Option<Value> {
        match self {
            RestPayload::Single(value) => Some(value),
            RestPayload::Collected(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RestPayload::Collected(items) if items.is_empty())
    }
}

pub struct RestClient {
    transport: Arc<dyn HttpTransport>,
    endpoint: String,
    api_key: String,
    default_backoff_secs: u64,
    max_rate_limit_retries: u32,
}

impl RestClient {
    pub fn new(transport: Arc<dyn HttpTransport>, endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            default_backoff_secs: 5,
            max_rate_limit_retries: 3,
        }
    }

    pub fn with_rate_limit(mut self, default_backoff_secs: u64, max_retries: u32) -> Self {
        self.default_backoff_secs = default_backoff_secs;
        self.max_rate_limit_retries = max_retries;
        self
    }

    /// Fetch up to `max_pages` pages (`None` = until the server stops linking)
    pub async fn make_request(
        &self,
        path: &str,
        query: &[(String, String)],
        body: &Value,
        max_pages: Option<usize>,
    ) -> Result<RestPayload, UpstreamError> {
        let first_url = format!("{}{}", self.endpoint, path);
        log::info!(". [=] Fetching data from REST API from {}", first_url);

        let mut next_url = Some(first_url);
        let mut collected: Vec<Value> = Vec::new();
        let mut pages_fetched = 0usize;
        let mut backoff = RateLimitBackoff::new(self.default_backoff_secs, self.max_rate_limit_retries);
        let budget = max_pages.map(|n| n.to_string()).unwrap_or_else(|| "∞".to_string());

        while let Some(url) = next_url.take() {
            if max_pages.is_some_and(|limit| pages_fetched >= limit) {
                break;
            }

            log::info!(". page {}/{} of {}", pages_fetched + 1, budget, url);

            // Next links already carry their own query string
            let request = HttpRequest {
                url: url.clone(),
                query: if pages_fetched == 0 { query.to_vec() } else { Vec::new() },
                headers: vec![
                    ("Accept".to_string(), "*/*".to_string()),
                    ("x-api-key".to_string(), self.api_key.clone()),
                ],
                body: body.clone(),
            };

            let response = self.transport.post_json(&request).await?;

            match response.status {
                200 => {
                    backoff.reset();
                    let page = response.json()?;
                    let following = response.header("link").and_then(parse_next_link);

                    if max_pages == Some(1) {
                        return Ok(RestPayload::Single(page));
                    }
                    if following.is_none() && pages_fetched == 0 {
                        return Ok(RestPayload::Single(page));
                    }

                    match page {
                        Value::Array(items) => collected.extend(items),
                        other => collected.push(other),
                    }

                    pages_fetched += 1;
                    next_url = following;
                }
                401 => {
                    log::error!(
                        " [-] Failed to retrieve from API. Status code: {} - {}. Please check your api key.",
                        response.status,
                        response.body
                    );
                    break;
                }
                404 => {
                    log::error!(
                        " [-] Failed to retrieve from API. Status code: {} - {}. Please check your endpoint.",
                        response.status,
                        response.body
                    );
                    break;
                }
                429 => {
                    log::warn!(" [-] Rate limit exceeded.");
                    if backoff.wait(response.header("retry-after")).await.is_err() {
                        log::error!(
                            " [-] Giving up on {} after {} rate-limit retries",
                            url,
                            backoff.attempts()
                        );
                        break;
                    }
                    next_url = Some(url);
                }
                500 | 502 | 503 | 504 => {
                    log::error!(
                        " [-] Failed to retrieve from API. Status code: {} - {}. Internal server error.",
                        response.status,
                        response.body
                    );
                    break;
                }
                other => {
                    log::error!(
                        " [-] Failed to retrieve from API. Status code: {} - {}",
                        other,
                        response.body
                    );
                    log::info!(" [#] Rest endpoint: {}", url);
                    log::info!(" [#] Variables: {:?}", query);
                    break;
                }
            }
        }

        Ok(RestPayload::Collected(collected))
    }
}

/// Extract the `rel="next"` target from an RFC 5988 `Link` header
pub fn parse_next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|part| {
        let mut pieces = part.split(';');
        let target = pieces.next()?.trim();
        let target = target.strip_prefix('<')?.strip_suffix('>')?;

        let is_next = pieces.any(|param| {
            let param = param.trim();
            match param.split_once('=') {
                Some((key, value)) => {
                    key.trim().eq_ignore_ascii_case("rel")
                        && value
                            .trim()
                            .trim_matches('"')
                            .split_whitespace()
                            .any(|rel| rel.eq_ignore_ascii_case("next"))
                }
                None => false,
            }
        });

        is_next.then(|| target.to_string())
    })
}
