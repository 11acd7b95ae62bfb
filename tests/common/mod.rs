//! Scripted upstream shared by the integration tests
//!
//! `ScriptedTransport` answers every POST through a handler closure and
//! records the request, so tests can assert on what was sent as well as
//! on what the clients made of the answers.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use dotlens::aggregate::Clock;
use dotlens::upstream::{GraphqlClient, GraphqlEndpoints, HttpRequest, HttpResponse, HttpTransport, UpstreamError};
use dotlens::Config;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const REST_ENDPOINT: &str = "http://rest.test/api/";
pub const EXPLORER_ENDPOINT: &str = "http://explorer.test/graphql";
pub const STATS_ENDPOINT: &str = "http://stats.test/graphql";
pub const MAIN_ENDPOINT: &str = "http://main.test/graphql";

type Handler = Box<dyn Fn(&HttpRequest) -> Result<HttpResponse, UpstreamError> + Send + Sync>;

pub struct ScriptedTransport {
    handler: Handler,
    requests: Mutex<Vec<HttpRequest>>,
    delay: Option<Duration>,
}

impl ScriptedTransport {
    pub fn new(handler: impl Fn(&HttpRequest) -> HttpResponse + Send + Sync + 'static) -> Self {
        Self::fallible(move |request| Ok(handler(request)))
    }

    pub fn fallible(
        handler: impl Fn(&HttpRequest) -> Result<HttpResponse, UpstreamError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Answer with `responses` in order, 500 once they run out
    pub fn sequence(responses: Vec<HttpResponse>) -> Self {
        let queue = Mutex::new(VecDeque::from(responses));
        Self::new(move |_| queue.lock().unwrap().pop_front().unwrap_or_else(|| status(500)))
    }

    /// Sleep before answering (tokio time, so paused clocks apply)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of GraphQL requests whose query text mentions `needle`
    pub fn queries_mentioning(&self, needle: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|request| query_text(request).contains(needle))
            .count()
    }

    /// `offset` variable of every page query mentioning `needle`
    pub fn page_offsets(&self, needle: &str) -> Vec<u64> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|request| query_text(request).contains(needle))
            .filter_map(|request| request.body["variables"]["offset"].as_u64())
            .collect()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn post_json(&self, request: &HttpRequest) -> Result<HttpResponse, UpstreamError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.handler)(request)
    }
}

pub fn query_text(request: &HttpRequest) -> &str {
    request.body["query"].as_str().unwrap_or_default()
}

pub fn status(status: u16) -> HttpResponse {
    HttpResponse {
        status,
        headers: HashMap::new(),
        body: String::new(),
    }
}

pub fn json_response(status: u16, body: Value) -> HttpResponse {
    HttpResponse {
        status,
        headers: HashMap::new(),
        body: body.to_string(),
    }
}

pub fn with_header(mut response: HttpResponse, name: &str, value: &str) -> HttpResponse {
    response.headers.insert(name.to_ascii_lowercase(), value.to_string());
    response
}

pub fn endpoints() -> GraphqlEndpoints {
    GraphqlEndpoints {
        explorer: EXPLORER_ENDPOINT.to_string(),
        stats: STATS_ENDPOINT.to_string(),
        main: MAIN_ENDPOINT.to_string(),
    }
}

pub fn graphql(transport: &Arc<ScriptedTransport>) -> Arc<GraphqlClient> {
    let transport: Arc<dyn HttpTransport> = transport.clone();
    Arc::new(GraphqlClient::new(transport, endpoints()))
}

pub fn test_config() -> Config {
    Config {
        subscan_api_key: "test-key".to_string(),
        rest_endpoint: REST_ENDPOINT.to_string(),
        explorer_endpoint: EXPLORER_ENDPOINT.to_string(),
        stats_endpoint: STATS_ENDPOINT.to_string(),
        main_endpoint: MAIN_ENDPOINT.to_string(),
        upstream_timeout_secs: 5,
        rate_limit_max_retries: 3,
        rate_limit_default_backoff_secs: 1,
        account_cache_capacity: 100,
        rust_log: "info".to_string(),
    }
}

pub fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

pub fn fixed_clock(now: DateTime<Utc>) -> Clock {
    Arc::new(move || now)
}
