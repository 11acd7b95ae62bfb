//! Subsquid GraphQL client
//!
//! Three fixed endpoints (explorer, stats, main). A failed query is logged
//! with its endpoint, text and variables and surfaces as `None`; callers
//! treat that as "no data".

use super::transport::{HttpRequest, HttpTransport};
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Explorer,
    Stats,
    Main,
}

#[derive(Debug, Clone)]
pub struct GraphqlEndpoints {
    pub explorer: String,
    pub stats: String,
    pub main: String,
}

impl GraphqlEndpoints {
    pub fn url(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Explorer => &self.explorer,
            Endpoint::Stats => &self.stats,
            Endpoint::Main => &self.main,
        }
    }
}

pub struct GraphqlClient {
    transport: Arc<dyn HttpTransport>,
    endpoints: GraphqlEndpoints,
}

impl GraphqlClient {
    pub fn new(transport: Arc<dyn HttpTransport>, endpoints: GraphqlEndpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    /// Run a query and return the full response document (`{"data": ...}`)
    pub async fn query(&self, endpoint: Endpoint, query: &str, variables: Value) -> Option<Value> {
        let url = self.endpoints.url(endpoint).to_string();
        log::info!(". [=] Fetching data from Graphql API from {}", url);

        let mut request = HttpRequest {
            url,
            query: Vec::new(),
            headers: vec![("Accept".to_string(), "*/*".to_string())],
            body: json!({
                "query": query,
                "variables": variables,
            }),
        };

        let mut response = match self.transport.post_json(&request).await {
            Ok(response) => response,
            Err(e) => {
                log_failure(&request.url, query, &variables, &e.to_string());
                return None;
            }
        };

        if matches!(response.status, 301 | 302) {
            let Some(location) = response.header("location").map(str::to_string) else {
                log_failure(&request.url, query, &variables, "redirect without location");
                return None;
            };
            log::debug!(". [=] Following redirect to {}", location);

            request.url = location;
            response = match self.transport.post_json(&request).await {
                Ok(response) => response,
                Err(e) => {
                    log_failure(&request.url, query, &variables, &e.to_string());
                    return None;
                }
            };
        }

        if response.status != 200 {
            let reason = format!("Status code: {} - {}", response.status, response.body);
            log_failure(self.endpoints.url(endpoint), query, &variables, &reason);
            return None;
        }

        match response.json() {
            Ok(document) => Some(document),
            Err(e) => {
                log_failure(&request.url, query, &variables, &e.to_string());
                None
            }
        }
    }
}

fn log_failure(endpoint: &str, query: &str, variables: &Value, reason: &str) {
    log::error!(". [-] Failed to retrieve from API. {}", reason);
    log::info!(". [#] Graphql endpoint: {}", endpoint);
    log::info!(". [#] Query: {}", query.trim());
    log::info!(". [#] Variables: {}", variables);
}
