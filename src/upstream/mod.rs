//! Upstream indexer clients
//!
//! - `rest` - Subscan REST API (page links, rate limits)
//! - `graphql` - Subsquid GraphQL endpoints (explorer, stats, main)
//! - `transport` - HTTP seam shared by both

pub mod backoff;
pub mod graphql;
pub mod rest;
pub mod transport;

pub use graphql::{Endpoint, GraphqlClient, GraphqlEndpoints};
pub use rest::{RestClient, RestPayload};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, UpstreamError};
