//! Bounded page plan shared by the GraphQL aggregators
//!
//! Only the most recent slice of a long history is fetched: with total `T`,
//! page size `P` and budget `N`, pages start at `max(0, T - N*P)` and walk
//! forward in ascending timestamp order.

use super::error::AggregateError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;

pub const DEFAULT_PAGE_SIZE: u64 = 1000;
pub const DEFAULT_MAX_PAGES: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPlan {
    pub page_size: u64,
    pub max_pages: u64,
}

impl Default for FetchPlan {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl FetchPlan {
    pub fn new(page_size: u64, max_pages: u64) -> Self {
        Self {
            page_size: page_size.max(1),
            max_pages,
        }
    }

    pub fn start_offset(&self, total: u64) -> u64 {
        total.saturating_sub(self.max_pages.saturating_mul(self.page_size))
    }

    /// Walk pages from the start offset until an empty or unavailable page,
    /// or until the page budget runs out
    ///
    /// `fetch_page(offset)` returns `Ok(None)` when upstream had nothing to
    /// say (failed query or error reply); the records gathered so far are kept.
    pub async fn collect<T, F, Fut>(&self, total: u64, mut fetch_page: F) -> Result<Vec<T>, AggregateError>
    where
        F: FnMut(u64) -> Fut,
        Fut: Future<Output = Result<Option<Vec<T>>, AggregateError>>,
    {
        let mut records = Vec::new();
        let mut offset = self.start_offset(total);

        for page in 0..self.max_pages {
            match fetch_page(offset).await? {
                Some(batch) if !batch.is_empty() => {
                    log::debug!("   └─ page {} at offset {}: {} records", page + 1, offset, batch.len());
                    records.extend(batch);
                    offset += self.page_size;
                }
                Some(_) => break,
                None => {
                    log::warn!("⚠️  Page at offset {} unavailable, keeping {} records", offset, records.len());
                    break;
                }
            }
        }

        Ok(records)
    }
}

/// Read `data.<connection>.totalCount` from a GraphQL response
///
/// `None` when the query failed or the reply carries no count (an error
/// reply has `data: null`). Only an explicit `totalCount: 0` is zero.
pub fn total_count(response: Option<&Value>, connection: &str) -> Option<u64> {
    response?
        .get("data")?
        .get(connection)?
        .get("totalCount")?
        .as_u64()
}

/// Decode the list at `path` under `data`
///
/// `Ok(None)` when the reply is a GraphQL error (top-level `errors`, or
/// `data` missing or null) or the list itself is missing; such a page is
/// unavailable, not empty.
pub fn decode_list<T: DeserializeOwned>(
    response: &Value,
    path: &[&str],
    what: &'static str,
) -> Result<Option<Vec<T>>, AggregateError> {
    if has_errors(response) {
        return Ok(None);
    }

    let mut node = response.get("data");
    for key in path {
        node = node.and_then(|value| value.get(*key));
    }

    match node {
        None | Some(Value::Null) => Ok(None),
        Some(list) => Vec::<T>::deserialize(list)
            .map(Some)
            .map_err(|source| AggregateError::Malformed { what, source }),
    }
}

fn has_errors(response: &Value) -> bool {
    response.get("errors").is_some_and(|errors| !errors.is_null())
}
