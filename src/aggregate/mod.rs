//! Per-account domain aggregators
//!
//! ## Fetch-all-then-derive
//!
//! Every GraphQL aggregator runs the same pass, once per account, while
//! holding that account's lock:
//!
//! ```text
//! totalCount query
//!     ↓ (0 → every slot Absent, no page queries)
//! FetchPlan::collect (offset = max(0, total - 3*1000), ascending)
//!     ↓
//! derive every slot from the full record set
//!     ↓
//! write all slots, read the requested one, unlock
//! ```
//!
//! A failed totalCount query caches nothing, so the next call retries.
//! Malformed records fail the pass with `AggregateError`.
//!
//! ## Module Organization
//!
//! - `extrinsics` - signed extrinsics, pallet distribution, activity
//! - `transfers` - transfer totals, counterparties, daily history
//! - `rewards` - staking rewards, validators, reward history
//! - `overview` - single-shot Subscan lookups (account, balances, identity)
//! - `fetch` / `history` / `ranking` / `amount` - shared building blocks

pub mod amount;
pub mod error;
pub mod extrinsics;
pub mod fetch;
pub mod history;
pub mod overview;
pub mod ranking;
pub mod rewards;
pub mod transfers;

pub use error::AggregateError;
pub use extrinsics::{ExtrinsicsAggregator, ExtrinsicsSlot};
pub use fetch::FetchPlan;
pub use history::{Chart, Interval};
pub use overview::{OverviewAggregator, OverviewSlot};
pub use rewards::{RewardsAggregator, RewardsSlot};
pub use transfers::{TransfersAggregator, TransfersSlot};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// Source of "now" (swappable for deterministic tests)
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

/// Number of newest records kept in the "recent" views
pub const RECENT_LIMIT: usize = 10;

/// Newest `RECENT_LIMIT` records of an ascending slice, newest first
pub fn newest_first<T: Clone>(ascending: &[T]) -> Vec<T> {
    ascending.iter().rev().take(RECENT_LIMIT).cloned().collect()
}

/// Success/failure split over a fetched slice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuccessRate {
    pub success_count: u64,
    pub failed_count: u64,
    /// Percentage, 0 when there are no records
    pub success_rate: f64,
}

impl SuccessRate {
    pub fn from_outcomes(outcomes: impl IntoIterator<Item = bool>) -> Self {
        let (mut success_count, mut failed_count) = (0u64, 0u64);
        for success in outcomes {
            if success {
                success_count += 1;
            } else {
                failed_count += 1;
            }
        }

        let total = success_count + failed_count;
        let success_rate = if total == 0 {
            0.0
        } else {
            success_count as f64 / total as f64 * 100.0
        };

        Self {
            success_count,
            failed_count,
            success_rate,
        }
    }
}
