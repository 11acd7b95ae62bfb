//! Extrinsics signed by an account (explorer endpoint)

use super::error::AggregateError;
use super::fetch::{decode_list, total_count, FetchPlan};
use super::history::{activity_chart, bucketize, Chart, Interval};
use super::ranking::Tally;
use super::{newest_first, system_clock, Clock, SuccessRate};
use crate::registry::{AccountGuard, AccountRegistry, Slot, SlotSet};
use crate::upstream::{Endpoint, GraphqlClient};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Window counted by the transaction-rate view
pub const TRANSACTION_RATE_WINDOW_DAYS: i64 = 120;

/// Pallets (and calls per pallet) kept by the top-interacted view
pub const TOP_INTERACTED_LIMIT: usize = 5;

const TOTAL_COUNT_QUERY: &str = r#"
query ($public_key: String!) {
    extrinsicsConnection(first: 0, orderBy: id_ASC, where: {signerPublicKey_eq: $public_key}) {
        totalCount
    }
}
"#;

const PAGE_QUERY: &str = r#"
query ($public_key: String!, $limit: Int!, $offset: Int!) {
    extrinsics(limit: $limit, offset: $offset, orderBy: timestamp_ASC, where: {signerPublicKey_eq: $public_key}) {
        id
        success
        timestamp
        mainCall {
            callName
            palletName
        }
    }
}
"#;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainCall {
    pub call_name: String,
    pub pallet_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extrinsic {
    pub id: String,
    pub success: bool,
    pub timestamp: DateTime<Utc>,
    pub main_call: MainCall,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallCount {
    pub call_name: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PalletUsage {
    pub total: u64,
    /// Calls in the order they were first seen
    pub call_names: Vec<CallCount>,
}

impl PalletUsage {
    pub fn call_count(&self, call_name: &str) -> u64 {
        self.call_names
            .iter()
            .find(|call| call.call_name == call_name)
            .map_or(0, |call| call.count)
    }
}

/// Per-pallet call counts, pallets ranked by total (ties in encounter order)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub ranking: Vec<String>,
    pub pallets: BTreeMap<String, PalletUsage>,
}

impl Distribution {
    pub fn from_extrinsics(extrinsics: &[Extrinsic]) -> Self {
        PalletTallies::scan(extrinsics).distribution()
    }
}

/// A most-used pallet with its most-used calls, both ranked by count
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopPallet {
    pub pallet_name: String,
    pub total: u64,
    pub calls: Vec<CallCount>,
}

struct PalletTallies {
    totals: Tally<u64>,
    calls: HashMap<String, Tally<u64>>,
}

impl PalletTallies {
    fn scan(extrinsics: &[Extrinsic]) -> Self {
        let mut totals: Tally<u64> = Tally::new();
        let mut calls: HashMap<String, Tally<u64>> = HashMap::new();

        for extrinsic in extrinsics {
            let call = &extrinsic.main_call;
            totals.count(&call.pallet_name);
            calls
                .entry(call.pallet_name.clone())
                .or_default()
                .count(&call.call_name);
        }

        Self { totals, calls }
    }

    fn calls_of(&self, pallet: &str) -> Option<&Tally<u64>> {
        self.calls.get(pallet)
    }

    fn distribution(&self) -> Distribution {
        let pallets = self
            .totals
            .entries()
            .iter()
            .map(|(pallet, total)| {
                let call_names = self
                    .calls_of(pallet)
                    .map(|calls| call_counts(calls.entries().to_vec()))
                    .unwrap_or_default();
                (pallet.clone(), PalletUsage { total: *total, call_names })
            })
            .collect();

        Distribution {
            ranking: self.totals.ranked().into_iter().map(|(pallet, _)| pallet).collect(),
            pallets,
        }
    }

    fn top_interacted(&self, limit: usize) -> Vec<TopPallet> {
        self.totals
            .top(limit)
            .into_iter()
            .map(|(pallet_name, total)| {
                let calls = self
                    .calls_of(&pallet_name)
                    .map(|calls| call_counts(calls.top(limit)))
                    .unwrap_or_default();
                TopPallet {
                    pallet_name,
                    total,
                    calls,
                }
            })
            .collect()
    }
}

fn call_counts(entries: Vec<(String, u64)>) -> Vec<CallCount> {
    entries
        .into_iter()
        .map(|(call_name, count)| CallCount { call_name, count })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityPoint {
    pub date: String,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtrinsicsSlot {
    TotalExtrinsics,
    Extrinsics,
    RecentExtrinsics,
    WeeklyTransactionRate,
    Distribution,
    TopInteracted,
    SuccessRate,
}

#[derive(Debug, Default)]
pub struct ExtrinsicsSlots {
    total_extrinsics: Slot<u64>,
    extrinsics: Slot<Vec<Extrinsic>>,
    recent_extrinsics: Slot<Vec<Extrinsic>>,
    weekly_transaction_rate: Slot<u64>,
    distribution: Slot<Distribution>,
    top_interacted: Slot<Vec<TopPallet>>,
    success_rate: Slot<SuccessRate>,
}

impl SlotSet for ExtrinsicsSlots {
    type Kind = ExtrinsicsSlot;

    fn has(&self, kind: ExtrinsicsSlot) -> bool {
        match kind {
            ExtrinsicsSlot::TotalExtrinsics => !self.total_extrinsics.is_vacant(),
            ExtrinsicsSlot::Extrinsics => !self.extrinsics.is_vacant(),
            ExtrinsicsSlot::RecentExtrinsics => !self.recent_extrinsics.is_vacant(),
            ExtrinsicsSlot::WeeklyTransactionRate => !self.weekly_transaction_rate.is_vacant(),
            ExtrinsicsSlot::Distribution => !self.distribution.is_vacant(),
            ExtrinsicsSlot::TopInteracted => !self.top_interacted.is_vacant(),
            ExtrinsicsSlot::SuccessRate => !self.success_rate.is_vacant(),
        }
    }
}

impl ExtrinsicsSlots {
    fn absent() -> Self {
        Self {
            total_extrinsics: Slot::Absent,
            extrinsics: Slot::Absent,
            recent_extrinsics: Slot::Absent,
            weekly_transaction_rate: Slot::Absent,
            distribution: Slot::Absent,
            top_interacted: Slot::Absent,
            success_rate: Slot::Absent,
        }
    }

    /// Every view from one fetched slice (ascending by timestamp)
    pub fn derive(total: u64, extrinsics: Vec<Extrinsic>, now: DateTime<Utc>) -> Self {
        let window_start = now - Duration::days(TRANSACTION_RATE_WINDOW_DAYS);
        let recent_count = extrinsics
            .iter()
            .filter(|extrinsic| extrinsic.timestamp >= window_start)
            .count() as u64;
        let pallets = PalletTallies::scan(&extrinsics);

        Self {
            total_extrinsics: Slot::Filled(total),
            recent_extrinsics: Slot::Filled(newest_first(&extrinsics)),
            weekly_transaction_rate: Slot::Filled(recent_count),
            distribution: Slot::Filled(pallets.distribution()),
            top_interacted: Slot::Filled(pallets.top_interacted(TOP_INTERACTED_LIMIT)),
            success_rate: Slot::Filled(SuccessRate::from_outcomes(extrinsics.iter().map(|e| e.success))),
            extrinsics: Slot::Filled(extrinsics),
        }
    }
}

pub struct ExtrinsicsAggregator {
    graphql: Arc<GraphqlClient>,
    registry: AccountRegistry<ExtrinsicsSlots>,
    plan: FetchPlan,
    clock: Clock,
}

impl ExtrinsicsAggregator {
    pub fn new(graphql: Arc<GraphqlClient>, capacity: usize) -> Self {
        Self {
            graphql,
            registry: AccountRegistry::new("extrinsics", capacity),
            plan: FetchPlan::default(),
            clock: system_clock(),
        }
    }

    pub fn with_plan(mut self, plan: FetchPlan) -> Self {
        self.plan = plan;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn registry(&self) -> &AccountRegistry<ExtrinsicsSlots> {
        &self.registry
    }

    pub async fn has_slot(&self, account: &str, kind: ExtrinsicsSlot) -> bool {
        self.registry.has_slot(account, kind).await
    }

    /// Upstream totalCount, independent of the fetched slice
    pub async fn total_extrinsics(&self, account: &str) -> Result<Option<u64>, AggregateError> {
        Ok(self.slots(account).await?.total_extrinsics.cloned())
    }

    /// Fetched slice, ascending by timestamp
    pub async fn extrinsics(&self, account: &str) -> Result<Option<Vec<Extrinsic>>, AggregateError> {
        Ok(self.slots(account).await?.extrinsics.cloned())
    }

    pub async fn recent_extrinsics(&self, account: &str) -> Result<Option<Vec<Extrinsic>>, AggregateError> {
        Ok(self.slots(account).await?.recent_extrinsics.cloned())
    }

    /// Fetched extrinsics in the last 120 days (historical name)
    pub async fn weekly_transaction_rate(&self, account: &str) -> Result<Option<u64>, AggregateError> {
        Ok(self.slots(account).await?.weekly_transaction_rate.cloned())
    }

    pub async fn distribution(&self, account: &str) -> Result<Option<Distribution>, AggregateError> {
        Ok(self.slots(account).await?.distribution.cloned())
    }

    /// Top pallets by call count, each with its top calls
    pub async fn top_interacted(&self, account: &str) -> Result<Option<Vec<TopPallet>>, AggregateError> {
        Ok(self.slots(account).await?.top_interacted.cloned())
    }

    pub async fn success_rate(&self, account: &str) -> Result<Option<SuccessRate>, AggregateError> {
        Ok(self.slots(account).await?.success_rate.cloned())
    }

    /// Extrinsic counts per interval bucket, zero-filled to today
    pub async fn activity(&self, account: &str, interval: Interval) -> Result<Option<Chart>, AggregateError> {
        let today = (self.clock)().date_naive();
        let guard = self.slots(account).await?;

        let Some(extrinsics) = guard.extrinsics.get().filter(|list| !list.is_empty()) else {
            return Ok(None);
        };

        let points: Vec<_> = extrinsics.iter().map(|e| (e.timestamp.date_naive(), 1u64)).collect();
        Ok(Some(activity_chart(&bucketize(&points, interval, today), interval)))
    }

    /// Activity of a single call name, one point per bucket
    pub async fn call_activity(
        &self,
        account: &str,
        call_name: &str,
        interval: Interval,
    ) -> Result<Option<Vec<ActivityPoint>>, AggregateError> {
        let today = (self.clock)().date_naive();
        let guard = self.slots(account).await?;

        let Some(extrinsics) = guard.extrinsics.get().filter(|list| !list.is_empty()) else {
            return Ok(None);
        };

        let points: Vec<_> = extrinsics
            .iter()
            .filter(|e| e.main_call.call_name == call_name)
            .map(|e| (e.timestamp.date_naive(), 1u64))
            .collect();

        Ok(Some(
            bucketize(&points, interval, today)
                .into_iter()
                .map(|(end, count)| ActivityPoint {
                    date: interval.label(end),
                    count,
                })
                .collect(),
        ))
    }

    /// Lock the account and make sure its pass has run
    async fn slots(&self, account: &str) -> Result<AccountGuard<ExtrinsicsSlots>, AggregateError> {
        let mut guard = self.registry.acquire(account).await;
        if guard.total_extrinsics.is_vacant() {
            self.populate(account, &mut guard).await?;
        }
        Ok(guard)
    }

    async fn populate(&self, account: &str, slots: &mut ExtrinsicsSlots) -> Result<(), AggregateError> {
        log::info!("🔍 Fetching extrinsics for {}", account);

        let response = self
            .graphql
            .query(Endpoint::Explorer, TOTAL_COUNT_QUERY, json!({ "public_key": account }))
            .await;

        let Some(total) = total_count(response.as_ref(), "extrinsicsConnection") else {
            log::warn!("⚠️  Extrinsic count unavailable for {}", account);
            return Ok(());
        };

        if total == 0 {
            *slots = ExtrinsicsSlots::absent();
            return Ok(());
        }

        let extrinsics = self.plan.collect(total, |offset| self.fetch_page(account, offset)).await?;
        if extrinsics.is_empty() {
            log::warn!("⚠️  No extrinsic pages for {} (total {}), not caching", account, total);
            return Ok(());
        }
        log::info!("✅ {} of {} extrinsics fetched for {}", extrinsics.len(), total, account);

        *slots = ExtrinsicsSlots::derive(total, extrinsics, (self.clock)());
        Ok(())
    }

    async fn fetch_page(&self, account: &str, offset: u64) -> Result<Option<Vec<Extrinsic>>, AggregateError> {
        let variables = json!({
            "public_key": account,
            "limit": self.plan.page_size,
            "offset": offset,
        });

        match self.graphql.query(Endpoint::Explorer, PAGE_QUERY, variables).await {
            Some(response) => decode_list(&response, &["extrinsics"], "extrinsic"),
            None => Ok(None),
        }
    }
}
