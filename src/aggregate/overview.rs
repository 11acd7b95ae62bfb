//! Single-shot Subscan lookups for the overview page
//!
//! Each lookup is keyed by the account public key but queried by its SS58
//! address. Responses are cached as upstream returned them; a response whose
//! `data` is empty is reported as `None` and retried on the next call.

use super::error::AggregateError;
use super::{system_clock, Clock};
use crate::registry::{AccountRegistry, Slot, SlotSet};
use crate::upstream::RestClient;
use chrono::Months;
use serde_json::{json, Value};
use std::sync::Arc;

pub const BALANCE_HISTORY_MONTHS: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverviewSlot {
    Account,
    BalanceDistribution,
    Identity,
    BalanceStats,
    BalanceHistory,
}

impl OverviewSlot {
    fn path(&self) -> &'static str {
        match self {
            OverviewSlot::Account => "v2/scan/search",
            OverviewSlot::BalanceDistribution => "scan/multiChain/account",
            OverviewSlot::Identity => "scan/multiChain/identities",
            OverviewSlot::BalanceStats => "scan/multiChain/balance_value_stat",
            OverviewSlot::BalanceHistory => "scan/multiChain/balance_value_history",
        }
    }
}

#[derive(Debug, Default)]
pub struct OverviewSlots {
    account: Slot<Value>,
    balance_distribution: Slot<Value>,
    identity: Slot<Value>,
    balance_stats: Slot<Value>,
    balance_history: Slot<Value>,
}

impl OverviewSlots {
    fn slot_mut(&mut self, kind: OverviewSlot) -> &mut Slot<Value> {
        match kind {
            OverviewSlot::Account => &mut self.account,
            OverviewSlot::BalanceDistribution => &mut self.balance_distribution,
            OverviewSlot::Identity => &mut self.identity,
            OverviewSlot::BalanceStats => &mut self.balance_stats,
            OverviewSlot::BalanceHistory => &mut self.balance_history,
        }
    }

    fn slot(&self, kind: OverviewSlot) -> &Slot<Value> {
        match kind {
            OverviewSlot::Account => &self.account,
            OverviewSlot::BalanceDistribution => &self.balance_distribution,
            OverviewSlot::Identity => &self.identity,
            OverviewSlot::BalanceStats => &self.balance_stats,
            OverviewSlot::BalanceHistory => &self.balance_history,
        }
    }
}

impl SlotSet for OverviewSlots {
    type Kind = OverviewSlot;

    fn has(&self, kind: OverviewSlot) -> bool {
        !self.slot(kind).is_vacant()
    }
}

/// Python-style truthiness of a JSON value
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

pub struct OverviewAggregator {
    rest: Arc<RestClient>,
    registry: AccountRegistry<OverviewSlots>,
    clock: Clock,
}

impl OverviewAggregator {
    pub fn new(rest: Arc<RestClient>, capacity: usize) -> Self {
        Self {
            rest,
            registry: AccountRegistry::new("overview", capacity),
            clock: system_clock(),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn registry(&self) -> &AccountRegistry<OverviewSlots> {
        &self.registry
    }

    pub async fn has_slot(&self, account: &str, kind: OverviewSlot) -> bool {
        self.registry.has_slot(account, kind).await
    }

    /// Subscan search result for the address (`data.account`)
    pub async fn account(&self, account: &str, address: &str) -> Result<Option<Value>, AggregateError> {
        self.lookup(account, address, OverviewSlot::Account).await
    }

    /// Balances of the address across chains
    pub async fn balance_distribution(&self, account: &str, address: &str) -> Result<Option<Value>, AggregateError> {
        self.lookup(account, address, OverviewSlot::BalanceDistribution).await
    }

    pub async fn identity(&self, account: &str, address: &str) -> Result<Option<Value>, AggregateError> {
        self.lookup(account, address, OverviewSlot::Identity).await
    }

    pub async fn balance_stats(&self, account: &str, address: &str) -> Result<Option<Value>, AggregateError> {
        self.lookup(account, address, OverviewSlot::BalanceStats).await
    }

    /// Balance value over the trailing twelve months
    pub async fn balance_history(&self, account: &str, address: &str) -> Result<Option<Value>, AggregateError> {
        self.lookup(account, address, OverviewSlot::BalanceHistory).await
    }

    fn request_body(&self, kind: OverviewSlot, address: &str) -> Value {
        match kind {
            OverviewSlot::Account => json!({ "key": address }),
            OverviewSlot::BalanceHistory => {
                let end = (self.clock)().date_naive();
                let start = end
                    .checked_sub_months(Months::new(BALANCE_HISTORY_MONTHS))
                    .unwrap_or(end);
                json!({
                    "address": address,
                    "start": start.format("%Y-%m-%d").to_string(),
                    "end": end.format("%Y-%m-%d").to_string(),
                })
            }
            _ => json!({ "address": address }),
        }
    }

    async fn lookup(&self, account: &str, address: &str, kind: OverviewSlot) -> Result<Option<Value>, AggregateError> {
        let mut guard = self.registry.acquire(account).await;
        if !guard.slot(kind).is_vacant() {
            return Ok(guard.slot(kind).cloned());
        }

        let body = self.request_body(kind, address);
        let payload = self.rest.make_request(kind.path(), &[], &body, Some(1)).await?;

        let Some(data) = payload
            .into_single()
            .and_then(|mut page| page.get_mut("data").map(Value::take))
            .filter(is_truthy)
        else {
            log::warn!("⚠️  No {:?} data for {}", kind, address);
            return Ok(None);
        };

        let value = match kind {
            OverviewSlot::Account => data
                .get("account")
                .cloned()
                .ok_or(AggregateError::MissingField("data.account"))?,
            _ => data,
        };

        *guard.slot_mut(kind) = Slot::Filled(value.clone());
        Ok(Some(value))
    }
}
