//! Native transfers touching an account (main endpoint)
//!
//! Transfers come nested under the account entity, each tagged with the
//! direction of the counterparty:
//! - `To` - the counterparty sent to us (`transfer.from` is the sender)
//! - `From` - we sent to the counterparty (`transfer.to` is the receiver)

use super::amount::planck_to_dot;
use super::error::AggregateError;
use super::fetch::{decode_list, total_count, FetchPlan};
use super::history::{bucketize, days_between, Chart, Interval};
use super::ranking::Tally;
use super::{newest_first, system_clock, Clock, SuccessRate};
use crate::registry::{AccountGuard, AccountRegistry, Slot, SlotSet};
use crate::upstream::{Endpoint, GraphqlClient};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

pub const TOP_BY_COUNT: usize = 10;
pub const TOP_BY_AMOUNT: usize = 5;

const COUNT_QUERY: &str = r#"
query ($public_key: String!, $direction: TransferDirection!) {
    transfersConnection(first: 0, orderBy: id_ASC, where: {account: {id_eq: $public_key}, direction_eq: $direction}) {
        totalCount
    }
}
"#;

const PAGE_QUERY: &str = r#"
query ($public_key: String!, $limit: Int!, $offset: Int!) {
    accounts(where: {id_eq: $public_key}, limit: 1, offset: 0) {
        transfers(limit: $limit, offset: $offset, orderBy: transfer_timestamp_ASC) {
            id
            direction
            transfer {
                blockNumber
                timestamp
                extrinsicHash
                amount
                success
                from {
                    publicKey
                }
                to {
                    publicKey
                }
            }
        }
    }
}
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferDirection {
    From,
    To,
}

impl TransferDirection {
    fn as_str(&self) -> &'static str {
        match self {
            TransferDirection::From => "From",
            TransferDirection::To => "To",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRef {
    pub public_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub block_number: u64,
    pub timestamp: DateTime<Utc>,
    pub extrinsic_hash: Option<String>,
    /// Planck units, decimal string
    pub amount: String,
    pub success: bool,
    pub from: AccountRef,
    pub to: AccountRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountTransfer {
    pub id: String,
    pub direction: TransferDirection,
    pub transfer: Transfer,
}

#[derive(Debug, Deserialize)]
struct AccountNode {
    #[serde(default)]
    transfers: Vec<AccountTransfer>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TotalTransfers {
    pub total_count: u64,
    pub received: u64,
    pub sent: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CounterpartyCount {
    pub public_id: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CounterpartyAmount {
    pub public_id: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Counterparties<E> {
    pub senders: Vec<E>,
    pub receivers: Vec<E>,
}

/// Top counterparties by number of transfers and by DOT moved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferRelationship {
    pub count: Counterparties<CounterpartyCount>,
    pub amount: Counterparties<CounterpartyAmount>,
}

impl TransferRelationship {
    pub fn from_transfers(transfers: &[AccountTransfer]) -> Result<Self, AggregateError> {
        let mut sender_counts: Tally<u64> = Tally::new();
        let mut receiver_counts: Tally<u64> = Tally::new();
        let mut sender_amounts: Tally<f64> = Tally::new();
        let mut receiver_amounts: Tally<f64> = Tally::new();

        for record in transfers {
            let amount = planck_to_dot(&record.transfer.amount)?;
            match record.direction {
                TransferDirection::To => {
                    let sender = &record.transfer.from.public_key;
                    sender_counts.count(sender);
                    sender_amounts.add(sender, amount);
                }
                TransferDirection::From => {
                    let receiver = &record.transfer.to.public_key;
                    receiver_counts.count(receiver);
                    receiver_amounts.add(receiver, amount);
                }
            }
        }

        let counts = |tally: &Tally<u64>| -> Vec<CounterpartyCount> {
            tally
                .top(TOP_BY_COUNT)
                .into_iter()
                .map(|(public_id, count)| CounterpartyCount { public_id, count })
                .collect()
        };
        let amounts = |tally: &Tally<f64>| -> Vec<CounterpartyAmount> {
            tally
                .top(TOP_BY_AMOUNT)
                .into_iter()
                .map(|(public_id, amount)| CounterpartyAmount { public_id, amount })
                .collect()
        };

        Ok(Self {
            count: Counterparties {
                senders: counts(&sender_counts),
                receivers: counts(&receiver_counts),
            },
            amount: Counterparties {
                senders: amounts(&sender_amounts),
                receivers: amounts(&receiver_amounts),
            },
        })
    }

    /// Distinct counterparties among the ranked entries
    pub fn counterparty_count(&self) -> usize {
        let mut seen: Vec<&str> = self
            .count
            .senders
            .iter()
            .chain(self.count.receivers.iter())
            .map(|entry| entry.public_id.as_str())
            .collect();
        seen.sort_unstable();
        seen.dedup();
        seen.len()
    }
}

/// Daily transfer counts from the first fetched day through today
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferHistory {
    pub timestamps: Vec<NaiveDate>,
    pub incoming_counts: Vec<u64>,
    pub outgoing_counts: Vec<u64>,
}

impl TransferHistory {
    pub fn from_transfers(transfers: &[AccountTransfer], today: NaiveDate) -> Self {
        let Some(first) = transfers.iter().map(|t| t.transfer.timestamp.date_naive()).min() else {
            return Self {
                timestamps: Vec::new(),
                incoming_counts: Vec::new(),
                outgoing_counts: Vec::new(),
            };
        };

        let mut daily: HashMap<NaiveDate, (u64, u64)> = HashMap::new();
        for record in transfers {
            let counts = daily.entry(record.transfer.timestamp.date_naive()).or_default();
            match record.direction {
                TransferDirection::To => counts.0 += 1,
                TransferDirection::From => counts.1 += 1,
            }
        }

        let last = daily.keys().copied().max().map_or(today, |latest| latest.max(today));
        let timestamps = days_between(first, last);
        let (incoming_counts, outgoing_counts): (Vec<u64>, Vec<u64>) = timestamps
            .iter()
            .map(|day| daily.get(day).copied().unwrap_or_default())
            .unzip();

        Self {
            timestamps,
            incoming_counts,
            outgoing_counts,
        }
    }

    /// Incoming/outgoing series regrouped by interval
    pub fn chart(&self, interval: Interval, today: NaiveDate) -> Chart<u64> {
        let incoming: Vec<_> = self.timestamps.iter().copied().zip(self.incoming_counts.iter().copied()).collect();
        let outgoing: Vec<_> = self.timestamps.iter().copied().zip(self.outgoing_counts.iter().copied()).collect();

        let incoming = bucketize(&incoming, interval, today);
        let outgoing = bucketize(&outgoing, interval, today);
        let labels = incoming.iter().map(|(end, _)| interval.label(*end)).collect();

        Chart::line(labels)
            .titled(format!("Transfers for {}", interval.as_str()))
            .with_series(Some("Incoming Transfers"), incoming.into_iter().map(|(_, count)| count).collect())
            .with_series(Some("Outgoing Transfers"), outgoing.into_iter().map(|(_, count)| count).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransfersSlot {
    TotalTransfers,
    RecentTransfers,
    TransferRelationship,
    TransferHistory,
    TransferSuccessRate,
}

#[derive(Debug, Default)]
pub struct TransfersSlots {
    total_transfers: Slot<TotalTransfers>,
    recent_transfers: Slot<Vec<AccountTransfer>>,
    transfer_relationship: Slot<TransferRelationship>,
    transfer_history: Slot<TransferHistory>,
    transfer_success_rate: Slot<SuccessRate>,
}

impl SlotSet for TransfersSlots {
    type Kind = TransfersSlot;

    fn has(&self, kind: TransfersSlot) -> bool {
        match kind {
            TransfersSlot::TotalTransfers => !self.total_transfers.is_vacant(),
            TransfersSlot::RecentTransfers => !self.recent_transfers.is_vacant(),
            TransfersSlot::TransferRelationship => !self.transfer_relationship.is_vacant(),
            TransfersSlot::TransferHistory => !self.transfer_history.is_vacant(),
            TransfersSlot::TransferSuccessRate => !self.transfer_success_rate.is_vacant(),
        }
    }
}

impl TransfersSlots {
    fn absent() -> Self {
        Self {
            total_transfers: Slot::Absent,
            recent_transfers: Slot::Absent,
            transfer_relationship: Slot::Absent,
            transfer_history: Slot::Absent,
            transfer_success_rate: Slot::Absent,
        }
    }

    pub fn derive(
        totals: TotalTransfers,
        transfers: &[AccountTransfer],
        today: NaiveDate,
    ) -> Result<Self, AggregateError> {
        Ok(Self {
            total_transfers: Slot::Filled(totals),
            recent_transfers: Slot::Filled(newest_first(transfers)),
            transfer_relationship: Slot::Filled(TransferRelationship::from_transfers(transfers)?),
            transfer_history: Slot::Filled(TransferHistory::from_transfers(transfers, today)),
            transfer_success_rate: Slot::Filled(SuccessRate::from_outcomes(
                transfers.iter().map(|t| t.transfer.success),
            )),
        })
    }
}

pub struct TransfersAggregator {
    graphql: Arc<GraphqlClient>,
    registry: AccountRegistry<TransfersSlots>,
    plan: FetchPlan,
    clock: Clock,
}

impl TransfersAggregator {
    pub fn new(graphql: Arc<GraphqlClient>, capacity: usize) -> Self {
        Self {
            graphql,
            registry: AccountRegistry::new("transfers", capacity),
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

    pub fn registry(&self) -> &AccountRegistry<TransfersSlots> {
        &self.registry
    }

    pub async fn has_slot(&self, account: &str, kind: TransfersSlot) -> bool {
        self.registry.has_slot(account, kind).await
    }

    pub async fn total_transfers(&self, account: &str) -> Result<Option<TotalTransfers>, AggregateError> {
        Ok(self.slots(account).await?.total_transfers.cloned())
    }

    pub async fn recent_transfers(&self, account: &str) -> Result<Option<Vec<AccountTransfer>>, AggregateError> {
        Ok(self.slots(account).await?.recent_transfers.cloned())
    }

    pub async fn transfer_relationship(
        &self,
        account: &str,
    ) -> Result<Option<TransferRelationship>, AggregateError> {
        Ok(self.slots(account).await?.transfer_relationship.cloned())
    }

    pub async fn transfer_history(&self, account: &str) -> Result<Option<TransferHistory>, AggregateError> {
        Ok(self.slots(account).await?.transfer_history.cloned())
    }

    pub async fn transfer_success_rate(&self, account: &str) -> Result<Option<SuccessRate>, AggregateError> {
        Ok(self.slots(account).await?.transfer_success_rate.cloned())
    }

    pub async fn transfer_history_chart(
        &self,
        account: &str,
        interval: Interval,
    ) -> Result<Option<Chart>, AggregateError> {
        let today = (self.clock)().date_naive();
        let guard = self.slots(account).await?;

        Ok(guard
            .transfer_history
            .get()
            .filter(|history| !history.timestamps.is_empty())
            .map(|history| history.chart(interval, today)))
    }

    async fn slots(&self, account: &str) -> Result<AccountGuard<TransfersSlots>, AggregateError> {
        let mut guard = self.registry.acquire(account).await;
        if guard.total_transfers.is_vacant() {
            self.populate(account, &mut guard).await?;
        }
        Ok(guard)
    }

    async fn count(&self, account: &str, direction: TransferDirection) -> Option<u64> {
        let variables = json!({
            "public_key": account,
            "direction": direction.as_str(),
        });
        let response = self.graphql.query(Endpoint::Main, COUNT_QUERY, variables).await;
        total_count(response.as_ref(), "transfersConnection")
    }

    async fn populate(&self, account: &str, slots: &mut TransfersSlots) -> Result<(), AggregateError> {
        log::info!("🔍 Fetching transfers for {}", account);

        let received = self.count(account, TransferDirection::To).await;
        let sent = self.count(account, TransferDirection::From).await;
        let (Some(received), Some(sent)) = (received, sent) else {
            log::warn!("⚠️  Transfer counts unavailable for {}", account);
            return Ok(());
        };

        let totals = TotalTransfers {
            total_count: received + sent,
            received,
            sent,
        };

        if totals.total_count == 0 {
            *slots = TransfersSlots::absent();
            return Ok(());
        }

        let transfers = self
            .plan
            .collect(totals.total_count, |offset| self.fetch_page(account, offset))
            .await?;
        if transfers.is_empty() {
            log::warn!(
                "⚠️  No transfer pages for {} (total {}), not caching",
                account,
                totals.total_count
            );
            return Ok(());
        }
        log::info!(
            "✅ {} of {} transfers fetched for {}",
            transfers.len(),
            totals.total_count,
            account
        );

        *slots = TransfersSlots::derive(totals, &transfers, (self.clock)().date_naive())?;
        Ok(())
    }

    async fn fetch_page(&self, account: &str, offset: u64) -> Result<Option<Vec<AccountTransfer>>, AggregateError> {
        let variables = json!({
            "public_key": account,
            "limit": self.plan.page_size,
            "offset": offset,
        });

        let Some(response) = self.graphql.query(Endpoint::Main, PAGE_QUERY, variables).await else {
            return Ok(None);
        };

        let accounts = decode_list::<AccountNode>(&response, &["accounts"], "transfer")?;
        Ok(accounts.map(|accounts| accounts.into_iter().next().map(|node| node.transfers).unwrap_or_default()))
    }
}
