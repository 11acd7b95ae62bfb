//! Staking rewards paid to an account (main endpoint)

use super::amount::planck_to_dot;
use super::error::AggregateError;
use super::fetch::{decode_list, total_count, FetchPlan};
use super::history::{bucketize, days_between, Chart, Interval};
use super::ranking::Tally;
use super::{newest_first, system_clock, Clock};
use crate::registry::{AccountGuard, AccountRegistry, Slot, SlotSet};
use crate::upstream::{Endpoint, GraphqlClient};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

pub const TOP_VALIDATORS_BY_COUNT: usize = 10;
pub const TOP_VALIDATORS_BY_AMOUNT: usize = 5;

const TOTAL_COUNT_QUERY: &str = r#"
query ($public_key: String!) {
    stakingRewardsConnection(first: 0, orderBy: id_ASC, where: {account: {id_eq: $public_key}}) {
        totalCount
    }
}
"#;

const PAGE_QUERY: &str = r#"
query ($public_key: String!, $limit: Int!, $offset: Int!) {
    stakingRewards(orderBy: timestamp_ASC, limit: $limit, offset: $offset, where: {account: {publicKey_eq: $public_key}}) {
        id
        timestamp
        amount
        validatorId
        era
    }
}
"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReward {
    id: String,
    timestamp: DateTime<Utc>,
    amount: String,
    validator_id: String,
    era: u32,
}

/// Reward with its amount scaled to DOT
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub amount: f64,
    pub validator_id: String,
    pub era: u32,
}

impl TryFrom<RawReward> for Reward {
    type Error = AggregateError;

    fn try_from(raw: RawReward) -> Result<Self, Self::Error> {
        Ok(Reward {
            amount: planck_to_dot(&raw.amount)?,
            id: raw.id,
            timestamp: raw.timestamp,
            validator_id: raw.validator_id,
            era: raw.era,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TotalRewards {
    /// Sum over the fetched slice
    pub total_amount: f64,
    /// Upstream totalCount
    pub total_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatorCount {
    pub validator_id: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatorAmount {
    pub validator_id: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RewardRelationship {
    pub count: Vec<ValidatorCount>,
    pub amount: Vec<ValidatorAmount>,
}

impl RewardRelationship {
    pub fn from_rewards(rewards: &[Reward]) -> Self {
        let mut counts: Tally<u64> = Tally::new();
        let mut amounts: Tally<f64> = Tally::new();
        for reward in rewards {
            counts.count(&reward.validator_id);
            amounts.add(&reward.validator_id, reward.amount);
        }

        Self {
            count: counts
                .top(TOP_VALIDATORS_BY_COUNT)
                .into_iter()
                .map(|(validator_id, count)| ValidatorCount { validator_id, count })
                .collect(),
            amount: amounts
                .top(TOP_VALIDATORS_BY_AMOUNT)
                .into_iter()
                .map(|(validator_id, amount)| ValidatorAmount { validator_id, amount })
                .collect(),
        }
    }
}

/// Daily reward counts and DOT amounts, first reward day through today
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RewardHistory {
    pub days: Vec<NaiveDate>,
    pub counts: Vec<u64>,
    pub amounts: Vec<f64>,
}

impl RewardHistory {
    pub fn from_rewards(rewards: &[Reward], today: NaiveDate) -> Self {
        let mut daily: HashMap<NaiveDate, (u64, f64)> = HashMap::new();
        for reward in rewards {
            let entry = daily.entry(reward.timestamp.date_naive()).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += reward.amount;
        }

        let (Some(first), Some(latest)) = (daily.keys().min().copied(), daily.keys().max().copied()) else {
            return Self {
                days: Vec::new(),
                counts: Vec::new(),
                amounts: Vec::new(),
            };
        };

        let days = days_between(first, latest.max(today));
        let (counts, amounts): (Vec<u64>, Vec<f64>) = days
            .iter()
            .map(|day| daily.get(day).copied().unwrap_or((0, 0.0)))
            .unzip();

        Self { days, counts, amounts }
    }

    pub fn chart(&self, interval: Interval, today: NaiveDate) -> Chart<f64> {
        let counts: Vec<_> = self.days.iter().copied().zip(self.counts.iter().map(|c| *c as f64)).collect();
        let amounts: Vec<_> = self.days.iter().copied().zip(self.amounts.iter().copied()).collect();

        let counts = bucketize(&counts, interval, today);
        let amounts = bucketize(&amounts, interval, today);
        let labels = counts.iter().map(|(end, _)| interval.label(*end)).collect();

        Chart::line(labels)
            .titled(format!("Rewards for {}", interval.as_str()))
            .with_series(Some("Rewards"), counts.into_iter().map(|(_, count)| count).collect())
            .with_series(Some("Amount"), amounts.into_iter().map(|(_, amount)| amount).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RewardsSlot {
    TotalRewards,
    Rewards,
    RecentRewards,
    RewardRelationship,
    RewardHistory,
}

#[derive(Debug, Default)]
pub struct RewardsSlots {
    total_rewards: Slot<TotalRewards>,
    rewards: Slot<Vec<Reward>>,
    recent_rewards: Slot<Vec<Reward>>,
    reward_relationship: Slot<RewardRelationship>,
    reward_history: Slot<RewardHistory>,
}

impl SlotSet for RewardsSlots {
    type Kind = RewardsSlot;

    fn has(&self, kind: RewardsSlot) -> bool {
        match kind {
            RewardsSlot::TotalRewards => !self.total_rewards.is_vacant(),
            RewardsSlot::Rewards => !self.rewards.is_vacant(),
            RewardsSlot::RecentRewards => !self.recent_rewards.is_vacant(),
            RewardsSlot::RewardRelationship => !self.reward_relationship.is_vacant(),
            RewardsSlot::RewardHistory => !self.reward_history.is_vacant(),
        }
    }
}

impl RewardsSlots {
    fn absent() -> Self {
        Self {
            total_rewards: Slot::Absent,
            rewards: Slot::Absent,
            recent_rewards: Slot::Absent,
            reward_relationship: Slot::Absent,
            reward_history: Slot::Absent,
        }
    }

    pub fn derive(total: u64, rewards: Vec<Reward>, today: NaiveDate) -> Self {
        let total_amount: f64 = rewards.iter().map(|reward| reward.amount).sum();

        Self {
            total_rewards: Slot::Filled(TotalRewards {
                total_amount,
                total_count: total,
            }),
            recent_rewards: Slot::Filled(newest_first(&rewards)),
            reward_relationship: Slot::Filled(RewardRelationship::from_rewards(&rewards)),
            reward_history: Slot::Filled(RewardHistory::from_rewards(&rewards, today)),
            rewards: Slot::Filled(rewards),
        }
    }
}

pub struct RewardsAggregator {
    graphql: Arc<GraphqlClient>,
    registry: AccountRegistry<RewardsSlots>,
    plan: FetchPlan,
    clock: Clock,
}

impl RewardsAggregator {
    pub fn new(graphql: Arc<GraphqlClient>, capacity: usize) -> Self {
        Self {
            graphql,
            registry: AccountRegistry::new("rewards", capacity),
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

    pub fn registry(&self) -> &AccountRegistry<RewardsSlots> {
        &self.registry
    }

    pub async fn has_slot(&self, account: &str, kind: RewardsSlot) -> bool {
        self.registry.has_slot(account, kind).await
    }

    pub async fn total_rewards(&self, account: &str) -> Result<Option<TotalRewards>, AggregateError> {
        Ok(self.slots(account).await?.total_rewards.cloned())
    }

    pub async fn rewards(&self, account: &str) -> Result<Option<Vec<Reward>>, AggregateError> {
        Ok(self.slots(account).await?.rewards.cloned())
    }

    pub async fn recent_rewards(&self, account: &str) -> Result<Option<Vec<Reward>>, AggregateError> {
        Ok(self.slots(account).await?.recent_rewards.cloned())
    }

    pub async fn reward_relationship(&self, account: &str) -> Result<Option<RewardRelationship>, AggregateError> {
        Ok(self.slots(account).await?.reward_relationship.cloned())
    }

    /// Daily history as cached
    pub async fn daily_reward_history(&self, account: &str) -> Result<Option<RewardHistory>, AggregateError> {
        Ok(self.slots(account).await?.reward_history.cloned())
    }

    /// Cached daily history regrouped by interval
    pub async fn reward_history(&self, account: &str, interval: Interval) -> Result<Option<Chart<f64>>, AggregateError> {
        let today = (self.clock)().date_naive();
        let guard = self.slots(account).await?;

        Ok(guard
            .reward_history
            .get()
            .filter(|history| !history.days.is_empty())
            .map(|history| history.chart(interval, today)))
    }

    async fn slots(&self, account: &str) -> Result<AccountGuard<RewardsSlots>, AggregateError> {
        let mut guard = self.registry.acquire(account).await;
        if guard.total_rewards.is_vacant() {
            self.populate(account, &mut guard).await?;
        }
        Ok(guard)
    }

    async fn populate(&self, account: &str, slots: &mut RewardsSlots) -> Result<(), AggregateError> {
        log::info!("🔍 Fetching staking rewards for {}", account);

        let response = self
            .graphql
            .query(Endpoint::Main, TOTAL_COUNT_QUERY, json!({ "public_key": account }))
            .await;

        let Some(total) = total_count(response.as_ref(), "stakingRewardsConnection") else {
            log::warn!("⚠️  Reward count unavailable for {}", account);
            return Ok(());
        };

        if total == 0 {
            *slots = RewardsSlots::absent();
            return Ok(());
        }

        let rewards = self.plan.collect(total, |offset| self.fetch_page(account, offset)).await?;
        if rewards.is_empty() {
            log::warn!("⚠️  No reward pages for {} (total {}), not caching", account, total);
            return Ok(());
        }
        log::info!("✅ {} of {} rewards fetched for {}", rewards.len(), total, account);

        *slots = RewardsSlots::derive(total, rewards, (self.clock)().date_naive());
        Ok(())
    }

    async fn fetch_page(&self, account: &str, offset: u64) -> Result<Option<Vec<Reward>>, AggregateError> {
        let variables = json!({
            "public_key": account,
            "limit": self.plan.page_size,
            "offset": offset,
        });

        let Some(response) = self.graphql.query(Endpoint::Main, PAGE_QUERY, variables).await else {
            return Ok(None);
        };

        let Some(raw) = decode_list::<RawReward>(&response, &["stakingRewards"], "staking reward")? else {
            return Ok(None);
        };
        raw.into_iter().map(Reward::try_from).collect::<Result<Vec<_>, _>>().map(Some)
    }
}
