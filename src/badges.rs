//! Achievement badges computed from the cached aggregator views
//!
//! A badge whose data cannot be loaded is reported as not earned; the
//! failure is logged and does not affect the other badges.

use crate::aggregate::{
    AggregateError, ExtrinsicsAggregator, OverviewAggregator, RewardsAggregator, TransfersAggregator,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Badge {
    JoinTheParty,
    GiftForMe,
    FirstSteps,
    SeasonedSigner,
    PowerUser,
    StillHere,
    Flawless,
    PalletExplorer,
    Staker,
    RewardHoarder,
    LoyalNominator,
    SocialButterfly,
    BigSpender,
    KnownEntity,
}

impl Badge {
    pub const CATALOGUE: [Badge; 14] = [
        Badge::JoinTheParty,
        Badge::GiftForMe,
        Badge::FirstSteps,
        Badge::SeasonedSigner,
        Badge::PowerUser,
        Badge::StillHere,
        Badge::Flawless,
        Badge::PalletExplorer,
        Badge::Staker,
        Badge::RewardHoarder,
        Badge::LoyalNominator,
        Badge::SocialButterfly,
        Badge::BigSpender,
        Badge::KnownEntity,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Badge::JoinTheParty => "Join the party!",
            Badge::GiftForMe => "Is this gift for me?",
            Badge::FirstSteps => "First steps",
            Badge::SeasonedSigner => "Seasoned signer",
            Badge::PowerUser => "Power user",
            Badge::StillHere => "Still here",
            Badge::Flawless => "Flawless",
            Badge::PalletExplorer => "Pallet explorer",
            Badge::Staker => "Staker",
            Badge::RewardHoarder => "Reward hoarder",
            Badge::LoyalNominator => "Loyal nominator",
            Badge::SocialButterfly => "Social butterfly",
            Badge::BigSpender => "Big spender",
            Badge::KnownEntity => "Known entity",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Badge::JoinTheParty => "Sent a token.",
            Badge::GiftForMe => "Receive a token.",
            Badge::FirstSteps => "Signed your first extrinsic.",
            Badge::SeasonedSigner => "Signed 100 extrinsics.",
            Badge::PowerUser => "Signed 1,000 extrinsics.",
            Badge::StillHere => "Signed an extrinsic in the last 120 days.",
            Badge::Flawless => "Signed at least 10 extrinsics without a single failure.",
            Badge::PalletExplorer => "Used 5 different pallets.",
            Badge::Staker => "Received a staking reward.",
            Badge::RewardHoarder => "Earned 100 DOT in staking rewards.",
            Badge::LoyalNominator => "Received 10 rewards from the same validator.",
            Badge::SocialButterfly => "Exchanged transfers with 10 different accounts.",
            Badge::BigSpender => "Sent 1,000 DOT to a single account.",
            Badge::KnownEntity => "Has an on-chain identity.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BadgeResult {
    pub name: &'static str,
    pub description: &'static str,
    pub success: bool,
}

pub struct BadgeEvaluator {
    extrinsics: Arc<ExtrinsicsAggregator>,
    transfers: Arc<TransfersAggregator>,
    rewards: Arc<RewardsAggregator>,
    overview: Arc<OverviewAggregator>,
}

impl BadgeEvaluator {
    pub fn new(
        extrinsics: Arc<ExtrinsicsAggregator>,
        transfers: Arc<TransfersAggregator>,
        rewards: Arc<RewardsAggregator>,
        overview: Arc<OverviewAggregator>,
    ) -> Self {
        Self {
            extrinsics,
            transfers,
            rewards,
            overview,
        }
    }

    /// Evaluate the whole catalogue, in catalogue order
    ///
    /// Identity needs the SS58 address and is not earned without one.
    pub async fn check_badges(&self, account: &str, address: Option<&str>) -> Vec<BadgeResult> {
        let mut results = Vec::with_capacity(Badge::CATALOGUE.len());

        for badge in Badge::CATALOGUE {
            let success = match self.evaluate(badge, account, address).await {
                Ok(earned) => earned,
                Err(e) => {
                    log::error!("❌ Badge '{}' for {} failed: {}", badge.name(), account, e);
                    false
                }
            };

            results.push(BadgeResult {
                name: badge.name(),
                description: badge.description(),
                success,
            });
        }

        results
    }

    pub async fn evaluate(&self, badge: Badge, account: &str, address: Option<&str>) -> Result<bool, AggregateError> {
        let earned = match badge {
            Badge::JoinTheParty => self
                .transfers
                .total_transfers(account)
                .await?
                .is_some_and(|totals| totals.sent > 0),
            Badge::GiftForMe => self
                .transfers
                .total_transfers(account)
                .await?
                .is_some_and(|totals| totals.received > 0),
            Badge::FirstSteps => self.signed_at_least(account, 1).await?,
            Badge::SeasonedSigner => self.signed_at_least(account, 100).await?,
            Badge::PowerUser => self.signed_at_least(account, 1_000).await?,
            Badge::StillHere => self
                .extrinsics
                .weekly_transaction_rate(account)
                .await?
                .is_some_and(|recent| recent > 0),
            Badge::Flawless => self.extrinsics.success_rate(account).await?.is_some_and(|rate| {
                rate.success_count + rate.failed_count >= 10 && rate.failed_count == 0
            }),
            Badge::PalletExplorer => self
                .extrinsics
                .distribution(account)
                .await?
                .is_some_and(|distribution| distribution.ranking.len() >= 5),
            Badge::Staker => self
                .rewards
                .total_rewards(account)
                .await?
                .is_some_and(|totals| totals.total_count > 0),
            Badge::RewardHoarder => self
                .rewards
                .total_rewards(account)
                .await?
                .is_some_and(|totals| totals.total_amount >= 100.0),
            Badge::LoyalNominator => self
                .rewards
                .reward_relationship(account)
                .await?
                .and_then(|relationship| relationship.count.first().map(|top| top.count >= 10))
                .unwrap_or(false),
            Badge::SocialButterfly => self
                .transfers
                .transfer_relationship(account)
                .await?
                .is_some_and(|relationship| relationship.counterparty_count() >= 10),
            Badge::BigSpender => self
                .transfers
                .transfer_relationship(account)
                .await?
                .and_then(|relationship| relationship.amount.receivers.first().map(|top| top.amount >= 1_000.0))
                .unwrap_or(false),
            Badge::KnownEntity => match address {
                Some(address) => self.overview.identity(account, address).await?.is_some(),
                None => false,
            },
        };

        Ok(earned)
    }

    async fn signed_at_least(&self, account: &str, threshold: u64) -> Result<bool, AggregateError> {
        Ok(self
            .extrinsics
            .total_extrinsics(account)
            .await?
            .is_some_and(|total| total >= threshold))
    }
}
