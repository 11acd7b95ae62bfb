//! Wiring of upstream clients and aggregators
//!
//! One context per process. Aggregators are shared through `Arc` so the
//! badge evaluator reads the same caches the views populate.

use crate::aggregate::{
    ExtrinsicsAggregator, OverviewAggregator, RewardsAggregator, TransfersAggregator,
};
use crate::badges::BadgeEvaluator;
use crate::config::Config;
use crate::upstream::{GraphqlClient, GraphqlEndpoints, HttpTransport, ReqwestTransport, RestClient, UpstreamError};
use std::sync::Arc;
use std::time::Duration;

pub struct AnalyticsContext {
    pub extrinsics: Arc<ExtrinsicsAggregator>,
    pub transfers: Arc<TransfersAggregator>,
    pub rewards: Arc<RewardsAggregator>,
    pub overview: Arc<OverviewAggregator>,
}

impl AnalyticsContext {
    /// Build against the real upstreams
    pub fn from_config(config: &Config) -> Result<Self, UpstreamError> {
        let transport = ReqwestTransport::new(Duration::from_secs(config.upstream_timeout_secs))?;
        Ok(Self::with_transport(Arc::new(transport), config))
    }

    /// Build on any transport (tests pass a scripted one)
    pub fn with_transport(transport: Arc<dyn HttpTransport>, config: &Config) -> Self {
        let rest = Arc::new(
            RestClient::new(Arc::clone(&transport), &config.rest_endpoint, &config.subscan_api_key)
                .with_rate_limit(config.rate_limit_default_backoff_secs, config.rate_limit_max_retries),
        );
        let graphql = Arc::new(GraphqlClient::new(
            transport,
            GraphqlEndpoints {
                explorer: config.explorer_endpoint.clone(),
                stats: config.stats_endpoint.clone(),
                main: config.main_endpoint.clone(),
            },
        ));

        let capacity = config.account_cache_capacity;
        log::info!("📋 Account cache capacity per aggregator: {}", capacity);

        Self {
            extrinsics: Arc::new(ExtrinsicsAggregator::new(Arc::clone(&graphql), capacity)),
            transfers: Arc::new(TransfersAggregator::new(Arc::clone(&graphql), capacity)),
            rewards: Arc::new(RewardsAggregator::new(graphql, capacity)),
            overview: Arc::new(OverviewAggregator::new(rest, capacity)),
        }
    }

    pub fn badges(&self) -> BadgeEvaluator {
        BadgeEvaluator::new(
            Arc::clone(&self.extrinsics),
            Arc::clone(&self.transfers),
            Arc::clone(&self.rewards),
            Arc::clone(&self.overview),
        )
    }
}
