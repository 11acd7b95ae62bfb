//! Integration tests for the domain aggregators
//!
//! Every aggregator runs its real pass through the real GraphQL/REST client
//! against a scripted transport. Key properties:
//! - one pass per account (memoization, single-flight under the lock)
//! - bounded FIFO registry (evicted accounts are refetched)
//! - zero total short-circuits; unavailable counts and error replies are not cached
//! - offsets back-calculated from the total

mod common;

#[cfg(test)]
mod aggregator_tests {
    use super::common::*;
    use dotlens::aggregate::{
        AggregateError, ExtrinsicsAggregator, ExtrinsicsSlot, Interval, OverviewAggregator, OverviewSlot,
        RewardsAggregator, RewardsSlot, TransfersAggregator, TransfersSlot,
    };
    use dotlens::upstream::{HttpRequest, HttpResponse, HttpTransport, RestClient};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;

    fn extrinsic(id: &str, pallet: &str, call: &str, timestamp: &str, success: bool) -> Value {
        json!({
            "id": id,
            "success": success,
            "timestamp": timestamp,
            "mainCall": {"callName": call, "palletName": pallet}
        })
    }

    fn offset(request: &HttpRequest) -> u64 {
        request.body["variables"]["offset"].as_u64().unwrap_or_default()
    }

    /// Explorer scripted with `total` and one page of `records` at offset 0
    fn explorer(total: u64, records: Vec<Value>) -> ScriptedTransport {
        ScriptedTransport::new(move |request| {
            let query = query_text(request);
            if query.contains("extrinsicsConnection") {
                json_response(200, json!({"data": {"extrinsicsConnection": {"totalCount": total}}}))
            } else if offset(request) == 0 {
                json_response(200, json!({"data": {"extrinsics": records.clone()}}))
            } else {
                json_response(200, json!({"data": {"extrinsics": []}}))
            }
        })
    }

    #[tokio::test]
    async fn test_extrinsics_pass_runs_once_per_account() {
        // Test: every view of an account comes out of a single pass
        let transport = Arc::new(explorer(
            3,
            vec![
                extrinsic("1", "Balances", "transfer", "2024-05-01T10:00:00Z", true),
                extrinsic("2", "Balances", "transfer", "2024-05-02T10:00:00Z", true),
                extrinsic("3", "Staking", "bond", "2024-05-03T10:00:00Z", false),
            ],
        ));
        let aggregator = ExtrinsicsAggregator::new(graphql(&transport), 10).with_clock(fixed_clock(at(2024, 6, 1)));

        let distribution = aggregator.distribution("alice").await.unwrap().unwrap();
        assert_eq!(distribution.ranking, vec!["Balances", "Staking"]);
        assert_eq!(distribution.pallets["Balances"].total, 2);
        assert_eq!(distribution.pallets["Balances"].call_count("transfer"), 2);
        assert_eq!(distribution.pallets["Staking"].call_count("bond"), 1);

        let requests_after_pass = transport.requests().len();
        assert_eq!(transport.queries_mentioning("extrinsicsConnection"), 1);
        // one page with data, one empty page ends the walk
        assert_eq!(transport.page_offsets("extrinsics(limit"), vec![0, 1000]);

        assert_eq!(aggregator.total_extrinsics("alice").await.unwrap(), Some(3));
        assert_eq!(aggregator.weekly_transaction_rate("alice").await.unwrap(), Some(3));
        let recent = aggregator.recent_extrinsics("alice").await.unwrap().unwrap();
        assert_eq!(recent[0].id, "3");
        let rate = aggregator.success_rate("alice").await.unwrap().unwrap();
        assert_eq!((rate.success_count, rate.failed_count), (2, 1));
        let top = aggregator.top_interacted("alice").await.unwrap().unwrap();
        assert_eq!(top[0].pallet_name, "Balances");
        assert_eq!(top[0].calls[0].call_name, "transfer");

        assert_eq!(transport.requests().len(), requests_after_pass);
        assert!(aggregator.has_slot("alice", ExtrinsicsSlot::WeeklyTransactionRate).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_share_one_pass() {
        // Test: the second caller waits on the account lock, then reads the cache
        let transport = Arc::new(
            explorer(1, vec![extrinsic("1", "System", "remark", "2024-05-01T10:00:00Z", true)])
                .with_delay(Duration::from_millis(200)),
        );
        let aggregator = ExtrinsicsAggregator::new(graphql(&transport), 10).with_clock(fixed_clock(at(2024, 6, 1)));

        let (total, distribution) = tokio::join!(
            aggregator.total_extrinsics("alice"),
            aggregator.distribution("alice")
        );

        assert_eq!(total.unwrap(), Some(1));
        assert_eq!(distribution.unwrap().unwrap().ranking, vec!["System"]);
        assert_eq!(transport.queries_mentioning("extrinsicsConnection"), 1);
    }

    /// Count queries sent for one account
    fn count_queries_for(transport: &ScriptedTransport, connection: &str, account: &str) -> usize {
        transport
            .requests()
            .iter()
            .filter(|request| query_text(request).contains(connection))
            .filter(|request| request.body["variables"]["public_key"] == account)
            .count()
    }

    #[tokio::test(start_paused = true)]
    async fn test_account_in_flight_is_not_evicted() {
        // Test: capacity 1, alice mid-pass, bob onboarded, alice asked again
        let transport = Arc::new(
            explorer(1, vec![extrinsic("1", "System", "remark", "2024-05-01T10:00:00Z", true)])
                .with_delay(Duration::from_millis(300)),
        );
        let aggregator = ExtrinsicsAggregator::new(graphql(&transport), 1).with_clock(fixed_clock(at(2024, 6, 1)));

        let (first, bob, second) = tokio::join!(
            aggregator.total_extrinsics("alice"),
            aggregator.total_extrinsics("bob"),
            aggregator.total_extrinsics("alice")
        );

        assert_eq!(first.unwrap(), Some(1));
        assert_eq!(bob.unwrap(), Some(1));
        assert_eq!(second.unwrap(), Some(1));
        assert_eq!(count_queries_for(&transport, "extrinsicsConnection", "alice"), 1);

        // once idle, the next account trims the registry back to capacity
        aggregator.total_extrinsics("carol").await.unwrap();
        assert_eq!(aggregator.registry().tracked(), vec!["carol".to_string()]);
    }

    #[tokio::test]
    async fn test_evicted_account_is_refetched() {
        let transport = Arc::new(explorer(
            1,
            vec![extrinsic("1", "System", "remark", "2024-05-01T10:00:00Z", true)],
        ));
        let aggregator = ExtrinsicsAggregator::new(graphql(&transport), 1).with_clock(fixed_clock(at(2024, 6, 1)));

        aggregator.total_extrinsics("alice").await.unwrap();
        aggregator.total_extrinsics("bob").await.unwrap();
        assert!(!aggregator.registry().contains("alice"));
        assert!(!aggregator.has_slot("alice", ExtrinsicsSlot::TotalExtrinsics).await);

        aggregator.total_extrinsics("alice").await.unwrap();
        assert_eq!(transport.queries_mentioning("extrinsicsConnection"), 3);
        assert_eq!(aggregator.registry().tracked(), vec!["alice".to_string()]);
    }

    #[tokio::test]
    async fn test_zero_total_skips_pages_and_caches_absence() {
        let transport = Arc::new(explorer(0, Vec::new()));
        let aggregator = ExtrinsicsAggregator::new(graphql(&transport), 10);

        assert_eq!(aggregator.distribution("ghost").await.unwrap(), None);
        assert_eq!(aggregator.total_extrinsics("ghost").await.unwrap(), None);
        assert!(aggregator.activity("ghost", Interval::Day).await.unwrap().is_none());

        assert!(aggregator.has_slot("ghost", ExtrinsicsSlot::Distribution).await);
        assert_eq!(transport.requests().len(), 1, "only the count query is sent");
    }

    #[tokio::test]
    async fn test_unavailable_count_is_not_cached() {
        let transport = Arc::new(ScriptedTransport::new(|_| status(503)));
        let aggregator = ExtrinsicsAggregator::new(graphql(&transport), 10);

        assert_eq!(aggregator.total_extrinsics("alice").await.unwrap(), None);
        assert!(!aggregator.has_slot("alice", ExtrinsicsSlot::TotalExtrinsics).await);

        aggregator.total_extrinsics("alice").await.unwrap();
        assert_eq!(transport.requests().len(), 2, "a later call retries");
    }

    fn graphql_error() -> HttpResponse {
        json_response(200, json!({"data": null, "errors": [{"message": "indexer timeout"}]}))
    }

    #[tokio::test]
    async fn test_count_error_reply_is_not_cached_as_zero() {
        // Test: an HTTP 200 error reply is an unavailable count, not an empty account
        let transport = Arc::new(ScriptedTransport::sequence(vec![
            graphql_error(),
            json_response(200, json!({"data": {"extrinsicsConnection": {"totalCount": 1}}})),
            json_response(
                200,
                json!({"data": {"extrinsics": [extrinsic("1", "System", "remark", "2024-05-01T10:00:00Z", true)]}}),
            ),
            json_response(200, json!({"data": {"extrinsics": []}})),
        ]));
        let aggregator = ExtrinsicsAggregator::new(graphql(&transport), 10).with_clock(fixed_clock(at(2024, 6, 1)));

        assert_eq!(aggregator.total_extrinsics("alice").await.unwrap(), None);
        assert!(!aggregator.has_slot("alice", ExtrinsicsSlot::TotalExtrinsics).await);

        assert_eq!(aggregator.total_extrinsics("alice").await.unwrap(), Some(1));
        assert_eq!(transport.queries_mentioning("extrinsicsConnection"), 2);
    }

    #[tokio::test]
    async fn test_error_reply_pages_are_not_cached() {
        // Test: totalCount 500 but every page is an error reply
        let transport = Arc::new(ScriptedTransport::new(|request| {
            if query_text(request).contains("extrinsicsConnection") {
                return json_response(200, json!({"data": {"extrinsicsConnection": {"totalCount": 500}}}));
            }
            graphql_error()
        }));
        let aggregator = ExtrinsicsAggregator::new(graphql(&transport), 10);

        assert_eq!(aggregator.extrinsics("alice").await.unwrap(), None);
        assert_eq!(aggregator.total_extrinsics("alice").await.unwrap(), None);
        assert!(!aggregator.has_slot("alice", ExtrinsicsSlot::Extrinsics).await);

        // the error page ends the walk after one request, and every call retries
        assert_eq!(transport.page_offsets("extrinsics(limit"), vec![0, 0]);
        assert_eq!(transport.queries_mentioning("extrinsicsConnection"), 2);
    }

    #[tokio::test]
    async fn test_error_reply_mid_walk_keeps_earlier_pages() {
        let transport = Arc::new(ScriptedTransport::new(|request| {
            if query_text(request).contains("extrinsicsConnection") {
                return json_response(200, json!({"data": {"extrinsicsConnection": {"totalCount": 2500}}}));
            }
            if offset(request) == 0 {
                return json_response(
                    200,
                    json!({"data": {"extrinsics": [extrinsic("1", "System", "remark", "2024-05-01T10:00:00Z", true)]}}),
                );
            }
            graphql_error()
        }));
        let aggregator = ExtrinsicsAggregator::new(graphql(&transport), 10).with_clock(fixed_clock(at(2024, 6, 1)));

        let extrinsics = aggregator.extrinsics("alice").await.unwrap().unwrap();
        assert_eq!(extrinsics.len(), 1);
        assert_eq!(transport.page_offsets("extrinsics(limit"), vec![0, 1000]);
        assert!(aggregator.has_slot("alice", ExtrinsicsSlot::Extrinsics).await);
    }

    #[tokio::test]
    async fn test_long_history_fetches_most_recent_slice() {
        // Test: total 10000, page 1000, 3 pages → offsets 7000, 8000, 9000
        let transport = Arc::new(ScriptedTransport::new(|request| {
            if query_text(request).contains("extrinsicsConnection") {
                return json_response(200, json!({"data": {"extrinsicsConnection": {"totalCount": 10000}}}));
            }
            let id = offset(request).to_string();
            json_response(
                200,
                json!({"data": {"extrinsics": [extrinsic(&id, "System", "remark", "2024-05-01T10:00:00Z", true)]}}),
            )
        }));
        let aggregator = ExtrinsicsAggregator::new(graphql(&transport), 10).with_clock(fixed_clock(at(2024, 6, 1)));

        let extrinsics = aggregator.extrinsics("whale").await.unwrap().unwrap();

        assert_eq!(transport.page_offsets("extrinsics(limit"), vec![7000, 8000, 9000]);
        assert_eq!(extrinsics.len(), 3);
        assert_eq!(aggregator.total_extrinsics("whale").await.unwrap(), Some(10000));
    }

    #[tokio::test]
    async fn test_malformed_record_fails_the_pass() {
        let transport = Arc::new(explorer(1, vec![json!({"id": "1", "success": "maybe"})]));
        let aggregator = ExtrinsicsAggregator::new(graphql(&transport), 10);

        let result = aggregator.distribution("alice").await;
        assert!(matches!(result, Err(AggregateError::Malformed { .. })));
        assert!(!aggregator.has_slot("alice", ExtrinsicsSlot::Distribution).await);
    }

    #[tokio::test]
    async fn test_activity_charts() {
        let transport = Arc::new(explorer(
            3,
            vec![
                extrinsic("1", "Balances", "transfer", "2024-05-01T10:00:00Z", true),
                extrinsic("2", "Staking", "bond", "2024-05-15T10:00:00Z", true),
                extrinsic("3", "Balances", "transfer", "2024-06-01T10:00:00Z", true),
            ],
        ));
        let aggregator = ExtrinsicsAggregator::new(graphql(&transport), 10).with_clock(fixed_clock(at(2024, 6, 10)));

        let chart = aggregator.activity("alice", Interval::Month).await.unwrap().unwrap();
        assert_eq!(chart.categories(), ["2024-05-31".to_string(), "2024-06-30".to_string()]);
        assert_eq!(chart.series[0].data, vec![2, 1]);

        let calls = aggregator
            .call_activity("alice", "transfer", Interval::Year)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].date, "2024");
        assert_eq!(calls[0].count, 2);
    }

    fn account_transfer(id: &str, direction: &str, from: &str, to: &str, amount: &str, timestamp: &str) -> Value {
        json!({
            "id": id,
            "direction": direction,
            "transfer": {
                "blockNumber": 1,
                "timestamp": timestamp,
                "extrinsicHash": "0xabc",
                "amount": amount,
                "success": true,
                "from": {"publicKey": from},
                "to": {"publicKey": to}
            }
        })
    }

    #[tokio::test]
    async fn test_transfers_totals_and_counterparties() {
        let transport = Arc::new(ScriptedTransport::new(|request| {
            let query = query_text(request);
            if query.contains("transfersConnection") {
                let total = match request.body["variables"]["direction"].as_str() {
                    Some("To") => 2,
                    _ => 1,
                };
                return json_response(200, json!({"data": {"transfersConnection": {"totalCount": total}}}));
            }
            if offset(request) > 0 {
                return json_response(200, json!({"data": {"accounts": [{"transfers": []}]}}));
            }
            json_response(
                200,
                json!({"data": {"accounts": [{"transfers": [
                    account_transfer("1", "To", "bob", "me", "10000000000", "2024-05-01T10:00:00Z"),
                    account_transfer("2", "To", "bob", "me", "20000000000", "2024-05-02T10:00:00Z"),
                    account_transfer("3", "From", "me", "carol", "5000000000", "2024-05-02T11:00:00Z"),
                ]}]}}),
            )
        }));
        let aggregator = TransfersAggregator::new(graphql(&transport), 10).with_clock(fixed_clock(at(2024, 5, 3)));

        let totals = aggregator.total_transfers("me").await.unwrap().unwrap();
        assert_eq!((totals.total_count, totals.received, totals.sent), (3, 2, 1));

        let relationship = aggregator.transfer_relationship("me").await.unwrap().unwrap();
        assert_eq!(relationship.count.senders[0].public_id, "bob");
        assert_eq!(relationship.count.senders[0].count, 2);
        assert_eq!(relationship.amount.senders[0].amount, 3.0);
        assert_eq!(relationship.amount.receivers[0].public_id, "carol");
        assert_eq!(relationship.amount.receivers[0].amount, 0.5);

        let history = aggregator.transfer_history("me").await.unwrap().unwrap();
        assert_eq!(history.incoming_counts, vec![1, 1, 0]);
        assert_eq!(history.outgoing_counts, vec![0, 1, 0]);

        let recent = aggregator.recent_transfers("me").await.unwrap().unwrap();
        assert_eq!(recent[0].id, "3");

        let chart = aggregator.transfer_history_chart("me", Interval::Week).await.unwrap().unwrap();
        assert_eq!(chart.series.len(), 2);

        assert_eq!(transport.queries_mentioning("transfersConnection"), 2);
        assert!(aggregator.has_slot("me", TransfersSlot::TransferSuccessRate).await);
    }

    fn transfer_counts(received: u64, sent: u64) -> ScriptedTransport {
        ScriptedTransport::new(move |request| {
            if !query_text(request).contains("transfersConnection") {
                return json_response(200, json!({"data": {"accounts": [{"transfers": []}]}}));
            }
            let total = match request.body["variables"]["direction"].as_str() {
                Some("To") => received,
                _ => sent,
            };
            json_response(200, json!({"data": {"transfersConnection": {"totalCount": total}}}))
        })
    }

    #[tokio::test]
    async fn test_transfers_zero_total_caches_absence() {
        let transport = Arc::new(transfer_counts(0, 0));
        let aggregator = TransfersAggregator::new(graphql(&transport), 10);

        assert_eq!(aggregator.total_transfers("ghost").await.unwrap(), None);
        assert_eq!(aggregator.recent_transfers("ghost").await.unwrap(), None);
        assert_eq!(aggregator.transfer_relationship("ghost").await.unwrap(), None);
        assert_eq!(aggregator.transfer_history("ghost").await.unwrap(), None);
        assert_eq!(aggregator.transfer_success_rate("ghost").await.unwrap(), None);

        for kind in [
            TransfersSlot::TotalTransfers,
            TransfersSlot::RecentTransfers,
            TransfersSlot::TransferRelationship,
            TransfersSlot::TransferHistory,
            TransfersSlot::TransferSuccessRate,
        ] {
            assert!(aggregator.has_slot("ghost", kind).await, "{:?} cached", kind);
        }

        assert_eq!(transport.queries_mentioning("accounts("), 0);
        assert_eq!(transport.queries_mentioning("transfersConnection"), 2);
    }

    #[tokio::test]
    async fn test_transfers_one_count_unavailable_is_not_cached() {
        // Test: received counts fine, sent fails with 503
        let transport = Arc::new(ScriptedTransport::new(|request| {
            match request.body["variables"]["direction"].as_str() {
                Some("To") => json_response(200, json!({"data": {"transfersConnection": {"totalCount": 4}}})),
                Some(_) => status(503),
                None => json_response(200, json!({"data": {"accounts": [{"transfers": []}]}})),
            }
        }));
        let aggregator = TransfersAggregator::new(graphql(&transport), 10);

        assert_eq!(aggregator.total_transfers("me").await.unwrap(), None);
        assert!(!aggregator.has_slot("me", TransfersSlot::TotalTransfers).await);
        assert_eq!(transport.queries_mentioning("accounts("), 0);

        aggregator.total_transfers("me").await.unwrap();
        assert_eq!(transport.queries_mentioning("transfersConnection"), 4, "a later call retries");
    }

    fn rewards_transport(amounts: &'static [&'static str]) -> ScriptedTransport {
        ScriptedTransport::new(move |request| {
            if query_text(request).contains("stakingRewardsConnection") {
                return json_response(
                    200,
                    json!({"data": {"stakingRewardsConnection": {"totalCount": amounts.len()}}}),
                );
            }
            if offset(request) > 0 {
                return json_response(200, json!({"data": {"stakingRewards": []}}));
            }
            let rewards: Vec<Value> = amounts
                .iter()
                .enumerate()
                .map(|(i, amount)| {
                    json!({
                        "id": format!("r-{}", i),
                        "timestamp": "2024-05-01T10:00:00Z",
                        "amount": amount,
                        "validatorId": "validator-1",
                        "era": 1400 + i
                    })
                })
                .collect();
            json_response(200, json!({"data": {"stakingRewards": rewards}}))
        })
    }

    #[tokio::test]
    async fn test_reward_amounts_are_scaled() {
        let transport = Arc::new(rewards_transport(&["10000000000", "20000000000"]));
        let aggregator = RewardsAggregator::new(graphql(&transport), 10).with_clock(fixed_clock(at(2024, 5, 2)));

        let totals = aggregator.total_rewards("nominator").await.unwrap().unwrap();
        assert_eq!(totals.total_amount, 3.0);
        assert_eq!(totals.total_count, 2);

        let rewards = aggregator.rewards("nominator").await.unwrap().unwrap();
        assert_eq!(rewards[0].amount, 1.0);

        let relationship = aggregator.reward_relationship("nominator").await.unwrap().unwrap();
        assert_eq!(relationship.count[0].count, 2);
        assert_eq!(relationship.amount[0].amount, 3.0);

        let chart = aggregator.reward_history("nominator", Interval::Day).await.unwrap().unwrap();
        assert_eq!(chart.series[1].data, vec![3.0, 0.0]);

        assert!(aggregator.has_slot("nominator", RewardsSlot::RecentRewards).await);
        assert_eq!(transport.queries_mentioning("stakingRewardsConnection"), 1);
    }

    #[tokio::test]
    async fn test_rewards_zero_total_caches_absence() {
        let transport = Arc::new(rewards_transport(&[]));
        let aggregator = RewardsAggregator::new(graphql(&transport), 10);

        assert_eq!(aggregator.total_rewards("idle").await.unwrap(), None);
        assert_eq!(aggregator.rewards("idle").await.unwrap(), None);
        assert!(aggregator.reward_history("idle", Interval::Day).await.unwrap().is_none());

        assert!(aggregator.has_slot("idle", RewardsSlot::RewardRelationship).await);
        assert_eq!(transport.requests().len(), 1, "only the count query is sent");
    }

    #[tokio::test]
    async fn test_bad_reward_amount_is_an_error() {
        let transport = Arc::new(rewards_transport(&["12.5"]));
        let aggregator = RewardsAggregator::new(graphql(&transport), 10);

        assert!(matches!(
            aggregator.total_rewards("nominator").await,
            Err(AggregateError::Amount(_))
        ));
    }

    fn rest(transport: &Arc<ScriptedTransport>) -> Arc<RestClient> {
        let transport: Arc<dyn HttpTransport> = transport.clone();
        Arc::new(RestClient::new(transport, REST_ENDPOINT, "test-key"))
    }

    #[tokio::test]
    async fn test_overview_lookups() {
        let transport = Arc::new(ScriptedTransport::new(|request| {
            if request.url.ends_with("v2/scan/search") {
                json_response(200, json!({"code": 0, "data": {"account": {"address": "15abc", "balance": "1"}}}))
            } else if request.url.ends_with("scan/multiChain/identities") {
                json_response(200, json!({"code": 0, "data": null}))
            } else {
                json_response(200, json!({"code": 0, "data": [{"network": "polkadot"}]}))
            }
        }));
        let aggregator = OverviewAggregator::new(rest(&transport), 10).with_clock(fixed_clock(at(2024, 3, 15)));

        let account = aggregator.account("key", "15abc").await.unwrap().unwrap();
        assert_eq!(account["address"], "15abc");
        aggregator.account("key", "15abc").await.unwrap();

        // empty data is reported as missing and retried next time
        assert_eq!(aggregator.identity("key", "15abc").await.unwrap(), None);
        assert!(!aggregator.has_slot("key", OverviewSlot::Identity).await);
        aggregator.identity("key", "15abc").await.unwrap();

        let history = aggregator.balance_history("key", "15abc").await.unwrap().unwrap();
        assert_eq!(history[0]["network"], "polkadot");

        let requests = transport.requests();
        assert_eq!(requests.len(), 4);
        assert_eq!(requests[0].body, json!({"key": "15abc"}));
        assert_eq!(
            requests[3].body,
            json!({"address": "15abc", "start": "2023-03-15", "end": "2024-03-15"})
        );
        assert!(aggregator.has_slot("key", OverviewSlot::Account).await);
    }

    #[tokio::test]
    async fn test_overview_account_without_account_field() {
        let transport = Arc::new(ScriptedTransport::new(|_| json_response(200, json!({"data": {"other": 1}}))));
        let aggregator = OverviewAggregator::new(rest(&transport), 10);

        assert!(matches!(
            aggregator.account("key", "15abc").await,
            Err(AggregateError::MissingField("data.account"))
        ));
    }
}
