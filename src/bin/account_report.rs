//! Account Report - every dashboard view for one account as JSON
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin account_report -- <public_key> [--address <ss58>] [--interval WEEK]
//! ```
//!
//! Overview lookups and the identity badge need `--address`.
//!
//! ## Environment Variables
//!
//! - SUBSCAN_API_KEY - Subscan API key (required)
//! - SUBSCAN_REST_ENDPOINT / SUBSQUID_*_ENDPOINT - upstream overrides
//! - ACCOUNT_CACHE_CAPACITY - accounts cached per aggregator (default: 100)
//! - RUST_LOG - Logging level (optional, default: info)

use dotlens::aggregate::{AggregateError, Interval};
use dotlens::{AnalyticsContext, Config};
use serde::Serialize;
use serde_json::{json, Value};
use std::env;

#[derive(Debug)]
struct ReportArgs {
    public_key: String,
    address: Option<String>,
    interval: Interval,
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|idx| args.get(idx + 1))
        .cloned()
}

fn parse_args() -> Result<ReportArgs, Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().skip(1).collect();

    let public_key = args
        .first()
        .filter(|arg| !arg.starts_with("--"))
        .cloned()
        .ok_or("usage: account_report <public_key> [--address <ss58>] [--interval DAY|WEEK|MONTH|YEAR]")?;

    let interval = match flag_value(&args, "--interval") {
        Some(raw) => raw.parse()?,
        None => Interval::Week,
    };

    Ok(ReportArgs {
        public_key,
        address: flag_value(&args, "--address"),
        interval,
    })
}

fn to_json<T: Serialize>(view: Result<Option<T>, AggregateError>) -> Value {
    match view {
        Ok(Some(value)) => serde_json::to_value(value).unwrap_or(Value::Null),
        Ok(None) => Value::Null,
        Err(e) => {
            log::error!("❌ {}", e);
            json!({ "error": e.to_string() })
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let args = parse_args()?;
    let config = Config::from_env()?;

    env_logger::Builder::new()
        .parse_filters(&config.rust_log)
        .target(env_logger::Target::Stderr)
        .init();

    log::info!("🚀 Building report for {}", args.public_key);
    log::info!("   REST endpoint: {}", config.rest_endpoint);
    log::info!("   Main endpoint: {}", config.main_endpoint);
    log::info!("   Interval: {}", args.interval.as_str());

    let context = AnalyticsContext::from_config(&config)?;
    let key = args.public_key.as_str();
    let interval = args.interval;

    let mut report = json!({
        "public_key": key,
        "extrinsics": {
            "total": to_json(context.extrinsics.total_extrinsics(key).await),
            "recent": to_json(context.extrinsics.recent_extrinsics(key).await),
            "transaction_rate": to_json(context.extrinsics.weekly_transaction_rate(key).await),
            "distribution": to_json(context.extrinsics.distribution(key).await),
            "top_interacted": to_json(context.extrinsics.top_interacted(key).await),
            "success_rate": to_json(context.extrinsics.success_rate(key).await),
            "activity": to_json(context.extrinsics.activity(key, interval).await),
        },
        "transfers": {
            "total": to_json(context.transfers.total_transfers(key).await),
            "recent": to_json(context.transfers.recent_transfers(key).await),
            "relationship": to_json(context.transfers.transfer_relationship(key).await),
            "success_rate": to_json(context.transfers.transfer_success_rate(key).await),
            "history": to_json(context.transfers.transfer_history_chart(key, interval).await),
        },
        "rewards": {
            "total": to_json(context.rewards.total_rewards(key).await),
            "recent": to_json(context.rewards.recent_rewards(key).await),
            "relationship": to_json(context.rewards.reward_relationship(key).await),
            "history": to_json(context.rewards.reward_history(key, interval).await),
        },
    });

    if let Some(address) = args.address.as_deref() {
        report["overview"] = json!({
            "account": to_json(context.overview.account(key, address).await),
            "balance_distribution": to_json(context.overview.balance_distribution(key, address).await),
            "identity": to_json(context.overview.identity(key, address).await),
            "balance_stats": to_json(context.overview.balance_stats(key, address).await),
            "balance_history": to_json(context.overview.balance_history(key, address).await),
        });
    }

    let badges = context.badges().check_badges(key, args.address.as_deref()).await;
    report["badges"] = serde_json::to_value(&badges)?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    log::info!("✅ Report complete");
    Ok(())
}
