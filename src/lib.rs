//! dotlens - account analytics for Polkadot
//!
//! Pulls an account's extrinsics, transfers, staking rewards and Subscan
//! overview from public indexers, derives dashboard views from them and
//! caches the results per account.
//!
//! ## Layout
//!
//! - `upstream` - REST and GraphQL clients over a shared HTTP seam
//! - `registry` - bounded per-account cache with per-account locks
//! - `aggregate` - fetch-all-then-derive aggregators and their views
//! - `badges` - achievements computed from the cached views
//! - `context` - wiring of clients and aggregators
//! - `config` - environment configuration

pub mod aggregate;
pub mod badges;
pub mod config;
pub mod context;
pub mod registry;
pub mod upstream;

pub use config::{Config, ConfigError};
pub use context::AnalyticsContext;
