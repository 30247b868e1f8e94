//! Telemetry for the interception layer
//!
//! Atomic counters describing where resolved responses came from and how
//! background work fared. Logging itself goes through `tracing`.

pub mod cache_stats;

pub use cache_stats::{InterceptStats, InterceptStatsSnapshot};
