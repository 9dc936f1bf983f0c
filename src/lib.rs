//! AlertRelay - renders security alerts as Slack messages and delivers them.
//!
//! The library holds the Slack output adapter used by the dispatcher: a pure
//! payload builder, an HTTP transport and the delivery reporter that records
//! each outcome in the stats table, the aggregate metrics sink and the
//! Prometheus counters.
pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod internal_metrics;
pub mod notification;
pub mod services;
pub mod stats;
pub mod template;

// Re-export core types for convenience
pub use crate::core::*;
