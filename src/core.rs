//! Core domain types and service traits for AlertRelay
//!
//! This module defines the alert record handed to every output adapter and
//! the trait contracts for the observability sinks an adapter reports to.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A normalized security alert produced by the upstream ingestion layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Alert {
    /// Human-readable summary of the event.
    pub output: String,
    /// Severity as received. Kept raw so unknown levels still render.
    pub priority: String,
    /// Name of the rule that fired.
    pub rule: String,
    /// When the event happened.
    pub time: DateTime<Utc>,
    /// Arbitrary event fields in upstream order. Only string values are rendered
    /// as attachment fields.
    #[serde(default)]
    pub output_fields: IndexMap<String, FieldValue>,
    /// Event source (e.g. "syscall", "k8s_audit").
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,
    /// Host that emitted the event.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hostname: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Alert {
    /// Parses the raw priority into a known severity level, if it is one.
    pub fn priority_level(&self) -> Option<Priority> {
        self.priority.parse().ok()
    }
}

/// The value of a single alert field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Bool(bool),
    Number(serde_json::Number),
    /// Nulls, arrays and nested objects.
    Other(serde_json::Value),
}

impl FieldValue {
    /// Returns the string payload, or `None` for every non-string variant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => f.write_str(s),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Other(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n.into())
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

/// Severity levels, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Emergency,
    Alert,
    Critical,
    Error,
    Warning,
    Notice,
    Informational,
    Debug,
}

impl Priority {
    pub const ALL: [Priority; 8] = [
        Priority::Emergency,
        Priority::Alert,
        Priority::Critical,
        Priority::Error,
        Priority::Warning,
        Priority::Notice,
        Priority::Informational,
        Priority::Debug,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Emergency => "Emergency",
            Priority::Alert => "Alert",
            Priority::Critical => "Critical",
            Priority::Error => "Error",
            Priority::Warning => "Warning",
            Priority::Notice => "Notice",
            Priority::Informational => "Informational",
            Priority::Debug => "Debug",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known priority.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown priority '{0}'")]
pub struct UnknownPriority(pub String);

impl FromStr for Priority {
    type Err = UnknownPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownPriority(s.to_string()))
    }
}

/// The result of one delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Error,
}

impl Outcome {
    /// The label used for this outcome in every metrics sink.
    pub fn as_label(&self) -> &'static str {
        match self {
            Outcome::Ok => crate::stats::OK,
            Outcome::Error => crate::stats::ERROR,
        }
    }
}

// =============================================================================
// Service Traits
// =============================================================================

/// Delivers alerts to one destination.
#[async_trait]
pub trait Output: Send + Sync {
    /// A unique, descriptive name for the output (e.g., "slack").
    /// Used for logging and metrics.
    fn name(&self) -> &str;

    /// Renders and delivers an alert, recording the outcome in every sink.
    ///
    /// Delivery failures are reported, not propagated; the returned
    /// `Outcome` only tells the caller which path was taken.
    async fn send_alert(&self, alert: &Alert) -> Outcome;
}

/// Synchronous per-destination counters (total / ok / error).
pub trait StatsSink: Send + Sync {
    fn add(&self, destination: &str, outcome: &str, delta: u64);
}

/// Aggregate counters shipped to an external collector.
///
/// Callers spawn `count_metric` and never await it; implementations handle
/// their own failures.
#[async_trait]
pub trait AggregateMetrics: Send + Sync {
    async fn count_metric(&self, category: &str, delta: i64, tags: Vec<String>);
}

/// Labeled counters scraped by the monitoring system.
pub trait MonitoringSink: Send + Sync {
    fn increment(&self, destination: &str, status: &str);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_priority_parse_is_case_insensitive() {
        assert_eq!("critical".parse::<Priority>(), Ok(Priority::Critical));
        assert_eq!("CRITICAL".parse::<Priority>(), Ok(Priority::Critical));
        assert_eq!("Informational".parse::<Priority>(), Ok(Priority::Informational));
        assert!("info".parse::<Priority>().is_err());
        assert!("".parse::<Priority>().is_err());
    }

    #[test]
    fn test_alert_deserializes_heterogeneous_fields() {
        let raw = json!({
            "output": "malicious process",
            "priority": "Critical",
            "rule": "Netcat spawned",
            "time": "2024-05-01T10:00:00Z",
            "output_fields": {
                "proc.name": "nc",
                "fd.num": 7,
                "evt.is_ok": true,
                "k8s.labels": {"app": "web"},
                "user.uid": null
            }
        });

        let alert: Alert = serde_json::from_value(raw).unwrap();

        assert_eq!(alert.priority_level(), Some(Priority::Critical));
        assert_eq!(alert.output_fields["proc.name"], FieldValue::from("nc"));
        assert_eq!(alert.output_fields["fd.num"], FieldValue::from(7));
        assert_eq!(alert.output_fields["evt.is_ok"], FieldValue::Bool(true));
        assert!(matches!(alert.output_fields["k8s.labels"], FieldValue::Other(_)));
        assert!(matches!(alert.output_fields["user.uid"], FieldValue::Other(serde_json::Value::Null)));
        assert!(alert.source.is_empty());
        assert!(alert.tags.is_empty());
    }

    #[test]
    fn test_alert_keeps_upstream_field_order() {
        let raw = r#"{"output":"o","priority":"Notice","rule":"r","time":"2024-05-01T10:00:00Z",
            "output_fields":{"z.first":"a","m.middle":1,"a.second":"b"}}"#;

        let alert: Alert = serde_json::from_str(raw).unwrap();

        let keys: Vec<&str> = alert.output_fields.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z.first", "m.middle", "a.second"]);
    }

    #[test]
    fn test_field_value_display() {
        assert_eq!(FieldValue::from("nc").to_string(), "nc");
        assert_eq!(FieldValue::from(7).to_string(), "7");
        assert_eq!(FieldValue::Bool(false).to_string(), "false");
        assert_eq!(FieldValue::Other(json!(["a", "b"])).to_string(), r#"["a","b"]"#);
    }
}
