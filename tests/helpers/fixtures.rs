//! Alert fixtures shared by the integration tests.

use alertrelay::core::{Alert, FieldValue};
use chrono::{TimeZone, Utc};

/// The alert used throughout the Slack scenarios: a critical netcat spawn
/// with one string field and one integer field.
pub fn netcat_alert() -> Alert {
    let mut alert = Alert {
        output: "malicious process".to_string(),
        priority: "Critical".to_string(),
        rule: "Netcat spawned".to_string(),
        time: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
        hostname: "node-1".to_string(),
        ..Default::default()
    };
    alert
        .output_fields
        .insert("proc.name".to_string(), FieldValue::from("nc"));
    alert
        .output_fields
        .insert("fd.num".to_string(), FieldValue::from(7));
    alert
}

/// The same alert as a single line of upstream JSON.
pub fn netcat_alert_json() -> String {
    serde_json::to_string(&netcat_alert()).unwrap()
}
