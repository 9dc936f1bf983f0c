//! Renders an alert into a Slack incoming-webhook message.
//!
//! Building a message is pure: the only fallible step is template expansion,
//! and a failure there is logged and leaves the overall text empty.

use crate::config::{OutputFormat, SlackConfig};
use crate::core::{Alert, Priority};
use crate::error::TemplateError;
use crate::template::{MessageTemplate, PlaceholderTemplate};
use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

/// Footer used when the configuration does not override it.
pub const DEFAULT_FOOTER: &str = "AlertRelay";

/// Title of the trailing rule field.
pub const RULE: &str = "rule";
/// Title of the trailing priority field.
pub const PRIORITY: &str = "priority";
/// Title of the trailing time field.
pub const TIME: &str = "time";

/// Values shorter than this many characters are displayed side by side.
pub const SHORT_FIELD_MAX_CHARS: usize = 36;

pub const RED: &str = "#e20b0b";
pub const ORANGE: &str = "#ff5400";
pub const YELLOW: &str = "#ffc700";
pub const LIGHT_CYAN: &str = "#5bffb5";
pub const LIGHT_BLUE: &str = "#68c2ff";
pub const PALE_CYAN: &str = "#ccfff2";
/// The color of an alert whose priority is not a known level.
pub const NO_COLOR: &str = "";

const PRIORITY_COLORS: [(Priority, &str); 8] = [
    (Priority::Emergency, RED),
    (Priority::Alert, ORANGE),
    (Priority::Critical, ORANGE),
    (Priority::Error, RED),
    (Priority::Warning, YELLOW),
    (Priority::Notice, LIGHT_CYAN),
    (Priority::Informational, LIGHT_BLUE),
    (Priority::Debug, PALE_CYAN),
];

/// Returns the attachment color for a raw priority string, ignoring case.
pub fn color_for(priority: &str) -> &'static str {
    priority
        .parse::<Priority>()
        .ok()
        .and_then(|level| {
            PRIORITY_COLORS
                .iter()
                .find(|(p, _)| *p == level)
                .map(|(_, color)| *color)
        })
        .unwrap_or(NO_COLOR)
}

/// A single title/value pair inside an attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentField {
    pub title: String,
    pub value: String,
    pub short: bool,
}

/// The colored block carrying the alert details.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Attachment {
    pub fallback: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default)]
    pub fields: Vec<AttachmentField>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub footer: String,
}

/// The JSON body posted to the Slack webhook.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SlackMessage {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icon_url: String,
    pub attachments: Vec<Attachment>,
}

/// Per-output settings the payload builder reads.
#[derive(Debug, Clone, Default)]
pub struct SlackSettings {
    pub output_format: OutputFormat,
    pub username: String,
    pub icon: String,
    pub footer: String,
    pub template: Option<Arc<dyn MessageTemplate>>,
}

impl SlackSettings {
    /// Builds settings from configuration, compiling the message template if one is set.
    pub fn from_config(config: &SlackConfig) -> Result<Self, TemplateError> {
        let template = if config.message_format.is_empty() {
            None
        } else {
            let compiled = PlaceholderTemplate::compile(&config.message_format)?;
            Some(Arc::new(compiled) as Arc<dyn MessageTemplate>)
        };

        Ok(Self {
            output_format: config.output_format.clone(),
            username: config.username.clone(),
            icon: config.icon.clone(),
            footer: config.footer.clone(),
            template,
        })
    }
}

fn field(title: &str, value: &str, short: bool) -> AttachmentField {
    AttachmentField {
        title: title.to_string(),
        value: value.to_string(),
        short,
    }
}

/// Formats an event time as `2006-01-02 15:04:05.999999999 +0000 UTC`,
/// with trailing zeros of the fractional seconds trimmed.
fn format_time(time: &DateTime<Utc>) -> String {
    let mut out = time.format("%Y-%m-%d %H:%M:%S").to_string();
    let nanos = time.nanosecond() % 1_000_000_000;
    if nanos > 0 {
        out.push('.');
        out.push_str(format!("{:09}", nanos).trim_end_matches('0'));
    }
    out.push_str(" +0000 UTC");
    out
}

/// Renders `alert` into a Slack message with exactly one attachment.
pub fn build_payload(alert: &Alert, settings: &SlackSettings) -> SlackMessage {
    let renders_fields = settings.output_format.renders_fields();

    let mut fields = Vec::new();
    if renders_fields {
        for (key, value) in &alert.output_fields {
            // Only string values are shown; numbers, booleans and nested values are skipped.
            let Some(text) = value.as_str() else {
                continue;
            };
            fields.push(field(
                key,
                text,
                text.chars().count() < SHORT_FIELD_MAX_CHARS,
            ));
        }
        fields.push(field(RULE, &alert.rule, true));
        fields.push(field(PRIORITY, &alert.priority, true));
        fields.push(field(TIME, &format_time(&alert.time), false));
    }

    let footer = if settings.footer.is_empty() {
        DEFAULT_FOOTER.to_string()
    } else {
        settings.footer.clone()
    };

    let text = match &settings.template {
        Some(template) => match template.render(alert) {
            Ok(text) => text,
            Err(e) => {
                error!("Slack - Error expanding Slack message: {}", e);
                String::new()
            }
        },
        None => String::new(),
    };

    let attachment = Attachment {
        fallback: alert.output.clone(),
        color: color_for(&alert.priority).to_string(),
        text: if renders_fields {
            alert.output.clone()
        } else {
            String::new()
        },
        fields,
        footer,
    };

    SlackMessage {
        text,
        username: settings.username.clone(),
        icon_url: settings.icon.clone(),
        attachments: vec![attachment],
    }
}
