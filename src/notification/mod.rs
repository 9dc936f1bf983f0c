//! The Slack output adapter.
//!
//! - `payload` renders an alert into the webhook message (pure).
//! - `slack` holds the `Transport` trait and the HTTP webhook client.
//! - `adapter` ties both together and reports each delivery outcome.
pub mod adapter;
pub mod payload;
pub mod slack;

pub use adapter::{OutputSinks, SlackOutput};
pub use payload::{build_payload, Attachment, AttachmentField, SlackMessage, SlackSettings};
pub use slack::{SlackClient, Transport};
