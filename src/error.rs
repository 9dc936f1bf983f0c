//! Error types shared by the Slack output adapter.

use thiserror::Error;

/// Errors raised while compiling or expanding a message template.
///
/// Expansion failures are never fatal for a delivery: the payload builder
/// logs them and sends the message without an overall text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// The template references a variable the alert record does not have.
    #[error("unknown template variable '{0}'")]
    UnknownVariable(String),
    /// The template references an output field that is absent from the alert.
    #[error("output field '{0}' is not present in the alert")]
    MissingField(String),
    /// A `{{` was opened but never closed.
    #[error("unterminated placeholder at byte {0}")]
    Unterminated(usize),
}

/// Errors returned by a transport when a message could not be delivered.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The HTTP request itself failed (connection, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The destination answered with a non-success status code.
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    /// Any other transport-specific failure.
    #[error("{0}")]
    Other(String),
}
