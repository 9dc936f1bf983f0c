//! Message templates for the overall notification text.
//!
//! A template is plain text with `{{ .Name }}` placeholders, compiled once
//! when the adapter is built and rendered against every alert:
//!
//! ```text
//! {{ .Priority }} on {{ .Hostname }}: {{ .Rule }} ({{ .OutputFields.proc.name }})
//! ```
//!
//! Supported names are `Rule`, `Priority`, `Output`, `Time`, `Source`,
//! `Hostname`, `Tags` and `OutputFields.<key>`. The leading dot is optional.

use crate::core::Alert;
use crate::error::TemplateError;

/// A compiled template that can be expanded against an alert.
pub trait MessageTemplate: Send + Sync + std::fmt::Debug {
    fn render(&self, alert: &Alert) -> Result<String, TemplateError>;
}

#[derive(Debug, Clone, PartialEq)]
enum Variable {
    Rule,
    Priority,
    Output,
    Time,
    Source,
    Hostname,
    Tags,
    OutputField(String),
}

impl Variable {
    fn parse(name: &str) -> Result<Self, TemplateError> {
        let name = name.strip_prefix('.').unwrap_or(name);
        if let Some(key) = name.strip_prefix("OutputFields.") {
            if !key.is_empty() {
                return Ok(Variable::OutputField(key.to_string()));
            }
        }
        match name {
            "Rule" => Ok(Variable::Rule),
            "Priority" => Ok(Variable::Priority),
            "Output" => Ok(Variable::Output),
            "Time" => Ok(Variable::Time),
            "Source" => Ok(Variable::Source),
            "Hostname" => Ok(Variable::Hostname),
            "Tags" => Ok(Variable::Tags),
            other => Err(TemplateError::UnknownVariable(other.to_string())),
        }
    }

    fn expand(&self, alert: &Alert, out: &mut String) -> Result<(), TemplateError> {
        match self {
            Variable::Rule => out.push_str(&alert.rule),
            Variable::Priority => out.push_str(&alert.priority),
            Variable::Output => out.push_str(&alert.output),
            Variable::Time => out.push_str(&alert.time.to_rfc3339()),
            Variable::Source => out.push_str(&alert.source),
            Variable::Hostname => out.push_str(&alert.hostname),
            Variable::Tags => out.push_str(&alert.tags.join(",")),
            Variable::OutputField(key) => {
                let value = alert
                    .output_fields
                    .get(key)
                    .ok_or_else(|| TemplateError::MissingField(key.clone()))?;
                out.push_str(&value.to_string());
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Variable(Variable),
}

/// A `{{ .Name }}` placeholder template.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderTemplate {
    segments: Vec<Segment>,
}

impl PlaceholderTemplate {
    /// Parses a template, rejecting unknown variables and unclosed placeholders.
    pub fn compile(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut offset = 0;

        while let Some(open) = rest.find("{{") {
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            let after_open = &rest[open + 2..];
            let close = after_open
                .find("}}")
                .ok_or(TemplateError::Unterminated(offset + open))?;
            let name = after_open[..close].trim();
            segments.push(Segment::Variable(Variable::parse(name)?));

            let consumed = open + 2 + close + 2;
            offset += consumed;
            rest = &rest[consumed..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self { segments })
    }
}

impl MessageTemplate for PlaceholderTemplate {
    fn render(&self, alert: &Alert) -> Result<String, TemplateError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Variable(var) => var.expand(alert, &mut out)?,
            }
        }
        Ok(out)
    }
}
