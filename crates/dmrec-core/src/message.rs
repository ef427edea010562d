//! # Validation Messages — Non-Fatal Diagnostics
//!
//! Defines [`ValidationMessage`], the structured diagnostic retained on a
//! successfully constructed instance. Errors are never stored as messages:
//! a fatal rule violation aborts construction with a
//! [`DmrecError`](crate::error::DmrecError) before the instance becomes
//! observable. Only warnings survive onto the finished value.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of a validation message.
///
/// `Error` exists for interface completeness with external rule engines
/// that emit both kinds; the framework itself only ever retains `Warning`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Fatal; aborts construction and is never stored on an instance.
    Error,
    /// Tolerated shape worth reporting; retained on the instance.
    Warning,
}

/// A single validation diagnostic with its origin path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationMessage {
    /// Whether this message is fatal or advisory.
    pub severity: Severity,
    /// Human-readable description of the condition.
    pub text: String,
    /// Slash-delimited path to the element that triggered the message.
    pub locator: String,
}

impl ValidationMessage {
    /// Build a warning anchored at the given locator.
    pub fn warning(text: impl Into<String>, locator: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            text: text.into(),
            locator: locator.into(),
        }
    }

    /// Returns a copy of this message with an ancestor segment prepended
    /// to the locator. Used when a parent aggregates child warnings.
    #[must_use]
    pub fn nested_under(&self, segment: &str) -> Self {
        Self {
            severity: self.severity,
            text: self.text.clone(),
            locator: format!("/{segment}{}", self.locator),
        }
    }
}

impl fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "[{severity}] {}: {}", self.locator, self.text)
    }
}
