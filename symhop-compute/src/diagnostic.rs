//! Messages reported by operations that can partially succeed.
//!
//! Operations such as [`Expr::derivative_with`](crate::Expr::derivative_with) accept a
//! [`StepCollector<Diagnostic>`](crate::StepCollector). Pass `&mut ()` to discard the messages,
//! or a `&mut Vec<Diagnostic>` to keep them. Every diagnostic is also mirrored to the [`log`]
//! facade at the matching level.

use crate::symbolic::step_collector::StepCollector;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How serious a [`Diagnostic`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Severity {
    /// The operation completed, but the result may not be what the caller expects.
    Warning,

    /// The operation could not be completed as requested.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A human-readable message produced while processing an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Diagnostic {
    /// The severity of the message.
    pub severity: Severity,

    /// The message itself.
    pub message: String,
}

impl Diagnostic {
    /// Creates a warning.
    pub fn warning(message: impl Into<String>) -> Self {
        Self { severity: Severity::Warning, message: message.into() }
    }

    /// Creates an error.
    pub fn error(message: impl Into<String>) -> Self {
        Self { severity: Severity::Error, message: message.into() }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Logs the diagnostic and hands it to the collector.
pub(crate) fn report(collector: &mut dyn StepCollector<Diagnostic>, diagnostic: Diagnostic) {
    log::warn!("{}", diagnostic);
    collector.push(diagnostic);
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn collects_into_vec() {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        report(&mut diagnostics, Diagnostic::error("Failed to find sorting path."));
        report(&mut diagnostics, Diagnostic::warning("unused"));
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].to_string(), "error: Failed to find sorting path.");
        assert_eq!(diagnostics[1].severity, Severity::Warning);
    }

    #[test]
    fn unit_collector_discards() {
        report(&mut (), Diagnostic::warning("ignored"));
    }
}
