//! Structured diagnostics for validation and contract checks.
//!
//! Checks never abort early; each appends zero or more diagnostics so the
//! caller receives the full error set in one pass.

use std::fmt;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
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

/// A single structured diagnostic.
///
/// The message always names the specific file, map, entity, or id and the
/// exact rule violated.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Machine-readable code (e.g. "kiln::validate::missing-layer").
    pub code: String,
    pub message: String,
    /// Optional remediation hint.
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code: code.into(),
            message: message.into(),
            help: None,
        }
    }

    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code: code.into(),
            message: message.into(),
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// An ordered collection of diagnostics from one or more checks.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticList {
    items: Vec<Diagnostic>,
}

impl DiagnosticList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn merge(&mut self, other: DiagnosticList) {
        self.items.extend(other.items);
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.items
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }
}

impl IntoIterator for DiagnosticList {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl FromIterator<Diagnostic> for DiagnosticList {
    fn from_iter<T: IntoIterator<Item = Diagnostic>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list() {
        let list = DiagnosticList::new();
        assert!(list.is_empty());
        assert!(!list.has_errors());
        assert_eq!(list.error_count(), 0);
    }

    #[test]
    fn test_error_counts() {
        let mut list = DiagnosticList::new();
        list.push(Diagnostic::error("kiln::test", "broken"));
        list.push(Diagnostic::warning("kiln::test", "suspicious"));

        assert!(list.has_errors());
        assert_eq!(list.error_count(), 1);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_merge_preserves_order() {
        let mut a = DiagnosticList::new();
        a.push(Diagnostic::error("kiln::a", "first"));

        let mut b = DiagnosticList::new();
        b.push(Diagnostic::error("kiln::b", "second"));

        a.merge(b);
        let messages: Vec<&str> = a.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[test]
    fn test_with_help() {
        let d = Diagnostic::error("kiln::test", "missing layer")
            .with_help("Add the layer in the map editor");
        assert_eq!(d.help.as_deref(), Some("Add the layer in the map editor"));
    }
}
