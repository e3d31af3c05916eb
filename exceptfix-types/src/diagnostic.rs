use crate::span::Span;
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// A source rewrite proposed by a rule: replace the text covered by `span`
/// with `replacement`. Application is the edit engine's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fix {
    pub span: Span,
    pub replacement: String,
}

impl Fix {
    pub fn replacement(span: Span, replacement: impl Into<String>) -> Self {
        Self {
            span,
            replacement: replacement.into(),
        }
    }
}

/// One rule finding, with an optional autofix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Deterministic instance id, assigned by the checker.
    pub id: String,

    /// Stable rule identifier, e.g. `except.os_error_alias`.
    pub rule_id: String,

    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Utf8PathBuf>,

    /// Span of the offending exception expression.
    pub span: Span,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
}

impl Diagnostic {
    pub fn new(rule_id: impl Into<String>, message: impl Into<String>, span: Span) -> Self {
        Self {
            id: String::new(),
            rule_id: rule_id.into(),
            message: message.into(),
            path: None,
            span,
            fix: None,
        }
    }

    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }
}
