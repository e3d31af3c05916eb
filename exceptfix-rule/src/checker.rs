use crate::rules::{self, Rule};
use camino::Utf8Path;
use exceptfix_types::ast::ExceptHandler;
use exceptfix_types::diagnostic::Diagnostic;
use tracing::debug;
use uuid::Uuid;

/// Runs the rules over the `except` clauses of one parsed module.
///
/// Each clause is independent: classification depends only on its own syntax,
/// so output order is made deterministic here (by span, then rule id) rather
/// than by traversal order.
pub struct Checker {
    rules: Vec<Box<dyn Rule>>,
}

impl Default for Checker {
    fn default() -> Self {
        Self::new()
    }
}

impl Checker {
    pub fn new() -> Self {
        Self {
            rules: rules::builtin_rules(),
        }
    }

    pub fn with_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    /// Check every handler of one module. `source` is the module's text;
    /// `path`, when given, is stamped onto each diagnostic.
    pub fn check_module(
        &self,
        handlers: &[ExceptHandler],
        source: &str,
        path: Option<&Utf8Path>,
    ) -> Vec<Diagnostic> {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        for handler in handlers {
            for rule in &self.rules {
                let mut found = rule.check(handler, source);
                diagnostics.append(&mut found);
            }
        }

        // Deterministic ordering.
        diagnostics.sort_by(|a, b| (a.span, &a.rule_id).cmp(&(b.span, &b.rule_id)));

        // Deterministic ids.
        for diag in diagnostics.iter_mut() {
            if let Some(path) = path {
                diag.path = Some(path.to_path_buf());
            }
            if diag.id.trim().is_empty() {
                diag.id = deterministic_diag_id(diag).to_string();
            }
        }

        debug!(count = diagnostics.len(), "checked module");
        diagnostics
    }
}

fn deterministic_diag_id(diag: &Diagnostic) -> Uuid {
    // Deterministic ID: v5(namespace, stable_key_bytes)
    const NAMESPACE: Uuid = Uuid::from_bytes([
        0x7e, 0x21, 0x9c, 0x04, 0x5a, 0x33, 0x4f, 0x6b, 0x91, 0x2d, 0xc8, 0x70, 0x1f, 0xae, 0x64,
        0x02,
    ]);

    let replacement = diag
        .fix
        .as_ref()
        .map(|f| f.replacement.as_str())
        .unwrap_or("-");
    let stable_key = format!(
        "{}|{}|{}|{}",
        diag.rule_id, diag.span.start, diag.span.end, replacement
    );
    Uuid::new_v5(&NAMESPACE, stable_key.as_bytes())
}
