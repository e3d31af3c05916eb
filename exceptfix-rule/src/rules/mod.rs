use exceptfix_types::ast::ExceptHandler;
use exceptfix_types::diagnostic::Diagnostic;

mod os_error_alias;

pub use os_error_alias::{AliasTable, Classification, OsErrorAliasRule};

/// Static description of a rule.
#[derive(Debug, Clone, Copy)]
pub struct RuleMeta {
    pub rule_id: &'static str,
    pub description: &'static str,
}

/// One autofix rule, invoked once per `except` clause.
///
/// Rules never fail: resolution ambiguity degrades to "no diagnostic", so a
/// rule either proposes fixes or stays silent.
pub trait Rule {
    fn meta(&self) -> RuleMeta;

    /// `source` is the module's text; rules use it to recover the original
    /// spelling of sub-expressions they leave untouched.
    fn check(&self, handler: &ExceptHandler, source: &str) -> Vec<Diagnostic>;
}

pub fn builtin_rules() -> Vec<Box<dyn Rule>> {
    vec![Box::new(OsErrorAliasRule::new())]
}
