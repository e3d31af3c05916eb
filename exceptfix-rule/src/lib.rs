//! Rule logic: turn parsed `except` clauses into deterministic fix proposals.
//!
//! This crate owns *what* should be rewritten and why. It does not own *how*
//! fixes are applied to source text; that's the `exceptfix-edit` crate.

mod checker;
mod rules;

pub use checker::Checker;
pub use rules::{AliasTable, Classification, OsErrorAliasRule, Rule, RuleMeta, builtin_rules};
