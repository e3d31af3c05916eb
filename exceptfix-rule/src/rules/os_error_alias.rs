use crate::rules::{Rule, RuleMeta};
use exceptfix_types::ast::{ExceptHandler, Expr};
use exceptfix_types::diagnostic::{Diagnostic, Fix};
use tracing::debug;

/// Immutable table of deprecated aliases and their canonical replacement.
///
/// Lookups are exact-match on the resolved identity, never substring or fuzzy.
/// Qualified entries only match literal `module.attr` syntax at the use site;
/// import provenance is deliberately never consulted.
#[derive(Debug, Clone)]
pub struct AliasTable {
    builtins: &'static [&'static str],
    qualified: &'static [(&'static str, &'static str)],
    replacement: &'static str,
}

impl Default for AliasTable {
    fn default() -> Self {
        Self {
            builtins: &["EnvironmentError", "IOError", "WindowsError"],
            qualified: &[("mmap", "error"), ("select", "error"), ("socket", "error")],
            replacement: "OSError",
        }
    }
}

impl AliasTable {
    pub fn replacement(&self) -> &'static str {
        self.replacement
    }

    fn is_alias(&self, resolution: &Resolution<'_>) -> bool {
        match resolution {
            Resolution::Builtin(name) => self.builtins.contains(name),
            Resolution::Qualified { module, attr } => self
                .qualified
                .iter()
                .any(|(m, a)| m == module && a == attr),
            Resolution::Unresolvable => false,
        }
    }
}

/// Identity of an exception reference, derived only from syntactic shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution<'a> {
    /// A bare name, e.g. `IOError`.
    Builtin(&'a str),
    /// `module.attr` where the base is a plain name token.
    Qualified { module: &'a str, attr: &'a str },
    /// Any other shape. A parenthesized base (`(mmap).error`), deeper
    /// qualification, or an opaque expression never matches the table.
    Unresolvable,
}

fn resolve(expr: &Expr) -> Resolution<'_> {
    match expr {
        Expr::Name { id, .. } => Resolution::Builtin(id),
        Expr::Attribute { value, attr, .. } => match value.as_ref() {
            Expr::Name { id, .. } => Resolution::Qualified { module: id, attr },
            _ => Resolution::Unresolvable,
        },
        // `(IOError)` still refers to the bare builtin.
        Expr::Paren { inner, .. } => resolve(inner),
        _ => Resolution::Unresolvable,
    }
}

/// Peels redundant outer parentheses so `(IOError)` classifies like `IOError`.
fn unparenthesized(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren { inner, .. } => unparenthesized(inner),
        other => other,
    }
}

/// Outcome of classifying one clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    NoMatch,
    /// Exactly one element survives; rendered without parentheses.
    SingleMatch(String),
    /// More than one element survives; rendered as a parenthesized tuple,
    /// first-seen order.
    TupleMatch(Vec<String>),
}

pub struct OsErrorAliasRule {
    table: AliasTable,
}

impl OsErrorAliasRule {
    pub const RULE_ID: &'static str = "except.os_error_alias";
    const DESCRIPTION: &'static str =
        "Replaces deprecated OS error exception aliases with their canonical name";

    pub fn new() -> Self {
        Self {
            table: AliasTable::default(),
        }
    }

    pub fn with_table(table: AliasTable) -> Self {
        Self { table }
    }

    /// Classify one `except` clause against the alias table.
    ///
    /// `source` is the module's text; untouched tuple elements keep their
    /// original spelling, which is recovered from it.
    pub fn classify(&self, handler: &ExceptHandler, source: &str) -> Classification {
        let Some(exception) = &handler.exception else {
            // Bare `except:` catches everything; nothing to rewrite.
            return Classification::NoMatch;
        };

        match unparenthesized(exception) {
            Expr::Tuple { elts, .. } => self.classify_tuple(elts, source),
            single => {
                if self.table.is_alias(&resolve(single)) {
                    Classification::SingleMatch(self.table.replacement().to_string())
                } else {
                    Classification::NoMatch
                }
            }
        }
    }

    fn classify_tuple(&self, elts: &[Expr], source: &str) -> Classification {
        let mut any_alias = false;
        let mut rendered: Vec<String> = Vec::with_capacity(elts.len());

        for elt in elts {
            if self.table.is_alias(&resolve(elt)) {
                any_alias = true;
                rendered.push(self.table.replacement().to_string());
            } else {
                // Untouched elements keep their original spelling. If the span
                // cannot be recovered the whole clause is left alone: a missed
                // rewrite beats a corrupted one.
                let Some(text) = elt.span().slice(source) else {
                    return Classification::NoMatch;
                };
                rendered.push(text.to_string());
            }
        }

        if !any_alias {
            return Classification::NoMatch;
        }

        // First-occurrence-order textual dedup.
        let mut unique: Vec<String> = Vec::with_capacity(rendered.len());
        for text in rendered {
            if !unique.contains(&text) {
                unique.push(text);
            }
        }

        if unique.len() == 1 {
            Classification::SingleMatch(unique.swap_remove(0))
        } else {
            Classification::TupleMatch(unique)
        }
    }

    /// Produce the fix for one clause, or `None` when it should stay as-is.
    pub fn rewrite(&self, handler: &ExceptHandler, source: &str) -> Option<Fix> {
        let exception = handler.exception.as_ref()?;

        let replacement = match self.classify(handler, source) {
            Classification::NoMatch => return None,
            Classification::SingleMatch(name) => name,
            Classification::TupleMatch(elts) => format!("({})", elts.join(", ")),
        };

        let span = exception.span();
        // Never emit a fix that reproduces the original text.
        if span.slice(source) == Some(replacement.as_str()) {
            return None;
        }

        debug!(
            start = span.start,
            end = span.end,
            replacement = %replacement,
            "rewriting deprecated exception alias"
        );
        Some(Fix::replacement(span, replacement))
    }
}

impl Default for OsErrorAliasRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for OsErrorAliasRule {
    fn meta(&self) -> RuleMeta {
        RuleMeta {
            rule_id: Self::RULE_ID,
            description: Self::DESCRIPTION,
        }
    }

    fn check(&self, handler: &ExceptHandler, source: &str) -> Vec<Diagnostic> {
        let Some(fix) = self.rewrite(handler, source) else {
            return vec![];
        };
        let message = format!(
            "replace deprecated exception alias with `{}`",
            self.table.replacement()
        );
        vec![Diagnostic::new(Self::RULE_ID, message, fix.span).with_fix(fix)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exceptfix_types::span::Span;
    use pretty_assertions::assert_eq;

    // Builds the handler for `except {expr}:` over the given source line,
    // locating `expr` by its text.
    fn name_at(source: &str, id: &str) -> Expr {
        let start = source.find(id).expect("name present in source");
        Expr::name(id, Span::new(start, start + id.len()))
    }

    fn single(expr: Expr) -> ExceptHandler {
        ExceptHandler::new(Some(expr))
    }

    fn qualified(source: &str, module: &str, attr: &str) -> Expr {
        let text = format!("{module}.{attr}");
        let start = source.find(&text).expect("attribute present in source");
        Expr::attribute(
            Expr::name(module, Span::new(start, start + module.len())),
            attr,
            Span::new(start, start + text.len()),
        )
    }

    #[test]
    fn bare_except_is_no_match() {
        let rule = OsErrorAliasRule::new();
        assert_eq!(
            rule.classify(&ExceptHandler::bare(), "except:"),
            Classification::NoMatch
        );
    }

    #[test]
    fn bare_aliases_resolve_to_single_match() {
        let rule = OsErrorAliasRule::new();
        for alias in ["EnvironmentError", "IOError", "WindowsError"] {
            let source = format!("except {alias}:");
            let handler = single(name_at(&source, alias));
            assert_eq!(
                rule.classify(&handler, &source),
                Classification::SingleMatch("OSError".to_string()),
                "alias {alias}"
            );
            let fix = rule.rewrite(&handler, &source).expect("fix");
            assert_eq!(fix.replacement, "OSError");
            assert_eq!(fix.span.slice(&source), Some(alias));
        }
    }

    #[test]
    fn qualified_aliases_resolve_to_single_match() {
        let rule = OsErrorAliasRule::new();
        for module in ["mmap", "select", "socket"] {
            let source = format!("except {module}.error:");
            let handler = single(qualified(&source, module, "error"));
            let fix = rule.rewrite(&handler, &source).expect("fix");
            assert_eq!(fix.replacement, "OSError", "module {module}");
        }
    }

    #[test]
    fn unrelated_builtin_is_untouched() {
        let rule = OsErrorAliasRule::new();
        let source = "except AssertionError:";
        let handler = single(name_at(source, "AssertionError"));
        assert_eq!(rule.rewrite(&handler, source), None);
    }

    #[test]
    fn canonical_name_is_untouched() {
        let rule = OsErrorAliasRule::new();
        let source = "except OSError:";
        let handler = single(name_at(source, "OSError"));
        assert_eq!(rule.classify(&handler, source), Classification::NoMatch);
        assert_eq!(rule.rewrite(&handler, source), None);
    }

    #[test]
    fn parenthesized_base_never_matches() {
        // `(mmap).error` is a distinct binding shape, not the module attribute.
        let rule = OsErrorAliasRule::new();
        let source = "except (mmap).error:";
        let base = Expr::paren(name_at(source, "mmap"), Span::new(7, 13));
        let handler = single(Expr::attribute(base, "error", Span::new(7, 19)));
        assert_eq!(rule.rewrite(&handler, source), None);
    }

    #[test]
    fn deep_qualification_never_matches() {
        let rule = OsErrorAliasRule::new();
        let source = "except os.path.error:";
        let inner = Expr::attribute(name_at(source, "os"), "path", Span::new(7, 14));
        let handler = single(Expr::attribute(inner, "error", Span::new(7, 20)));
        assert_eq!(rule.classify(&handler, source), Classification::NoMatch);
    }

    #[test]
    fn redundant_parens_around_single_alias_collapse() {
        let rule = OsErrorAliasRule::new();
        let source = "except (IOError):";
        let inner = name_at(source, "IOError");
        let handler = single(Expr::paren(inner, Span::new(7, 16)));
        let fix = rule.rewrite(&handler, source).expect("fix");
        assert_eq!(fix.replacement, "OSError");
        assert_eq!(fix.span.slice(source), Some("(IOError)"));
    }

    #[test]
    fn single_element_tuple_loses_parentheses() {
        let rule = OsErrorAliasRule::new();
        let source = "except (IOError,):";
        let handler = single(Expr::tuple(
            vec![name_at(source, "IOError")],
            Span::new(7, 17),
        ));
        let fix = rule.rewrite(&handler, source).expect("fix");
        assert_eq!(fix.replacement, "OSError");
        assert_eq!(fix.span.slice(source), Some("(IOError,)"));
    }

    #[test]
    fn all_alias_tuple_collapses_to_one_name() {
        let rule = OsErrorAliasRule::new();
        let source = "except (EnvironmentError, IOError, OSError):";
        let handler = single(Expr::tuple(
            vec![
                name_at(source, "EnvironmentError"),
                name_at(source, "IOError"),
                name_at(source, "OSError"),
            ],
            Span::new(7, 43),
        ));
        assert_eq!(
            rule.classify(&handler, source),
            Classification::SingleMatch("OSError".to_string())
        );
        let fix = rule.rewrite(&handler, source).expect("fix");
        assert_eq!(fix.replacement, "OSError");
    }

    #[test]
    fn mixed_tuple_stays_parenthesized_in_first_seen_order() {
        let rule = OsErrorAliasRule::new();
        let source = "except (IOError, KeyError, OSError):";
        let handler = single(Expr::tuple(
            vec![
                name_at(source, "IOError"),
                name_at(source, "KeyError"),
                name_at(source, "OSError"),
            ],
            Span::new(7, 35),
        ));
        assert_eq!(
            rule.classify(&handler, source),
            Classification::TupleMatch(vec!["OSError".to_string(), "KeyError".to_string()])
        );
        let fix = rule.rewrite(&handler, source).expect("fix");
        assert_eq!(fix.replacement, "(OSError, KeyError)");
    }

    #[test]
    fn unresolvable_tuple_element_is_kept() {
        // `error` imported via `from foo import error` is a bare local name,
        // not `foo.error`; it must survive the rewrite untouched.
        let rule = OsErrorAliasRule::new();
        let source = "except (IOError, error):";
        let handler = single(Expr::tuple(
            vec![name_at(source, "IOError"), name_at(source, "error")],
            Span::new(7, 23),
        ));
        let fix = rule.rewrite(&handler, source).expect("fix");
        assert_eq!(fix.replacement, "(OSError, error)");
    }

    #[test]
    fn tuple_without_aliases_is_untouched() {
        let rule = OsErrorAliasRule::new();
        let source = "except (OSError, KeyError):";
        let handler = single(Expr::tuple(
            vec![name_at(source, "OSError"), name_at(source, "KeyError")],
            Span::new(7, 26),
        ));
        assert_eq!(rule.classify(&handler, source), Classification::NoMatch);
        assert_eq!(rule.rewrite(&handler, source), None);
    }

    #[test]
    fn tuple_with_opaque_element_keeps_its_spelling() {
        let rule = OsErrorAliasRule::new();
        let source = "except (IOError, get_errors()):";
        let handler = single(Expr::tuple(
            vec![
                name_at(source, "IOError"),
                Expr::Other {
                    span: Span::new(17, 29),
                },
            ],
            Span::new(7, 30),
        ));
        let fix = rule.rewrite(&handler, source).expect("fix");
        assert_eq!(fix.replacement, "(OSError, get_errors())");
    }

    #[test]
    fn broken_span_degrades_to_no_match() {
        let rule = OsErrorAliasRule::new();
        let source = "except (IOError, error):";
        let handler = single(Expr::tuple(
            vec![
                name_at(source, "IOError"),
                Expr::name("error", Span::new(90, 95)),
            ],
            Span::new(7, 23),
        ));
        assert_eq!(rule.classify(&handler, source), Classification::NoMatch);
    }

    #[test]
    fn rewrite_is_idempotent() {
        let rule = OsErrorAliasRule::new();
        let source = "except IOError:";
        let handler = single(name_at(source, "IOError"));
        let fix = rule.rewrite(&handler, source).expect("fix");

        let rewritten = format!(
            "{}{}{}",
            &source[..fix.span.start],
            fix.replacement,
            &source[fix.span.end..]
        );
        assert_eq!(rewritten, "except OSError:");

        let start = rewritten.find("OSError").expect("name");
        let again = single(Expr::name("OSError", Span::new(start, start + 7)));
        assert_eq!(rule.rewrite(&again, &rewritten), None);
    }

    #[test]
    fn check_emits_one_diagnostic_with_fix() {
        let rule = OsErrorAliasRule::new();
        let source = "except IOError:";
        let handler = single(name_at(source, "IOError"));
        let diags = rule.check(&handler, source);
        assert_eq!(diags.len(), 1);
        let diag = &diags[0];
        assert_eq!(diag.rule_id, OsErrorAliasRule::RULE_ID);
        assert_eq!(diag.span, Span::new(7, 14));
        assert_eq!(diag.fix.as_ref().expect("fix").replacement, "OSError");
    }

    #[test]
    fn check_stays_silent_on_no_match() {
        let rule = OsErrorAliasRule::new();
        assert!(rule.check(&ExceptHandler::bare(), "except:").is_empty());
    }
}
