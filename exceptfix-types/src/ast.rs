use crate::span::Span;
use serde::{Deserialize, Serialize};

/// Syntactic shape of an exception expression, as supplied by the external
/// parser.
///
/// Parentheses are preserved structurally (`Paren`), so `(mmap).error` and
/// `mmap.error` are distinct trees. Shapes the rules never inspect collapse
/// into `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expr {
    /// A bare name token, e.g. `IOError`.
    Name { id: String, span: Span },
    /// Attribute access off a base expression, e.g. `mmap.error`.
    Attribute {
        value: Box<Expr>,
        attr: String,
        span: Span,
    },
    /// A parenthesized expression, e.g. the `(mmap)` in `(mmap).error`.
    Paren { inner: Box<Expr>, span: Span },
    /// An ordered sequence of exception expressions, e.g. `(IOError, KeyError)`.
    /// The span covers the parentheses.
    Tuple { elts: Vec<Expr>, span: Span },
    /// Any other expression shape.
    Other { span: Span },
}

impl Expr {
    pub fn name(id: impl Into<String>, span: Span) -> Self {
        Expr::Name {
            id: id.into(),
            span,
        }
    }

    pub fn attribute(value: Expr, attr: impl Into<String>, span: Span) -> Self {
        Expr::Attribute {
            value: Box::new(value),
            attr: attr.into(),
            span,
        }
    }

    pub fn paren(inner: Expr, span: Span) -> Self {
        Expr::Paren {
            inner: Box::new(inner),
            span,
        }
    }

    pub fn tuple(elts: Vec<Expr>, span: Span) -> Self {
        Expr::Tuple { elts, span }
    }

    pub fn span(&self) -> Span {
        match self {
            Expr::Name { span, .. }
            | Expr::Attribute { span, .. }
            | Expr::Paren { span, .. }
            | Expr::Tuple { span, .. }
            | Expr::Other { span } => *span,
        }
    }
}

/// One `except` clause of a `try` statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptHandler {
    /// The exception expression; `None` for a bare `except:`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<Expr>,
}

impl ExceptHandler {
    pub fn new(exception: Option<Expr>) -> Self {
        Self { exception }
    }

    pub fn bare() -> Self {
        Self { exception: None }
    }
}
