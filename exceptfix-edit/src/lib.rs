//! Edit engine for exceptfix fix records.
//!
//! Responsibilities:
//! - Apply fix records to source text (in-memory or to disk).
//! - Guard disk applications with sha256 file preconditions.
//! - Generate a unified diff preview.

mod error;

pub use error::{EditError, EditResult, InvalidFixError};

use anyhow::Context;
use camino::Utf8Path;
use chrono::Utc;
use diffy::PatchFormatter;
use exceptfix_types::apply::{ApplyOutcome, FileChange};
use exceptfix_types::diagnostic::Fix;
use fs_err as fs;
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// When true, nothing is written; the outcome and patch are still produced.
    pub dry_run: bool,

    /// Expected sha256 of the file at apply time. Set this from
    /// [`file_sha256`] when the fixes are planned.
    pub expected_sha256: Option<String>,
}

/// Apply a set of fix records to `source`.
///
/// Fixes are applied in span order regardless of input order. The set is
/// rejected when any two spans overlap or any span does not slice `source`
/// cleanly.
pub fn apply_fixes(source: &str, fixes: &[Fix]) -> EditResult<String> {
    let mut ordered: Vec<&Fix> = fixes.iter().collect();
    ordered.sort_by_key(|f| f.span);

    for pair in ordered.windows(2) {
        if pair[0].span.overlaps(pair[1].span) {
            return Err(InvalidFixError::Overlap {
                first: pair[0].span,
                second: pair[1].span,
            }
            .into());
        }
    }

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0usize;
    for fix in ordered {
        let span = fix.span;
        if span.slice(source).is_none() || span.start < cursor {
            return Err(InvalidFixError::BadSpan { span }.into());
        }
        let gap = source
            .get(cursor..span.start)
            .ok_or(InvalidFixError::BadSpan { span })?;
        out.push_str(gap);
        out.push_str(&fix.replacement);
        cursor = span.end;
    }
    let tail = source
        .get(cursor..)
        .ok_or(InvalidFixError::BadSpan {
            span: exceptfix_types::span::Span::new(cursor, source.len()),
        })?;
    out.push_str(tail);

    Ok(out)
}

/// Render a unified diff preview for a fix set without touching the file.
pub fn preview_patch(path: &Utf8Path, source: &str, fixes: &[Fix]) -> EditResult<String> {
    let after = apply_fixes(source, fixes)?;
    Ok(render_patch(path, source, &after))
}

/// Apply a fix set to one file on disk.
///
/// When `opts.dry_run` is true no bytes are written, but the outcome and a
/// patch are still produced.
pub fn apply_fixes_to_file(
    path: &Utf8Path,
    fixes: &[Fix],
    opts: &ApplyOptions,
) -> EditResult<(ApplyOutcome, String)> {
    let before = fs::read_to_string(path)
        .with_context(|| format!("read {}", path))
        .map_err(EditError::Runtime)?;

    if let Some(expected) = &opts.expected_sha256 {
        let actual = sha256_hex(before.as_bytes());
        if &actual != expected {
            return Err(InvalidFixError::PreconditionMismatch {
                message: format!("sha mismatch for {}: expected {}, got {}", path, expected, actual),
            }
            .into());
        }
    }

    let after = apply_fixes(&before, fixes)?;
    let patch = render_patch(path, &before, &after);
    let changed = before != after;

    if changed && !opts.dry_run {
        fs::write(path, &after)
            .with_context(|| format!("write {}", path))
            .map_err(EditError::Runtime)?;
    }

    let outcome = ApplyOutcome {
        applied: changed && !opts.dry_run,
        change: changed.then(|| file_change(path, &before, &after)),
    };
    Ok((outcome, patch))
}

/// sha256 of a file's current contents, for precondition capture at plan time.
pub fn file_sha256(path: &Utf8Path) -> EditResult<String> {
    let bytes = fs::read(path)
        .with_context(|| format!("read {}", path))
        .map_err(EditError::Runtime)?;
    Ok(sha256_hex(&bytes))
}

fn file_change(path: &Utf8Path, before: &str, after: &str) -> FileChange {
    let before_bytes = before.as_bytes();
    let after_bytes = after.as_bytes();
    FileChange {
        path: path.to_path_buf(),
        before_sha256: sha256_hex(before_bytes),
        after_sha256: sha256_hex(after_bytes),
        before_bytes: Some(before_bytes.len() as u64),
        after_bytes: Some(after_bytes.len() as u64),
        applied_at: Some(Utc::now()),
    }
}

fn render_patch(path: &Utf8Path, before: &str, after: &str) -> String {
    if before == after {
        return String::new();
    }

    let mut out = String::new();
    let formatter = PatchFormatter::new();
    out.push_str(&format!("diff --git a/{0} b/{0}\n", path));
    out.push_str(&format!("--- a/{0}\n+++ b/{0}\n", path));
    let patch = diffy::create_patch(before, after);
    out.push_str(&format!("{}", formatter.fmt_patch(&patch)));
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
