use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record of one file rewritten by the edit engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub path: Utf8PathBuf,
    pub before_sha256: String,
    pub after_sha256: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_bytes: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_bytes: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_at: Option<DateTime<Utc>>,
}

/// Result of applying a fix set to one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyOutcome {
    /// True when the file on disk was rewritten (never in dry-run).
    pub applied: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<FileChange>,
}
