//! Core data models shared by storage, ingest, and the CLI commands.

use serde::Serialize;
use std::path::PathBuf;

/// A stored document: extracted, normalized text plus provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub id: i64,
    pub source_path: String,
    pub title: String,
    /// Hex SHA-256 of the source file bytes. Unique across the store.
    pub sha256: String,
    pub text: String,
    /// Local time of first ingest, ISO 8601 to the second.
    pub created_at: String,
}

/// A full-text search hit.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub id: i64,
    pub title: String,
    pub source_path: String,
    /// Negated bm25: higher is a better match.
    pub score: f64,
    pub snippet: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestStatus {
    /// A new row was inserted.
    New,
    /// Content already stored; path/title/text refreshed.
    Updated,
    Skipped,
}

impl IngestStatus {
    /// Short label used in the ingest table.
    pub fn label(self) -> &'static str {
        match self {
            IngestStatus::New => "NEW",
            IngestStatus::Updated => "UPD",
            IngestStatus::Skipped => "SKIP",
        }
    }
}

/// What happened to one input file during ingest.
#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    pub path: PathBuf,
    pub status: IngestStatus,
    pub doc_id: Option<i64>,
    /// `"ok"` on success, otherwise the skip reason.
    pub note: String,
}

impl IngestOutcome {
    pub fn stored(path: PathBuf, doc_id: i64, inserted: bool) -> Self {
        Self {
            path,
            status: if inserted {
                IngestStatus::New
            } else {
                IngestStatus::Updated
            },
            doc_id: Some(doc_id),
            note: "ok".to_string(),
        }
    }

    pub fn skipped(path: PathBuf, reason: impl Into<String>) -> Self {
        Self {
            path,
            status: IngestStatus::Skipped,
            doc_id: None,
            note: reason.into(),
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.status == IngestStatus::Skipped
    }
}
