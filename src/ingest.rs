//! Ingestion pipeline.
//!
//! For every file found under the inputs: check extension and size, hash
//! the raw bytes, extract text, normalize whitespace, guess a title, and
//! upsert. Each file yields exactly one [`IngestOutcome`]; per-file
//! failures become skips, never errors.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::extract::{self, Format};
use crate::migrate;
use crate::models::{IngestOutcome, IngestStatus};
use crate::progress::{IngestProgressEvent, ProgressMode, ProgressReporter};
use crate::scan;
use crate::store;

const MAX_TITLE_CHARS: usize = 140;
const MIN_TITLE_ALNUM: usize = 3;
pub const EMPTY_TEXT_REASON: &str = "empty text (maybe scanned PDF?)";

static BLANK_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("blank-run pattern compiles"));

/// Unify line endings, cap blank runs at one empty line, trim every line.
pub fn normalize_whitespace(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    let collapsed = BLANK_RUN_RE.replace_all(&unified, "\n\n");
    collapsed
        .split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// First short, mostly-alphanumeric line of `text`, else the file stem.
pub fn guess_title(path: &Path, text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| line.chars().count() <= MAX_TITLE_CHARS)
        .find(|line| line.chars().filter(|c| c.is_alphanumeric()).count() >= MIN_TITLE_ALNUM)
        .map(str::to_string)
        .unwrap_or_else(|| {
            path.file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default()
        })
}

/// Hex SHA-256 of a file, read in 1 MiB blocks.
pub fn sha256_file(path: &Path) -> std::io::Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 1024 * 1024];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

async fn ingest_file(config: &Config, pool: &SqlitePool, path: PathBuf) -> Result<IngestOutcome> {
    let ext = extract::extension_of(&path);
    let supported = config.ingest.extensions.iter().any(|e| e == &ext)
        && Format::from_extension(&ext).is_some();
    if !supported {
        return Ok(IngestOutcome::skipped(path, "unsupported extension"));
    }

    let size = match std::fs::metadata(&path) {
        Ok(m) => m.len(),
        Err(e) => return Ok(IngestOutcome::skipped(path, format!("stat failed: {}", e))),
    };
    if size > config.ingest.max_file_bytes {
        return Ok(IngestOutcome::skipped(
            path,
            format!(
                "file too large ({} bytes > {})",
                size, config.ingest.max_file_bytes
            ),
        ));
    }

    let hash = match sha256_file(&path) {
        Ok(h) => h,
        Err(e) => return Ok(IngestOutcome::skipped(path, format!("hash failed: {}", e))),
    };

    // Extractors are CPU-bound and third-party parsers may panic on
    // malformed input; a panic surfaces here as a JoinError.
    let extract_path = path.clone();
    let extracted = tokio::task::spawn_blocking(move || extract::extract_file(&extract_path)).await;
    let raw = match extracted {
        Ok(Ok(raw)) => raw,
        Ok(Err(e)) => return Ok(IngestOutcome::skipped(path, format!("extract failed: {}", e))),
        Err(e) => {
            return Ok(IngestOutcome::skipped(
                path,
                format!("extract failed: extractor aborted ({})", e),
            ))
        }
    };

    let text = normalize_whitespace(&raw);
    if text.is_empty() {
        return Ok(IngestOutcome::skipped(path, EMPTY_TEXT_REASON));
    }

    let title = guess_title(&path, &text);
    let source_path = std::fs::canonicalize(&path)
        .unwrap_or_else(|_| path.clone())
        .to_string_lossy()
        .to_string();
    let created_at = chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string();

    let (doc_id, inserted) =
        store::upsert_document(pool, &source_path, &title, &hash, &text, &created_at).await?;
    Ok(IngestOutcome::stored(path, doc_id, inserted))
}

/// Ingest files and directories into the store.
///
/// Only storage failures abort the run; everything else is reported per
/// file in the returned outcomes.
pub async fn ingest_paths(
    config: &Config,
    pool: &SqlitePool,
    inputs: &[PathBuf],
    progress: &dyn ProgressReporter,
) -> Result<Vec<IngestOutcome>> {
    progress.report(IngestProgressEvent::Discovering {
        inputs: inputs.len(),
    });
    let files = scan::collect_files(&config.ingest, inputs)?;
    let total = files.len() as u64;
    tracing::info!(files = total, "ingest started");

    let mut outcomes = Vec::with_capacity(files.len());
    for (i, path) in files.into_iter().enumerate() {
        let shown = path.display().to_string();
        let outcome = ingest_file(config, pool, path).await?;
        match outcome.status {
            IngestStatus::Skipped => {
                tracing::warn!(path = %shown, reason = %outcome.note, "skipped")
            }
            _ => tracing::debug!(path = %shown, id = ?outcome.doc_id, "ingested"),
        }
        outcomes.push(outcome);
        progress.report(IngestProgressEvent::Ingesting {
            n: i as u64 + 1,
            total,
            path: shown,
        });
    }
    Ok(outcomes)
}

pub async fn run_ingest(
    config: &Config,
    inputs: &[PathBuf],
    mode: ProgressMode,
    json: bool,
) -> Result<()> {
    let pool = migrate::open(config).await?;
    let reporter = mode.reporter();
    let outcomes = ingest_paths(config, &pool, inputs, reporter.as_ref()).await?;
    pool.close().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
        return Ok(());
    }

    println!("{:<60} {:<6} {:>6}  NOTE", "PATH", "STATUS", "DOCID");
    for o in &outcomes {
        let doc_id = o
            .doc_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<60} {:<6} {:>6}  {}",
            o.path.display(),
            o.status.label(),
            doc_id,
            o.note
        );
    }

    let count = |s: IngestStatus| outcomes.iter().filter(|o| o.status == s).count();
    println!();
    println!(
        "ingested: {} new, {} updated, {} skipped",
        count(IngestStatus::New),
        count(IngestStatus::Updated),
        count(IngestStatus::Skipped)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_blank_runs_and_trims_lines() {
        let raw = "  Title  \r\n\r\n\r\n\r\nBody line one \rBody line two\n\n\n";
        assert_eq!(
            normalize_whitespace(raw),
            "Title\n\nBody line one\nBody line two"
        );
    }

    #[test]
    fn normalize_keeps_single_blank_lines() {
        assert_eq!(normalize_whitespace("a\n\nb"), "a\n\nb");
        assert_eq!(normalize_whitespace("   \n  \t "), "");
    }

    #[test]
    fn title_skips_punctuation_and_long_lines() {
        let long = "x".repeat(141);
        let text = format!("***\n\n{}\nReal Title Here\nbody", long);
        assert_eq!(guess_title(Path::new("/tmp/doc.pdf"), &text), "Real Title Here");
    }

    #[test]
    fn title_falls_back_to_stem() {
        assert_eq!(guess_title(Path::new("/tmp/report-2024.pdf"), "-- !!\n.."), "report-2024");
        assert_eq!(guess_title(Path::new("notes.txt"), ""), "notes");
    }

    #[test]
    fn title_counts_cjk_as_alphanumeric() {
        assert_eq!(guess_title(Path::new("a.txt"), "社会システム\n本文"), "社会システム");
    }

    #[test]
    fn sha256_matches_known_digest() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("abc.txt");
        std::fs::write(&path, b"abc").unwrap();
        assert_eq!(
            sha256_file(&path).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
