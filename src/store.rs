//! Document storage queries.
//!
//! All functions take a pool opened through [`crate::migrate::open`]. Rows in
//! `docs` are keyed by an autoincrement id and deduplicated by the SHA-256 of
//! the source file, so re-ingesting identical bytes from a new location
//! refreshes the existing row instead of adding one.

use anyhow::{Context, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::models::{Document, SearchHit};

fn document_from_row(row: &SqliteRow) -> Document {
    Document {
        id: row.get("id"),
        source_path: row.get("source_path"),
        title: row.get("title"),
        sha256: row.get("sha256"),
        text: row.get("text"),
        created_at: row.get("created_at"),
    }
}

/// Insert a document, or refresh the row that already has this content hash.
///
/// Returns `(id, inserted)`. An existing row keeps its id and `created_at`.
pub async fn upsert_document(
    pool: &SqlitePool,
    source_path: &str,
    title: &str,
    sha256: &str,
    text: &str,
    created_at: &str,
) -> Result<(i64, bool)> {
    let mut tx = pool.begin().await?;

    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM docs WHERE sha256 = ?")
        .bind(sha256)
        .fetch_optional(&mut *tx)
        .await?;

    let result = match existing {
        Some(id) => {
            sqlx::query("UPDATE docs SET source_path = ?, title = ?, text = ? WHERE id = ?")
                .bind(source_path)
                .bind(title)
                .bind(text)
                .bind(id)
                .execute(&mut *tx)
                .await?;
            (id, false)
        }
        None => {
            let done = sqlx::query(
                "INSERT INTO docs (source_path, title, sha256, text, created_at) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(source_path)
            .bind(title)
            .bind(sha256)
            .bind(text)
            .bind(created_at)
            .execute(&mut *tx)
            .await?;
            (done.last_insert_rowid(), true)
        }
    };

    tx.commit().await?;
    tracing::debug!(id = result.0, inserted = result.1, path = source_path, "document stored");
    Ok(result)
}

/// All documents, id ascending.
pub async fn list_documents(pool: &SqlitePool) -> Result<Vec<Document>> {
    let rows = sqlx::query(
        "SELECT id, source_path, title, sha256, text, created_at FROM docs ORDER BY id ASC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(document_from_row).collect())
}

pub async fn get_document(pool: &SqlitePool, id: i64) -> Result<Option<Document>> {
    let row = sqlx::query(
        "SELECT id, source_path, title, sha256, text, created_at FROM docs WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.as_ref().map(document_from_row))
}

/// Like [`get_document`], but a missing id is an error.
pub async fn require_document(pool: &SqlitePool, id: i64) -> Result<Document> {
    get_document(pool, id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("document not found: {}", id))
}

/// Full-text search over title and text using FTS5 query syntax.
///
/// Hits are ordered by bm25 (best first), ties by id. A blank query
/// matches nothing.
pub async fn search_documents(pool: &SqlitePool, query: &str, top: i64) -> Result<Vec<SearchHit>> {
    if query.trim().is_empty() || top < 1 {
        return Ok(Vec::new());
    }

    let rows = sqlx::query(
        r#"
        SELECT d.id, d.title, d.source_path,
               bm25(docs_fts) AS bm25,
               snippet(docs_fts, 1, '>>>', '<<<', '...', 16) AS snippet
        FROM docs_fts
        JOIN docs d ON d.id = docs_fts.rowid
        WHERE docs_fts MATCH ?
        ORDER BY bm25 ASC, d.id ASC
        LIMIT ?
        "#,
    )
    .bind(query)
    .bind(top)
    .fetch_all(pool)
    .await
    .with_context(|| format!("search failed for query '{}'", query))?;

    let hits = rows
        .iter()
        .map(|row| {
            let bm25: f64 = row.get("bm25");
            SearchHit {
                id: row.get("id"),
                title: row.get("title"),
                source_path: row.get("source_path"),
                score: -bm25, // negate so higher = better
                snippet: row.get("snippet"),
            }
        })
        .collect();
    Ok(hits)
}

/// Delete a document and its index entry. Returns false when the id is unknown.
pub async fn delete_document(pool: &SqlitePool, id: i64) -> Result<bool> {
    let done = sqlx::query("DELETE FROM docs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(done.rows_affected() > 0)
}

pub async fn count_documents(pool: &SqlitePool) -> Result<i64> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM docs")
        .fetch_one(pool)
        .await?;
    Ok(n)
}
