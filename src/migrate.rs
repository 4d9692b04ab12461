//! Idempotent schema setup: the `docs` table, its FTS5 index and sync triggers.

use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

/// Create the schema if it is missing. Safe to call on every connection.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS docs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            source_path TEXT NOT NULL,
            title TEXT NOT NULL,
            sha256 TEXT NOT NULL UNIQUE,
            text TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // External-content FTS5 table over docs(title, text).
    let fts_exists: bool = sqlx::query_scalar(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='docs_fts'",
    )
    .fetch_one(pool)
    .await?;

    if !fts_exists {
        sqlx::query(
            r#"
            CREATE VIRTUAL TABLE docs_fts USING fts5(
                title,
                text,
                content='docs',
                content_rowid='id'
            )
            "#,
        )
        .execute(pool)
        .await?;
    }

    // Triggers keep docs_fts in step with docs.
    sqlx::query(
        r#"
        CREATE TRIGGER IF NOT EXISTS docs_ai AFTER INSERT ON docs BEGIN
            INSERT INTO docs_fts(rowid, title, text) VALUES (new.id, new.title, new.text);
        END
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TRIGGER IF NOT EXISTS docs_ad AFTER DELETE ON docs BEGIN
            INSERT INTO docs_fts(docs_fts, rowid, title, text)
            VALUES ('delete', old.id, old.title, old.text);
        END
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TRIGGER IF NOT EXISTS docs_au AFTER UPDATE ON docs BEGIN
            INSERT INTO docs_fts(docs_fts, rowid, title, text)
            VALUES ('delete', old.id, old.title, old.text);
            INSERT INTO docs_fts(rowid, title, text) VALUES (new.id, new.title, new.text);
        END
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Connect and make sure the schema exists. Every command opens the store this way.
pub async fn open(config: &Config) -> Result<SqlitePool> {
    let pool = db::connect(config).await?;
    ensure_schema(&pool).await?;
    Ok(pool)
}

pub async fn run_init(config: &Config) -> Result<()> {
    let pool = open(config).await?;
    pool.close().await;

    let project = std::fs::canonicalize(&config.project).unwrap_or_else(|_| config.project.clone());
    tracing::info!(db = %config.db_path().display(), "schema ready");
    println!("initialized: {}", project.display());
    Ok(())
}
