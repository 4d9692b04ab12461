//! Per-document commands: `list`, `view`, `remove`.

use anyhow::Result;

use crate::config::Config;
use crate::migrate;
use crate::store;

/// Truncate to `max` chars, marking the cut with an ellipsis.
pub(crate) fn clip(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// First `head` lines of `text`.
pub fn head_lines(text: &str, head: usize) -> String {
    text.lines().take(head).collect::<Vec<_>>().join("\n")
}

pub async fn run_list(config: &Config, json: bool) -> Result<()> {
    let pool = migrate::open(config).await?;
    let docs = store::list_documents(&pool).await?;
    pool.close().await;

    if json {
        let rows: Vec<serde_json::Value> = docs
            .iter()
            .map(|d| {
                serde_json::json!({
                    "id": d.id,
                    "title": d.title,
                    "created_at": d.created_at,
                    "source_path": d.source_path,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if docs.is_empty() {
        println!("No docs found.");
        return Ok(());
    }

    println!("{:>5}  {:<48} {:<19}  SOURCE", "ID", "TITLE", "CREATED");
    for d in &docs {
        println!(
            "{:>5}  {:<48} {:<19}  {}",
            d.id,
            clip(&d.title, 48),
            d.created_at,
            d.source_path
        );
    }
    Ok(())
}

pub async fn run_view(config: &Config, id: i64, head: usize) -> Result<()> {
    let pool = migrate::open(config).await?;
    let doc = store::require_document(&pool, id).await;
    pool.close().await;
    let doc = doc?;

    let total = doc.text.lines().count();
    println!("--- {}: {} ---", doc.id, doc.title);
    println!("source:     {}", doc.source_path);
    println!("created_at: {}", doc.created_at);
    println!("sha256:     {}", doc.sha256);
    println!();
    println!("{}", head_lines(&doc.text, head));
    if total > head {
        println!();
        println!("... ({} more lines)", total - head);
    }
    Ok(())
}

pub async fn run_remove(config: &Config, id: i64) -> Result<()> {
    let pool = migrate::open(config).await?;
    let removed = store::delete_document(&pool, id).await;
    pool.close().await;
    if !removed? {
        anyhow::bail!("document not found: {}", id);
    }
    tracing::info!(id, "document removed");
    println!("removed: {}", id);
    Ok(())
}
