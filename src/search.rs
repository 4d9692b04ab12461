use anyhow::Result;

use crate::config::Config;
use crate::get::clip;
use crate::migrate;
use crate::store;

pub async fn run_search(config: &Config, query: &str, top: i64, json: bool) -> Result<()> {
    if query.trim().is_empty() {
        println!("No results.");
        return Ok(());
    }

    let pool = migrate::open(config).await?;
    let hits = store::search_documents(&pool, query, top).await;
    pool.close().await;
    let hits = hits?;

    if json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    if hits.is_empty() {
        println!("No results.");
        return Ok(());
    }

    println!("{:>4}  {:>5}  {:>8}  TITLE", "RANK", "ID", "SCORE");
    for (i, hit) in hits.iter().enumerate() {
        println!(
            "{:>4}  {:>5}  {:>8.3}  {}",
            i + 1,
            hit.id,
            hit.score,
            clip(&hit.title, 60)
        );
        println!(
            "{:>21}{}",
            "",
            hit.snippet.replace('\n', " ").trim()
        );
    }
    Ok(())
}
