//! Corpus statistics (`paperbox stats`).
//!
//! A quick look at what is stored: document and character counts, database
//! size, how many documents take the CJK tokenization path, and how many
//! distinct terms the whole corpus produces.

use anyhow::Result;
use serde::Serialize;

use crate::config::Config;
use crate::migrate;
use crate::models::Document;
use crate::nlp::{vectorize::corpus_terms, Script, Tokenizer};
use crate::store;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusStats {
    pub documents: usize,
    pub total_chars: usize,
    pub latin_documents: usize,
    pub cjk_documents: usize,
    pub distinct_terms: usize,
}

pub fn corpus_stats(tokenizer: &Tokenizer, docs: &[Document]) -> CorpusStats {
    let cjk_documents = docs
        .iter()
        .filter(|d| tokenizer.script(&d.text) == Script::Cjk)
        .count();
    let texts: Vec<&str> = docs.iter().map(|d| d.text.as_str()).collect();
    CorpusStats {
        documents: docs.len(),
        total_chars: docs.iter().map(|d| d.text.chars().count()).sum(),
        latin_documents: docs.len() - cjk_documents,
        cjk_documents,
        distinct_terms: corpus_terms(tokenizer, &texts).len(),
    }
}

pub async fn run_stats(config: &Config, json: bool) -> Result<()> {
    let pool = migrate::open(config).await?;
    let docs = store::list_documents(&pool).await;
    pool.close().await;
    let docs = docs?;

    let stats = corpus_stats(&config.tokenizer(), &docs);
    let db_path = config.db_path();
    let db_size = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);

    if json {
        let out = serde_json::json!({
            "database": db_path.display().to_string(),
            "db_bytes": db_size,
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Paperbox Stats");
    println!("==============");
    println!();
    println!("  Database:    {}", db_path.display());
    println!("  Size:        {}", format_bytes(db_size));
    println!();
    println!("  Documents:   {}", stats.documents);
    println!("  Characters:  {}", stats.total_chars);
    println!("  Latin docs:  {}", stats.latin_documents);
    println!("  CJK docs:    {}", stats.cjk_documents);
    println!("  Terms:       {}", stats.distinct_terms);
    println!();
    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: i64, text: &str) -> Document {
        Document {
            id,
            source_path: String::new(),
            title: String::new(),
            sha256: id.to_string(),
            text: text.to_string(),
            created_at: String::new(),
        }
    }

    #[test]
    fn splits_documents_by_script() {
        let docs = vec![
            doc(1, "social systems observe"),
            doc(2, "社会システムはコミュニケーションから成る"),
        ];
        let stats = corpus_stats(&Tokenizer::default(), &docs);
        assert_eq!(stats.documents, 2);
        assert_eq!(stats.latin_documents, 1);
        assert_eq!(stats.cjk_documents, 1);
        assert_eq!(
            stats.total_chars,
            "social systems observe".chars().count() + "社会システムはコミュニケーションから成る".chars().count()
        );
        assert!(stats.distinct_terms >= 5);
    }

    #[test]
    fn empty_corpus() {
        let stats = corpus_stats(&Tokenizer::default(), &[]);
        assert_eq!(stats.documents, 0);
        assert_eq!(stats.distinct_terms, 0);
    }

    #[test]
    fn format_bytes_units() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
    }
}
