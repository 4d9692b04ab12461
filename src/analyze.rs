//! Analysis commands over stored documents: `summarize`, `compare`, `graph`.
//!
//! Each command loads documents through [`crate::store`], hands their text
//! to the synchronous engine in [`crate::nlp`] / [`crate::graph`], and
//! prints the result. CLI flags win over `paperbox.toml` values.

use anyhow::{Context, Result};

use crate::config::Config;
use crate::graph::{self, Edge, GraphFormat, Node};
use crate::migrate;
use crate::models::Document;
use crate::nlp::{self, Comparison, TermWeight, Tokenizer};
use crate::store;

/// Nodes and edges for a document list, node `i` labelled `"<id>: <title>"`.
///
/// At most `max_nodes` documents are used, in the order given. A single
/// document yields one node and no edges.
pub fn document_graph(
    tokenizer: &Tokenizer,
    docs: &[Document],
    threshold: f64,
    max_nodes: usize,
) -> Result<(Vec<Node>, Vec<Edge>)> {
    let docs = &docs[..docs.len().min(max_nodes)];
    let nodes: Vec<Node> = docs
        .iter()
        .enumerate()
        .map(|(i, d)| Node {
            id: i,
            label: format!("{}: {}", d.id, d.title),
        })
        .collect();

    if docs.len() < 2 {
        return Ok((nodes, Vec::new()));
    }

    let texts: Vec<&str> = docs.iter().map(|d| d.text.as_str()).collect();
    let sim = nlp::pairwise_similarity(tokenizer, &texts)
        .context("cannot build similarity graph")?;
    let edges = graph::build_edges(&sim, threshold);
    tracing::debug!(nodes = nodes.len(), edges = edges.len(), threshold, "graph built");
    Ok((nodes, edges))
}

pub async fn run_summarize(config: &Config, id: i64, sentences: Option<usize>) -> Result<()> {
    let count = sentences.unwrap_or(config.analysis.summary_sentences);
    let pool = migrate::open(config).await?;
    let doc = store::require_document(&pool, id).await;
    pool.close().await;
    let doc = doc?;

    let summary = nlp::summarize_with(&config.tokenizer(), &doc.text, count);
    println!("Summary: {}: {}", doc.id, doc.title);
    println!();
    if summary.is_empty() {
        println!("(empty)");
    } else {
        println!("{}", summary);
    }
    Ok(())
}

fn print_terms(heading: &str, terms: &[TermWeight]) {
    println!();
    println!("{}", heading);
    if terms.is_empty() {
        println!("  (none)");
        return;
    }
    println!("  {:<32} {:>8}", "TERM", "WEIGHT");
    for t in terms {
        println!("  {:<32} {:>8.4}", t.term, t.weight);
    }
}

pub async fn run_compare(
    config: &Config,
    id1: i64,
    id2: i64,
    top_terms: Option<usize>,
    json: bool,
) -> Result<()> {
    let top = top_terms.unwrap_or(config.analysis.top_terms);
    let pool = migrate::open(config).await?;
    let d1 = store::require_document(&pool, id1).await;
    let d2 = store::require_document(&pool, id2).await;
    pool.close().await;
    let (d1, d2) = (d1?, d2?);

    let comparison: Comparison =
        nlp::compare_with(&config.tokenizer(), &d1.text, &d2.text, top)?;

    if json {
        let out = serde_json::json!({
            "doc1": { "id": d1.id, "title": d1.title },
            "doc2": { "id": d2.id, "title": d2.title },
            "comparison": comparison,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Cosine similarity: {:.3}", comparison.similarity);
    println!();
    println!("Doc1: {}: {}", d1.id, d1.title);
    println!("Doc2: {}: {}", d2.id, d2.title);
    print_terms("Common terms", &comparison.common_terms);
    print_terms(
        &format!("Doc1 unique terms (ID {})", d1.id),
        &comparison.doc1_unique_terms,
    );
    print_terms(
        &format!("Doc2 unique terms (ID {})", d2.id),
        &comparison.doc2_unique_terms,
    );
    Ok(())
}

pub async fn run_graph(
    config: &Config,
    threshold: Option<f64>,
    format: Option<String>,
    max_nodes: Option<usize>,
) -> Result<()> {
    // Parse before touching the database so a bad selector fails fast.
    let format: GraphFormat = match format {
        Some(f) => f.parse()?,
        None => config.graph.format,
    };
    let threshold = threshold.unwrap_or(config.graph.threshold);
    let max_nodes = max_nodes.unwrap_or(config.graph.max_nodes);

    let pool = migrate::open(config).await?;
    let docs = store::list_documents(&pool).await;
    pool.close().await;
    let docs = docs?;

    if docs.is_empty() {
        println!("No docs found.");
        return Ok(());
    }
    if docs.len() > max_nodes {
        tracing::info!(total = docs.len(), max_nodes, "graph truncated to first documents");
    }

    let (nodes, edges) = document_graph(&config.tokenizer(), &docs, threshold, max_nodes)?;
    println!("{}", graph::render(&nodes, &edges, format));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: i64, title: &str, text: &str) -> Document {
        Document {
            id,
            source_path: format!("/docs/{}.txt", id),
            title: title.to_string(),
            sha256: format!("{:064}", id),
            text: text.to_string(),
            created_at: "2024-01-01T00:00:00".to_string(),
        }
    }

    #[test]
    fn single_document_has_node_but_no_edges() {
        let docs = vec![doc(4, "Lonely", "only one document in the corpus")];
        let (nodes, edges) = document_graph(&Tokenizer::default(), &docs, 0.0, 60).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].label, "4: Lonely");
        assert!(edges.is_empty());
    }

    #[test]
    fn corpus_is_truncated_to_max_nodes() {
        let docs = vec![
            doc(1, "A", "systems theory communication"),
            doc(2, "B", "systems theory observation"),
            doc(3, "C", "systems theory autopoiesis"),
        ];
        let (nodes, edges) = document_graph(&Tokenizer::default(), &docs, 0.0, 2).unwrap();
        assert_eq!(nodes.len(), 2);
        assert!(edges.iter().all(|e| e.a < 2 && e.b < 2));
    }

    #[test]
    fn similar_documents_are_linked() {
        let docs = vec![
            doc(1, "Cats", "the cat sat on the mat and purred at the cat"),
            doc(2, "More cats", "a cat sat on a mat while another cat purred"),
            doc(3, "Finance", "quarterly revenue grew as operating margins narrowed"),
        ];
        let (_, edges) = document_graph(&Tokenizer::default(), &docs, 0.2, 60).unwrap();
        assert!(edges.iter().any(|e| (e.a, e.b) == (0, 1)));
        assert!(!edges.iter().any(|e| e.b == 2));
    }

    #[test]
    fn tokenless_corpus_is_an_error() {
        let docs = vec![doc(1, "x", "12 34"), doc(2, "y", "56 78")];
        assert!(document_graph(&Tokenizer::default(), &docs, 0.25, 60).is_err());
    }
}
