//! TF-IDF vectorization over a small, call-scoped corpus.
//!
//! Terms are the unigrams and adjacent-pair bigrams of each document's
//! filtered token stream. Weights are raw counts times a smoothed IDF,
//! `ln((1 + n) / (1 + df)) + 1`, and every row is L2-normalized so a dot
//! product between rows is their cosine similarity.
//!
//! A [`TfidfMatrix`] is fit from exactly the texts passed in. Nothing is
//! cached between fits: the same term can weigh differently against a
//! different background corpus.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::AnalysisError;

use super::tokenize::{Token, Tokenizer};

/// Terms present in more than this share of documents are dropped.
pub const MAX_DF: f64 = 0.95;

/// Unigrams followed by bigrams of consecutive surviving tokens.
fn terms(tokens: &[Token]) -> Vec<String> {
    let mut out: Vec<String> = tokens.to_vec();
    out.extend(tokens.windows(2).map(|w| format!("{} {}", w[0], w[1])));
    out
}

/// Sparse row: term index to weight, ordered by term index.
pub type SparseRow = BTreeMap<usize, f64>;

#[derive(Debug, Clone)]
pub struct TfidfMatrix {
    vocabulary: Vec<String>,
    idf: Vec<f64>,
    rows: Vec<SparseRow>,
}

impl TfidfMatrix {
    /// Fit the vocabulary, IDF weights and document rows from `texts`.
    ///
    /// Row `i` corresponds to `texts[i]`. Requires at least two documents.
    pub fn fit<S: AsRef<str>>(tokenizer: &Tokenizer, texts: &[S]) -> Result<Self, AnalysisError> {
        if texts.len() < 2 {
            return Err(AnalysisError::InvalidInput(format!(
                "vectorization needs at least 2 documents, got {}",
                texts.len()
            )));
        }
        let n = texts.len();

        let counts: Vec<BTreeMap<String, usize>> = texts
            .iter()
            .map(|t| {
                let mut tf = BTreeMap::new();
                for term in terms(&tokenizer.tokenize(t.as_ref())) {
                    *tf.entry(term).or_insert(0) += 1;
                }
                tf
            })
            .collect();

        let mut df: BTreeMap<&str, usize> = BTreeMap::new();
        for tf in &counts {
            for term in tf.keys() {
                *df.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let vocabulary = prune_vocabulary(&df, n);
        let index: HashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), i))
            .collect();
        let idf: Vec<f64> = vocabulary
            .iter()
            .map(|t| smoothed_idf(n, df[t.as_str()]))
            .collect();

        let rows = counts
            .iter()
            .map(|tf| {
                let mut row: SparseRow = tf
                    .iter()
                    .filter_map(|(term, &count)| {
                        index
                            .get(term.as_str())
                            .map(|&i| (i, count as f64 * idf[i]))
                    })
                    .collect();
                l2_normalize(&mut row);
                row
            })
            .collect();

        tracing::trace!(documents = n, terms = vocabulary.len(), "fitted tf-idf matrix");
        Ok(Self {
            vocabulary,
            idf,
            rows,
        })
    }

    /// Vocabulary in lexicographic order; term `i` is column `i`.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn idf(&self, term: usize) -> f64 {
        self.idf[term]
    }

    /// Number of documents (rows).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, doc: usize) -> &SparseRow {
        &self.rows[doc]
    }

    pub fn weight(&self, doc: usize, term: usize) -> f64 {
        self.rows[doc].get(&term).copied().unwrap_or(0.0)
    }

    /// Cosine similarity of two rows; 0 when either row has no terms.
    pub fn cosine(&self, a: usize, b: usize) -> f64 {
        let (ra, rb) = (&self.rows[a], &self.rows[b]);
        let (small, large) = if ra.len() <= rb.len() { (ra, rb) } else { (rb, ra) };
        let dot: f64 = small
            .iter()
            .filter_map(|(i, w)| large.get(i).map(|v| w * v))
            .sum();
        dot.clamp(0.0, 1.0)
    }

    /// Pairwise cosine similarities, diagonal fixed to 1.0.
    pub fn similarity_matrix(&self) -> SimilarityMatrix {
        let n = self.len();
        let mut values = vec![vec![0.0; n]; n];
        for i in 0..n {
            values[i][i] = 1.0;
            for j in (i + 1)..n {
                let s = self.cosine(i, j);
                values[i][j] = s;
                values[j][i] = s;
            }
        }
        SimilarityMatrix { values }
    }
}

fn smoothed_idf(n: usize, df: usize) -> f64 {
    ((1.0 + n as f64) / (1.0 + df as f64)).ln() + 1.0
}

/// Apply the `MAX_DF` ceiling unless the corpus is a pair or the ceiling
/// would leave nothing.
fn prune_vocabulary(df: &BTreeMap<&str, usize>, n: usize) -> Vec<String> {
    let ceiling = MAX_DF * n as f64;
    let kept: Vec<String> = df
        .iter()
        .filter(|&(_, &d)| d as f64 <= ceiling)
        .map(|(t, _)| t.to_string())
        .collect();
    if n <= 2 || kept.is_empty() {
        return df.keys().map(|t| t.to_string()).collect();
    }
    kept
}

fn l2_normalize(row: &mut SparseRow) {
    let norm = row.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for w in row.values_mut() {
            *w /= norm;
        }
    }
}

/// Square, symmetric matrix of pairwise similarities.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    values: Vec<Vec<f64>>,
}

impl SimilarityMatrix {
    /// Wrap precomputed values; rejects non-square input.
    pub fn new(values: Vec<Vec<f64>>) -> Result<Self, AnalysisError> {
        let n = values.len();
        if let Some(bad) = values.iter().position(|r| r.len() != n) {
            return Err(AnalysisError::InvalidInput(format!(
                "similarity matrix row {} has {} entries, expected {}",
                bad,
                values[bad].len(),
                n
            )));
        }
        Ok(Self { values })
    }

    pub fn identity(n: usize) -> Self {
        let mut values = vec![vec![0.0; n]; n];
        for (i, row) in values.iter_mut().enumerate() {
            row[i] = 1.0;
        }
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i][j]
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.values
    }
}

/// Similarity matrix for a corpus of at least two documents, at least one
/// of which yields terms.
pub fn pairwise_similarity<S: AsRef<str>>(
    tokenizer: &Tokenizer,
    texts: &[S],
) -> Result<SimilarityMatrix, AnalysisError> {
    let matrix = TfidfMatrix::fit(tokenizer, texts)?;
    if matrix.vocabulary().is_empty() {
        return Err(AnalysisError::InvalidInput(
            "no document yields any term".to_string(),
        ));
    }
    Ok(matrix.similarity_matrix())
}

/// Distinct terms across a corpus, for diagnostics.
pub fn corpus_terms<S: AsRef<str>>(tokenizer: &Tokenizer, texts: &[S]) -> BTreeSet<String> {
    texts
        .iter()
        .flat_map(|t| terms(&tokenizer.tokenize(t.as_ref())))
        .collect()
}
