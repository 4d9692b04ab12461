//! Project configuration.
//!
//! A project is a directory holding the SQLite database and an optional
//! `paperbox.toml`. Every section and field of the file is optional; missing
//! values fall back to the defaults below.
//!
//! ```toml
//! [db]
//! filename = "paperbox.sqlite"
//!
//! [ingest]
//! extensions = ["pdf", "docx", "html", "htm", "txt", "md", "rst"]
//! exclude_globs = ["**/drafts/**"]
//! follow_symlinks = false
//! max_file_bytes = 52428800
//!
//! [analysis]
//! summary_sentences = 7
//! top_terms = 15
//! cjk_ratio = 0.08
//!
//! [graph]
//! threshold = 0.25
//! format = "mermaid"
//! max_nodes = 60
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::graph::{GraphFormat, DEFAULT_MAX_NODES, DEFAULT_THRESHOLD};
use crate::nlp::{Tokenizer, DEFAULT_CJK_RATIO, DEFAULT_SUMMARY_SENTENCES, DEFAULT_TOP_TERMS};

pub const CONFIG_FILENAME: &str = "paperbox.toml";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    /// Project directory the config was loaded for. Not read from the file.
    #[serde(skip)]
    pub project: PathBuf,
    #[serde(default)]
    pub db: DbConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub graph: GraphConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    #[serde(default = "default_db_filename")]
    pub filename: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            filename: default_db_filename(),
        }
    }
}

fn default_db_filename() -> String {
    "paperbox.sqlite".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct IngestConfig {
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub follow_symlinks: bool,
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            exclude_globs: Vec::new(),
            follow_symlinks: false,
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    ["pdf", "docx", "html", "htm", "txt", "md", "rst"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_max_file_bytes() -> u64 {
    50 * 1024 * 1024
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisConfig {
    #[serde(default = "default_summary_sentences")]
    pub summary_sentences: usize,
    #[serde(default = "default_top_terms")]
    pub top_terms: usize,
    #[serde(default = "default_cjk_ratio")]
    pub cjk_ratio: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            summary_sentences: DEFAULT_SUMMARY_SENTENCES,
            top_terms: DEFAULT_TOP_TERMS,
            cjk_ratio: DEFAULT_CJK_RATIO,
        }
    }
}

fn default_summary_sentences() -> usize {
    DEFAULT_SUMMARY_SENTENCES
}
fn default_top_terms() -> usize {
    DEFAULT_TOP_TERMS
}
fn default_cjk_ratio() -> f64 {
    DEFAULT_CJK_RATIO
}

#[derive(Debug, Deserialize, Clone)]
pub struct GraphConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default)]
    pub format: GraphFormat,
    #[serde(default = "default_max_nodes")]
    pub max_nodes: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            format: GraphFormat::default(),
            max_nodes: DEFAULT_MAX_NODES,
        }
    }
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}
fn default_max_nodes() -> usize {
    DEFAULT_MAX_NODES
}

impl Config {
    /// Defaults for `project`, ignoring any config file.
    pub fn minimal(project: &Path) -> Self {
        Self {
            project: project.to_path_buf(),
            ..Self::default()
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.project.join(&self.db.filename)
    }

    pub fn tokenizer(&self) -> Tokenizer {
        Tokenizer::new(self.analysis.cjk_ratio)
    }

    fn validate(&self) -> Result<()> {
        if self.db.filename.trim().is_empty() {
            bail!("db.filename must not be empty");
        }
        if self.ingest.extensions.is_empty() {
            bail!("ingest.extensions must list at least one extension");
        }
        if self.analysis.summary_sentences < 1 {
            bail!("analysis.summary_sentences must be >= 1");
        }
        if self.analysis.top_terms < 1 {
            bail!("analysis.top_terms must be >= 1");
        }
        if !(0.0..=1.0).contains(&self.analysis.cjk_ratio) {
            bail!("analysis.cjk_ratio must be in [0.0, 1.0]");
        }
        if !(0.0..=1.0).contains(&self.graph.threshold) {
            bail!("graph.threshold must be in [0.0, 1.0]");
        }
        if self.graph.max_nodes < 1 {
            bail!("graph.max_nodes must be >= 1");
        }
        Ok(())
    }
}

/// Load `paperbox.toml` from `project`, or defaults when the file is absent.
pub fn load_config(project: &Path) -> Result<Config> {
    let path = project.join(CONFIG_FILENAME);
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str::<Config>(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?
    } else {
        Config::default()
    };
    config.project = project.to_path_buf();

    // Extensions are matched case-insensitively and without the dot.
    for ext in config.ingest.extensions.iter_mut() {
        *ext = ext.trim_start_matches('.').to_ascii_lowercase();
    }

    config.validate()?;
    Ok(config)
}
