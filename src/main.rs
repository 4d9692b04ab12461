//! # Paperbox CLI (`paperbox`)
//!
//! Every command works on a project directory (`--project`, default `.`)
//! that holds `paperbox.sqlite` and an optional `paperbox.toml`.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `paperbox init` | Create the project directory and database schema |
//! | `paperbox ingest <path>...` | Extract and index files or directories |
//! | `paperbox list` | List stored documents |
//! | `paperbox view <id>` | Show the first lines of a document |
//! | `paperbox search "<query>"` | Full-text search (FTS5 syntax) |
//! | `paperbox summarize <id>` | Extractive summary of a document |
//! | `paperbox compare <id1> <id2>` | Similarity plus common and unique terms |
//! | `paperbox graph` | Corpus similarity graph as Mermaid or DOT |
//! | `paperbox remove <id>` | Delete a document |
//! | `paperbox stats` | Corpus statistics |
//!
//! Logs go to stderr; set `RUST_LOG=paperbox=debug` for detail.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use paperbox::progress::ProgressMode;
use paperbox::{analyze, config, get, ingest, migrate, search, stats};

/// Paperbox: a local-first document box with search, summaries,
/// comparisons and similarity graphs.
#[derive(Parser)]
#[command(name = "paperbox", version, about)]
struct Cli {
    /// Project directory holding `paperbox.sqlite` and `paperbox.toml`.
    #[arg(short, long, global = true, default_value = ".")]
    project: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the project directory and database schema.
    ///
    /// Idempotent: running it on an existing project changes nothing.
    Init,

    /// Ingest files or directories: extract text and index it.
    ///
    /// Directories are walked recursively. Every file gets one result row:
    /// NEW, UPD (same content seen before) or SKIP with a reason.
    Ingest {
        /// Files or directories to ingest.
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Progress on stderr: off, human, or json. Defaults to human on a TTY.
        #[arg(long, value_parser = ["off", "human", "json"])]
        progress: Option<String>,

        /// Print results as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// List stored documents.
    List {
        #[arg(long)]
        json: bool,
    },

    /// Show a document's header and its first lines of text.
    View {
        id: i64,

        /// Number of lines to show.
        #[arg(long, default_value_t = 80)]
        head: usize,
    },

    /// Full-text search over titles and text (SQLite FTS5 query syntax).
    Search {
        query: String,

        /// Maximum number of results.
        #[arg(long, default_value_t = 10)]
        top: i64,

        #[arg(long)]
        json: bool,
    },

    /// Summarize a document with its most representative sentences.
    Summarize {
        id: i64,

        /// Number of sentences [config: analysis.summary_sentences].
        #[arg(short = 'n', long, value_parser = parse_positive)]
        sentences: Option<usize>,
    },

    /// Compare two documents: cosine similarity, common and unique terms.
    Compare {
        id1: i64,
        id2: i64,

        /// Terms per list [config: analysis.top_terms].
        #[arg(long, value_parser = parse_positive)]
        top_terms: Option<usize>,

        #[arg(long)]
        json: bool,
    },

    /// Render the corpus similarity graph.
    Graph {
        /// Minimum similarity for an edge [config: graph.threshold].
        #[arg(long, value_parser = parse_unit_interval)]
        threshold: Option<f64>,

        /// Output format: mermaid or dot [config: graph.format].
        #[arg(long)]
        format: Option<String>,

        /// Use at most this many documents, lowest ids first [config: graph.max_nodes].
        #[arg(long, value_parser = parse_positive)]
        max_nodes: Option<usize>,
    },

    /// Delete a document and its index entry.
    Remove { id: i64 },

    /// Show corpus statistics.
    Stats {
        #[arg(long)]
        json: bool,
    },
}

/// Parse a count that must be at least 1.
fn parse_positive(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| format!("invalid count: {}", s))?;
    if n == 0 {
        return Err("must be at least 1".to_string());
    }
    Ok(n)
}

/// Parse a value in [0.0, 1.0]; NaN is rejected.
fn parse_unit_interval(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("invalid number: {}", s))?;
    if !(0.0..=1.0).contains(&v) {
        return Err("must be between 0.0 and 1.0".to_string());
    }
    Ok(v)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn progress_mode(flag: Option<&str>) -> ProgressMode {
    match flag {
        Some("off") => ProgressMode::Off,
        Some("human") => ProgressMode::Human,
        Some("json") => ProgressMode::Json,
        _ => ProgressMode::default_for_tty(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.project)?;

    match cli.command {
        Commands::Init => {
            migrate::run_init(&cfg).await?;
        }
        Commands::Ingest {
            paths,
            progress,
            json,
        } => {
            let mode = progress_mode(progress.as_deref());
            ingest::run_ingest(&cfg, &paths, mode, json).await?;
        }
        Commands::List { json } => {
            get::run_list(&cfg, json).await?;
        }
        Commands::View { id, head } => {
            get::run_view(&cfg, id, head).await?;
        }
        Commands::Search { query, top, json } => {
            search::run_search(&cfg, &query, top, json).await?;
        }
        Commands::Summarize { id, sentences } => {
            analyze::run_summarize(&cfg, id, sentences).await?;
        }
        Commands::Compare {
            id1,
            id2,
            top_terms,
            json,
        } => {
            analyze::run_compare(&cfg, id1, id2, top_terms, json).await?;
        }
        Commands::Graph {
            threshold,
            format,
            max_nodes,
        } => {
            analyze::run_graph(&cfg, threshold, format, max_nodes).await?;
        }
        Commands::Remove { id } => {
            get::run_remove(&cfg, id).await?;
        }
        Commands::Stats { json } => {
            stats::run_stats(&cfg, json).await?;
        }
    }

    Ok(())
}
