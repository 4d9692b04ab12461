//! # Paperbox
//!
//! A local-first document box: ingest PDF, DOCX, HTML and plain-text files
//! into a SQLite store with full-text search, then summarize documents,
//! compare pairs of them, and map the whole corpus as a similarity graph.
//! Latin-script and CJK text are both supported.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────────┐   ┌───────────┐
//! │  Files   │──▶│   Ingest     │──▶│  SQLite   │
//! │ PDF/DOCX │   │ extract+norm │   │ docs+FTS5 │
//! └──────────┘   └──────────────┘   └─────┬─────┘
//!                                         │
//!                     ┌───────────────────┤
//!                     ▼                   ▼
//!               ┌───────────┐       ┌───────────┐
//!               │  search   │       │   nlp +   │
//!               │  (bm25)   │       │   graph   │
//!               └───────────┘       └───────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! paperbox -p ./box init
//! paperbox -p ./box ingest ~/papers
//! paperbox -p ./box search "causality"
//! paperbox -p ./box summarize 3 -n 5
//! paperbox -p ./box compare 3 7
//! paperbox -p ./box graph --format dot > corpus.dot
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`nlp`] | Tokenizer, sentence splitter, summarizer, TF-IDF, comparator |
//! | [`graph`] | Similarity graph edges and Mermaid/DOT rendering |
//! | [`error`] | Engine error type |
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema creation |
//! | [`store`] | Document queries and FTS5 search |
//! | [`extract`] | PDF/DOCX/HTML/text extraction |
//! | [`scan`] | File discovery |
//! | [`ingest`] | Ingest pipeline |
//! | [`progress`] | Ingest progress reporting |
//! | [`get`], [`search`], [`analyze`], [`stats`] | CLI commands |

pub mod analyze;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod get;
pub mod graph;
pub mod ingest;
pub mod migrate;
pub mod models;
pub mod nlp;
pub mod progress;
pub mod scan;
pub mod search;
pub mod stats;
pub mod store;
