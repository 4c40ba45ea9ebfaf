//! Memory storage and semantic retrieval engine.
//!
//! Engram stores text "memories" — each with a type, source, tags, and
//! confidence — and retrieves them by semantic similarity to a free-text
//! query.
//!
//! # Architecture
//!
//! - **Storage**: SQLite; embeddings live inline as fixed-width BLOBs of
//!   native-order f32, tags as a single comma-joined column
//! - **Embeddings**: dual vectors per record — one over the body text, one
//!   over `"{type} {tags}"` — produced by a pluggable [`embedding::EmbeddingProvider`]
//!   (local ONNX Runtime with all-MiniLM-L6-v2 by default)
//! - **Search**: brute-force cosine scan with tag pre-filtering, wrapped in a
//!   three-tier relaxation strategy (content pass → metadata rescue →
//!   lowered threshold) so valid queries rarely come back empty
//! - **Relations**: typed directed edges between memories, bidirectional
//!   lookup, cascade delete
//!
//! # Modules
//!
//! - [`config`] — Configuration from TOML files and environment variables
//! - [`db`] — SQLite initialization, schema, migrations, and health checks
//! - [`embedding`] — Text-to-vector pipeline via ONNX Runtime
//! - [`memory`] — Core engine: store, search, relations, statistics
//! - [`service`] — Async facade exposing the full query surface
//! - [`title`] — Title generation contract and truncation fallback

pub mod config;
pub mod db;
pub mod embedding;
pub mod error;
pub mod memory;
pub mod service;
pub mod title;
