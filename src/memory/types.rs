//! Core memory type definitions.
//!
//! Defines [`MemoryRecord`] (a stored memory with its dual embeddings),
//! [`Relationship`] (a typed directed edge), and the annotated
//! [`RelationEntry`] returned by bidirectional relationship lookups.

use serde::{Deserialize, Serialize};

/// A memory record, matching the `memories` table schema.
///
/// Immutable after creation; the only lifecycle transitions are creation and
/// deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// UUID v7 (time-sortable) primary key.
    pub id: String,
    /// Free-form category string (e.g. `"note"`, `"reference"`).
    #[serde(rename = "type")]
    pub record_type: String,
    /// Human-readable short title, generated if not supplied at store time.
    pub title: String,
    /// The plain text that was embedded.
    pub text: String,
    /// Opaque structured payload, kept verbatim.
    pub content: serde_json::Value,
    /// Provenance tag (e.g. `"cli"`, `"import"`).
    pub source: String,
    /// Tag set; order-irrelevant, may be empty.
    pub tags: Vec<String>,
    /// Confidence score in `[0.0, 1.0]`, default 1.0.
    pub confidence: f64,
    /// Embedding of `text`.
    #[serde(skip)]
    pub content_embedding: Vec<f32>,
    /// Embedding of `"{type} {tags joined by space}"`.
    #[serde(skip)]
    pub metadata_embedding: Vec<f32>,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
    /// ISO 8601 last-modification timestamp.
    pub updated_at: String,
    /// Transient: cosine similarity to the query that produced this record.
    /// Populated only by search, never persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
}

impl MemoryRecord {
    /// The string the metadata embedding is computed over: type followed by
    /// space-joined tags.
    pub fn metadata_text(record_type: &str, tags: &[String]) -> String {
        if tags.is_empty() {
            record_type.to_string()
        } else {
            format!("{} {}", record_type, tags.join(" "))
        }
    }
}

/// A typed directed edge between two memory records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    /// UUID v7 primary key.
    pub id: String,
    /// ID of the source memory.
    pub from_id: String,
    /// ID of the target memory.
    pub to_id: String,
    /// Relationship label (e.g. `"references"`, `"derived_from"`).
    #[serde(rename = "type")]
    pub relation_type: String,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
}

/// A relationship as seen from one memory, annotated with the other endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct RelationEntry {
    pub id: String,
    pub from_id: String,
    pub to_id: String,
    #[serde(rename = "type")]
    pub relation_type: String,
    pub created_at: String,
    /// The endpoint that is *not* the queried memory.
    pub other: RelationTarget,
}

/// Display annotation for the far endpoint of a relationship.
#[derive(Debug, Clone, Serialize)]
pub struct RelationTarget {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub record_type: String,
}

/// Join tags into the single delimited column value (comma-joined).
pub fn join_tags(tags: &[String]) -> String {
    tags.join(",")
}

/// Split the delimited column value back into a tag list. Empty column means
/// no tags.
pub fn split_tags(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(',').map(str::to_string).collect()
}
