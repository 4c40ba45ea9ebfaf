//! Write path and direct record access.
//!
//! [`store_memory`] is the single insert entry point. Both embeddings are
//! computed *before* the transaction opens, so a failed or cancelled embedding
//! call leaves nothing behind; the row insert itself is a single transaction.

use rusqlite::{params, Connection, Row};

use crate::embedding::EmbeddingProvider;
use crate::error::{EngramError, Result};
use crate::memory::types::{join_tags, split_tags, MemoryRecord};
use crate::memory::{embedding_from_bytes, embedding_to_bytes};
use crate::title::{resolve_title, TitleGenerator};

/// Column list shared by every SELECT that hydrates a [`MemoryRecord`].
pub(crate) const RECORD_COLUMNS: &str = "id, type, title, text, content, source, tags, \
     confidence, content_embedding, metadata_embedding, created_at, updated_at";

/// Caller-supplied fields for a new memory.
pub struct NewMemory<'a> {
    /// Free-form category string.
    pub record_type: &'a str,
    /// Opaque structured payload, stored verbatim.
    pub content: &'a serde_json::Value,
    /// Provenance tag.
    pub source: &'a str,
    /// Plain text to embed.
    pub text: &'a str,
    /// Tag set, may be empty.
    pub tags: &'a [String],
    /// Confidence in `[0.0, 1.0]`.
    pub confidence: f64,
    /// Explicit title; when `None` the title generator (or truncation
    /// fallback) supplies one.
    pub title: Option<&'a str>,
}

/// Full write path: embed text and metadata → resolve title → insert.
///
/// The metadata embedding is computed over `"{type} {tags joined by space}"`
/// and written even when tags are absent. The first insert pins the store's
/// embedding dimension; later inserts must match it.
pub fn store_memory(
    conn: &mut Connection,
    provider: &dyn EmbeddingProvider,
    titles: Option<&dyn TitleGenerator>,
    memory: &NewMemory<'_>,
) -> Result<MemoryRecord> {
    // Embed before touching the database. If either call fails, no partial
    // record exists.
    let content_embedding = provider.embed(memory.text)?;
    let metadata_text = MemoryRecord::metadata_text(memory.record_type, memory.tags);
    let metadata_embedding = provider.embed(&metadata_text)?;

    let expected = provider.dimensions();
    check_dimensions(expected, content_embedding.len())?;
    check_dimensions(expected, metadata_embedding.len())?;

    // Title: explicit → generated → truncation fallback.
    let title = resolve_title(memory.title, titles, memory.text);

    insert_memory(conn, memory, title, content_embedding, metadata_embedding)
}

/// The transaction half of [`store_memory`]: insert a row from precomputed
/// embeddings and an already-resolved title.
///
/// Async callers embed off-thread and use this directly, so inference never
/// runs while the connection is held. `memory.title` is not consulted here —
/// `title` is the resolved value.
pub fn insert_memory(
    conn: &mut Connection,
    memory: &NewMemory<'_>,
    title: String,
    content_embedding: Vec<f32>,
    metadata_embedding: Vec<f32>,
) -> Result<MemoryRecord> {
    check_dimensions(content_embedding.len(), metadata_embedding.len())?;

    let id = uuid::Uuid::now_v7().to_string();
    let now = chrono::Utc::now().to_rfc3339();
    let content_json = serde_json::to_string(memory.content)?;

    // Single transaction: dimension pin + row insert.
    let tx = conn.transaction()?;

    match crate::db::migrations::get_embedding_dimensions(&tx)? {
        Some(stored) => check_dimensions(stored, content_embedding.len())?,
        None => crate::db::migrations::set_embedding_dimensions(&tx, content_embedding.len())?,
    }

    tx.execute(
        "INSERT INTO memories (id, type, title, text, content, source, tags, confidence, \
         content_embedding, metadata_embedding, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
        params![
            id,
            memory.record_type,
            title,
            memory.text,
            content_json,
            memory.source,
            join_tags(memory.tags),
            memory.confidence,
            embedding_to_bytes(&content_embedding),
            embedding_to_bytes(&metadata_embedding),
            now,
        ],
    )?;

    tx.commit()?;

    tracing::info!(id = %id, record_type = memory.record_type, "memory stored");

    Ok(MemoryRecord {
        id,
        record_type: memory.record_type.to_string(),
        title,
        text: memory.text.to_string(),
        content: memory.content.clone(),
        source: memory.source.to_string(),
        tags: memory.tags.to_vec(),
        confidence: memory.confidence,
        content_embedding,
        metadata_embedding,
        created_at: now.clone(),
        updated_at: now,
        similarity: None,
    })
}

/// Fetch a single record by id. Absence is `None`, not an error.
pub fn get_memory(conn: &Connection, id: &str) -> Result<Option<MemoryRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {RECORD_COLUMNS} FROM memories WHERE id = ?1"
    ))?;
    let mut rows = stmt.query_map(params![id], record_from_row)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

/// Batch-fetch records by id. Empty input returns empty output without
/// touching the database. Result order is unspecified.
pub fn get_memories(conn: &Connection, ids: &[String]) -> Result<Vec<MemoryRecord>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders: Vec<String> = (1..=ids.len()).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "SELECT {RECORD_COLUMNS} FROM memories WHERE id IN ({})",
        placeholders.join(", ")
    );

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::types::ToSql> = ids
        .iter()
        .map(|id| id as &dyn rusqlite::types::ToSql)
        .collect();

    let records = stmt
        .query_map(params.as_slice(), record_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(records)
}

/// Delete a record by id. Returns whether a row existed. Relationships
/// touching the record are removed by the foreign-key cascade.
pub fn delete_memory(conn: &Connection, id: &str) -> Result<bool> {
    let rows = conn.execute("DELETE FROM memories WHERE id = ?1", params![id])?;
    if rows > 0 {
        tracing::info!(id = %id, "memory deleted");
    }
    Ok(rows > 0)
}

/// Map a row selected with [`RECORD_COLUMNS`] onto a [`MemoryRecord`].
pub(crate) fn record_from_row(row: &Row<'_>) -> rusqlite::Result<MemoryRecord> {
    let content_str: String = row.get(4)?;
    let tags_str: String = row.get(6)?;
    let content_blob: Vec<u8> = row.get(8)?;
    let metadata_blob: Vec<u8> = row.get(9)?;

    Ok(MemoryRecord {
        id: row.get(0)?,
        record_type: row.get(1)?,
        title: row.get(2)?,
        text: row.get(3)?,
        // A payload that no longer parses means store corruption; fail the
        // read rather than hand back a silently emptied record.
        content: serde_json::from_str(&content_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?,
        source: row.get(5)?,
        tags: split_tags(&tags_str),
        confidence: row.get(7)?,
        content_embedding: embedding_from_bytes(&content_blob),
        metadata_embedding: embedding_from_bytes(&metadata_blob),
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
        similarity: None,
    })
}

fn check_dimensions(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(EngramError::DimensionMismatch { expected, actual });
    }
    Ok(())
}
