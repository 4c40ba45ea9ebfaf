//! Similarity search and the multi-pass retrieval coordinator.
//!
//! [`search_by_similarity`] is a brute-force cosine scan: O(N·D) per query
//! over all candidate rows. That is the scalability ceiling of this engine —
//! fine into the tens of thousands of records, not beyond.
//!
//! [`recall`] layers a three-tier relaxation strategy on top: a strict
//! content-embedding pass, a metadata-embedding rescue pass when the first
//! under-returns, and a relaxed-threshold pass that keeps valid queries from
//! coming back empty. Each pass is a deliberate query with different
//! parameters, not an error-recovery retry.

use rusqlite::Connection;

use crate::embedding::EmbeddingProvider;
use crate::error::{EngramError, Result};
use crate::memory::cosine_similarity;
use crate::memory::store::{record_from_row, RECORD_COLUMNS};
use crate::memory::types::{MemoryRecord, RelationEntry};

/// Threshold scale applied to the metadata rescue pass.
const METADATA_THRESHOLD_SCALE: f64 = 0.9;

/// How far the relaxed pass lowers the threshold.
const RELAXATION_STEP: f64 = 0.2;

/// The relaxed pass never goes below this floor.
const RELAXATION_FLOOR: f64 = 0.5;

/// Parameters for a single [`search_by_similarity`] pass.
pub struct SearchOptions<'a> {
    /// Maximum rows returned.
    pub limit: usize,
    /// Similarity floor; candidates below it are dropped.
    pub min_similarity: f64,
    /// Tag OR-filter: a record matches if it carries *any* requested tag.
    /// `None` means no pre-filter.
    pub filter_tags: Option<&'a [String]>,
    /// Score against the metadata embedding instead of the content embedding.
    pub use_metadata_embedding: bool,
}

/// A recall result: the scored record plus every relationship touching it.
#[derive(Debug, serde::Serialize)]
pub struct SearchHit {
    pub memory: MemoryRecord,
    pub relations: Vec<RelationEntry>,
}

/// Brute-force cosine scan with optional tag pre-filter.
///
/// Candidates are read in insertion (rowid) order and sorted stably by
/// descending similarity, so equal scores tie-break deterministically by
/// insertion order.
///
/// The tag filter matches the comma-joined tags column with `LIKE '%tag%'`,
/// so a requested tag that is a substring of another tag's name over-matches
/// (filtering for `test` also hits a record tagged only `testing`). Preserved
/// behavior, see the crate docs.
pub fn search_by_similarity(
    conn: &Connection,
    query: &[f32],
    opts: &SearchOptions<'_>,
) -> Result<Vec<MemoryRecord>> {
    let (where_clause, params) = tag_filter(opts.filter_tags);
    let sql = format!(
        "SELECT {RECORD_COLUMNS} FROM memories {where_clause} ORDER BY rowid"
    );

    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn rusqlite::types::ToSql> = params
        .iter()
        .map(|p| p as &dyn rusqlite::types::ToSql)
        .collect();

    let candidates = stmt
        .query_map(param_refs.as_slice(), record_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut scored: Vec<MemoryRecord> = Vec::new();
    for mut record in candidates {
        let embedding = if opts.use_metadata_embedding {
            &record.metadata_embedding
        } else {
            &record.content_embedding
        };

        // The store-wide dimension invariant makes this unreachable; if it
        // fires, a defect corrupted the store or the caller's query vector.
        if embedding.len() != query.len() {
            return Err(EngramError::DimensionMismatch {
                expected: query.len(),
                actual: embedding.len(),
            });
        }

        let similarity = cosine_similarity(query, embedding);
        if similarity >= opts.min_similarity {
            record.similarity = Some(similarity);
            scored.push(record);
        }
    }

    // Stable sort keeps insertion order for equal similarities.
    scored.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(opts.limit);
    Ok(scored)
}

/// Three-tier retrieval: content pass → metadata rescue → threshold
/// relaxation, then relationship enrichment.
///
/// Content embeddings give the highest-precision match; the metadata pass
/// rescues queries that match type/tags better than body text; the relaxed
/// pass trades precision so valid queries rarely come back empty.
pub fn recall(
    conn: &Connection,
    provider: &dyn EmbeddingProvider,
    query_text: &str,
    limit: usize,
    filter_tags: Option<&[String]>,
    min_similarity: f64,
) -> Result<Vec<SearchHit>> {
    let query = provider.embed(query_text)?;
    recall_embedded(conn, &query, limit, filter_tags, min_similarity)
}

/// [`recall`] with a precomputed query vector.
///
/// Async callers embed off-thread and pass the vector in, so inference never
/// runs while the connection is held.
pub fn recall_embedded(
    conn: &Connection,
    query: &[f32],
    limit: usize,
    filter_tags: Option<&[String]>,
    min_similarity: f64,
) -> Result<Vec<SearchHit>> {
    // Pass 1: content embeddings, strict threshold, widened limit.
    let mut results = search_by_similarity(
        conn,
        query,
        &SearchOptions {
            limit: limit * 2,
            min_similarity,
            filter_tags,
            use_metadata_embedding: false,
        },
    )?;
    tracing::debug!(pass = 1, hits = results.len(), "content pass complete");

    // Pass 2: metadata embeddings, slightly relaxed, only when the content
    // pass under-returned. Content-pass results win on duplicate ids.
    if results.len() < limit / 2 {
        let metadata_hits = search_by_similarity(
            conn,
            query,
            &SearchOptions {
                limit,
                min_similarity: min_similarity * METADATA_THRESHOLD_SCALE,
                filter_tags,
                use_metadata_embedding: true,
            },
        )?;
        tracing::debug!(pass = 2, hits = metadata_hits.len(), "metadata pass complete");

        for hit in metadata_hits {
            if !results.iter().any(|r| r.id == hit.id) {
                results.push(hit);
            }
        }
    }

    // Pass 3: relaxed threshold against content embeddings, only when passes
    // 1–2 produced nothing at all. Replaces the (empty) set outright.
    if results.is_empty() && min_similarity > RELAXATION_FLOOR {
        let relaxed = RELAXATION_FLOOR.max(min_similarity - RELAXATION_STEP);
        results = search_by_similarity(
            conn,
            query,
            &SearchOptions {
                limit,
                min_similarity: relaxed,
                filter_tags,
                use_metadata_embedding: false,
            },
        )?;
        tracing::debug!(pass = 3, threshold = relaxed, hits = results.len(), "relaxed pass complete");
    }

    results.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results.truncate(limit);

    results
        .into_iter()
        .map(|memory| {
            let relations = crate::memory::relations::get_relationships(conn, &memory.id)?;
            Ok(SearchHit { memory, relations })
        })
        .collect()
}

/// Build the optional tag OR-filter WHERE clause.
///
/// Each requested tag becomes a `tags LIKE '%tag%'` term; terms are OR-ed so
/// any single match admits the row.
fn tag_filter(filter_tags: Option<&[String]>) -> (String, Vec<String>) {
    match filter_tags {
        Some(tags) if !tags.is_empty() => {
            let terms: Vec<String> = (1..=tags.len())
                .map(|i| format!("tags LIKE ?{i}"))
                .collect();
            let params = tags.iter().map(|t| format!("%{t}%")).collect();
            (format!("WHERE {}", terms.join(" OR ")), params)
        }
        _ => (String::new(), Vec::new()),
    }
}
