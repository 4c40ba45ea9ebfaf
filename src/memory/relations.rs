//! Relationship graph: typed directed edges between memory records.
//!
//! Edges are created explicitly and removed automatically when either
//! endpoint memory is deleted (foreign-key cascade). Lookup is undirected:
//! [`get_relationships`] returns every edge where the given id appears as
//! either endpoint, annotated with the far endpoint's title and type.

use rusqlite::{params, Connection};

use crate::error::Result;
use crate::memory::types::{RelationEntry, RelationTarget, Relationship};

/// Create a typed directed edge between two memories.
///
/// Both endpoints must exist: the foreign-key constraints reject dangling
/// ids, surfacing as a storage error.
pub fn create_relationship(
    conn: &Connection,
    from_id: &str,
    to_id: &str,
    relation_type: &str,
) -> Result<Relationship> {
    let id = uuid::Uuid::now_v7().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO memory_relations (id, from_id, to_id, type, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![id, from_id, to_id, relation_type, now],
    )?;

    tracing::info!(id = %id, from = %from_id, to = %to_id, relation_type, "relationship created");

    Ok(Relationship {
        id,
        from_id: from_id.to_string(),
        to_id: to_id.to_string(),
        relation_type: relation_type.to_string(),
        created_at: now,
    })
}

/// Every relationship touching `memory_id`, as either endpoint.
///
/// Each entry carries the *other* endpoint's id, title, and type for display.
pub fn get_relationships(conn: &Connection, memory_id: &str) -> Result<Vec<RelationEntry>> {
    let mut stmt = conn.prepare(
        "SELECT r.id, r.from_id, r.to_id, r.type, r.created_at, m.id, m.title, m.type \
         FROM memory_relations r \
         JOIN memories m ON m.id = CASE WHEN r.from_id = ?1 THEN r.to_id ELSE r.from_id END \
         WHERE r.from_id = ?1 OR r.to_id = ?1",
    )?;

    let entries = stmt
        .query_map(params![memory_id], |row| {
            Ok(RelationEntry {
                id: row.get(0)?,
                from_id: row.get(1)?,
                to_id: row.get(2)?,
                relation_type: row.get(3)?,
                created_at: row.get(4)?,
                other: RelationTarget {
                    id: row.get(5)?,
                    title: row.get(6)?,
                    record_type: row.get(7)?,
                },
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(entries)
}
