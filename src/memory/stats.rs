use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;

/// Store statistics.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_memories: u64,
    pub by_type: HashMap<String, u64>,
    pub total_relationships: u64,
    pub db_size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest_memory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newest_memory: Option<String>,
}

/// Compute memory store statistics.
///
/// `db_path` is used for file size calculation; pass `None` for in-memory
/// databases.
pub fn memory_stats(conn: &Connection, db_path: Option<&Path>) -> Result<StatsResponse> {
    let total: i64 = conn.query_row("SELECT COUNT(*) FROM memories", [], |row| row.get(0))?;

    let mut by_type = HashMap::new();
    let mut stmt = conn.prepare("SELECT type, COUNT(*) FROM memories GROUP BY type")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;
    for row in rows {
        let (t, count) = row?;
        by_type.insert(t, count as u64);
    }

    let relationships: i64 =
        conn.query_row("SELECT COUNT(*) FROM memory_relations", [], |row| row.get(0))?;

    let (oldest, newest): (Option<String>, Option<String>) = conn.query_row(
        "SELECT MIN(created_at), MAX(created_at) FROM memories",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    let db_size_bytes = db_path
        .and_then(|p| std::fs::metadata(p).ok())
        .map(|m| m.len())
        .unwrap_or(0);

    Ok(StatsResponse {
        total_memories: total as u64,
        by_type,
        total_relationships: relationships as u64,
        db_size_bytes,
        oldest_memory: oldest,
        newest_memory: newest,
    })
}
