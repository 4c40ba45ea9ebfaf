pub mod migrations;
pub mod schema;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

/// Open (or create) the Engram database at the given path, with schema
/// initialized and migrations applied.
pub fn open_database(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let conn = Connection::open(path)
        .with_context(|| format!("failed to open database at {}", path.display()))?;

    // WAL mode for better concurrent read performance; foreign keys enforce
    // the relation cascade on memory deletion.
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;

    schema::init_schema(&conn).context("failed to initialize schema")?;
    migrations::run_migrations(&conn).context("failed to run migrations")?;

    tracing::info!(path = %path.display(), "database initialized");
    Ok(conn)
}

/// Open an in-memory database with schema and migrations applied.
///
/// Used by tests and by callers that want an ephemeral store.
pub fn open_memory_database() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    schema::init_schema(&conn).context("failed to initialize schema")?;
    migrations::run_migrations(&conn).context("failed to run migrations")?;
    Ok(conn)
}

/// Diagnostic snapshot produced by [`check_database_health`].
#[derive(Debug)]
pub struct HealthReport {
    pub schema_version: u32,
    pub embedding_model: Option<String>,
    pub embedding_dimensions: Option<usize>,
    pub memory_count: u64,
    pub relation_count: u64,
    pub integrity_ok: bool,
    pub integrity_details: String,
}

/// Run diagnostics against an open database.
pub fn check_database_health(conn: &Connection) -> Result<HealthReport> {
    let schema_version = migrations::get_schema_version(conn)?;
    let embedding_model = migrations::get_embedding_model(conn)?;
    let embedding_dimensions = migrations::get_embedding_dimensions(conn)?;

    let memory_count: i64 =
        conn.query_row("SELECT COUNT(*) FROM memories", [], |row| row.get(0))?;
    let relation_count: i64 =
        conn.query_row("SELECT COUNT(*) FROM memory_relations", [], |row| row.get(0))?;

    let integrity_details: String =
        conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
    let integrity_ok = integrity_details == "ok";

    Ok(HealthReport {
        schema_version,
        embedding_model,
        embedding_dimensions,
        memory_count: memory_count as u64,
        relation_count: relation_count as u64,
        integrity_ok,
        integrity_details,
    })
}
