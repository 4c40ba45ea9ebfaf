//! Forward-only schema migration framework.
//!
//! Tracks the schema version in `schema_meta` and runs sequential migrations
//! to bring the database up to [`CURRENT_SCHEMA_VERSION`]. The embedding model
//! identity and its dimension count are also recorded here so a store never
//! silently mixes vectors from different providers.

use rusqlite::Connection;

/// The schema version that the current binary expects.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Get the current schema version from the database.
pub fn get_schema_version(conn: &Connection) -> rusqlite::Result<u32> {
    conn.query_row(
        "SELECT value FROM schema_meta WHERE key = 'schema_version'",
        [],
        |row| {
            let val: String = row.get(0)?;
            Ok(val.parse::<u32>().unwrap_or(0))
        },
    )
}

/// Update the stored schema version.
fn update_schema_version(conn: &Connection, version: u32) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE schema_meta SET value = ?1 WHERE key = 'schema_version'",
        [version.to_string()],
    )?;
    Ok(())
}

/// Get the stored embedding model identifier, if any.
pub fn get_embedding_model(conn: &Connection) -> rusqlite::Result<Option<String>> {
    get_meta(conn, "embedding_model")
}

/// Record the embedding model identifier.
pub fn set_embedding_model(conn: &Connection, model: &str) -> rusqlite::Result<()> {
    set_meta(conn, "embedding_model", model)
}

/// Reconcile the configured embedding model with the one the store was built
/// with.
///
/// A store with no recorded model adopts the configured one. When the stored
/// and configured models differ, the stored value is returned (and kept —
/// existing vectors were produced by it) so the caller can warn.
pub fn reconcile_embedding_model(
    conn: &Connection,
    configured: &str,
) -> rusqlite::Result<Option<String>> {
    match get_embedding_model(conn)? {
        None => {
            set_embedding_model(conn, configured)?;
            Ok(None)
        }
        Some(stored) if stored == configured => Ok(None),
        Some(stored) => Ok(Some(stored)),
    }
}

/// Get the stored embedding dimension count, if any.
///
/// Set on the first insert; every later insert must match it.
pub fn get_embedding_dimensions(conn: &Connection) -> rusqlite::Result<Option<usize>> {
    Ok(get_meta(conn, "embedding_dimensions")?.and_then(|v| v.parse().ok()))
}

/// Record the embedding dimension count for this store.
pub fn set_embedding_dimensions(conn: &Connection, dims: usize) -> rusqlite::Result<()> {
    set_meta(conn, "embedding_dimensions", &dims.to_string())
}

fn get_meta(conn: &Connection, key: &str) -> rusqlite::Result<Option<String>> {
    match conn.query_row(
        "SELECT value FROM schema_meta WHERE key = ?1",
        [key],
        |row| row.get::<_, String>(0),
    ) {
        Ok(val) => Ok(Some(val)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

fn set_meta(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_meta (key, value) VALUES (?1, ?2)",
        [key, value],
    )?;
    Ok(())
}

/// Run any pending forward-only migrations.
///
/// Version 1 is current, so nothing is applied yet; migration steps slot in
/// here (bumping the version via [`update_schema_version`]) as the schema
/// evolves.
pub fn run_migrations(conn: &Connection) -> rusqlite::Result<()> {
    let version = get_schema_version(conn)?;
    tracing::debug!(
        schema_version = version,
        target = CURRENT_SCHEMA_VERSION,
        "checking migrations"
    );

    if version > CURRENT_SCHEMA_VERSION {
        tracing::warn!(
            schema_version = version,
            "database schema is newer than this binary"
        );
    }

    Ok(())
}
