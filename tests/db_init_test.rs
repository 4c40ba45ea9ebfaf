//! On-disk database lifecycle: creation, persistence across reopen, health.

mod helpers;

use engram::db::{self, migrations};
use helpers::{insert_memory, CannedProvider};

#[test]
fn open_creates_the_file_and_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("engram.db");

    let conn = db::open_database(&path).unwrap();
    assert!(path.exists());

    let version = migrations::get_schema_version(&conn).unwrap();
    assert_eq!(version, migrations::CURRENT_SCHEMA_VERSION);
    // No model is on record until an embedding-backed caller connects.
    assert!(migrations::get_embedding_model(&conn).unwrap().is_none());
}

#[test]
fn first_connect_records_the_configured_model() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("engram.db");

    {
        let conn = db::open_database(&path).unwrap();
        assert!(migrations::reconcile_embedding_model(&conn, "custom-model")
            .unwrap()
            .is_none());
    }

    // Reopening with the same model stays silent; a different one reports
    // the stored model and leaves it in place.
    let conn = db::open_database(&path).unwrap();
    assert!(migrations::reconcile_embedding_model(&conn, "custom-model")
        .unwrap()
        .is_none());
    assert_eq!(
        migrations::reconcile_embedding_model(&conn, "other-model").unwrap(),
        Some("custom-model".to_string())
    );
    assert_eq!(
        migrations::get_embedding_model(&conn).unwrap().as_deref(),
        Some("custom-model")
    );
}

#[test]
fn reopen_is_idempotent_and_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("engram.db");
    let provider = CannedProvider::empty();

    let id = {
        let mut conn = db::open_database(&path).unwrap();
        insert_memory(&mut conn, &provider, "persisted fact", "note", &["keep"])
    };

    let conn = db::open_database(&path).unwrap();
    let fetched = engram::memory::store::get_memory(&conn, &id)
        .unwrap()
        .unwrap();
    assert_eq!(fetched.text, "persisted fact");
    assert_eq!(fetched.tags, vec!["keep".to_string()]);

    // The dimension pin survives reopen too.
    assert_eq!(
        migrations::get_embedding_dimensions(&conn).unwrap(),
        Some(helpers::TEST_DIM)
    );
}

#[test]
fn wal_journal_mode_is_active() {
    let dir = tempfile::tempdir().unwrap();
    let conn = db::open_database(dir.path().join("engram.db")).unwrap();
    let mode: String = conn
        .query_row("PRAGMA journal_mode", [], |row| row.get(0))
        .unwrap();
    assert_eq!(mode.to_lowercase(), "wal");
}

#[test]
fn health_report_counts_rows() {
    let dir = tempfile::tempdir().unwrap();
    let mut conn = db::open_database(dir.path().join("engram.db")).unwrap();
    let provider = CannedProvider::empty();
    let id_a = insert_memory(&mut conn, &provider, "one", "note", &[]);
    let id_b = insert_memory(&mut conn, &provider, "two", "note", &[]);
    engram::memory::relations::create_relationship(&conn, &id_a, &id_b, "references").unwrap();

    let report = db::check_database_health(&conn).unwrap();
    assert_eq!(report.memory_count, 2);
    assert_eq!(report.relation_count, 1);
    assert_eq!(report.embedding_dimensions, Some(helpers::TEST_DIM));
    assert!(report.integrity_ok);
}
