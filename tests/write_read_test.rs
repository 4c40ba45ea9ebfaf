//! End-to-end write/read coverage over the real storage path.

mod helpers;

use engram::memory::store::{delete_memory, get_memories, get_memory, store_memory, NewMemory};
use engram::memory::types::MemoryRecord;
use helpers::{axis, insert_memory, test_db, CannedProvider};

#[test]
fn stored_record_reads_back_identically() {
    let mut conn = test_db();
    let provider = CannedProvider::new(&[("the capital of France is Paris", axis(0))]);

    let tags = vec!["geography".to_string(), "europe".to_string()];
    let payload = serde_json::json!({"verified": true});
    let stored = store_memory(
        &mut conn,
        &provider,
        None,
        &NewMemory {
            record_type: "fact",
            content: &payload,
            source: "import",
            text: "the capital of France is Paris",
            tags: &tags,
            confidence: 0.9,
            title: None,
        },
    )
    .unwrap();

    let fetched = get_memory(&conn, &stored.id).unwrap().unwrap();
    assert_eq!(fetched.id, stored.id);
    assert_eq!(fetched.record_type, "fact");
    assert_eq!(fetched.text, "the capital of France is Paris");
    assert_eq!(fetched.content, payload);
    assert_eq!(fetched.source, "import");
    assert_eq!(fetched.tags, tags);
    assert!((fetched.confidence - 0.9).abs() < 1e-9);
    assert_eq!(fetched.created_at, stored.created_at);
    assert_eq!(fetched.updated_at, fetched.created_at);

    // Embeddings survive the BLOB round-trip bit-for-bit.
    assert_eq!(fetched.content_embedding, stored.content_embedding);
    assert_eq!(fetched.metadata_embedding, stored.metadata_embedding);
}

#[test]
fn metadata_embedding_covers_type_and_tags() {
    let mut conn = test_db();
    let provider = CannedProvider::empty();
    let tags = vec!["a".to_string(), "b".to_string()];

    let stored = store_memory(
        &mut conn,
        &provider,
        None,
        &NewMemory {
            record_type: "note",
            content: &serde_json::Value::Null,
            source: "test",
            text: "body",
            tags: &tags,
            confidence: 1.0,
            title: None,
        },
    )
    .unwrap();

    let metadata_text = MemoryRecord::metadata_text("note", &tags);
    assert_eq!(metadata_text, "note a b");
    assert_eq!(
        stored.metadata_embedding,
        engram::embedding::EmbeddingProvider::embed(&provider, &metadata_text).unwrap()
    );
}

#[test]
fn short_text_becomes_title_verbatim() {
    let mut conn = test_db();
    let provider = CannedProvider::empty();
    let id = insert_memory(&mut conn, &provider, "short enough", "note", &[]);

    let fetched = get_memory(&conn, &id).unwrap().unwrap();
    assert_eq!(fetched.title, "short enough");
}

#[test]
fn batch_fetch_returns_requested_subset() {
    let mut conn = test_db();
    let provider = CannedProvider::empty();
    let id_a = insert_memory(&mut conn, &provider, "first", "note", &[]);
    let id_b = insert_memory(&mut conn, &provider, "second", "note", &[]);
    insert_memory(&mut conn, &provider, "third", "note", &[]);

    let records = get_memories(&conn, &[id_a.clone(), id_b.clone()]).unwrap();
    assert_eq!(records.len(), 2);
    let mut ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    ids.sort_unstable();
    let mut expected = vec![id_a.as_str(), id_b.as_str()];
    expected.sort_unstable();
    assert_eq!(ids, expected);
}

#[test]
fn batch_fetch_skips_unknown_ids() {
    let mut conn = test_db();
    let provider = CannedProvider::empty();
    let id = insert_memory(&mut conn, &provider, "real", "note", &[]);

    let records = get_memories(&conn, &[id.clone(), "no-such-id".to_string()]).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, id);
}

#[test]
fn batch_fetch_empty_input_skips_the_query() {
    let conn = test_db();
    assert!(get_memories(&conn, &[]).unwrap().is_empty());
}

#[test]
fn delete_reports_whether_a_row_existed() {
    let mut conn = test_db();
    let provider = CannedProvider::empty();
    let id = insert_memory(&mut conn, &provider, "doomed", "note", &[]);

    assert!(delete_memory(&conn, &id).unwrap());
    assert!(!delete_memory(&conn, &id).unwrap());
    assert!(get_memory(&conn, &id).unwrap().is_none());
}

#[test]
fn duplicate_id_insert_is_rejected_by_the_schema() {
    let conn = test_db();
    let insert = "INSERT INTO memories (id, type, title, text, content, source, tags, \
         confidence, content_embedding, metadata_embedding, created_at, updated_at) \
         VALUES ('dup', 'note', 't', 'x', 'null', 's', '', 1.0, x'', x'', 'now', 'now')";
    conn.execute(insert, []).unwrap();
    assert!(conn.execute(insert, []).is_err());
}
