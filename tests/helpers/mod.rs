#![allow(dead_code)]

use std::collections::HashMap;

use engram::db;
use engram::embedding::EmbeddingProvider;
use engram::error::Result;
use engram::memory::store::{store_memory, NewMemory};
use rusqlite::Connection;

/// Embedding dimension used by test providers. Small on purpose — the engine
/// never assumes a particular width.
pub const TEST_DIM: usize = 16;

/// Open a fresh in-memory database with schema and migrations applied.
pub fn test_db() -> Connection {
    db::open_memory_database().unwrap()
}

/// Deterministic unit vector with a spike at position `seed`.
pub fn axis(seed: usize) -> Vec<f32> {
    let mut v = vec![0.0f32; TEST_DIM];
    v[seed % TEST_DIM] = 1.0;
    v
}

/// A vector at a chosen cosine similarity to `axis(0)`, using axis 1 for the
/// orthogonal component.
pub fn at_similarity(cos: f32) -> Vec<f32> {
    let mut v = vec![0.0f32; TEST_DIM];
    v[0] = cos;
    v[1] = (1.0 - cos * cos).sqrt();
    v
}

/// Provider with canned vectors per exact text. Texts without an entry get a
/// spike derived from their byte sum, so distinct unknown texts still embed
/// deterministically.
pub struct CannedProvider {
    vectors: HashMap<String, Vec<f32>>,
}

impl CannedProvider {
    pub fn new(entries: &[(&str, Vec<f32>)]) -> Self {
        let vectors = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        Self { vectors }
    }

    pub fn empty() -> Self {
        Self {
            vectors: HashMap::new(),
        }
    }
}

impl EmbeddingProvider for CannedProvider {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.vectors.get(text).cloned().unwrap_or_else(|| {
            let spike = text.bytes().map(usize::from).sum::<usize>() % TEST_DIM;
            axis(spike)
        }))
    }

    fn dimensions(&self) -> usize {
        TEST_DIM
    }
}

/// Insert a memory through the real write path. Returns the record id.
pub fn insert_memory(
    conn: &mut Connection,
    provider: &dyn EmbeddingProvider,
    text: &str,
    record_type: &str,
    tags: &[&str],
) -> String {
    let tags: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
    store_memory(
        conn,
        provider,
        None,
        &NewMemory {
            record_type,
            content: &serde_json::Value::Null,
            source: "test",
            text,
            tags: &tags,
            confidence: 1.0,
            title: None,
        },
    )
    .unwrap()
    .id
}
