//! The async service facade, end to end against an in-memory store.

mod helpers;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use engram::config::EngramConfig;
use engram::embedding::EmbeddingProvider;
use engram::service::{MemoryService, StoreRequest};
use helpers::{at_similarity, axis, test_db, CannedProvider};

fn service_with(provider: CannedProvider) -> MemoryService {
    MemoryService::new(
        Arc::new(Mutex::new(test_db())),
        None,
        Arc::new(provider),
        None,
        Arc::new(EngramConfig::default()),
    )
}

fn request(text: &str, tags: &[&str]) -> StoreRequest {
    StoreRequest {
        record_type: "note".into(),
        content: serde_json::Value::Null,
        source: "test".into(),
        text: text.into(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        confidence: None,
        title: None,
    }
}

#[tokio::test]
async fn search_returns_scored_hits_with_relations() {
    let provider = CannedProvider::new(&[
        ("how the scheduler picks tasks", at_similarity(0.9)),
        ("unrelated grocery list", axis(4)),
        ("scheduler", axis(0)),
        ("note", axis(7)),
        ("note runtime", axis(7)),
    ]);
    let service = service_with(provider);

    let a = service
        .store(request("how the scheduler picks tasks", &["runtime"]))
        .await
        .unwrap();
    let b = service
        .store(request("unrelated grocery list", &[]))
        .await
        .unwrap();
    service
        .create_relationship(a.id.clone(), b.id.clone(), "references".to_string())
        .await
        .unwrap();

    let hits = service
        .search("scheduler".into(), None, None, None)
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].memory.id, a.id);
    assert!((hits[0].memory.similarity.unwrap() - 0.9).abs() < 1e-4);
    assert_eq!(hits[0].relations.len(), 1);
    assert_eq!(hits[0].relations[0].other.id, b.id);
}

#[tokio::test]
async fn search_defaults_come_from_config() {
    let provider = CannedProvider::new(&[
        ("close enough", at_similarity(0.75)),
        ("query", axis(0)),
        ("note", axis(7)),
    ]);
    let service = service_with(provider);
    service.store(request("close enough", &[])).await.unwrap();

    // Default min_similarity is 0.7; 0.75 clears it without explicit options.
    let hits = service.search("query".into(), None, None, None).await.unwrap();
    assert_eq!(hits.len(), 1);

    // A floor strict enough that even the relaxed pass (floor − 0.2) stays
    // above the record's 0.75 score filters it out.
    let hits = service
        .search("query".into(), None, None, Some(0.96))
        .await
        .unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn get_many_returns_stored_records() {
    let service = service_with(CannedProvider::empty());
    let a = service.store(request("alpha", &[])).await.unwrap();
    let b = service.store(request("beta", &[])).await.unwrap();

    let records = service
        .get_many(vec![a.id.clone(), b.id.clone()])
        .await
        .unwrap();
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn delete_cascades_through_the_service() {
    let service = service_with(CannedProvider::empty());
    let a = service.store(request("from", &[])).await.unwrap();
    let b = service.store(request("to", &[])).await.unwrap();
    service
        .create_relationship(a.id.clone(), b.id.clone(), "references".to_string())
        .await
        .unwrap();

    assert!(service.delete(a.id).await.unwrap());

    let stats = service.statistics().await.unwrap();
    assert_eq!(stats.total_memories, 1);
    assert_eq!(stats.total_relationships, 0);
}

/// Provider whose `embed` parks until the test releases it, simulating
/// seconds-long inference.
struct GatedProvider {
    entered: Arc<AtomicBool>,
    release: Arc<AtomicBool>,
}

impl EmbeddingProvider for GatedProvider {
    fn embed(&self, _text: &str) -> engram::error::Result<Vec<f32>> {
        self.entered.store(true, Ordering::SeqCst);
        while !self.release.load(Ordering::SeqCst) {
            std::thread::sleep(Duration::from_millis(5));
        }
        Ok(axis(0))
    }

    fn dimensions(&self) -> usize {
        helpers::TEST_DIM
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn slow_embedding_does_not_block_readers() {
    let entered = Arc::new(AtomicBool::new(false));
    let release = Arc::new(AtomicBool::new(false));
    let provider = GatedProvider {
        entered: Arc::clone(&entered),
        release: Arc::clone(&release),
    };

    let service = MemoryService::new(
        Arc::new(Mutex::new(test_db())),
        None,
        Arc::new(provider),
        None,
        Arc::new(EngramConfig::default()),
    );

    let writer = {
        let service = service.clone();
        tokio::spawn(async move { service.store(request("held up", &[])).await })
    };

    while !entered.load(Ordering::SeqCst) {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    // Inference is in flight; a reader must still get through the store.
    let get = tokio::time::timeout(Duration::from_secs(5), service.get("missing".into())).await;
    assert!(get
        .expect("reader stalled behind embedding inference")
        .unwrap()
        .is_none());

    release.store(true, Ordering::SeqCst);
    let stored = writer.await.unwrap().unwrap();
    assert_eq!(stored.text, "held up");
}

#[tokio::test]
async fn statistics_break_down_by_type() {
    let service = service_with(CannedProvider::empty());
    service.store(request("a note", &[])).await.unwrap();
    let mut fact = request("a fact", &[]);
    fact.record_type = "fact".into();
    service.store(fact).await.unwrap();

    let stats = service.statistics().await.unwrap();
    assert_eq!(stats.total_memories, 2);
    assert_eq!(stats.by_type["note"], 1);
    assert_eq!(stats.by_type["fact"], 1);
    assert!(stats.oldest_memory.is_some());
    assert!(stats.newest_memory.is_some());
}
