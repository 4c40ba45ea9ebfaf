//! The query surface exposed to callers (CLI, embedding hosts, future
//! transports): store, search, get, get-many, delete, relate, statistics.
//!
//! [`MemoryService`] owns the shared long-lived resources — one database
//! connection behind a mutex, one embedding provider, an optional title
//! generator — and bridges sync core code into async callers. Embedding
//! inference and database work both run under `spawn_blocking`; the service
//! itself holds no per-call state, so any number of callers may share one
//! instance.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::config::EngramConfig;
use crate::db;
use crate::embedding::EmbeddingProvider;
use crate::memory::search::SearchHit;
use crate::memory::stats::StatsResponse;
use crate::memory::store::NewMemory;
use crate::memory::types::{MemoryRecord, Relationship};
use crate::title::TitleGenerator;

/// Owned fields for a store request.
#[derive(Debug, Clone)]
pub struct StoreRequest {
    pub record_type: String,
    pub content: serde_json::Value,
    pub source: String,
    pub text: String,
    pub tags: Vec<String>,
    pub confidence: Option<f64>,
    pub title: Option<String>,
}

/// Shared-state facade over the memory core.
#[derive(Clone)]
pub struct MemoryService {
    db: Arc<Mutex<Connection>>,
    db_path: Option<PathBuf>,
    embedding: Arc<dyn EmbeddingProvider>,
    titles: Option<Arc<dyn TitleGenerator>>,
    config: Arc<EngramConfig>,
}

impl MemoryService {
    pub fn new(
        db: Arc<Mutex<Connection>>,
        db_path: Option<PathBuf>,
        embedding: Arc<dyn EmbeddingProvider>,
        titles: Option<Arc<dyn TitleGenerator>>,
        config: Arc<EngramConfig>,
    ) -> Self {
        Self {
            db,
            db_path,
            embedding,
            titles,
            config,
        }
    }

    /// Open the configured database and embedding provider.
    ///
    /// Warns when the configured embedding model differs from the one the
    /// store was built with — vectors from different models never compare
    /// meaningfully.
    pub fn connect(config: EngramConfig) -> Result<Self> {
        let db_path = config.resolved_db_path();
        let conn = db::open_database(&db_path)?;

        // A fresh store adopts the configured model; an existing one keeps
        // the model its vectors were built with.
        if let Some(stored_model) =
            db::migrations::reconcile_embedding_model(&conn, &config.embedding.model)?
        {
            tracing::warn!(
                stored = %stored_model,
                configured = %config.embedding.model,
                "embedding model changed — existing vectors were built with a different model"
            );
        }

        let provider = crate::embedding::create_provider(&config.embedding)?;
        tracing::info!("embedding provider ready");

        Ok(Self::new(
            Arc::new(Mutex::new(conn)),
            Some(db_path),
            Arc::from(provider),
            None,
            Arc::new(config),
        ))
    }

    /// Attach a title generator. Without one, titles fall back to truncation.
    pub fn with_title_generator(mut self, titles: Arc<dyn TitleGenerator>) -> Self {
        self.titles = Some(titles);
        self
    }

    /// Store a new memory. Embeds text and metadata, derives a title, writes
    /// one row atomically.
    ///
    /// Inference and title generation run before the connection lock is
    /// taken: a slow embedding call must not stall concurrent readers, and a
    /// failed one still writes nothing.
    pub async fn store(&self, request: StoreRequest) -> Result<MemoryRecord> {
        let confidence = request.confidence.unwrap_or(1.0);
        anyhow::ensure!(
            (0.0..=1.0).contains(&confidence),
            "confidence must be between 0.0 and 1.0"
        );
        anyhow::ensure!(!request.text.is_empty(), "text must not be empty");

        let embedding = Arc::clone(&self.embedding);
        let titles = self.titles.clone();

        let (request, title, content_embedding, metadata_embedding) =
            tokio::task::spawn_blocking(move || {
                let content = embedding.embed(&request.text)?;
                let metadata_text =
                    MemoryRecord::metadata_text(&request.record_type, &request.tags);
                let metadata = embedding.embed(&metadata_text)?;
                let title = crate::title::resolve_title(
                    request.title.as_deref(),
                    titles.as_deref(),
                    &request.text,
                );
                Ok::<_, crate::error::EngramError>((request, title, content, metadata))
            })
            .await
            .context("embedding task failed")??;

        let db = Arc::clone(&self.db);
        let record = tokio::task::spawn_blocking(move || {
            let mut conn = db
                .lock()
                .map_err(|e| anyhow::anyhow!("db lock poisoned: {e}"))?;
            crate::memory::store::insert_memory(
                &mut conn,
                &NewMemory {
                    record_type: &request.record_type,
                    content: &request.content,
                    source: &request.source,
                    text: &request.text,
                    tags: &request.tags,
                    confidence,
                    title: request.title.as_deref(),
                },
                title,
                content_embedding,
                metadata_embedding,
            )
            .map_err(anyhow::Error::from)
        })
        .await
        .context("store task failed")??;

        Ok(record)
    }

    /// Multi-pass semantic search, enriched with relationships.
    ///
    /// The query embedding is computed before the connection lock is taken.
    pub async fn search(
        &self,
        query: String,
        limit: Option<usize>,
        filter_tags: Option<Vec<String>>,
        min_similarity: Option<f64>,
    ) -> Result<Vec<SearchHit>> {
        let limit = limit.unwrap_or(self.config.retrieval.default_limit);
        let min_similarity = min_similarity.unwrap_or(self.config.retrieval.min_similarity);

        let embedding = Arc::clone(&self.embedding);
        let query_vector =
            tokio::task::spawn_blocking(move || embedding.embed(&query).map_err(anyhow::Error::from))
                .await
                .context("embedding task failed")??;

        self.with_conn(move |conn| {
            crate::memory::search::recall_embedded(
                conn,
                &query_vector,
                limit,
                filter_tags.as_deref(),
                min_similarity,
            )
        })
        .await
    }

    /// Fetch one record by id; `None` when absent.
    pub async fn get(&self, id: String) -> Result<Option<MemoryRecord>> {
        self.with_conn(move |conn| crate::memory::store::get_memory(conn, &id))
            .await
    }

    /// Batch fetch; empty input yields empty output.
    pub async fn get_many(&self, ids: Vec<String>) -> Result<Vec<MemoryRecord>> {
        self.with_conn(move |conn| crate::memory::store::get_memories(conn, &ids))
            .await
    }

    /// Delete by id; returns whether a row existed. Relationship edges cascade.
    pub async fn delete(&self, id: String) -> Result<bool> {
        self.with_conn(move |conn| crate::memory::store::delete_memory(conn, &id))
            .await
    }

    /// Create a typed directed relationship between two memories.
    pub async fn create_relationship(
        &self,
        from_id: String,
        to_id: String,
        relation_type: String,
    ) -> Result<Relationship> {
        self.with_conn(move |conn| {
            crate::memory::relations::create_relationship(conn, &from_id, &to_id, &relation_type)
        })
        .await
    }

    /// Store statistics: totals, counts by type, relationship count.
    pub async fn statistics(&self) -> Result<StatsResponse> {
        let db_path = self.db_path.clone();
        self.with_conn(move |conn| crate::memory::stats::memory_stats(conn, db_path.as_deref()))
            .await
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> crate::error::Result<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let conn = db
                .lock()
                .map_err(|e| anyhow::anyhow!("db lock poisoned: {e}"))?;
            f(&conn).map_err(anyhow::Error::from)
        })
        .await
        .context("db task failed")?
    }
}
