//! Text-to-vector embedding pipeline.
//!
//! Provides the [`EmbeddingProvider`] contract and a local implementation
//! using all-MiniLM-L6-v2 (384 dimensions, L2-normalized). The provider is
//! created via [`create_provider`] from configuration.

pub mod local;

use crate::error::Result;

/// Number of dimensions produced by the default local model (all-MiniLM-L6-v2).
pub const EMBEDDING_DIM: usize = 384;

/// Capability contract for embedding text into vectors.
///
/// `dimensions` must not change for the lifetime of a provider: every vector
/// it produces has exactly that length, and a store only ever holds vectors of
/// one length. All methods are synchronous — callers in async contexts should
/// use `tokio::task::spawn_blocking`, since inference may take seconds.
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text string into a vector of `dimensions()` floats.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of texts. Implementations may override for batched
    /// inference.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// The fixed vector length this provider produces.
    fn dimensions(&self) -> usize {
        EMBEDDING_DIM
    }
}

/// Create an embedding provider from config.
///
/// Currently only `"local"` is supported (ONNX Runtime + all-MiniLM-L6-v2).
/// Returns an error if model files are not found — run `engram model download`
/// first.
pub fn create_provider(
    config: &crate::config::EmbeddingConfig,
) -> anyhow::Result<Box<dyn EmbeddingProvider>> {
    match config.provider.as_str() {
        "local" => {
            let provider = local::LocalEmbeddingProvider::new(config)?;
            Ok(Box::new(provider))
        }
        other => anyhow::bail!("unknown embedding provider: {other}. Supported: local"),
    }
}
