//! Core memory engine: vector codec, similarity scoring, storage, search,
//! relations, and statistics.

pub mod relations;
pub mod search;
pub mod stats;
pub mod store;
pub mod types;

/// Encode an f32 embedding as a fixed-width BLOB: native-order IEEE-754
/// singles, `len * 4` bytes.
pub fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(embedding.len() * 4);
    for v in embedding {
        bytes.extend_from_slice(&v.to_ne_bytes());
    }
    bytes
}

/// Decode a BLOB written by [`embedding_to_bytes`] back into an f32 vector.
pub fn embedding_from_bytes(bytes: &[u8]) -> Vec<f32> {
    debug_assert!(bytes.len() % 4 == 0, "embedding blob not a multiple of 4");
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// Cosine similarity: `dot(a,b) / (||a|| * ||b||)`.
///
/// Defined as 0.0 when either norm is zero. Callers must pass equal-length
/// vectors; the store-wide dimension invariant guarantees this for persisted
/// embeddings.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "cosine over mismatched dimensions");

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += f64::from(*x) * f64::from(*y);
        norm_a += f64::from(*x) * f64::from(*x);
        norm_b += f64::from(*y) * f64::from(*y);
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_embedding_bytes() {
        let v = vec![0.25f32, -1.5, 3.75, 0.0, f32::MIN_POSITIVE];
        let bytes = embedding_to_bytes(&v);
        assert_eq!(bytes.len(), v.len() * 4);
        assert_eq!(embedding_from_bytes(&bytes), v);
    }

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let v = vec![0.3f32, -0.2, 0.9, 0.1];
        let sim = cosine_similarity(&v, &v);
        assert!((sim - 1.0).abs() < 1e-9);
    }

    #[test]
    fn cosine_is_bounded() {
        let a = vec![1.0f32, 2.0, -3.0];
        let b = vec![-4.0f32, 0.5, 2.0];
        let sim = cosine_similarity(&a, &b);
        assert!((-1.0..=1.0).contains(&sim));
    }

    #[test]
    fn cosine_of_opposite_vectors_is_minus_one() {
        let a = vec![1.0f32, 2.0];
        let b = vec![-1.0f32, -2.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn cosine_with_zero_vector_is_zero() {
        let a = vec![0.0f32; 4];
        let b = vec![1.0f32, 0.0, 0.0, 0.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
        assert_eq!(cosine_similarity(&b, &a), 0.0);
        assert_eq!(cosine_similarity(&a, &a), 0.0);
    }

    #[test]
    fn cosine_of_orthogonal_vectors_is_zero() {
        let a = vec![1.0f32, 0.0];
        let b = vec![0.0f32, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-9);
    }
}
