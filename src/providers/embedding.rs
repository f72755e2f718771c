use super::ProviderError;

/// Embedding provider abstraction.
///
/// `embed_batch` must return exactly one vector per input text, in input
/// order, all with the same dimensionality. The retrieval stage checks
/// those guarantees and fails the run if a provider violates them.
pub trait Embedder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, ProviderError>;
}

impl Embedder for Box<dyn Embedder> {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, ProviderError> {
        (**self).embed_batch(texts)
    }
}

/// Mock embedder for testing — produces deterministic unit vectors.
pub struct MockEmbedder {
    dimension: usize,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self { dimension: 64 }
    }

    pub fn with_dimension(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl Embedder for MockEmbedder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, ProviderError> {
        Ok(texts
            .iter()
            .map(|t| deterministic_vector(t, self.dimension))
            .collect())
    }
}

/// Generate a deterministic unit vector from text (for testing).
/// Uses a simple byte-mixing approach so equal texts embed identically
/// and similar texts land near each other.
fn deterministic_vector(text: &str, dim: usize) -> Vec<f32> {
    let mut vec = vec![0.0f32; dim];
    let bytes = text.as_bytes();

    for (i, slot) in vec.iter_mut().enumerate() {
        let byte_idx = i % bytes.len().max(1);
        *slot = (bytes.get(byte_idx).copied().unwrap_or(0) as f32 + i as f32) / 255.0;
    }

    // L2 normalize
    let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for val in &mut vec {
            *val /= norm;
        }
    }

    vec
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_vector_per_input_in_order() {
        let embedder = MockEmbedder::new();
        let vecs = embedder.embed_batch(&["alpha", "beta", "gamma"]).unwrap();
        assert_eq!(vecs.len(), 3);
        for v in &vecs {
            assert_eq!(v.len(), 64);
        }
    }

    #[test]
    fn embedding_is_deterministic() {
        let embedder = MockEmbedder::new();
        let a = embedder.embed_batch(&["same text"]).unwrap();
        let b = embedder.embed_batch(&["same text"]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_texts_differ() {
        let embedder = MockEmbedder::new();
        let vecs = embedder.embed_batch(&["text A", "text B"]).unwrap();
        assert_ne!(vecs[0], vecs[1]);
    }

    #[test]
    fn vectors_are_l2_normalized() {
        let embedder = MockEmbedder::with_dimension(32);
        let vecs = embedder.embed_batch(&["normalize me"]).unwrap();
        let norm: f32 = vecs[0].iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 0.01, "expected unit norm, got {norm}");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let embedder = MockEmbedder::new();
        let vecs = embedder.embed_batch(&[]).unwrap();
        assert!(vecs.is_empty());
    }
}
