//! Vector-similarity retrieval of the chunks most relevant to the
//! deliverable query.
//!
//! The flat index is rebuilt for every run and never shared across
//! invocations; search is exact nearest-neighbor over squared L2 distance
//! in the embedding's native dimensionality.

use thiserror::Error;

use crate::providers::{Embedder, ProviderError};

/// Number of nearest chunks handed to the extraction stage.
pub const TOP_K: usize = 10;

/// Fixed natural-language query the chunk index is searched with.
pub const RETRIEVAL_QUERY: &str =
    "Find any assignments, readings, quizzes, presentations, projects, or exams with specific due dates.";

#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("embedding provider returned no usable vectors")]
    EmptyEmbedding,

    #[error("embedding count mismatch: sent {sent} texts, got {got} vectors")]
    CountMismatch { sent: usize, got: usize },

    #[error("embedding dimension mismatch: index is {expected}, vector is {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

/// Flat brute-force similarity index over squared L2 distance.
pub struct FlatL2Index {
    dimension: usize,
    vectors: Vec<Vec<f32>>,
}

impl FlatL2Index {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Add a vector to the index; its position becomes its id.
    pub fn add(&mut self, vector: Vec<f32>) -> Result<(), RetrievalError> {
        if vector.len() != self.dimension {
            return Err(RetrievalError::DimensionMismatch {
                expected: self.dimension,
                got: vector.len(),
            });
        }
        self.vectors.push(vector);
        Ok(())
    }

    /// Return the ids of the `k` vectors nearest to `query`,
    /// nearest-first. Equidistant vectors keep insertion order; no further
    /// tie-break is defined.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<usize>, RetrievalError> {
        if query.len() != self.dimension {
            return Err(RetrievalError::DimensionMismatch {
                expected: self.dimension,
                got: query.len(),
            });
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, squared_l2(query, v)))
            .collect();

        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        Ok(scored.into_iter().take(k).map(|(i, _)| i).collect())
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Embed the chunks and the fixed query, then return the `k` most relevant
/// chunks in nearest-first order.
///
/// Zero, missing, or dimension-skewed vectors from the provider fail the
/// run — an empty retrieval set here would silently produce zero extracted
/// rows downstream, which must stay distinguishable from "no deliverables
/// in the document".
pub fn retrieve_relevant(
    embedder: &dyn Embedder,
    chunks: &[String],
    query: &str,
    k: usize,
) -> Result<Vec<String>, RetrievalError> {
    if chunks.is_empty() {
        return Ok(Vec::new());
    }

    let refs: Vec<&str> = chunks.iter().map(String::as_str).collect();
    let vectors = embedder.embed_batch(&refs)?;

    if vectors.is_empty() {
        return Err(RetrievalError::EmptyEmbedding);
    }
    if vectors.len() != chunks.len() {
        return Err(RetrievalError::CountMismatch {
            sent: chunks.len(),
            got: vectors.len(),
        });
    }

    let dimension = vectors[0].len();
    if dimension == 0 {
        return Err(RetrievalError::EmptyEmbedding);
    }

    let mut index = FlatL2Index::new(dimension);
    for vector in vectors {
        index.add(vector)?;
    }

    let query_vector = embedder
        .embed_batch(&[query])?
        .into_iter()
        .next()
        .ok_or(RetrievalError::EmptyEmbedding)?;

    let ids = index.search(&query_vector, k)?;
    tracing::debug!(
        chunks = chunks.len(),
        retrieved = ids.len(),
        dimension,
        "retrieval complete"
    );

    Ok(ids.into_iter().map(|i| chunks[i].clone()).collect())
}
