//! Token-aware batching of retrieved chunks into prompt-sized groups.

use crate::providers::TokenCounter;

/// Default per-batch token budget, sized for mid-context completion models.
pub const DEFAULT_MAX_TOKENS: usize = 6000;

/// Default number of trailing chunks re-included at a batch boundary so
/// context carries across batches.
pub const DEFAULT_OVERLAP: usize = 1;

/// Packs an ordered chunk sequence into batches whose token totals stay
/// within a budget, carrying `overlap` chunks across each boundary.
#[derive(Debug, Clone)]
pub struct TokenBatcher {
    max_tokens: usize,
    overlap: usize,
}

impl TokenBatcher {
    pub fn new(max_tokens: usize, overlap: usize) -> Self {
        Self {
            max_tokens,
            overlap,
        }
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Batch the chunks. Each batch is a blank-line-joined concatenation.
    ///
    /// Greedy walk: a batch starting at `start` absorbs chunks while the
    /// running token total stays within budget, then the next batch starts
    /// at `end - overlap` — but never at or before the previous start, so
    /// every flush advances and the walk always terminates with each chunk
    /// consumed into at least one batch. A chunk whose own count exceeds
    /// the budget is emitted alone rather than split further.
    pub fn batch(&self, chunks: &[String], counter: &dyn TokenCounter) -> Vec<String> {
        let mut batches = Vec::new();
        let mut start = 0;

        while start < chunks.len() {
            let mut end = start;
            let mut total = 0;

            while end < chunks.len() {
                let cost = counter.count(&chunks[end]);
                if end > start && total + cost > self.max_tokens {
                    break;
                }
                // The first chunk of a batch is always taken, oversized or not.
                total += cost;
                end += 1;
                if total > self.max_tokens {
                    break;
                }
            }

            batches.push(chunks[start..end].join("\n\n"));

            if end >= chunks.len() {
                break;
            }
            start = end.saturating_sub(self.overlap).max(start + 1);
        }

        batches
    }
}

impl Default for TokenBatcher {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TOKENS, DEFAULT_OVERLAP)
    }
}
