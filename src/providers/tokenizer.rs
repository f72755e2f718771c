use tiktoken_rs::CoreBPE;

use super::ProviderError;

/// Token counting seam for the batcher.
///
/// Counts must approximate what the target completion model will see, so
/// the token-budget invariant on batches holds at the provider too.
pub trait TokenCounter {
    fn count(&self, text: &str) -> usize;
}

impl TokenCounter for Box<dyn TokenCounter> {
    fn count(&self, text: &str) -> usize {
        (**self).count(text)
    }
}

/// BPE token counter calibrated to a specific model.
pub struct TiktokenCounter {
    bpe: CoreBPE,
}

impl TiktokenCounter {
    /// Tokenizer for the given model identifier, falling back to the
    /// `cl100k_base` encoding for model names tiktoken does not know.
    pub fn for_model(model: &str) -> Result<Self, ProviderError> {
        let bpe = tiktoken_rs::get_bpe_from_model(model)
            .or_else(|_| tiktoken_rs::cl100k_base())
            .map_err(|_| ProviderError::UnknownTokenizer(model.to_string()))?;
        Ok(Self { bpe })
    }
}

impl TokenCounter for TiktokenCounter {
    fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}

/// Cheap character-based estimate (~4 chars per token for English prose).
/// Useful where loading a BPE table is not worth it.
pub struct CharEstimateCounter;

impl TokenCounter for CharEstimateCounter {
    fn count(&self, text: &str) -> usize {
        text.len().div_ceil(4)
    }
}
