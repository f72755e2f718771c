//! Provider seams for everything non-deterministic or external.
//!
//! The pipeline never talks to a model service directly — it goes through
//! the narrow traits in this module (`Embedder`, `CompletionModel`,
//! `TokenCounter`), so providers can be swapped or mocked and all
//! non-determinism stays confined behind one seam.

pub mod completion;
pub mod embedding;
pub mod openai;
pub mod tokenizer;

pub use completion::{CompletionModel, MockCompletionModel, ScriptedCompletionModel};
pub use embedding::{Embedder, MockEmbedder};
pub use openai::OpenAiClient;
pub use tokenizer::{CharEstimateCounter, TiktokenCounter, TokenCounter};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("cannot reach provider at {0}")]
    Connection(String),

    #[error("provider request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("provider returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("malformed provider response: {0}")]
    ResponseParsing(String),

    #[error("no tokenizer available for model {0:?}")]
    UnknownTokenizer(String),
}
