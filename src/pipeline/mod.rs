pub mod batcher;
pub mod chunker;
pub mod extraction;
pub mod orchestrator;
pub mod prompt;
pub mod reconcile;
pub mod retrieval;
pub mod table;

use thiserror::Error;

use crate::config::ConfigError;
use crate::providers::ProviderError;
use extraction::ExtractionError;
use retrieval::RetrievalError;

/// Fatal failures that abort a run.
///
/// These must surface to the caller as a distinguishable failure — never
/// swallowed into an empty table, which would be indistinguishable from
/// "no deliverables present". Recoverable per-batch CSV failures are
/// handled inside the run and never appear here.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("document extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("provider call failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("retrieval failed: {0}")]
    Retrieval(#[from] RetrievalError),
}
