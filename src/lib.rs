//! Syllacal turns a course syllabus into a calendar-ready deliverable
//! schedule.
//!
//! One `SyllabusPipeline::run()` call takes document bytes and produces a
//! validated table of dated deliverables, exportable as CSV for manual
//! calendar import:
//!
//! ```text
//! document bytes
//!   └─► extraction   — page text + one combined [TABLE]-sentinel block
//!        └─► chunker — blank-line paragraphs, deliverable-cue filter
//!             └─► retrieval — embed chunks + query, top-K by L2 distance
//!                  └─► batcher — token-budgeted groups with overlap carry
//!                       └─► prompt/completion — one CSV extraction per batch
//!                            └─► reconcile — dedup, validate, final table
//! ```
//!
//! Every external capability (document parsing, embeddings, completion,
//! tokenization, relevance classification) sits behind a trait seam with
//! mock implementations alongside, so runs are isolated, concurrent, and
//! testable without network access. Fatal failures (unreadable document,
//! bad configuration, provider errors) surface as [`PipelineError`];
//! a clean run over a syllabus with nothing to extract returns an empty
//! table under the fixed header, never an error.

pub mod config;
pub mod pipeline;
pub mod providers;

pub use config::{ConfigError, ExtractionConfig};
pub use pipeline::orchestrator::{PipelineReport, PipelineRun, SyllabusPipeline};
pub use pipeline::table::{DeliverableRow, ResultTable, COLUMNS};
pub use pipeline::PipelineError;
