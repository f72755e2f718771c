//! End-to-end pipeline orchestration:
//! extract → chunk → filter → retrieve → batch → prompt → reconcile.
//!
//! One `run()` call processes one document, synchronously, with no state
//! shared across invocations — concurrent callers construct independent
//! pipelines with their own provider handles.

use serde::Serialize;
use uuid::Uuid;

use super::batcher::TokenBatcher;
use super::chunker::{filter_relevant, split_paragraphs, DeliverableCueFilter, RelevanceFilter};
use super::extraction::{extract_document_text, DocumentExtractor, PdfSyllabusExtractor};
use super::prompt::{build_extraction_prompt, EXTRACTION_SYSTEM_PROMPT};
use super::reconcile::RowReconciler;
use super::retrieval::{retrieve_relevant, RETRIEVAL_QUERY, TOP_K};
use super::table::ResultTable;
use super::PipelineError;
use crate::config::ExtractionConfig;
use crate::providers::{
    CompletionModel, Embedder, OpenAiClient, TiktokenCounter, TokenCounter,
};

/// Stage counters for one run, for caller-side diagnostics.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PipelineReport {
    pub chunks_total: usize,
    pub chunks_relevant: usize,
    pub chunks_retrieved: usize,
    pub batches_total: usize,
    /// Batches whose responses failed CSV parsing (skipped, run continued).
    pub batches_failed: usize,
    /// Stored rows dropped by field-count or year validation.
    pub rows_dropped: usize,
}

/// Outcome of one successful run. An empty table is a valid outcome
/// meaning "no assignments found".
#[derive(Debug)]
pub struct PipelineRun {
    pub table: ResultTable,
    pub report: PipelineReport,
}

/// The syllabus extraction pipeline, with every external capability
/// injected behind a trait seam.
pub struct SyllabusPipeline {
    config: ExtractionConfig,
    extractor: Box<dyn DocumentExtractor>,
    embedder: Box<dyn Embedder>,
    completion: Box<dyn CompletionModel>,
    counter: Box<dyn TokenCounter>,
    filter: Box<dyn RelevanceFilter>,
    batcher: TokenBatcher,
}

impl SyllabusPipeline {
    /// Assemble a pipeline from explicit providers, with the default
    /// relevance filter and batcher.
    pub fn new(
        config: ExtractionConfig,
        extractor: Box<dyn DocumentExtractor>,
        embedder: Box<dyn Embedder>,
        completion: Box<dyn CompletionModel>,
        counter: Box<dyn TokenCounter>,
    ) -> Self {
        Self {
            config,
            extractor,
            embedder,
            completion,
            counter,
            filter: Box::new(DeliverableCueFilter::new()),
            batcher: TokenBatcher::default(),
        }
    }

    /// Production assembly: PDF extraction, hosted OpenAI-compatible
    /// providers, and a tokenizer calibrated to the configured model.
    pub fn openai(config: ExtractionConfig, api_key: &str) -> Result<Self, PipelineError> {
        let counter = TiktokenCounter::for_model(&config.model)?;
        let embedder = OpenAiClient::hosted(api_key)?;
        let completion = OpenAiClient::hosted(api_key)?;
        Ok(Self::new(
            config,
            Box::new(PdfSyllabusExtractor),
            Box::new(embedder),
            Box::new(completion),
            Box::new(counter),
        ))
    }

    /// Substitute the relevance predicate.
    pub fn with_filter(mut self, filter: Box<dyn RelevanceFilter>) -> Self {
        self.filter = filter;
        self
    }

    /// Substitute the batcher (budget/overlap tuning).
    pub fn with_batcher(mut self, batcher: TokenBatcher) -> Self {
        self.batcher = batcher;
        self
    }

    /// Process one document end to end.
    ///
    /// Fatal paths: unparseable document, provider failure, malformed
    /// embedding output. A document with no text, no relevant chunks, or
    /// no surviving rows completes successfully with an empty table.
    pub fn run(&self, document: &[u8]) -> Result<PipelineRun, PipelineError> {
        let run_id = Uuid::new_v4();
        let _span = tracing::info_span!("syllabus_run", run_id = %run_id).entered();
        let mut report = PipelineReport::default();

        let text = extract_document_text(self.extractor.as_ref(), document)?;

        let chunks = split_paragraphs(&text);
        report.chunks_total = chunks.len();

        let relevant = filter_relevant(chunks, self.filter.as_ref());
        report.chunks_relevant = relevant.len();

        if relevant.is_empty() {
            tracing::info!(
                chunks = report.chunks_total,
                "no deliverable-bearing chunks; returning empty table"
            );
            return Ok(PipelineRun {
                table: ResultTable::default(),
                report,
            });
        }

        let retrieved =
            retrieve_relevant(self.embedder.as_ref(), &relevant, RETRIEVAL_QUERY, TOP_K)?;
        report.chunks_retrieved = retrieved.len();

        let batches = self.batcher.batch(&retrieved, self.counter.as_ref());
        report.batches_total = batches.len();

        let mut reconciler = RowReconciler::new();
        for (i, batch) in batches.iter().enumerate() {
            let prompt = build_extraction_prompt(&self.config, batch);
            let response =
                self.completion
                    .complete(&self.config.model, EXTRACTION_SYSTEM_PROMPT, &prompt)?;

            match reconciler.absorb(&response) {
                Ok(rows) => {
                    tracing::debug!(batch = i + 1, rows, "batch reconciled");
                }
                Err(e) => {
                    report.batches_failed += 1;
                    tracing::warn!(
                        batch = i + 1,
                        error = %e,
                        raw_output = %response,
                        "batch response failed CSV parse; skipping batch"
                    );
                }
            }
        }

        let (table, stats) = reconciler.finish(self.config.target_year);
        report.rows_dropped = stats.rows_dropped;

        tracing::info!(
            rows = table.len(),
            dropped = stats.rows_dropped,
            failed_batches = report.batches_failed,
            "run complete"
        );

        Ok(PipelineRun { table, report })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extraction::{ExtractionError, PageContent};
    use crate::providers::{
        CharEstimateCounter, MockCompletionModel, MockEmbedder, ProviderError,
        ScriptedCompletionModel,
    };
    use std::rc::Rc;

    const HEADER: &str =
        "Subject, Start Date, Start Time, End Date, End Time, All Day Event, Description, Location";

    struct StaticExtractor {
        pages: Vec<PageContent>,
    }

    impl StaticExtractor {
        fn with_text(text: &str) -> Self {
            Self {
                pages: vec![PageContent {
                    page_number: 1,
                    text: text.to_string(),
                    table_rows: vec![],
                }],
            }
        }

        fn empty() -> Self {
            Self { pages: vec![] }
        }
    }

    impl DocumentExtractor for StaticExtractor {
        fn extract(&self, _document: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
            Ok(self.pages.clone())
        }
    }

    struct FailingExtractor;

    impl DocumentExtractor for FailingExtractor {
        fn extract(&self, _document: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
            Err(ExtractionError::DocumentParsing("garbled bytes".into()))
        }
    }

    struct FailingCompletion;

    impl CompletionModel for FailingCompletion {
        fn complete(
            &self,
            _model: &str,
            _system: &str,
            _prompt: &str,
        ) -> Result<String, ProviderError> {
            Err(ProviderError::Connection("http://unreachable".into()))
        }
    }

    impl CompletionModel for Rc<ScriptedCompletionModel> {
        fn complete(&self, model: &str, system: &str, prompt: &str) -> Result<String, ProviderError> {
            (**self).complete(model, system, prompt)
        }
    }

    fn config() -> ExtractionConfig {
        ExtractionConfig::new("HIST 101", "", "2025", "gpt-4o").unwrap()
    }

    fn pipeline_with(
        extractor: Box<dyn DocumentExtractor>,
        completion: Box<dyn CompletionModel>,
    ) -> SyllabusPipeline {
        SyllabusPipeline::new(
            config(),
            extractor,
            Box::new(MockEmbedder::new()),
            completion,
            Box::new(CharEstimateCounter),
        )
    }

    #[test]
    fn empty_document_yields_empty_table_without_provider_calls() {
        // Scenario A.
        let scripted = Rc::new(ScriptedCompletionModel::new(vec!["unused"]));
        let pipeline = pipeline_with(
            Box::new(StaticExtractor::empty()),
            Box::new(Rc::clone(&scripted)),
        );

        let run = pipeline.run(b"ignored").unwrap();
        assert!(run.table.is_empty());
        assert_eq!(run.report.chunks_total, 0);
        assert_eq!(scripted.calls(), 0, "no completion call for empty document");
        assert!(run.table.to_csv().starts_with("Subject,Start Date"));
    }

    #[test]
    fn irrelevant_document_yields_empty_table() {
        let scripted = Rc::new(ScriptedCompletionModel::new(vec!["unused"]));
        let pipeline = pipeline_with(
            Box::new(StaticExtractor::with_text(
                "Welcome to the course.\n\nOffice hours are by appointment.",
            )),
            Box::new(Rc::clone(&scripted)),
        );

        let run = pipeline.run(b"ignored").unwrap();
        assert!(run.table.is_empty());
        assert!(run.report.chunks_total >= 2);
        assert_eq!(run.report.chunks_relevant, 0);
        assert_eq!(scripted.calls(), 0);
    }

    #[test]
    fn single_batch_run_produces_validated_rows() {
        let response = format!(
            "{HEADER}\nHIST 101: Quiz 1,2025-09-12,,2025-09-12,,True,First quiz,\n\
             HIST 101: Old Exam,2024-05-01,,2024-05-01,,True,Wrong year,"
        );
        let pipeline = pipeline_with(
            Box::new(StaticExtractor::with_text(
                "Quiz 1 takes place September 12.\n\nGrading is out of 100.",
            )),
            Box::new(MockCompletionModel::new(&response)),
        );

        let run = pipeline.run(b"ignored").unwrap();
        assert_eq!(run.table.len(), 1);
        assert_eq!(run.table.rows()[0].subject, "HIST 101: Quiz 1");
        assert_eq!(run.report.rows_dropped, 1);
        assert_eq!(run.report.batches_total, 1);
    }

    #[test]
    fn duplicate_rows_across_batches_collapse() {
        // Scenario B: two batches both report the midterm; one row survives.
        let batch1 = format!("{HEADER}\nHIST 101: Midterm Exam,2025-03-10,,2025-03-10,,True,In class,");
        let batch2 =
            format!("{HEADER}\nHIST 101: MIDTERM  EXAM!,2025-03-10,,2025-03-10,,True,Covers weeks 1-6 inclusive,");
        let scripted = Rc::new(ScriptedCompletionModel::new(vec![&batch1, &batch2]));

        // Two long cue-bearing paragraphs + a tiny budget force two batches.
        let text = format!(
            "Midterm exam details: {}.\n\nThe midterm exam is due March 10: {}.",
            "x".repeat(300),
            "y".repeat(300)
        );
        let pipeline = pipeline_with(
            Box::new(StaticExtractor::with_text(&text)),
            Box::new(Rc::clone(&scripted)),
        )
        .with_batcher(TokenBatcher::new(100, 1));

        let run = pipeline.run(b"ignored").unwrap();
        assert_eq!(scripted.calls(), 2, "expected two batches");
        assert_eq!(run.table.len(), 1);
        assert!(run.table.rows()[0].description.contains("weeks 1-6"));
    }

    #[test]
    fn non_csv_batch_contributes_nothing_but_later_batches_proceed() {
        // Scenario D.
        let batch2 = format!("{HEADER}\nHIST 101: Essay,2025-10-01,,2025-10-01,,True,Outline due,");
        let scripted = Rc::new(ScriptedCompletionModel::new(vec![
            "Sorry, I cannot find anything useful here.",
            &batch2,
        ]));

        let text = format!(
            "Reading response due September 5: {}.\n\nEssay outline due October 1: {}.",
            "x".repeat(300),
            "y".repeat(300)
        );
        let pipeline = pipeline_with(
            Box::new(StaticExtractor::with_text(&text)),
            Box::new(Rc::clone(&scripted)),
        )
        .with_batcher(TokenBatcher::new(100, 1));

        let run = pipeline.run(b"ignored").unwrap();
        assert_eq!(scripted.calls(), 2);
        assert_eq!(run.table.len(), 1);
        assert_eq!(run.table.rows()[0].subject, "HIST 101: Essay");
    }

    #[test]
    fn extraction_failure_is_fatal_and_distinguishable() {
        let pipeline = pipeline_with(
            Box::new(FailingExtractor),
            Box::new(MockCompletionModel::new("unused")),
        );
        let result = pipeline.run(b"not a document");
        assert!(matches!(result, Err(PipelineError::Extraction(_))));
    }

    #[test]
    fn completion_failure_is_fatal() {
        let pipeline = pipeline_with(
            Box::new(StaticExtractor::with_text("Quiz 1 on 9/12 covers chapter 1.")),
            Box::new(FailingCompletion),
        );
        let result = pipeline.run(b"ignored");
        assert!(matches!(result, Err(PipelineError::Provider(_))));
    }

    #[test]
    fn zero_surviving_rows_is_success_not_error() {
        let response = format!("{HEADER}\nHIST 101: Stale,2019-01-01,,2019-01-01,,True,Old,");
        let pipeline = pipeline_with(
            Box::new(StaticExtractor::with_text("Assignment due January 1.")),
            Box::new(MockCompletionModel::new(&response)),
        );

        let run = pipeline.run(b"ignored").unwrap();
        assert!(run.table.is_empty());
        assert_eq!(run.report.rows_dropped, 1);
    }
}
