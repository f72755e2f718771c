//! Paragraph chunking and deliverable-cue relevance filtering.
//!
//! Chunking is a structural split on blank lines — it does not try to keep
//! a table block intact across chunk boundaries. The relevance filter is a
//! precision-oriented lexical screen: missed deliverables are the accepted
//! cost of sending less noise to the embedding and extraction stages, and
//! false positives are fine because the extraction model filters again.

use regex::Regex;

/// Split extracted text on blank-line boundaries into trimmed,
/// non-empty paragraph chunks.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Chunk relevance predicate — pluggable so alternative classifiers can be
/// substituted without touching the pipeline's control flow.
pub trait RelevanceFilter {
    fn is_relevant(&self, chunk: &str) -> bool;
}

impl RelevanceFilter for Box<dyn RelevanceFilter> {
    fn is_relevant(&self, chunk: &str) -> bool {
        (**self).is_relevant(chunk)
    }
}

/// Lexical cues strongly associated with dated deliverables.
///
/// A chunk is retained iff it matches a deliverable keyword
/// (case-insensitive) or a date-shaped pattern: a capitalized month-like
/// word of 3-9 letters followed by a 1-2 digit day, or "on M/D".
pub struct DeliverableCueFilter {
    keyword: Regex,
    date_shape: Regex,
}

impl DeliverableCueFilter {
    pub fn new() -> Self {
        Self {
            keyword: Regex::new(
                r"(?i)\b(due|exam|test|quiz|paper|project|assignment|submit|submission|read|reading|chapter)\b",
            )
            .unwrap(),
            date_shape: Regex::new(r"\b(?:[A-Z][a-z]{2,8} \d{1,2}|on \d{1,2}/\d{1,2})\b").unwrap(),
        }
    }
}

impl Default for DeliverableCueFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl RelevanceFilter for DeliverableCueFilter {
    fn is_relevant(&self, chunk: &str) -> bool {
        self.keyword.is_match(chunk) || self.date_shape.is_match(chunk)
    }
}

/// Keep only the chunks the filter considers relevant, preserving order.
pub fn filter_relevant(chunks: Vec<String>, filter: &dyn RelevanceFilter) -> Vec<String> {
    chunks
        .into_iter()
        .filter(|c| filter.is_relevant(c))
        .collect()
}
