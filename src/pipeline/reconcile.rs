//! Merging per-batch model output into one validated table.
//!
//! Batches are extracted independently, so the same deliverable often
//! arrives more than once with slightly different wording. Rows collapse
//! on a normalized (subject, start-date) key; when two rows collide, the
//! one with more total text wins. That is a policy choice — information
//! density as a proxy for completeness — not a correctness guarantee:
//! later batches can silently replace earlier ones.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

use super::table::{DeliverableRow, ResultTable, COLUMNS};

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("batch output is not valid CSV: {0}")]
    MalformedCsv(String),
}

/// Dedup key: normalized subject plus the raw trimmed start-date string.
pub type DedupKey = (String, String);

/// Counters describing one reconciliation pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileStats {
    /// Unique keys stored across all batches.
    pub unique_rows: usize,
    /// Stored rows dropped by field-count or year validation.
    pub rows_dropped: usize,
}

/// Case-, whitespace-, and punctuation-insensitive subject normalization:
/// "MIDTERM  EXAM!" and "Midterm Exam" produce the same key component.
pub fn normalize_subject(subject: &str) -> String {
    subject
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn dedup_key(fields: &[String]) -> DedupKey {
    (
        normalize_subject(&fields[0]),
        fields[1].trim().to_string(),
    )
}

fn total_chars(fields: &[String]) -> usize {
    fields.iter().map(|f| f.chars().count()).sum()
}

fn is_header_echo(fields: &[String]) -> bool {
    fields.len() == COLUMNS.len()
        && fields
            .iter()
            .zip(COLUMNS.iter())
            .all(|(f, c)| f.trim().eq_ignore_ascii_case(c))
}

fn is_target_year(date: &str, target_year: i32) -> bool {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map(|d| d.year() == target_year)
        .unwrap_or(false)
}

/// Accumulates rows across batches, one entry per unique `DedupKey`.
///
/// Local to a single pipeline run — nothing here is shared across
/// concurrent invocations.
#[derive(Debug, Default)]
pub struct RowReconciler {
    rows_by_key: HashMap<DedupKey, Vec<String>>,
    insertion_order: Vec<DedupKey>,
}

impl RowReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one batch's raw response as CSV and merge its rows.
    ///
    /// The absorb is transactional: if any record fails to parse, the
    /// whole batch contributes nothing and the error is returned for the
    /// caller to log — a single bad batch never aborts the run. The first
    /// record is always discarded as the header the prompt demands, and
    /// any later record matching the canonical column names is discarded
    /// as a duplicated header echo. Data rows need at least two fields
    /// (subject and start date) to be keyable.
    pub fn absorb(&mut self, response: &str) -> Result<usize, ReconcileError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(response.as_bytes());

        let mut records: Vec<Vec<String>> = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| ReconcileError::MalformedCsv(e.to_string()))?;
            records.push(record.iter().map(str::to_string).collect());
        }

        let mut contributed = 0;
        for fields in records.into_iter().skip(1) {
            if is_header_echo(&fields) || fields.len() < 2 {
                continue;
            }
            self.merge(fields);
            contributed += 1;
        }

        Ok(contributed)
    }

    fn merge(&mut self, fields: Vec<String>) {
        let key = dedup_key(&fields);
        match self.rows_by_key.get(&key) {
            None => {
                self.insertion_order.push(key.clone());
                self.rows_by_key.insert(key, fields);
            }
            Some(existing) => {
                // Longest-total-text wins; equal lengths keep the incumbent.
                if total_chars(&fields) > total_chars(existing) {
                    self.rows_by_key.insert(key, fields);
                }
            }
        }
    }

    /// Number of unique keys currently stored.
    pub fn len(&self) -> usize {
        self.insertion_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.insertion_order.is_empty()
    }

    /// Validate every stored row and assemble the final table.
    ///
    /// A surviving row has exactly eight fields and a start date that
    /// parses as `YYYY-MM-DD` in the target year. Everything else is
    /// dropped and counted, not surfaced per-row. Zero survivors yield an
    /// empty table, never an error.
    pub fn finish(self, target_year: i32) -> (ResultTable, ReconcileStats) {
        let mut rows = Vec::new();
        let mut dropped = 0;

        for key in &self.insertion_order {
            let fields = &self.rows_by_key[key];
            match DeliverableRow::from_fields(fields) {
                Some(row) if is_target_year(&row.start_date, target_year) => rows.push(row),
                _ => dropped += 1,
            }
        }

        let stats = ReconcileStats {
            unique_rows: rows.len() + dropped,
            rows_dropped: dropped,
        };
        (ResultTable::new(rows), stats)
    }
}
