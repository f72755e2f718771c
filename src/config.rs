//! Run configuration for the extraction pipeline.
//!
//! Everything the pipeline needs to know about one syllabus lives here:
//! the course name used to prefix event subjects, the user's free-text
//! notes about the document's formatting, the calendar year extracted
//! dates must fall in, and the completion model identifier. The target
//! year arrives as a string from the upload surface and is validated at
//! construction time — before any provider call is made.

use serde::Serialize;
use thiserror::Error;

/// Default completion model when the caller does not pick one.
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-3.5-turbo";

/// Default embedding model for the retrieval stage.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("target year {0:?} is not a valid year")]
    InvalidTargetYear(String),
}

/// Validated configuration for one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionConfig {
    /// Course name, prefixed onto every extracted Subject.
    pub course_name: String,
    /// Free-text notes about the syllabus format, injected verbatim into
    /// the extraction prompt.
    pub format_notes: String,
    /// Calendar year extracted start dates must match.
    pub target_year: i32,
    /// Completion model identifier, used for both tokenization and
    /// extraction calls.
    pub model: String,
}

impl ExtractionConfig {
    /// Build a config, parsing the target year from its string form.
    ///
    /// An unparseable year is a configuration error, never a silent
    /// default.
    pub fn new(
        course_name: &str,
        format_notes: &str,
        target_year: &str,
        model: &str,
    ) -> Result<Self, ConfigError> {
        let year: i32 = target_year
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidTargetYear(target_year.to_string()))?;

        Ok(Self {
            course_name: course_name.trim().to_string(),
            format_notes: format_notes.trim().to_string(),
            target_year: year,
            model: model.to_string(),
        })
    }

    /// Convenience constructor with the default completion model.
    pub fn with_default_model(
        course_name: &str,
        format_notes: &str,
        target_year: &str,
    ) -> Result<Self, ConfigError> {
        Self::new(course_name, format_notes, target_year, DEFAULT_COMPLETION_MODEL)
    }
}
