//! Assembly of extracted pages into the single text stream the chunker
//! consumes: trimmed page prose separated by blank lines, followed by one
//! combined table block bounded by sentinel markers.

use super::types::{DocumentExtractor, PageContent};
use super::ExtractionError;

/// Sentinel opening a synthesized table block. The extraction prompt
/// tells the model these markers delimit tabular content.
pub const TABLE_START: &str = "[TABLE START]";
/// Sentinel closing a synthesized table block.
pub const TABLE_END: &str = "[TABLE END]";

const TABLE_PREAMBLE: &str = "--- Combined Table Block ---";

/// Run the extractor and compose its pages into one text stream.
///
/// A document with no text and no tables composes to an empty string —
/// the pipeline treats that as "nothing found", not a failure.
pub fn extract_document_text(
    extractor: &dyn DocumentExtractor,
    document: &[u8],
) -> Result<String, ExtractionError> {
    let pages = extractor.extract(document)?;
    Ok(compose_pages(&pages))
}

/// Compose page prose and one combined table block into a single string.
pub fn compose_pages(pages: &[PageContent]) -> String {
    let mut combined = String::new();

    for page in pages {
        let text = page.text.trim();
        if !text.is_empty() {
            combined.push('\n');
            combined.push_str(text);
            combined.push('\n');
        }
    }

    let table_rows: Vec<String> = pages
        .iter()
        .flat_map(|p| p.table_rows.iter())
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .map(|row| {
            row.iter()
                .map(|cell| cell.trim())
                .collect::<Vec<_>>()
                .join(", ")
        })
        .collect();

    if !table_rows.is_empty() {
        combined.push('\n');
        combined.push_str(TABLE_PREAMBLE);
        combined.push('\n');
        combined.push_str(TABLE_START);
        combined.push('\n');
        combined.push_str(&table_rows.join("\n"));
        combined.push('\n');
        combined.push_str(TABLE_END);
        combined.push('\n');
    }

    combined
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(n: usize, text: &str, rows: Vec<Vec<&str>>) -> PageContent {
        PageContent {
            page_number: n,
            text: text.to_string(),
            table_rows: rows
                .into_iter()
                .map(|r| r.into_iter().map(str::to_string).collect())
                .collect(),
        }
    }

    #[test]
    fn pages_separated_by_blank_lines() {
        let pages = vec![
            page(1, "  Course overview.  ", vec![]),
            page(2, "Grading policy.", vec![]),
        ];
        let out = compose_pages(&pages);
        assert!(out.contains("Course overview.\n\nGrading policy."));
        assert!(!out.contains(TABLE_START));
    }

    #[test]
    fn table_block_appended_once_with_sentinels() {
        let pages = vec![
            page(1, "Schedule", vec![vec!["Week 1", "Reading", "Sep 2"]]),
            page(2, "", vec![vec!["Week 2", "Quiz 1", "Sep 9"]]),
        ];
        let out = compose_pages(&pages);

        assert_eq!(out.matches(TABLE_START).count(), 1);
        assert_eq!(out.matches(TABLE_END).count(), 1);
        assert!(out.contains("Week 1, Reading, Sep 2\nWeek 2, Quiz 1, Sep 9"));
        let start = out.find(TABLE_START).unwrap();
        let end = out.find(TABLE_END).unwrap();
        assert!(start < end, "sentinels out of order");
    }

    #[test]
    fn empty_cells_render_as_empty_strings() {
        let pages = vec![page(1, "", vec![vec!["Quiz 1", "", "Sep 9"]])];
        let out = compose_pages(&pages);
        assert!(out.contains("Quiz 1, , Sep 9"));
    }

    #[test]
    fn all_empty_rows_dropped() {
        let pages = vec![page(1, "Just prose here.", vec![vec!["", "  ", ""]])];
        let out = compose_pages(&pages);
        assert!(!out.contains(TABLE_START));
    }

    #[test]
    fn no_text_no_tables_yields_empty_string() {
        let pages = vec![page(1, "   ", vec![])];
        assert_eq!(compose_pages(&pages), "");
        assert_eq!(compose_pages(&[]), "");
    }
}
