use super::table_detect::collect_table_rows;
use super::types::{DocumentExtractor, PageContent};
use super::ExtractionError;

/// PDF extractor using the pdf-extract crate.
/// Handles digital PDFs with embedded text layers; table rows are
/// recovered from tabular-looking lines in each page's text.
pub struct PdfSyllabusExtractor;

impl DocumentExtractor for PdfSyllabusExtractor {
    fn extract(&self, document: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
        let page_texts = pdf_extract::extract_text_from_mem_by_pages(document)
            .map_err(|e| ExtractionError::DocumentParsing(e.to_string()))?;

        let pages = page_texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let table_rows = collect_table_rows(&text);
                PageContent {
                    page_number: i + 1,
                    text,
                    table_rows,
                }
            })
            .collect();

        Ok(pages)
    }
}
