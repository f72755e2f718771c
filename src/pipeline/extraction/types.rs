use super::ExtractionError;

/// Extraction result for one page: reading-order prose plus any table
/// rows recovered from that page, each row as ordered cell values.
#[derive(Debug, Clone)]
pub struct PageContent {
    pub page_number: usize,
    pub text: String,
    pub table_rows: Vec<Vec<String>>,
}

/// Document extraction abstraction.
///
/// A document that yields no pages (or only empty ones) is not an error —
/// downstream stages turn it into an empty result. Bytes that cannot be
/// parsed at all must fail, so "unreadable document" stays distinguishable
/// from "no deliverables found".
pub trait DocumentExtractor {
    fn extract(&self, document: &[u8]) -> Result<Vec<PageContent>, ExtractionError>;
}

impl DocumentExtractor for Box<dyn DocumentExtractor> {
    fn extract(&self, document: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
        (**self).extract(document)
    }
}
