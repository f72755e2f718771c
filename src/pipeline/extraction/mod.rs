pub mod compose;
pub mod pdf;
pub mod table_detect;
pub mod types;

pub use compose::*;
pub use pdf::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("document parsing failed: {0}")]
    DocumentParsing(String),

    #[error("unsupported format for extraction")]
    UnsupportedFormat,
}
