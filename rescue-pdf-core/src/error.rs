use crate::parser::ParseError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

impl PdfError {
    /// True when a known filter declined to decode
    pub fn is_unsupported(&self) -> bool {
        matches!(self, PdfError::Parse(e) if e.is_unsupported())
    }
}

pub type Result<T> = std::result::Result<T, PdfError>;
