//! PDF Parser Module
//!
//! Structural recovery for PDF readers: locating the `startxref` anchor in
//! possibly malformed files, and decoding stream payloads through the
//! standard filters (ISO 32000-1 Sections 7.4 and 7.5.5).

pub mod anchor;
pub mod filter_impls;
pub mod filters;
pub mod lexer;
pub mod objects;
pub mod source;
pub mod startxref;

pub use self::anchor::{AnchorKeyword, AnchorMatch, AnchorScan, AnchorSearch};
pub use self::filters::{decode_stream, FilterContext, FilterRegistry, StreamFilter};
pub use self::lexer::{Lexer, Token};
pub use self::objects::{PdfArray, PdfDictionary, PdfName, PdfObject, PdfStream};
pub use self::source::ByteCursor;
pub use self::startxref::{StartXRef, StartXRefLocator};

/// Default size of the trailing window searched for `startxref`
pub const DEFAULT_XREF_SEARCH_WINDOW: u64 = 2048;

/// Result type for parser operations
pub type ParseResult<T> = Result<T, ParseError>;

/// PDF Parser errors
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Syntax error at position {position}: {message}")]
    SyntaxError { position: u64, message: String },

    #[error("Unexpected token: expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },

    #[error("No recognized anchor keyword ({}) found in the trailing {searched} bytes", .keywords.join(", "))]
    AnchorNotFound {
        keywords: Vec<&'static str>,
        searched: u64,
    },

    #[error("Anchor inconsistency: byte match for '{keyword}' at offset {offset}, but the lexer read {found}")]
    AnchorInconsistency {
        keyword: &'static str,
        offset: u64,
        found: String,
    },

    #[error("Unexpected token {found} after '{keyword}' at position {position}")]
    UnexpectedTokenAfterAnchor {
        keyword: &'static str,
        found: String,
        position: u64,
    },

    #[error("No numeric offset found after '{keyword}', searched from position {position}")]
    MissingXRefOffset { keyword: &'static str, position: u64 },

    #[error("Invalid xref offset after '{keyword}': {found}")]
    InvalidXRefOffset { keyword: &'static str, found: String },

    #[error("Unknown filter: {0}")]
    UnknownFilter(String),

    #[error("Filter {filter} is not supported; {suggestion}")]
    UnsupportedFilter {
        filter: &'static str,
        suggestion: &'static str,
    },

    #[error("Stream decode error: {0}")]
    StreamDecodeError(String),
}

impl ParseError {
    /// True for errors that describe a malformed or non-conformant document
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            ParseError::SyntaxError { .. }
                | ParseError::UnexpectedToken { .. }
                | ParseError::AnchorNotFound { .. }
                | ParseError::UnexpectedTokenAfterAnchor { .. }
                | ParseError::MissingXRefOffset { .. }
                | ParseError::InvalidXRefOffset { .. }
                | ParseError::UnknownFilter(_)
                | ParseError::StreamDecodeError(_)
        )
    }

    /// True when the byte-level search and the lexer disagreed
    pub fn is_internal(&self) -> bool {
        matches!(self, ParseError::AnchorInconsistency { .. })
    }

    /// True when a known filter declined to decode
    pub fn is_unsupported(&self) -> bool {
        matches!(self, ParseError::UnsupportedFilter { .. })
    }
}

/// Options for parsing PDF files with different levels of strictness
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Accept known non-conformant syntax, such as the `startref` misspelling
    pub lenient_syntax: bool,
    /// Initial size of the trailing window searched for the anchor keyword
    pub xref_search_window: u64,
    /// Record recovery notes instead of only logging them
    pub collect_warnings: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            lenient_syntax: false,
            xref_search_window: DEFAULT_XREF_SEARCH_WINDOW,
            collect_warnings: false,
        }
    }
}

impl ParseOptions {
    /// Create options for strict parsing
    pub fn strict() -> Self {
        Self::default()
    }

    /// Create options for lenient parsing that tries to recover from errors
    pub fn lenient() -> Self {
        Self {
            lenient_syntax: true,
            xref_search_window: DEFAULT_XREF_SEARCH_WINDOW,
            collect_warnings: true,
        }
    }

    /// Set the initial trailing search window
    pub fn with_xref_search_window(mut self, window: u64) -> Self {
        self.xref_search_window = window;
        self
    }
}
