//! Cross-reference offset locator
//!
//! Resolves the `startxref` trailer line (ISO 32000-1 Section 7.5.5) into the
//! byte offset of the cross-reference section. The anchor is found with a
//! byte-level [`AnchorSearch`], then confirmed and read with the [`Lexer`]
//! so that comments between the keyword and the number are tolerated.

use super::anchor::{AnchorKeyword, AnchorMatch, AnchorScan, AnchorSearch};
use super::lexer::{Lexer, Token};
use super::{ParseError, ParseOptions, ParseResult};
use crate::error::Result;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

/// A validated `startxref` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartXRef {
    /// Keyword spelling that was found
    pub keyword: AnchorKeyword,
    /// Offset of the first byte of the keyword
    pub anchor_offset: u64,
    /// Offset of the cross-reference section
    pub xref_offset: u64,
    /// Lexer position right after the offset token
    pub resume_position: u64,
    /// Bytes read by the anchor search across all candidates
    pub bytes_scanned: u64,
    /// Recovery notes, collected when `ParseOptions::collect_warnings` is set
    pub warnings: Vec<String>,
}

impl StartXRef {
    /// Locate the cross-reference offset in any seekable reader
    pub fn locate<R: Read + Seek>(reader: R, options: &ParseOptions) -> ParseResult<Self> {
        let mut lexer = Lexer::new(reader)?;
        StartXRefLocator::new(options.clone()).locate(&mut lexer)
    }

    /// Locate the cross-reference offset in a file on disk
    pub fn from_path<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::locate(file, options)?)
    }

    /// Whether a non-standard keyword spelling was needed
    pub fn used_legacy_keyword(&self) -> bool {
        self.keyword.is_legacy()
    }
}

/// Finds and validates the `startxref` anchor
#[derive(Debug, Clone)]
pub struct StartXRefLocator {
    options: ParseOptions,
    search: AnchorSearch,
}

impl Default for StartXRefLocator {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}

impl StartXRefLocator {
    pub fn new(options: ParseOptions) -> Self {
        let search = AnchorSearch::new(options.xref_search_window);
        Self { options, search }
    }

    pub fn strict() -> Self {
        Self::new(ParseOptions::strict())
    }

    pub fn lenient() -> Self {
        Self::new(ParseOptions::lenient())
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Locate the anchor and read the offset that follows it
    ///
    /// On success the lexer is left at [`StartXRef::resume_position`].
    pub fn locate<R: Read + Seek>(&self, lexer: &mut Lexer<R>) -> ParseResult<StartXRef> {
        let mut warnings = Vec::new();
        let (anchor, scan, bytes_scanned) = self.find_anchor(lexer)?;

        if scan.passes > 1 {
            self.note(
                &mut warnings,
                format!(
                    "'{}' was not in the trailing {} bytes; found after widening the search to {} bytes",
                    anchor.keyword,
                    self.search.initial_window(),
                    scan.window
                ),
            );
        }
        if anchor.keyword.is_legacy() {
            tracing::warn!(
                "using non-standard '{}' keyword at offset {}",
                anchor.keyword,
                anchor.offset
            );
            self.note(
                &mut warnings,
                format!(
                    "found non-standard '{}' keyword at offset {}",
                    anchor.keyword, anchor.offset
                ),
            );
        }

        Self::validate_anchor(lexer, anchor)?;
        let xref_offset = Self::read_xref_offset(lexer, anchor.keyword)?;

        Ok(StartXRef {
            keyword: anchor.keyword,
            anchor_offset: anchor.offset,
            xref_offset,
            resume_position: lexer.position(),
            bytes_scanned,
            warnings,
        })
    }

    /// Try each candidate keyword in priority order
    fn find_anchor<R: Read + Seek>(
        &self,
        lexer: &mut Lexer<R>,
    ) -> ParseResult<(AnchorMatch, AnchorScan, u64)> {
        let candidates = AnchorKeyword::candidates(self.options.lenient_syntax);
        let mut bytes_scanned = 0;
        let mut searched = 0;

        for &keyword in candidates {
            let scan = self.search.find_last(lexer.cursor_mut(), keyword)?;
            bytes_scanned += scan.bytes_scanned;
            searched = searched.max(scan.window);

            if let Some(anchor) = scan.found {
                return Ok((anchor, scan, bytes_scanned));
            }
            tracing::debug!("no '{}' keyword in the last {} bytes", keyword, scan.window);
        }

        Err(ParseError::AnchorNotFound {
            keywords: candidates.iter().map(|keyword| keyword.text()).collect(),
            searched,
        })
    }

    /// Confirm that the lexer reads the keyword at the matched offset
    fn validate_anchor<R: Read + Seek>(
        lexer: &mut Lexer<R>,
        anchor: AnchorMatch,
    ) -> ParseResult<()> {
        lexer.seek(anchor.offset)?;
        let token = lexer.next_token()?;

        if token.keyword() == Some(anchor.keyword.text()) {
            Ok(())
        } else {
            Err(ParseError::AnchorInconsistency {
                keyword: anchor.keyword.text(),
                offset: anchor.offset,
                found: format!("{token:?}"),
            })
        }
    }

    /// Read the first numeric token after the keyword, skipping comments
    pub fn read_xref_offset<R: Read + Seek>(
        lexer: &mut Lexer<R>,
        keyword: AnchorKeyword,
    ) -> ParseResult<u64> {
        let position = lexer.position();

        loop {
            let token = match lexer.next_token() {
                Ok(token) => token,
                Err(ParseError::SyntaxError { position: at, message }) => {
                    return Err(ParseError::UnexpectedTokenAfterAnchor {
                        keyword: keyword.text(),
                        found: format!("malformed token at {at}: {message}"),
                        position,
                    })
                }
                Err(e) => return Err(e),
            };

            match token {
                Token::Comment(_) => continue,
                Token::Integer(offset) if offset >= 0 => return Ok(offset as u64),
                token @ (Token::Integer(_) | Token::Real(_)) => {
                    return Err(ParseError::InvalidXRefOffset {
                        keyword: keyword.text(),
                        found: format!("{token:?}"),
                    })
                }
                Token::Eof => {
                    return Err(ParseError::MissingXRefOffset {
                        keyword: keyword.text(),
                        position,
                    })
                }
                token => {
                    return Err(ParseError::UnexpectedTokenAfterAnchor {
                        keyword: keyword.text(),
                        found: format!("{token:?}"),
                        position,
                    })
                }
            }
        }
    }

    fn note(&self, warnings: &mut Vec<String>, message: String) {
        tracing::debug!("{}", message);
        if self.options.collect_warnings {
            warnings.push(message);
        }
    }
}
