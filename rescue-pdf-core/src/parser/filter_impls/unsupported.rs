//! Filters that are recognized but never decoded
//!
//! JPXDecode (JPEG 2000), JBIG2Decode and CCITTFaxDecode image data is passed
//! to viewers undecoded. Crypt streams belong to the security handler.

use crate::parser::filters::{FilterContext, StreamFilter, RAW_DATA_SUGGESTION};
use crate::parser::{ParseError, ParseResult};

/// JPXDecode (JPEG 2000)
///
/// Always refuses. Never returns empty or zero-filled output.
#[derive(Debug, Clone, Copy, Default)]
pub struct JpxFilter;

impl StreamFilter for JpxFilter {
    fn name(&self) -> &'static str {
        "JPXDecode"
    }

    fn is_supported(&self) -> bool {
        false
    }

    fn decode(&self, _data: &[u8], _ctx: &FilterContext<'_>) -> ParseResult<Vec<u8>> {
        Err(ParseError::UnsupportedFilter {
            filter: self.name(),
            suggestion: RAW_DATA_SUGGESTION,
        })
    }
}

/// Any other known filter without a decoder
#[derive(Debug, Clone, Copy)]
pub struct UnsupportedCodec {
    name: &'static str,
}

impl UnsupportedCodec {
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    pub const fn jbig2() -> Self {
        Self::new("JBIG2Decode")
    }

    pub const fn ccitt_fax() -> Self {
        Self::new("CCITTFaxDecode")
    }

    pub const fn crypt() -> Self {
        Self::new("Crypt")
    }
}

impl StreamFilter for UnsupportedCodec {
    fn name(&self) -> &'static str {
        self.name
    }

    fn is_supported(&self) -> bool {
        false
    }

    fn decode(&self, _data: &[u8], _ctx: &FilterContext<'_>) -> ParseResult<Vec<u8>> {
        Err(ParseError::UnsupportedFilter {
            filter: self.name,
            suggestion: RAW_DATA_SUGGESTION,
        })
    }
}
