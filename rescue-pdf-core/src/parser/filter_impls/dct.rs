//! DCTDecode (JPEG) filter implementation
//!
//! Implements the DCTDecode filter according to ISO 32000-1:2008 Section 7.4.8.
//! JPEG data is kept as-is for the viewer; only the SOI marker is checked.

use crate::parser::filters::{FilterContext, StreamFilter};
use crate::parser::{ParseError, ParseResult};

/// Start of Image
const SOI: [u8; 2] = [0xFF, 0xD8];

#[derive(Debug, Clone, Copy, Default)]
pub struct DctFilter;

impl StreamFilter for DctFilter {
    fn name(&self) -> &'static str {
        "DCTDecode"
    }

    fn is_supported(&self) -> bool {
        true
    }

    fn decode(&self, data: &[u8], _ctx: &FilterContext<'_>) -> ParseResult<Vec<u8>> {
        if data.len() < SOI.len() {
            return Err(ParseError::StreamDecodeError(
                "JPEG data too short".to_string(),
            ));
        }

        if data[..2] != SOI {
            return Err(ParseError::StreamDecodeError(
                "Invalid JPEG: missing SOI marker".to_string(),
            ));
        }

        Ok(data.to_vec())
    }
}
