//! FlateDecode filter (ISO 32000-1:2008 Section 7.4.4)

use super::predictor::apply_predictor;
use crate::parser::filters::{FilterContext, StreamFilter};
use crate::parser::{ParseError, ParseResult};

#[cfg(feature = "compression")]
use flate2::read::ZlibDecoder;
#[cfg(feature = "compression")]
use std::io::Read;

#[derive(Debug, Clone, Copy, Default)]
pub struct FlateFilter;

impl StreamFilter for FlateFilter {
    fn name(&self) -> &'static str {
        "FlateDecode"
    }

    fn is_supported(&self) -> bool {
        cfg!(feature = "compression")
    }

    fn decode(&self, data: &[u8], ctx: &FilterContext<'_>) -> ParseResult<Vec<u8>> {
        let inflated = decode_flate(data)?;
        apply_predictor(inflated, ctx)
    }
}

/// Decode FlateDecode (zlib/deflate) compressed data
#[cfg(feature = "compression")]
pub fn decode_flate(data: &[u8]) -> ParseResult<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data);
    let mut result = Vec::new();
    decoder
        .read_to_end(&mut result)
        .map_err(|e| ParseError::StreamDecodeError(format!("Flate decode error: {e}")))?;
    Ok(result)
}

#[cfg(not(feature = "compression"))]
pub fn decode_flate(_data: &[u8]) -> ParseResult<Vec<u8>> {
    Err(ParseError::StreamDecodeError(
        "FlateDecode requires 'compression' feature".to_string(),
    ))
}
