//! RunLengthDecode filter (ISO 32000-1:2008 Section 7.4.5)

use crate::parser::filters::{FilterContext, StreamFilter};
use crate::parser::{ParseError, ParseResult};

/// End of data marker
const EOD: u8 = 128;

#[derive(Debug, Clone, Copy, Default)]
pub struct RunLengthFilter;

impl StreamFilter for RunLengthFilter {
    fn name(&self) -> &'static str {
        "RunLengthDecode"
    }

    fn is_supported(&self) -> bool {
        true
    }

    fn decode(&self, data: &[u8], _ctx: &FilterContext<'_>) -> ParseResult<Vec<u8>> {
        decode_run_length(data)
    }
}

/// Decode run-length encoded data. A missing EOD marker is tolerated.
pub fn decode_run_length(data: &[u8]) -> ParseResult<Vec<u8>> {
    let mut result = Vec::with_capacity(data.len() * 2);
    let mut pos = 0;

    while pos < data.len() {
        let length = data[pos];
        pos += 1;

        match length {
            EOD => break,
            0..=127 => {
                let count = length as usize + 1;
                let literal = data.get(pos..pos + count).ok_or_else(|| {
                    ParseError::StreamDecodeError(format!(
                        "RunLength literal run of {count} bytes truncated at offset {pos}"
                    ))
                })?;
                result.extend_from_slice(literal);
                pos += count;
            }
            _ => {
                let byte = *data.get(pos).ok_or_else(|| {
                    ParseError::StreamDecodeError(format!(
                        "RunLength repeat run truncated at offset {pos}"
                    ))
                })?;
                result.extend(std::iter::repeat(byte).take(257 - length as usize));
                pos += 1;
            }
        }
    }

    Ok(result)
}
