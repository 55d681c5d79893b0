//! ASCIIHexDecode and ASCII85Decode filters (ISO 32000-1:2008 Sections 7.4.2 and 7.4.3)

use crate::parser::filters::{FilterContext, StreamFilter};
use crate::parser::lexer::{hex_value, is_whitespace};
use crate::parser::{ParseError, ParseResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct AsciiHexFilter;

impl StreamFilter for AsciiHexFilter {
    fn name(&self) -> &'static str {
        "ASCIIHexDecode"
    }

    fn is_supported(&self) -> bool {
        true
    }

    fn decode(&self, data: &[u8], _ctx: &FilterContext<'_>) -> ParseResult<Vec<u8>> {
        decode_ascii_hex(data)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Ascii85Filter;

impl StreamFilter for Ascii85Filter {
    fn name(&self) -> &'static str {
        "ASCII85Decode"
    }

    fn is_supported(&self) -> bool {
        true
    }

    fn decode(&self, data: &[u8], _ctx: &FilterContext<'_>) -> ParseResult<Vec<u8>> {
        decode_ascii85(data)
    }
}

/// Decode ASCIIHexDecode data
pub fn decode_ascii_hex(data: &[u8]) -> ParseResult<Vec<u8>> {
    let mut result = Vec::with_capacity(data.len() / 2);
    let mut chars = data.iter().copied().filter(|&b| !is_whitespace(b));

    loop {
        let high = match chars.next() {
            Some(b'>') | None => break,
            Some(ch) => ch,
        };

        // Odd number of digits: the missing one is 0
        let low = match chars.next() {
            Some(ch) => ch,
            None => b'0',
        };
        let terminated = low == b'>';

        let high_val = hex_value(high).ok_or_else(|| {
            ParseError::StreamDecodeError(format!("Invalid hex digit: {}", high as char))
        })?;
        let low_val = if terminated {
            0
        } else {
            hex_value(low).ok_or_else(|| {
                ParseError::StreamDecodeError(format!("Invalid hex digit: {}", low as char))
            })?
        };

        result.push((high_val << 4) | low_val);

        if terminated {
            break;
        }
    }

    Ok(result)
}

/// Decode ASCII85Decode data
pub fn decode_ascii85(data: &[u8]) -> ParseResult<Vec<u8>> {
    let mut result = Vec::with_capacity(data.len() * 4 / 5);
    let mut chars = data.iter().copied().filter(|&b| !is_whitespace(b)).peekable();
    let mut group = Vec::with_capacity(5);

    // Skip optional <~ prefix
    if chars.peek() == Some(&b'<') {
        chars.next();
        if chars.next() != Some(b'~') {
            return Err(ParseError::StreamDecodeError(
                "Invalid ASCII85 start marker".to_string(),
            ));
        }
    }

    while let Some(c) = chars.next() {
        match c {
            b'~' => {
                if chars.next() == Some(b'>') {
                    break;
                }
                return Err(ParseError::StreamDecodeError(
                    "Invalid ASCII85 end marker".to_string(),
                ));
            }
            b'z' if group.is_empty() => {
                result.extend_from_slice(&[0, 0, 0, 0]);
            }
            b'!'..=b'u' => {
                group.push(c);
                if group.len() == 5 {
                    result.extend_from_slice(&group_value(&group)?.to_be_bytes());
                    group.clear();
                }
            }
            _ => {
                return Err(ParseError::StreamDecodeError(format!(
                    "Invalid ASCII85 character: {}",
                    c as char
                )));
            }
        }
    }

    // Incomplete final group: pad with 'u', keep len - 1 bytes
    if !group.is_empty() {
        if group.len() == 1 {
            return Err(ParseError::StreamDecodeError(
                "ASCII85 final group has a single character".to_string(),
            ));
        }

        let output_bytes = group.len() - 1;
        group.resize(5, b'u');
        let value = group_value(&group)?;
        result.extend_from_slice(&value.to_be_bytes()[..output_bytes]);
    }

    Ok(result)
}

fn group_value(group: &[u8]) -> ParseResult<u32> {
    let value = group
        .iter()
        .fold(0u64, |acc, &ch| acc * 85 + u64::from(ch - b'!'));

    u32::try_from(value).map_err(|_| {
        ParseError::StreamDecodeError(format!(
            "ASCII85 group {} exceeds 32 bits",
            String::from_utf8_lossy(group)
        ))
    })
}
