//! LZWDecode filter (ISO 32000-1:2008 Section 7.4.4)
//!
//! Codes are read MSB first starting at 9 bits. With `/EarlyChange 1`, the
//! default, the code width grows one code early, which is the TIFF variant.

use super::predictor::apply_predictor;
use crate::parser::filters::{FilterContext, StreamFilter};
use crate::parser::{ParseError, ParseResult};
use weezl::{decode::Decoder, BitOrder};

#[derive(Debug, Clone, Copy, Default)]
pub struct LzwFilter;

impl StreamFilter for LzwFilter {
    fn name(&self) -> &'static str {
        "LZWDecode"
    }

    fn is_supported(&self) -> bool {
        true
    }

    fn decode(&self, data: &[u8], ctx: &FilterContext<'_>) -> ParseResult<Vec<u8>> {
        let early_change = ctx.parm_or("EarlyChange", 1);
        let expanded = decode_lzw(data, early_change)?;
        apply_predictor(expanded, ctx)
    }
}

/// Decode LZW data. A missing end-of-data code is tolerated.
pub fn decode_lzw(data: &[u8], early_change: i64) -> ParseResult<Vec<u8>> {
    let mut decoder = match early_change {
        0 => Decoder::new(BitOrder::Msb, 8),
        1 => Decoder::with_tiff_size_switch(BitOrder::Msb, 8),
        other => {
            return Err(ParseError::StreamDecodeError(format!(
                "Invalid EarlyChange {other}"
            )));
        }
    };

    let mut output = Vec::new();
    let result = decoder.into_vec(&mut output).decode(data);
    result
        .status
        .map_err(|e| ParseError::StreamDecodeError(format!("LZW decode error: {e}")))?;

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::objects::{PdfDictionary, PdfObject};
    use weezl::encode::Encoder;

    const TEXT: &[u8] = b"TOBEORNOTTOBEORTOBEORNOT TOBEORNOTTOBEORTOBEORNOT";

    #[test]
    fn test_lzw_default_early_change() {
        let encoded = Encoder::with_tiff_size_switch(BitOrder::Msb, 8)
            .encode(TEXT)
            .unwrap();
        let dict = PdfDictionary::new();

        let result = LzwFilter
            .decode(&encoded, &FilterContext::new(&dict, 0))
            .unwrap();
        assert_eq!(result, TEXT);
    }

    #[test]
    fn test_lzw_early_change_zero() {
        let encoded = Encoder::new(BitOrder::Msb, 8).encode(TEXT).unwrap();

        let mut parms = PdfDictionary::new();
        parms.insert("EarlyChange".to_string(), PdfObject::Integer(0));
        let mut dict = PdfDictionary::new();
        dict.insert("DecodeParms".to_string(), PdfObject::Dictionary(parms));

        let result = LzwFilter
            .decode(&encoded, &FilterContext::new(&dict, 0))
            .unwrap();
        assert_eq!(result, TEXT);
    }

    #[test]
    fn test_lzw_larger_input_crosses_code_widths() {
        let original: Vec<u8> = (0..4096u32).map(|i| (i * 7 % 251) as u8).collect();
        let encoded = Encoder::with_tiff_size_switch(BitOrder::Msb, 8)
            .encode(&original)
            .unwrap();

        assert_eq!(decode_lzw(&encoded, 1).unwrap(), original);
    }

    #[test]
    fn test_lzw_invalid_early_change() {
        assert!(decode_lzw(&[0x80, 0x0B], 2).is_err());
    }
}
