//! Predictor functions for FlateDecode and LZWDecode (ISO 32000-1:2008 Section 7.4.4.4)

use crate::parser::filters::FilterContext;
use crate::parser::{ParseError, ParseResult};

/// Predictor parameters from `/DecodeParms`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictorParams {
    pub predictor: i64,
    pub colors: usize,
    pub bits_per_component: usize,
    pub columns: usize,
}

impl Default for PredictorParams {
    fn default() -> Self {
        Self {
            predictor: 1,
            colors: 1,
            bits_per_component: 8,
            columns: 1,
        }
    }
}

impl PredictorParams {
    /// Read parameters for the filter at `ctx.index`
    pub fn from_context(ctx: &FilterContext<'_>) -> ParseResult<Self> {
        let params = Self {
            predictor: ctx.parm_or("Predictor", 1),
            colors: positive(ctx.parm_or("Colors", 1), "Colors")?,
            bits_per_component: positive(ctx.parm_or("BitsPerComponent", 8), "BitsPerComponent")?,
            columns: positive(ctx.parm_or("Columns", 1), "Columns")?,
        };

        if !matches!(params.bits_per_component, 1 | 2 | 4 | 8 | 16) {
            return Err(ParseError::StreamDecodeError(format!(
                "Invalid BitsPerComponent {}",
                params.bits_per_component
            )));
        }

        Ok(params)
    }

    /// Bytes per complete pixel, at least 1
    fn bytes_per_pixel(&self) -> usize {
        let bits = self.colors.saturating_mul(self.bits_per_component);
        (bits.saturating_add(7) / 8).max(1)
    }

    /// Bytes per row of samples, excluding any PNG tag byte
    fn row_length(&self) -> ParseResult<usize> {
        self.colors
            .checked_mul(self.bits_per_component)
            .and_then(|bits| bits.checked_mul(self.columns))
            .and_then(|bits| bits.checked_add(7))
            .map(|bits| bits / 8)
            .ok_or_else(|| {
                ParseError::StreamDecodeError("Predictor row length overflows".to_string())
            })
    }
}

fn positive(value: i64, key: &str) -> ParseResult<usize> {
    usize::try_from(value)
        .ok()
        .filter(|&v| v > 0)
        .ok_or_else(|| ParseError::StreamDecodeError(format!("Invalid {key} {value}")))
}

/// Undo the predictor named in the filter's `/DecodeParms`
pub fn apply_predictor(data: Vec<u8>, ctx: &FilterContext<'_>) -> ParseResult<Vec<u8>> {
    let params = PredictorParams::from_context(ctx)?;
    decode_predicted(data, &params)
}

/// Undo a predictor given explicit parameters
pub fn decode_predicted(data: Vec<u8>, params: &PredictorParams) -> ParseResult<Vec<u8>> {
    match params.predictor {
        1 => Ok(data),
        2 => decode_tiff(data, params),
        10..=15 => decode_png(&data, params),
        other => Err(ParseError::StreamDecodeError(format!(
            "Unknown predictor {other}"
        ))),
    }
}

fn decode_tiff(mut data: Vec<u8>, params: &PredictorParams) -> ParseResult<Vec<u8>> {
    if params.bits_per_component != 8 {
        return Err(ParseError::StreamDecodeError(format!(
            "TIFF predictor with {} bits per component is not supported",
            params.bits_per_component
        )));
    }

    let row_length = params.row_length()?;
    if data.is_empty() {
        return Ok(data);
    }
    if row_length > data.len() || data.len() % row_length != 0 {
        return Err(ParseError::StreamDecodeError(format!(
            "TIFF predictor data of {} bytes is not a whole number of {row_length}-byte rows",
            data.len()
        )));
    }

    let bpp = params.colors;
    for row in data.chunks_mut(row_length) {
        for i in bpp..row.len() {
            row[i] = row[i].wrapping_add(row[i - bpp]);
        }
    }

    Ok(data)
}

fn decode_png(data: &[u8], params: &PredictorParams) -> ParseResult<Vec<u8>> {
    let row_length = params.row_length()?;
    let encoded_row = row_length.checked_add(1).ok_or_else(|| {
        ParseError::StreamDecodeError("Predictor row length overflows".to_string())
    })?;

    // Rows are sized from the payload before anything is allocated
    if data.is_empty() {
        return Ok(Vec::new());
    }
    if encoded_row > data.len() || data.len() % encoded_row != 0 {
        return Err(ParseError::StreamDecodeError(format!(
            "PNG predictor data of {} bytes is not a whole number of {encoded_row}-byte rows",
            data.len()
        )));
    }

    let bpp = params.bytes_per_pixel();
    let mut result = Vec::with_capacity(data.len() / encoded_row * row_length);
    let mut previous = vec![0u8; row_length];

    for (row_index, encoded) in data.chunks(encoded_row).enumerate() {
        let tag = encoded[0];
        let mut row = encoded[1..].to_vec();

        for i in 0..row_length {
            let left = if i >= bpp { row[i - bpp] } else { 0 };
            let up = previous[i];
            let up_left = if i >= bpp { previous[i - bpp] } else { 0 };

            let predicted = match tag {
                0 => 0,
                1 => left,
                2 => up,
                3 => ((u16::from(left) + u16::from(up)) / 2) as u8,
                4 => paeth(left, up, up_left),
                other => {
                    return Err(ParseError::StreamDecodeError(format!(
                        "Invalid PNG filter type {other} in row {row_index}"
                    )));
                }
            };
            row[i] = row[i].wrapping_add(predicted);
        }

        result.extend_from_slice(&row);
        previous = row;
    }

    Ok(result)
}

fn paeth(left: u8, up: u8, up_left: u8) -> u8 {
    let p = i16::from(left) + i16::from(up) - i16::from(up_left);
    let pa = (p - i16::from(left)).abs();
    let pb = (p - i16::from(up)).abs();
    let pc = (p - i16::from(up_left)).abs();

    if pa <= pb && pa <= pc {
        left
    } else if pb <= pc {
        up
    } else {
        up_left
    }
}
