//! PDF stream filter implementations
//!
//! This module contains implementations of the standard PDF stream filters
//! according to ISO 32000-1:2008 Section 7.4

pub mod ascii;
pub mod dct;
pub mod flate;
pub mod lzw;
pub mod predictor;
pub mod run_length;
pub mod unsupported;

pub use ascii::{Ascii85Filter, AsciiHexFilter};
pub use dct::DctFilter;
pub use flate::FlateFilter;
pub use lzw::LzwFilter;
pub use predictor::apply_predictor;
pub use run_length::RunLengthFilter;
pub use unsupported::{JpxFilter, UnsupportedCodec};
