//! # rescue-pdf
//!
//! Structural recovery for PDF readers: find the cross-reference anchor in
//! damaged files and decode stream payloads without ever faking output.
//!
//! ## Features
//!
//! - **Anchor recovery**: backward search for `startxref` with a doubling
//!   window, so files with trailing garbage are still readable
//! - **Lenient syntax**: optional fallback to the `startref` misspelling found
//!   in files from some legacy producers
//! - **Offset extraction**: the xref offset is read from a real integer token,
//!   skipping comments, with a precise error when it is missing
//! - **Filter dispatch**: a name-keyed registry of stream codecs where codecs
//!   without a decoder (JPXDecode, JBIG2Decode, ...) fail loudly
//!
//! ## Quick Start
//!
//! ### Locating the cross-reference table
//!
//! ```rust
//! use rescue_pdf::parser::{ParseOptions, StartXRef};
//! use std::io::Cursor;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = b"%PDF-1.4\n...\nstartxref\n% written by hand\n1234\n%%EOF\n";
//! let anchor = StartXRef::locate(Cursor::new(&bytes[..]), &ParseOptions::strict())?;
//!
//! assert_eq!(anchor.xref_offset, 1234);
//! # Ok(())
//! # }
//! ```
//!
//! ### Decoding a stream
//!
//! ```rust
//! use rescue_pdf::parser::{PdfDictionary, PdfName, PdfObject, PdfStream};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut dict = PdfDictionary::new();
//! dict.insert(
//!     "Filter".to_string(),
//!     PdfObject::Name(PdfName::new("ASCIIHexDecode")),
//! );
//! let stream = PdfStream::new(dict, b"48656C6C6F>".to_vec());
//!
//! assert_eq!(stream.decode()?, b"Hello");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod parser;

pub use error::{PdfError, Result};
pub use parser::{
    FilterRegistry, ParseError, ParseOptions, PdfStream, StartXRef, StartXRefLocator,
};

/// Current version of rescue-pdf
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
