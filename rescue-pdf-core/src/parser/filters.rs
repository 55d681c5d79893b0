//! PDF Stream Filters
//!
//! Dispatches stream payloads to codecs by filter name according to
//! ISO 32000-1 Section 7.4. Every codec declares whether it can decode; a
//! codec that cannot is refused before it sees any input.

use super::filter_impls::{
    Ascii85Filter, AsciiHexFilter, DctFilter, FlateFilter, JpxFilter, LzwFilter,
    RunLengthFilter, UnsupportedCodec,
};
use super::objects::{PdfDictionary, PdfObject};
use super::{ParseError, ParseResult};
use std::collections::HashMap;

lazy_static::lazy_static! {
    static ref STANDARD_FILTERS: FilterRegistry = FilterRegistry::standard();
}

/// A single stream codec
pub trait StreamFilter: Send + Sync {
    /// Filter name as it appears after `/Filter`
    fn name(&self) -> &'static str;

    /// Whether this codec can decode at all
    fn is_supported(&self) -> bool;

    /// Decode a complete payload. Output is all-or-nothing.
    fn decode(&self, data: &[u8], ctx: &FilterContext<'_>) -> ParseResult<Vec<u8>>;
}

/// What a codec gets to see besides the bytes
#[derive(Debug, Clone, Copy)]
pub struct FilterContext<'a> {
    /// The owning stream dictionary
    pub dict: &'a PdfDictionary,
    /// Position of this filter in the `/Filter` chain
    pub index: usize,
}

impl<'a> FilterContext<'a> {
    pub fn new(dict: &'a PdfDictionary, index: usize) -> Self {
        Self { dict, index }
    }

    /// The `/DecodeParms` entry that applies to this filter, if any.
    ///
    /// A dictionary applies to the first filter only; an array is matched by
    /// index and `null` entries mean "use defaults".
    pub fn decode_parms(&self) -> Option<&'a PdfDictionary> {
        match self.dict.get("DecodeParms")? {
            PdfObject::Dictionary(parms) if self.index == 0 => Some(parms),
            PdfObject::Array(array) => array.get(self.index).and_then(PdfObject::as_dict),
            _ => None,
        }
    }

    /// Integer parameter lookup with a default
    pub fn parm_or(&self, key: &str, default: i64) -> i64 {
        self.decode_parms()
            .and_then(|parms| parms.get_integer(key))
            .unwrap_or(default)
    }
}

/// Name-keyed table of codecs
pub struct FilterRegistry {
    filters: HashMap<&'static str, Box<dyn StreamFilter>>,
}

impl std::fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("filters", &self.names())
            .finish()
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl FilterRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            filters: HashMap::new(),
        }
    }

    /// Registry with every standard PDF filter
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(FlateFilter));
        registry.register(Box::new(LzwFilter));
        registry.register(Box::new(AsciiHexFilter));
        registry.register(Box::new(Ascii85Filter));
        registry.register(Box::new(RunLengthFilter));
        registry.register(Box::new(DctFilter));
        registry.register(Box::new(JpxFilter));
        registry.register(Box::new(UnsupportedCodec::jbig2()));
        registry.register(Box::new(UnsupportedCodec::ccitt_fax()));
        registry.register(Box::new(UnsupportedCodec::crypt()));
        registry
    }

    /// Process-wide standard registry
    pub fn shared() -> &'static FilterRegistry {
        &STANDARD_FILTERS
    }

    /// Add a codec, replacing any codec registered under the same name
    pub fn register(&mut self, filter: Box<dyn StreamFilter>) {
        self.filters.insert(filter.name(), filter);
    }

    pub fn get(&self, name: &str) -> Option<&dyn StreamFilter> {
        self.filters.get(name).map(|filter| filter.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// Capability of a registered filter, `None` if the name is unknown
    pub fn is_supported(&self, name: &str) -> Option<bool> {
        self.get(name).map(|filter| filter.is_supported())
    }

    /// Registered filter names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.filters.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Decode `data` with the filter registered as `name`
    pub fn decode(
        &self,
        name: &str,
        data: &[u8],
        dict: &PdfDictionary,
        index: usize,
    ) -> ParseResult<Vec<u8>> {
        let filter = self
            .get(name)
            .ok_or_else(|| ParseError::UnknownFilter(name.to_string()))?;

        if !filter.is_supported() {
            tracing::warn!("refusing to decode {} bytes with {}", data.len(), name);
            return Err(ParseError::UnsupportedFilter {
                filter: filter.name(),
                suggestion: RAW_DATA_SUGGESTION,
            });
        }

        filter.decode(data, &FilterContext::new(dict, index))
    }
}

/// Guidance attached to every refused decode
pub(crate) const RAW_DATA_SUGGESTION: &str =
    "retrieve the undecoded bytes with PdfStream::raw_data instead";

/// Decode stream data according to the filters named in its dictionary
pub fn decode_stream(
    data: &[u8],
    dict: &PdfDictionary,
    registry: &FilterRegistry,
) -> ParseResult<Vec<u8>> {
    // Get filter(s) from dictionary
    let filters = match dict.get("Filter") {
        Some(PdfObject::Name(name)) => vec![name.as_str()],
        Some(PdfObject::Array(array)) => {
            let mut filter_names = Vec::with_capacity(array.len());
            for obj in &array.0 {
                if let PdfObject::Name(name) = obj {
                    filter_names.push(name.as_str());
                } else {
                    return Err(ParseError::SyntaxError {
                        position: 0,
                        message: "Invalid filter in array".to_string(),
                    });
                }
            }
            filter_names
        }
        None => {
            // No filter, return data as-is
            return Ok(data.to_vec());
        }
        _ => {
            return Err(ParseError::SyntaxError {
                position: 0,
                message: "Invalid Filter type".to_string(),
            });
        }
    };

    let mut result = data.to_vec();
    for (index, filter_name) in filters.into_iter().enumerate() {
        result = registry.decode(filter_name, &result, dict, index)?;
    }

    Ok(result)
}
