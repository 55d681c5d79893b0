//! Integration tests for stream filter dispatch
//!
//! Encodes fixtures with independent encoders and checks that every supported
//! codec restores them exactly, while unsupported codecs refuse outright.

use pretty_assertions::assert_eq;
use rescue_pdf::parser::{
    decode_stream, FilterRegistry, ParseError, PdfArray, PdfDictionary, PdfName, PdfObject,
    PdfStream,
};
use rescue_pdf::PdfError;

const FIXTURE: &[u8] = b"BT /F1 12 Tf 72 712 Td (Recovered page content) Tj ET\n\
BT /F1 12 Tf 72 700 Td (Recovered page content) Tj ET\n";

fn stream(filters: &[&str], parms: Option<PdfObject>, data: Vec<u8>) -> PdfStream {
    let mut dict = PdfDictionary::new();
    let filter = match filters {
        [single] => PdfObject::Name(PdfName::new(*single)),
        many => PdfObject::Array(PdfArray(
            many.iter().map(|name| PdfObject::Name(PdfName::new(*name))).collect(),
        )),
    };
    dict.insert("Filter".to_string(), filter);
    if let Some(parms) = parms {
        dict.insert("DecodeParms".to_string(), parms);
    }
    dict.insert("Length".to_string(), PdfObject::Integer(data.len() as i64));
    PdfStream::new(dict, data)
}

fn hex_encode(data: &[u8]) -> Vec<u8> {
    let mut out: Vec<u8> = data
        .iter()
        .flat_map(|b| format!("{b:02X}").into_bytes())
        .collect();
    out.push(b'>');
    out
}

fn run_length_encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    for chunk in data.chunks(128) {
        out.push((chunk.len() - 1) as u8);
        out.extend_from_slice(chunk);
    }
    out.push(128);
    out
}

#[cfg(feature = "compression")]
fn zlib(data: &[u8]) -> Vec<u8> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

#[test]
fn test_ascii_hex_fixture() {
    let stream = stream(&["ASCIIHexDecode"], None, hex_encode(FIXTURE));
    assert_eq!(stream.decode().unwrap(), FIXTURE);
}

#[test]
fn test_run_length_fixture() {
    let stream = stream(&["RunLengthDecode"], None, run_length_encode(FIXTURE));
    assert_eq!(stream.decode().unwrap(), FIXTURE);
}

#[cfg(feature = "compression")]
#[test]
fn test_flate_fixture() {
    let stream = stream(&["FlateDecode"], None, zlib(FIXTURE));
    assert_eq!(stream.decode().unwrap(), FIXTURE);
}

#[cfg(feature = "compression")]
#[test]
fn test_flate_with_png_predictor_per_chain_entry() {
    // Three rows of 5 bytes, PNG Up tags, with the predictor on the second filter
    let rows = [
        2u8, 1, 2, 3, 4, 5, //
        2, 1, 1, 1, 1, 1, //
        2, 0, 0, 0, 0, 0,
    ];
    let mut parms = PdfDictionary::new();
    parms.insert("Predictor".to_string(), PdfObject::Integer(12));
    parms.insert("Columns".to_string(), PdfObject::Integer(5));
    let parms = PdfObject::Array(PdfArray(vec![PdfObject::Null, PdfObject::Dictionary(parms)]));

    let stream = stream(
        &["ASCIIHexDecode", "FlateDecode"],
        Some(parms),
        hex_encode(&zlib(&rows)),
    );

    assert_eq!(
        stream.decode().unwrap(),
        vec![1, 2, 3, 4, 5, 2, 3, 4, 5, 6, 2, 3, 4, 5, 6]
    );
}

#[test]
fn test_lzw_fixture() {
    let encoded = weezl::encode::Encoder::with_tiff_size_switch(weezl::BitOrder::Msb, 8)
        .encode(FIXTURE)
        .unwrap();
    let stream = stream(&["LZWDecode"], None, encoded);
    assert_eq!(stream.decode().unwrap(), FIXTURE);
}

#[test]
fn test_dct_passthrough() {
    let jpeg = vec![0xFF, 0xD8, 0xFF, 0xDB, 0x00, 0x02, 0xFF, 0xD9];
    let stream = stream(&["DCTDecode"], None, jpeg.clone());
    assert_eq!(stream.decode().unwrap(), jpeg);
}

#[test]
fn test_unsupported_codecs_always_refuse() {
    for name in ["JPXDecode", "JBIG2Decode", "CCITTFaxDecode", "Crypt"] {
        for payload in [Vec::new(), vec![0u8; 16], FIXTURE.to_vec()] {
            let stream = stream(&[name], None, payload.clone());

            match stream.decode() {
                Err(ParseError::UnsupportedFilter { filter, suggestion }) => {
                    assert_eq!(filter, name);
                    assert!(suggestion.contains("raw_data"));
                }
                other => panic!("{name}: expected UnsupportedFilter, got {other:?}"),
            }

            // The undecoded bytes stay reachable
            assert_eq!(stream.raw_data(), payload.as_slice());
        }
    }
}

#[test]
fn test_unsupported_error_is_distinct_from_format_errors() {
    let refused = stream(&["JPXDecode"], None, vec![1, 2, 3]).decode().unwrap_err();
    let corrupt = stream(&["ASCIIHexDecode"], None, b"ZZ>".to_vec())
        .decode()
        .unwrap_err();

    assert!(refused.is_unsupported());
    assert!(!refused.is_format_error());
    assert!(corrupt.is_format_error());
    assert!(!corrupt.is_unsupported());

    let wrapped: PdfError = refused.into();
    assert!(wrapped.is_unsupported());
}

#[test]
fn test_unknown_filter_in_chain() {
    let stream = stream(&["ASCIIHexDecode", "Rot13Decode"], None, hex_encode(FIXTURE));
    match stream.decode() {
        Err(ParseError::UnknownFilter(name)) => assert_eq!(name, "Rot13Decode"),
        other => panic!("expected UnknownFilter, got {other:?}"),
    }
}

#[test]
fn test_custom_registry() {
    let mut registry = FilterRegistry::new();
    registry.register(Box::new(rescue_pdf::parser::filter_impls::AsciiHexFilter));

    let hex = stream(&["ASCIIHexDecode"], None, hex_encode(b"abc"));
    assert_eq!(hex.decode_with(&registry).unwrap(), b"abc");

    let rle = stream(&["RunLengthDecode"], None, run_length_encode(b"abc"));
    assert!(matches!(
        rle.decode_with(&registry),
        Err(ParseError::UnknownFilter(_))
    ));
}

#[test]
fn test_registry_is_shareable_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let payload = vec![i as u8; 300];
                let mut dict = PdfDictionary::new();
                dict.insert(
                    "Filter".to_string(),
                    PdfObject::Name(PdfName::new("RunLengthDecode")),
                );
                let decoded =
                    decode_stream(&run_length_encode(&payload), &dict, FilterRegistry::shared())
                        .unwrap();
                assert_eq!(decoded, payload);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
