//! Backward anchor search
//!
//! Finds the last occurrence of the `startxref` keyword (or its legacy
//! spelling) in the tail of a file. The trailing window starts small and
//! doubles until a match turns up or the window covers the whole file, so the
//! common case stays cheap and the worst case stays linear in the file size.

use super::source::ByteCursor;
use super::{ParseResult, DEFAULT_XREF_SEARCH_WINDOW};
use std::io::{Read, Seek};

/// Keyword spellings that introduce the cross-reference offset
///
/// Variants are declared in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorKeyword {
    /// `startxref`, as defined by ISO 32000-1 Section 7.5.5
    StartXRef,
    /// `startref`, written by some broken producers
    StartRef,
}

const STRICT_CANDIDATES: &[AnchorKeyword] = &[AnchorKeyword::StartXRef];
const LENIENT_CANDIDATES: &[AnchorKeyword] = &[AnchorKeyword::StartXRef, AnchorKeyword::StartRef];

impl AnchorKeyword {
    /// Keyword text
    pub const fn text(self) -> &'static str {
        match self {
            AnchorKeyword::StartXRef => "startxref",
            AnchorKeyword::StartRef => "startref",
        }
    }

    /// Raw byte pattern searched for in the file
    pub const fn pattern(self) -> &'static [u8] {
        self.text().as_bytes()
    }

    /// Whether this is a non-conformant spelling
    pub const fn is_legacy(self) -> bool {
        matches!(self, AnchorKeyword::StartRef)
    }

    /// Candidates to try, in priority order
    pub fn candidates(lenient: bool) -> &'static [AnchorKeyword] {
        if lenient {
            LENIENT_CANDIDATES
        } else {
            STRICT_CANDIDATES
        }
    }
}

impl std::fmt::Display for AnchorKeyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

/// Position of a keyword in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorMatch {
    /// Keyword that matched
    pub keyword: AnchorKeyword,
    /// Offset of the first byte of the keyword
    pub offset: u64,
}

/// Outcome of one anchor search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorScan {
    /// Rightmost match in the final window, if any
    pub found: Option<AnchorMatch>,
    /// Size of the last window searched
    pub window: u64,
    /// Total bytes read across all passes
    pub bytes_scanned: u64,
    /// Number of passes (1 + number of doublings)
    pub passes: u32,
}

/// Streaming consecutive-match automaton
///
/// Counts how many bytes of the pattern have matched so far. A mismatch
/// resets the count to zero and the mismatched byte is dropped, even when it
/// equals the first pattern byte. A match that starts on the byte that broke
/// a partial match is therefore missed, as in `sstartxref`.
#[derive(Debug, Clone)]
pub struct PatternMatcher<'p> {
    pattern: &'p [u8],
    matched: usize,
}

impl<'p> PatternMatcher<'p> {
    pub fn new(pattern: &'p [u8]) -> Self {
        Self {
            pattern,
            matched: 0,
        }
    }

    /// Feed one byte; returns true when it completes a full match
    pub fn feed(&mut self, byte: u8) -> bool {
        if self.pattern.is_empty() {
            return false;
        }

        if byte == self.pattern[self.matched] {
            self.matched += 1;
        } else {
            self.matched = 0;
        }

        if self.matched == self.pattern.len() {
            self.matched = 0;
            true
        } else {
            false
        }
    }

    /// Forget any partial match
    pub fn reset(&mut self) {
        self.matched = 0;
    }
}

/// Exponentially widening search over the tail of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorSearch {
    initial_window: u64,
}

impl Default for AnchorSearch {
    fn default() -> Self {
        Self::new(DEFAULT_XREF_SEARCH_WINDOW)
    }
}

impl AnchorSearch {
    /// Create a search starting from `initial_window` trailing bytes
    ///
    /// A zero window is treated as one byte.
    pub fn new(initial_window: u64) -> Self {
        Self {
            initial_window: initial_window.max(1),
        }
    }

    pub fn initial_window(&self) -> u64 {
        self.initial_window
    }

    /// Find the rightmost occurrence of `keyword`
    ///
    /// The cursor is left at the end of the data.
    pub fn find_last<R: Read + Seek>(
        &self,
        cursor: &mut ByteCursor<R>,
        keyword: AnchorKeyword,
    ) -> ParseResult<AnchorScan> {
        let len = cursor.len();
        let mut window = self.initial_window.min(len);
        let mut bytes_scanned = 0;
        let mut passes = 0;

        loop {
            let start = len - window;
            let matches = Self::scan_window(cursor, start, keyword.pattern())?;
            bytes_scanned += len - start;
            passes += 1;

            if let Some(&offset) = matches.last() {
                tracing::debug!(
                    "found '{}' at offset {} ({} candidates in last {} bytes)",
                    keyword,
                    offset,
                    matches.len(),
                    window
                );
                return Ok(AnchorScan {
                    found: Some(AnchorMatch { keyword, offset }),
                    window,
                    bytes_scanned,
                    passes,
                });
            }

            if start == 0 {
                return Ok(AnchorScan {
                    found: None,
                    window,
                    bytes_scanned,
                    passes,
                });
            }

            window = window.saturating_mul(2).min(len);
            tracing::debug!("'{}' not found, widening search window to {} bytes", keyword, window);
        }
    }

    /// Scan from `start` to end of data, returning every match offset in order
    fn scan_window<R: Read + Seek>(
        cursor: &mut ByteCursor<R>,
        start: u64,
        pattern: &[u8],
    ) -> ParseResult<Vec<u64>> {
        cursor.seek(start)?;
        let mut matcher = PatternMatcher::new(pattern);
        let mut matches = Vec::new();

        while let Some(byte) = cursor.next_byte()? {
            if matcher.feed(byte) {
                matches.push(cursor.position() - pattern.len() as u64);
            }
        }

        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn cursor(data: &[u8]) -> ByteCursor<Cursor<Vec<u8>>> {
        ByteCursor::new(Cursor::new(data.to_vec())).unwrap()
    }

    #[test]
    fn test_keyword_text_and_pattern() {
        assert_eq!(AnchorKeyword::StartXRef.text(), "startxref");
        assert_eq!(AnchorKeyword::StartXRef.pattern().len(), 9);
        assert_eq!(AnchorKeyword::StartRef.text(), "startref");
        assert_eq!(AnchorKeyword::StartRef.pattern().len(), 8);
        assert!(AnchorKeyword::StartRef.is_legacy());
        assert!(!AnchorKeyword::StartXRef.is_legacy());
        assert_eq!(AnchorKeyword::StartRef.to_string(), "startref");
    }

    #[test]
    fn test_candidate_order() {
        assert_eq!(
            AnchorKeyword::candidates(false),
            &[AnchorKeyword::StartXRef]
        );
        assert_eq!(
            AnchorKeyword::candidates(true),
            &[AnchorKeyword::StartXRef, AnchorKeyword::StartRef]
        );
    }

    #[test]
    fn test_matcher_simple() {
        let mut matcher = PatternMatcher::new(b"abc");
        let hits: Vec<bool> = b"xabcabc".iter().map(|&b| matcher.feed(b)).collect();
        assert_eq!(hits, vec![false, false, false, true, false, false, true]);
    }

    #[test]
    fn test_matcher_hard_reset_drops_mismatched_byte() {
        let mut matcher = PatternMatcher::new(b"startxref");
        let hits = b"sstartxref".iter().filter(|&&b| matcher.feed(b)).count();
        assert_eq!(hits, 0);

        // A separator between the stray byte and the keyword restores the match
        matcher.reset();
        let hits = b"s startxref".iter().filter(|&&b| matcher.feed(b)).count();
        assert_eq!(hits, 1);
    }

    #[test]
    fn test_matcher_misses_overlapping_prefix() {
        // "ababc" inside "abababc": after "abab" the next 'a' mismatches 'c'
        // and the count drops to 0, so the real match at index 2 is lost.
        let mut matcher = PatternMatcher::new(b"ababc");
        let hits = b"abababc".iter().filter(|&&b| matcher.feed(b)).count();
        assert_eq!(hits, 0);
    }

    #[test]
    fn test_matcher_reset() {
        let mut matcher = PatternMatcher::new(b"ab");
        assert!(!matcher.feed(b'a'));
        matcher.reset();
        assert!(!matcher.feed(b'b'));
    }

    #[test]
    fn test_find_in_small_file() {
        let data = b"trailer\n<< >>\nstartxref\n123\n%%EOF";
        let mut cursor = cursor(data);
        let scan = AnchorSearch::default()
            .find_last(&mut cursor, AnchorKeyword::StartXRef)
            .unwrap();

        assert_eq!(
            scan.found,
            Some(AnchorMatch {
                keyword: AnchorKeyword::StartXRef,
                offset: 14
            })
        );
        assert_eq!(scan.window, data.len() as u64);
        assert_eq!(scan.passes, 1);
        assert_eq!(scan.bytes_scanned, data.len() as u64);
        assert!(cursor.is_eof());
    }

    #[test]
    fn test_find_returns_rightmost() {
        let data = b"startxref\n1\n%%EOF\nstartxref\n2\n%%EOF";
        let scan = AnchorSearch::default()
            .find_last(&mut cursor(data), AnchorKeyword::StartXRef)
            .unwrap();
        assert_eq!(scan.found.unwrap().offset, 18);
    }

    #[test]
    fn test_find_widens_window() {
        let mut data = b"startxref\n0\n".to_vec();
        data.extend(std::iter::repeat(b' ').take(100));
        let scan = AnchorSearch::new(16)
            .find_last(&mut cursor(&data), AnchorKeyword::StartXRef)
            .unwrap();

        // 16 -> 32 -> 64 -> 112 (clamped to the file length)
        assert_eq!(scan.found.unwrap().offset, 0);
        assert_eq!(scan.passes, 4);
        assert_eq!(scan.window, 112);
        assert_eq!(scan.bytes_scanned, 16 + 32 + 64 + 112);
    }

    #[test]
    fn test_match_straddling_window_start_needs_wider_window() {
        // Keyword begins 5 bytes before the first window start
        let mut data = vec![b'x'; 50];
        data.extend_from_slice(b"startxref");
        data.extend(std::iter::repeat(b'y').take(4));
        let scan = AnchorSearch::new(8)
            .find_last(&mut cursor(&data), AnchorKeyword::StartXRef)
            .unwrap();
        assert_eq!(scan.found.unwrap().offset, 50);
        assert_eq!(scan.passes, 2);
    }

    #[test]
    fn test_not_found_covers_whole_file() {
        let data = vec![b'a'; 1000];
        let scan = AnchorSearch::new(100)
            .find_last(&mut cursor(&data), AnchorKeyword::StartXRef)
            .unwrap();
        assert!(scan.found.is_none());
        assert_eq!(scan.window, 1000);
        // 100 + 200 + 400 + 800 + 1000
        assert_eq!(scan.bytes_scanned, 2500);
        assert!(scan.bytes_scanned < 3 * 1000);
    }

    #[test]
    fn test_empty_and_tiny_files() {
        let scan = AnchorSearch::default()
            .find_last(&mut cursor(b""), AnchorKeyword::StartXRef)
            .unwrap();
        assert!(scan.found.is_none());
        assert_eq!(scan.window, 0);
        assert_eq!(scan.passes, 1);

        let scan = AnchorSearch::default()
            .find_last(&mut cursor(b"start"), AnchorKeyword::StartXRef)
            .unwrap();
        assert!(scan.found.is_none());
    }

    #[test]
    fn test_zero_window_is_clamped_to_one() {
        let search = AnchorSearch::new(0);
        assert_eq!(search.initial_window(), 1);
        let scan = search
            .find_last(&mut cursor(b"startref 5"), AnchorKeyword::StartRef)
            .unwrap();
        assert_eq!(scan.found.unwrap().offset, 0);
    }

    #[test]
    fn test_legacy_pattern_does_not_match_canonical() {
        let scan = AnchorSearch::default()
            .find_last(&mut cursor(b"startxref 10"), AnchorKeyword::StartRef)
            .unwrap();
        assert!(scan.found.is_none());
    }
}
