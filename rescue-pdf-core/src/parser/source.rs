//! Seekable byte source
//!
//! Position-aware cursor over a whole PDF file. The anchor search and the
//! lexer both read through it, so they always agree on what "offset N" means.

use std::io::{BufReader, Read, Seek, SeekFrom};

/// Byte cursor over a seekable reader
///
/// Tracks the absolute offset of the current byte and the total length of
/// the underlying data. Reads are buffered; seeking discards the buffer.
pub struct ByteCursor<R> {
    reader: BufReader<R>,
    position: u64,
    len: u64,
    current: Option<u8>,
}

impl<R: Read + Seek> ByteCursor<R> {
    /// Create a cursor positioned at the start of the data
    pub fn new(inner: R) -> std::io::Result<Self> {
        let mut reader = BufReader::new(inner);
        let len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;

        Ok(Self {
            reader,
            position: 0,
            len,
            current: None,
        })
    }

    /// Total length of the data in bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Check if the data is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Absolute offset of the current byte
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Check if the cursor is at or past the end of the data
    pub fn is_eof(&self) -> bool {
        self.position >= self.len
    }

    /// Move to an absolute offset
    ///
    /// Offsets past the end are clamped to the data length.
    pub fn seek(&mut self, offset: u64) -> std::io::Result<()> {
        let target = offset.min(self.len);
        self.reader.seek(SeekFrom::Start(target))?;
        self.position = target;
        self.current = None;
        Ok(())
    }

    /// Read the current byte without advancing
    pub fn peek(&mut self) -> std::io::Result<Option<u8>> {
        if let Some(byte) = self.current {
            return Ok(Some(byte));
        }
        if self.is_eof() {
            return Ok(None);
        }

        let mut buf = [0u8; 1];
        match self.reader.read_exact(&mut buf) {
            Ok(()) => {
                self.current = Some(buf[0]);
                Ok(Some(buf[0]))
            }
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Read the current byte and advance past it
    pub fn next_byte(&mut self) -> std::io::Result<Option<u8>> {
        let byte = self.peek()?;
        if byte.is_some() {
            self.current = None;
            self.position += 1;
        }
        Ok(byte)
    }
}
