//! Record reader.
//!
//! Pulls one logical record at a time from a byte stream. A record ends at
//! the two-byte sequence `0x02 0x0A`; a line feed that is not preceded by
//! `0x02` is ordinary record content. Text fields in EPF are unbounded, so
//! the record buffer keeps growing (in whole chunks) until the terminator
//! shows up.

use std::io::{self, BufRead};
use tracing::warn;

/// Byte separating the fields of a record.
pub const FIELD_SEPARATOR: u8 = 0x01;

/// Byte sequence terminating a record.
pub const RECORD_TERMINATOR: [u8; 2] = [0x02, b'\n'];

/// Initial record buffer size and growth step (4 KiB).
pub const DEFAULT_RECORD_CHUNK_SIZE: usize = 4096;

/// Reads `0x02 0x0A`-terminated records from a buffered stream.
pub struct RecordReader<R> {
    inner: R,
    chunk_size: usize,
    records_read: u64,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_chunk_size(inner, DEFAULT_RECORD_CHUNK_SIZE)
    }

    /// Create a reader whose record buffer starts at, and grows by,
    /// `chunk_size` bytes.
    pub fn with_chunk_size(inner: R, chunk_size: usize) -> Self {
        Self {
            inner,
            chunk_size: chunk_size.max(1),
            records_read: 0,
        }
    }

    /// Number of complete records returned so far.
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Read the next record, without its terminator.
    ///
    /// Returns `Ok(None)` at end of stream. Bytes left over after the last
    /// terminator cannot form a record in a well-formed file; they are
    /// logged and dropped.
    pub fn read_record(&mut self) -> io::Result<Option<Vec<u8>>> {
        let chunk_size = self.chunk_size;
        let mut record = Vec::with_capacity(chunk_size);

        loop {
            let available = match self.inner.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };

            if available.is_empty() {
                if !record.is_empty() {
                    warn!(
                        "Discarding {} trailing bytes without a record terminator",
                        record.len()
                    );
                }
                return Ok(None);
            }

            match available.iter().position(|&b| b == RECORD_TERMINATOR[1]) {
                Some(pos) => {
                    // The 0x02 may sit at the end of the previous buffer fill
                    let before = if pos > 0 {
                        Some(available[pos - 1])
                    } else {
                        record.last().copied()
                    };
                    reserve_chunks(&mut record, pos + 1, chunk_size);
                    record.extend_from_slice(&available[..=pos]);
                    self.inner.consume(pos + 1);

                    if before == Some(RECORD_TERMINATOR[0]) {
                        record.truncate(record.len() - RECORD_TERMINATOR.len());
                        self.records_read += 1;
                        return Ok(Some(record));
                    }
                }
                None => {
                    let len = available.len();
                    reserve_chunks(&mut record, len, chunk_size);
                    record.extend_from_slice(available);
                    self.inner.consume(len);
                }
            }
        }
    }
}

/// Grow `buf` by whole chunks until `additional` more bytes fit.
fn reserve_chunks(buf: &mut Vec<u8>, additional: usize, chunk_size: usize) {
    let needed = buf.len() + additional;
    if needed > buf.capacity() {
        let target = needed.div_ceil(chunk_size) * chunk_size;
        buf.reserve_exact(target - buf.len());
    }
}
