//! EPF source: an opened file with a parsed header.
//!
//! An [`EpfSource`] only exists once its header has been read successfully,
//! so rows can never be pulled from an uninitialized file. Data records are
//! pulled one at a time with [`EpfSource::next_entry`], which reports skipped
//! records explicitly instead of through a side flag.

use crate::error::EpfError;
use crate::header::parse_header;
use crate::record::{RecordReader, DEFAULT_RECORD_CHUNK_SIZE};
use crate::schema::{FieldSchema, Schema};
use crate::split::{RecordSplitter, Split};
use std::fmt;
use std::io::BufRead;
use tracing::{info, warn};

/// Reader tuning knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOptions {
    /// Initial size and growth step of the record buffer
    pub record_chunk_size: usize,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            record_chunk_size: DEFAULT_RECORD_CHUNK_SIZE,
        }
    }
}

/// Why a data record was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The record does not have as many fields as the schema
    FieldCount { expected: usize, found: usize },
    /// The record is not valid UTF-8
    InvalidUtf8,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::FieldCount { expected, found } => {
                write!(f, "invalid field count: expected {expected}, found {found}")
            }
            SkipReason::InvalidUtf8 => f.write_str("record is not valid UTF-8"),
        }
    }
}

/// One step of reading the data section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A data row, one string per field
    Row(Vec<String>),
    /// A malformed record that was skipped; reading can continue
    Skipped { line: u64, reason: SkipReason },
    /// No more records
    End,
}

/// An EPF file positioned at its data section.
pub struct EpfSource<R> {
    name: String,
    reader: RecordReader<R>,
    splitter: RecordSplitter,
    schema: Schema,
    incremental: bool,
    pending: Option<(u64, Vec<u8>)>,
    entries_read: u64,
    entries_skipped: u64,
}

impl<R: BufRead> EpfSource<R> {
    /// Read the header of `input` and position it at the first data record.
    ///
    /// `name` is only used to give errors and log lines some context.
    pub fn open(
        input: R,
        name: impl Into<String>,
        options: &SourceOptions,
    ) -> Result<Self, EpfError> {
        let name = name.into();
        let mut reader = RecordReader::with_chunk_size(input, options.record_chunk_size);
        let mut splitter = RecordSplitter::new();

        let header = parse_header(&mut reader, &mut splitter, &name)?;
        info!(
            "{name}: parsed header with {} fields ({} indexed, {} export)",
            header.schema.len(),
            header.schema.indexed().count(),
            if header.incremental { "incremental" } else { "full" }
        );

        Ok(Self {
            name,
            reader,
            splitter,
            schema: header.schema,
            incremental: header.incremental,
            pending: header.first_record,
            entries_read: 0,
            entries_skipped: 0,
        })
    }

    /// Pull the next data record.
    pub fn next_entry(&mut self) -> Result<Entry, EpfError> {
        let (line, record) = match self.pending.take() {
            Some(pending) => pending,
            None => {
                let line = self.reader.records_read() + 1;
                let record = self.reader.read_record().map_err(|error| EpfError::Io {
                    file: self.name.clone(),
                    line,
                    error,
                })?;
                match record {
                    Some(record) => (line, record),
                    None => return Ok(Entry::End),
                }
            }
        };

        let reason = match self.splitter.split(&record) {
            Split::Fields(fields) => {
                self.entries_read += 1;
                return Ok(Entry::Row(fields));
            }
            Split::Mismatch { expected, found } => SkipReason::FieldCount { expected, found },
            Split::InvalidUtf8 => SkipReason::InvalidUtf8,
        };

        self.entries_skipped += 1;
        warn!("{}:{line}: skipping record: {reason}", self.name);
        Ok(Entry::Skipped { line, reason })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn fields(&self) -> &[FieldSchema] {
        self.schema.fields()
    }

    /// Whether the file is an incremental export.
    pub fn incremental(&self) -> bool {
        self.incremental
    }

    /// Records pulled from the stream so far, header included.
    pub fn lines_read(&self) -> u64 {
        self.reader.records_read()
    }

    /// Data rows returned so far.
    pub fn entries_read(&self) -> u64 {
        self.entries_read
    }

    /// Data records skipped so far.
    pub fn entries_skipped(&self) -> u64 {
        self.entries_skipped
    }
}
