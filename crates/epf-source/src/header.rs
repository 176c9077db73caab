//! Header state machine.
//!
//! The header is a fixed sequence of records, each consumed by exactly one
//! state:
//!
//! ```text
//! FieldNames -> IndexedFields -> FieldTypes -> ExportMode -> CommentSkip -> Ready
//!  (record 1)     (record 2)       (record 3)    (record 4)    (records 5..)
//! ```
//!
//! `CommentSkip` discards `##` records. The first record that is not a
//! comment is handed back to the caller as the first data record.

use crate::error::EpfError;
use crate::record::RecordReader;
use crate::schema::{parse_type_token, FieldSchema, Schema};
use crate::split::{split_fields, RecordSplitter, Split};
use std::collections::HashSet;
use std::io::BufRead;
use tracing::debug;

const PRIMARY_KEY_PREFIX: &str = "primaryKey:";
const DB_TYPES_PREFIX: &str = "dbTypes:";
const EXPORT_MODE_PREFIX: &str = "exportMode:";
const FULL_MODE: &str = "FULL";
const INCREMENTAL_MODE: &str = "INCREMENTAL";
const COMMENT_PREFIX: &[u8] = b"##";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderState {
    FieldNames,
    IndexedFields,
    FieldTypes,
    ExportMode,
    CommentSkip,
    Ready,
}

/// Everything recovered from the header.
#[derive(Debug)]
pub(crate) struct Header {
    pub schema: Schema,
    pub incremental: bool,
    /// First data record and its record number, read while skipping comments
    pub first_record: Option<(u64, Vec<u8>)>,
}

struct HeaderParser<'a> {
    file: &'a str,
    state: HeaderState,
    fields: Vec<FieldSchema>,
    incremental: bool,
    first_record: Option<(u64, Vec<u8>)>,
}

/// Read and validate the header, leaving the reader at the data section.
pub(crate) fn parse_header<R: BufRead>(
    reader: &mut RecordReader<R>,
    splitter: &mut RecordSplitter,
    file: &str,
) -> Result<Header, EpfError> {
    let mut parser = HeaderParser {
        file,
        state: HeaderState::FieldNames,
        fields: Vec::new(),
        incremental: false,
        first_record: None,
    };

    while parser.state != HeaderState::Ready {
        let line = reader.records_read() + 1;
        let record = reader.read_record().map_err(|error| EpfError::Io {
            file: file.to_string(),
            line,
            error,
        })?;
        parser.step(record, line, splitter)?;
    }

    Ok(Header {
        schema: Schema::new(parser.fields),
        incremental: parser.incremental,
        first_record: parser.first_record,
    })
}

impl HeaderParser<'_> {
    fn step(
        &mut self,
        record: Option<Vec<u8>>,
        line: u64,
        splitter: &mut RecordSplitter,
    ) -> Result<(), EpfError> {
        self.state = match self.state {
            HeaderState::FieldNames => {
                let record = self.require(record, line, "field names record")?;
                self.parse_field_names(&record, line, splitter)?;
                HeaderState::IndexedFields
            }
            HeaderState::IndexedFields => {
                let record = self.require(record, line, "primaryKey record")?;
                self.parse_indexed_fields(&record, line)?;
                HeaderState::FieldTypes
            }
            HeaderState::FieldTypes => {
                let record = self.require(record, line, "dbTypes record")?;
                self.parse_field_types(&record, line)?;
                HeaderState::ExportMode
            }
            HeaderState::ExportMode => {
                let record = self.require(record, line, "exportMode record")?;
                self.parse_export_mode(&record, line)?;
                HeaderState::CommentSkip
            }
            HeaderState::CommentSkip => match record {
                Some(record) if record.starts_with(COMMENT_PREFIX) => {
                    debug!("{}: skipping comment record {line}", self.file);
                    HeaderState::CommentSkip
                }
                Some(record) => {
                    self.first_record = Some((line, record));
                    HeaderState::Ready
                }
                None => HeaderState::Ready,
            },
            HeaderState::Ready => HeaderState::Ready,
        };
        Ok(())
    }

    fn require(
        &self,
        record: Option<Vec<u8>>,
        line: u64,
        expected: &'static str,
    ) -> Result<Vec<u8>, EpfError> {
        record.ok_or_else(|| EpfError::PrematureEof {
            file: self.file.to_string(),
            line,
            expected,
        })
    }

    fn malformed(&self, line: u64, message: impl Into<String>) -> EpfError {
        EpfError::MalformedHeader {
            file: self.file.to_string(),
            line,
            message: message.into(),
        }
    }

    fn check_no_line_feed(&self, fields: &[String], line: u64) -> Result<(), EpfError> {
        if fields.iter().any(|f| f.contains('\n')) {
            return Err(self.malformed(line, "header records should not contain a line feed"));
        }
        Ok(())
    }

    /// Split a header record that is not subject to the arity check.
    fn header_fields(&self, record: &[u8], line: u64) -> Result<Vec<String>, EpfError> {
        let fields =
            split_fields(record).map_err(|_| self.malformed(line, "header is not valid UTF-8"))?;
        self.check_no_line_feed(&fields, line)?;
        Ok(fields)
    }

    /// Strip `prefix` off the first field of a labelled header record.
    fn labelled_fields(
        &self,
        record: &[u8],
        line: u64,
        prefix: &str,
    ) -> Result<Vec<String>, EpfError> {
        let mut fields = self.header_fields(record, line)?;
        let first = fields[0]
            .strip_prefix(prefix)
            .map(str::to_string)
            .ok_or_else(|| {
                self.malformed(line, format!("expected a record starting with '{prefix}'"))
            })?;
        fields[0] = first;
        Ok(fields)
    }

    fn parse_field_names(
        &mut self,
        record: &[u8],
        line: u64,
        splitter: &mut RecordSplitter,
    ) -> Result<(), EpfError> {
        let names = match splitter.split(record) {
            Split::Fields(names) => names,
            Split::InvalidUtf8 => return Err(self.malformed(line, "header is not valid UTF-8")),
            Split::Mismatch { .. } => {
                return Err(self.malformed(line, "field names record has an unexpected arity"))
            }
        };
        self.check_no_line_feed(&names, line)?;
        if names.is_empty() {
            return Err(self.malformed(line, "no field name defined"));
        }

        let mut seen = HashSet::new();
        for name in &names {
            if name.is_empty() {
                return Err(self.malformed(line, "empty field name"));
            }
            if name.contains('\0') {
                return Err(self.malformed(line, format!("field '{name}' contains a NUL byte")));
            }
            if !seen.insert(name.as_str()) {
                return Err(self.malformed(line, format!("field '{name}' is declared twice")));
            }
            debug!("{}: declared field: {name}", self.file);
        }

        self.fields = names.into_iter().map(FieldSchema::new).collect();
        Ok(())
    }

    fn parse_indexed_fields(&mut self, record: &[u8], line: u64) -> Result<(), EpfError> {
        let names = self.labelled_fields(record, line, PRIMARY_KEY_PREFIX)?;
        for name in &names {
            if let Some(field) = self.fields.iter_mut().find(|f| &f.name == name) {
                field.indexed = true;
                debug!("{}: field '{name}' is indexed", self.file);
            }
        }
        Ok(())
    }

    fn parse_field_types(&mut self, record: &[u8], line: u64) -> Result<(), EpfError> {
        let tokens = self.labelled_fields(record, line, DB_TYPES_PREFIX)?;
        if tokens.len() != self.fields.len() {
            return Err(EpfError::FieldTypeCount {
                file: self.file.to_string(),
                line,
                expected: self.fields.len(),
                found: tokens.len(),
            });
        }

        for (field, token) in self.fields.iter_mut().zip(&tokens) {
            let (field_type, capacity) =
                parse_type_token(token).ok_or_else(|| EpfError::UnknownFieldType {
                    file: self.file.to_string(),
                    line,
                    token: token.clone(),
                })?;
            debug!("{}: field '{}' is declared as {token}", self.file, field.name);
            field.field_type = field_type;
            field.capacity = capacity;
        }
        Ok(())
    }

    fn parse_export_mode(&mut self, record: &[u8], line: u64) -> Result<(), EpfError> {
        let fields = self.labelled_fields(record, line, EXPORT_MODE_PREFIX)?;
        let mode = &fields[0];
        if mode.starts_with(FULL_MODE) {
            self.incremental = false;
        } else if mode.starts_with(INCREMENTAL_MODE) {
            self.incremental = true;
        } else {
            return Err(EpfError::UnknownExportMode {
                file: self.file.to_string(),
                line,
                mode: mode.clone(),
            });
        }
        debug!(
            "{}: {} export mode declared",
            self.file,
            if self.incremental { "incremental" } else { "full" }
        );
        Ok(())
    }
}
