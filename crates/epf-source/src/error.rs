//! Fatal EPF parsing errors.
//!
//! Every variant names the source being read and the 1-based record number
//! at which the problem was detected.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EpfError {
    #[error("{file}: I/O error after record {line}: {error}")]
    Io {
        file: String,
        line: u64,
        #[source]
        error: std::io::Error,
    },

    #[error("{file}:{line}: premature end of file, expected {expected}")]
    PrematureEof {
        file: String,
        line: u64,
        expected: &'static str,
    },

    #[error("{file}:{line}: {message}, probably not an EPF file")]
    MalformedHeader {
        file: String,
        line: u64,
        message: String,
    },

    #[error("{file}:{line}: invalid field type '{token}'")]
    UnknownFieldType {
        file: String,
        line: u64,
        token: String,
    },

    #[error("{file}:{line}: {found} field types declared for {expected} fields")]
    FieldTypeCount {
        file: String,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("{file}:{line}: unknown export mode '{mode}'")]
    UnknownExportMode {
        file: String,
        line: u64,
        mode: String,
    },
}
