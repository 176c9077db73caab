//! Record splitting.
//!
//! Fields are separated by `0x01`; the last field runs to the end of the
//! record. A record starting with `#` is a comment record: the marker is
//! stripped and its field count is never checked.

use crate::record::FIELD_SEPARATOR;
use std::str::Utf8Error;

/// Marker byte of a comment record.
pub const COMMENT_MARKER: u8 = b'#';

/// Outcome of splitting one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Split {
    /// The fields of the record
    Fields(Vec<String>),
    /// A data record with the wrong number of fields
    Mismatch { expected: usize, found: usize },
    /// The record is not valid UTF-8
    InvalidUtf8,
}

/// Check whether a raw record is a comment record.
pub fn is_comment(record: &[u8]) -> bool {
    record.first() == Some(&COMMENT_MARKER)
}

/// Split a record into fields, dropping a leading comment marker.
///
/// No arity check is applied.
pub fn split_fields(record: &[u8]) -> Result<Vec<String>, Utf8Error> {
    let body = if is_comment(record) {
        &record[1..]
    } else {
        record
    };
    let text = std::str::from_utf8(body)?;
    Ok(text
        .split(char::from(FIELD_SEPARATOR))
        .map(str::to_string)
        .collect())
}

/// Splits records and enforces a fixed arity once it is known.
#[derive(Debug, Clone, Default)]
pub struct RecordSplitter {
    arity: Option<usize>,
}

impl RecordSplitter {
    /// A splitter whose arity is set by the first record it sees.
    pub fn new() -> Self {
        Self::default()
    }

    /// A splitter with a known arity.
    pub fn with_arity(arity: usize) -> Self {
        Self { arity: Some(arity) }
    }

    pub fn arity(&self) -> Option<usize> {
        self.arity
    }

    /// Split a record.
    ///
    /// The first record split establishes the arity. Afterwards, a
    /// non-comment record with a different field count is reported as
    /// [`Split::Mismatch`] so the caller can skip it and carry on.
    pub fn split(&mut self, record: &[u8]) -> Split {
        let fields = match split_fields(record) {
            Ok(fields) => fields,
            Err(_) => return Split::InvalidUtf8,
        };

        match self.arity {
            None => self.arity = Some(fields.len()),
            Some(expected) if !is_comment(record) && fields.len() != expected => {
                return Split::Mismatch {
                    expected,
                    found: fields.len(),
                };
            }
            Some(_) => {}
        }
        Split::Fields(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_split_fields() {
        assert_eq!(
            split_fields(b"a\x01\x01c").unwrap(),
            strings(&["a", "", "c"])
        );
        assert_eq!(split_fields(b"").unwrap(), strings(&[""]));
        assert_eq!(split_fields(b"single").unwrap(), strings(&["single"]));
    }

    #[test]
    fn test_comment_marker_stripped() {
        assert!(is_comment(b"#x"));
        assert!(!is_comment(b"x#"));
        assert_eq!(
            split_fields(b"#export_date\x01id").unwrap(),
            strings(&["export_date", "id"])
        );
    }

    #[test]
    fn test_first_split_establishes_arity() {
        let mut splitter = RecordSplitter::new();
        assert_eq!(splitter.arity(), None);
        assert_eq!(
            splitter.split(b"a\x01b\x01c"),
            Split::Fields(strings(&["a", "b", "c"]))
        );
        assert_eq!(splitter.arity(), Some(3));
    }

    #[test]
    fn test_arity_mismatch_is_soft() {
        let mut splitter = RecordSplitter::with_arity(2);
        assert_eq!(
            splitter.split(b"only one"),
            Split::Mismatch {
                expected: 2,
                found: 1
            }
        );
        assert_eq!(
            splitter.split(b"1\x012\x013"),
            Split::Mismatch {
                expected: 2,
                found: 3
            }
        );
        // The splitter keeps working after a mismatch
        assert_eq!(splitter.split(b"1\x012"), Split::Fields(strings(&["1", "2"])));
    }

    #[test]
    fn test_comment_records_skip_arity_check() {
        let mut splitter = RecordSplitter::with_arity(3);
        assert_eq!(
            splitter.split(b"#only one"),
            Split::Fields(strings(&["only one"]))
        );
    }

    #[test]
    fn test_invalid_utf8() {
        let mut splitter = RecordSplitter::with_arity(1);
        assert_eq!(splitter.split(b"\xff\xfe"), Split::InvalidUtf8);
    }
}
