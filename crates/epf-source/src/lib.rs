//! EPF file parser.
//!
//! EPF exports are delimiter-framed text tables: records end with `0x02 0x0A`
//! and fields are separated by `0x01`. A file starts with four header
//! records (field names, `primaryKey:`, `dbTypes:`, `exportMode:`), followed
//! by any number of `##` comment records and then the data records.
//!
//! # Modules
//!
//! - [`record`] - pulls terminator-delimited records from a byte stream
//! - [`split`] - splits records into fields and validates their arity
//! - [`schema`] - field schema types and `dbTypes:` token parsing
//! - [`source`] - header state machine and the data row pull interface
//!
//! # Example
//!
//! ```rust
//! use epf_source::{EpfSource, Entry, SourceOptions};
//!
//! let data = b"id\x01name\x02\n\
//!              primaryKey:id\x02\n\
//!              dbTypes:INTEGER\x01VARCHAR(255)\x02\n\
//!              exportMode:FULL\x02\n\
//!              42\x01Hello\x02\n";
//! let mut source = EpfSource::open(&data[..], "example", &SourceOptions::default()).unwrap();
//! assert_eq!(source.schema().len(), 2);
//!
//! match source.next_entry().unwrap() {
//!     Entry::Row(fields) => assert_eq!(fields, vec!["42", "Hello"]),
//!     other => panic!("unexpected {other:?}"),
//! }
//! assert!(matches!(source.next_entry().unwrap(), Entry::End));
//! ```

pub mod error;
mod header;
pub mod record;
pub mod schema;
pub mod source;
pub mod split;

pub use error::EpfError;
pub use record::{RecordReader, DEFAULT_RECORD_CHUNK_SIZE, FIELD_SEPARATOR, RECORD_TERMINATOR};
pub use schema::{FieldSchema, FieldType, Schema};
pub use source::{Entry, EpfSource, SkipReason, SourceOptions};
pub use split::{RecordSplitter, Split};
