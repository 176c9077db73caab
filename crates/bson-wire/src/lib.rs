//! Document builder and BSON wire encoder.
//!
//! This crate holds the two halves of the output side of epf2bson:
//!
//! - [`document`] - an ordered, append-only document tree with unique field names
//! - [`encode`] - serialization of a [`Document`] into the BSON byte layout
//!
//! Only a subset of the BSON element types is supported: double, string,
//! embedded document, array, ObjectId, boolean, UTC datetime, null, int32
//! and int64.
//!
//! # Example
//!
//! ```rust
//! use bson_wire::{Document, WireEncoder};
//!
//! let mut doc = Document::new();
//! assert!(doc.add_int32("id", 42));
//! assert!(doc.add_string("name", "Hello"));
//! assert!(!doc.add_int32("id", 7));
//!
//! let encoded = WireEncoder::default().encode(&doc).unwrap();
//! assert_eq!(encoded.len(), encoded.as_slice().len());
//! ```

pub mod document;
pub mod encode;

pub use document::{Document, Element, ElementType, ObjectId, Value};
pub use encode::{EncodeError, EncodedBytes, WireEncoder, DEFAULT_GROWTH_INCREMENT};
