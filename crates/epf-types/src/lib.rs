//! EPF type conversions.
//!
//! Converts the text fields of an EPF data row into typed BSON values,
//! guided by the declared column types of the file.
//!
//! # Modules
//!
//! - [`convert`] - one EPF string → one [`bson_wire::Value`]
//! - [`row`] - one EPF row → one [`bson_wire::Document`]
//!
//! # Example
//!
//! ```rust
//! use bson_wire::Value;
//! use epf_source::FieldType;
//! use epf_types::epf_string_to_value;
//!
//! assert_eq!(epf_string_to_value("42", FieldType::Integer).unwrap(), Value::Int32(42));
//! assert_eq!(epf_string_to_value("", FieldType::Integer).unwrap(), Value::Null);
//! ```

pub mod convert;
pub mod row;

pub use convert::{epf_string_to_value, EpfParseError};
pub use row::{row_to_document, RowConversionError};
