//! EPF row → BSON document conversion.

use crate::convert::{epf_string_to_value, EpfParseError};
use bson_wire::Document;
use epf_source::FieldSchema;
use thiserror::Error;
use tracing::debug;

/// A row that could not be converted because one of its fields is invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field '{field}': {source}")]
pub struct RowConversionError {
    pub field: String,
    #[source]
    pub source: EpfParseError,
}

/// Build the document for one data row.
///
/// Fields are paired with columns by position. A row shorter than the
/// schema (only possible for comment records) leaves the trailing columns
/// out of the document; extra fields are ignored.
pub fn row_to_document(
    columns: &[FieldSchema],
    row: &[String],
) -> Result<Document, RowConversionError> {
    let mut doc = Document::with_capacity(columns.len());

    for (column, text) in columns.iter().zip(row) {
        let value = epf_string_to_value(text, column.field_type).map_err(|source| {
            RowConversionError {
                field: column.name.clone(),
                source,
            }
        })?;
        if !doc.add(&column.name, value) {
            debug!("Column '{}' cannot be used as a field name, dropped", column.name);
        }
    }

    Ok(doc)
}
