//! Index metadata sidecar written next to each collection dump.
//!
//! The file lists one ascending single-field index per primary key
//! column, in the layout `mongorestore` reads from `<collection>.metadata.json`.

use anyhow::{Context, Result};
use epf_source::Schema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// Index version written for every index
pub const INDEX_VERSION: i32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexMetadata {
    pub indexes: Vec<IndexSpec>,
}

/// A single index declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSpec {
    /// `<db>.<collection>`
    pub ns: String,
    pub name: String,
    pub v: i32,
    /// Indexed field → sort direction
    pub key: BTreeMap<String, i32>,
}

impl IndexSpec {
    pub fn ascending(db_name: &str, collection: &str, field: &str) -> Self {
        Self {
            ns: format!("{db_name}.{collection}"),
            name: index_name(field),
            v: INDEX_VERSION,
            key: BTreeMap::from([(field.to_string(), 1)]),
        }
    }
}

impl IndexMetadata {
    /// One index per indexed column, in schema order.
    pub fn from_schema(db_name: &str, collection: &str, schema: &Schema) -> Self {
        Self {
            indexes: schema
                .indexed()
                .map(|field| IndexSpec::ascending(db_name, collection, &field.name))
                .collect(),
        }
    }
}

pub fn index_name(field: &str) -> String {
    format!("_EPF2Bson_{field}_")
}

/// Write the sidecar as a single line of JSON.
pub fn write_index_metadata(path: &Path, metadata: &IndexMetadata) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create metadata file: {}", path.display()))?;
    serde_json::to_writer(&mut file, metadata)
        .with_context(|| format!("Failed to write metadata file: {}", path.display()))?;
    file.flush()
        .with_context(|| format!("Failed to write metadata file: {}", path.display()))?;
    Ok(())
}
