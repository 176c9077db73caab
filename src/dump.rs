//! Export of EPF files into a BSON dump directory.
//!
//! The dump layout is the one `mongorestore` reads:
//!
//! ```text
//! <dump_dir>/<db_name>/<collection>.bson
//! <dump_dir>/<db_name>/<collection>.metadata.json
//! ```
//!
//! Every EPF file becomes one collection named after the file. Documents
//! are appended to the `.bson` file as soon as they are encoded, so memory
//! use does not grow with the size of the export.

use crate::config::{validate_db_name, Config};
use crate::files::{file_base_name, list_epf_files};
use crate::metadata::{write_index_metadata, IndexMetadata};
use anyhow::{bail, Context, Result};
use epf_source::{Entry, EpfSource};
use epf_types::row_to_document;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Outcome of exporting a single EPF file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// Collection name, i.e. the EPF file base name
    pub collection: String,
    /// Path of the written `.bson` file
    pub bson_path: PathBuf,
    /// Documents written
    pub entries: u64,
    /// Records skipped because of an invalid field count, invalid UTF-8 or
    /// a value that does not parse as its declared type
    pub skipped: u64,
    /// Indexes declared in the metadata sidecar
    pub indexes: usize,
}

/// Create `<dump_dir>/<db_name>` and return its path.
///
/// The dump directory itself must not exist yet, but its parent must.
pub fn prepare_dump_dir(dump_dir: &Path, db_name: &str) -> Result<PathBuf> {
    if dump_dir.exists() {
        bail!(
            "Dump directory {} already exists, please remove it first",
            dump_dir.display()
        );
    }

    let parent = match dump_dir.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !parent.is_dir() {
        bail!(
            "Parent directory of the dump directory does not exist: {}",
            parent.display()
        );
    }

    std::fs::create_dir(dump_dir)
        .with_context(|| format!("Failed to create dump directory: {}", dump_dir.display()))?;
    let db_dir = dump_dir.join(db_name);
    std::fs::create_dir(&db_dir)
        .with_context(|| format!("Failed to create database directory: {}", db_dir.display()))?;

    info!("Created dump directory: {}", db_dir.display());
    Ok(db_dir)
}

/// Export one EPF file into `out_dir`.
pub fn export_file(path: &Path, out_dir: &Path, config: &Config) -> Result<ExportSummary> {
    let collection = file_base_name(path)?;
    info!("Exporting {} into collection {collection}", path.display());

    let input = File::open(path)
        .with_context(|| format!("Failed to open EPF file: {}", path.display()))?;
    let mut source = EpfSource::open(BufReader::new(input), collection.as_str(), &config.source)
        .with_context(|| format!("Failed to read EPF header: {}", path.display()))?;

    let bson_path = out_dir.join(format!("{collection}.bson"));
    let output = File::create(&bson_path)
        .with_context(|| format!("Failed to create dump file: {}", bson_path.display()))?;
    let mut output = BufWriter::new(output);

    let mut entries = 0u64;
    let mut invalid_values = 0u64;
    loop {
        let row = match source
            .next_entry()
            .with_context(|| format!("Failed to read EPF file: {}", path.display()))?
        {
            Entry::Row(row) => row,
            Entry::Skipped { .. } => continue,
            Entry::End => break,
        };

        let doc = match row_to_document(source.fields(), &row) {
            Ok(doc) => doc,
            Err(e) => {
                invalid_values += 1;
                warn!(
                    "{collection}: skipping entry {}: {e}",
                    source.entries_read()
                );
                continue;
            }
        };

        let bytes = config.encoder.encode(&doc).with_context(|| {
            format!(
                "Failed to encode entry {} of {}",
                source.entries_read(),
                path.display()
            )
        })?;
        output
            .write_all(bytes.as_slice())
            .with_context(|| format!("Failed to write dump file: {}", bson_path.display()))?;

        entries += 1;
        if config.progress_interval > 0 && entries % config.progress_interval == 0 {
            info!("{collection}: {entries} entries exported");
        }
    }

    output
        .flush()
        .with_context(|| format!("Failed to write dump file: {}", bson_path.display()))?;

    let metadata = IndexMetadata::from_schema(&config.db_name, &collection, source.schema());
    let metadata_path = out_dir.join(format!("{collection}.metadata.json"));
    write_index_metadata(&metadata_path, &metadata)?;

    let summary = ExportSummary {
        collection,
        bson_path,
        entries,
        skipped: source.entries_skipped() + invalid_values,
        indexes: metadata.indexes.len(),
    };
    info!(
        "{}: {} entries exported, {} skipped, {} records read",
        summary.collection,
        summary.entries,
        summary.skipped,
        source.lines_read()
    );
    Ok(summary)
}

/// Export every selected EPF file of `config.epf_dir`.
pub fn run(config: &Config) -> Result<Vec<ExportSummary>> {
    validate_db_name(&config.db_name)?;
    let files = list_epf_files(&config.epf_dir, config.include.as_deref())?;
    let db_dir = prepare_dump_dir(&config.dump_dir, &config.db_name)?;

    let mut summaries = Vec::with_capacity(files.len());
    for path in &files {
        summaries.push(export_file(path, &db_dir, config)?);
    }

    let total: u64 = summaries.iter().map(|s| s.entries).sum();
    info!(
        "Exported {total} entries from {} EPF files into {}",
        summaries.len(),
        db_dir.display()
    );
    Ok(summaries)
}
