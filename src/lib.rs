//! epf2bson
//!
//! Converts iTunes Enterprise Partner Feed (EPF) exports into a BSON dump
//! that `mongorestore` can load.
//!
//! # Crates
//!
//! - `epf_source` - EPF record reader, header parser and row pull interface
//! - `epf_types` - EPF field text → BSON value conversion
//! - `bson_wire` - BSON documents and wire encoder
//!
//! This crate ties them together: it lists the EPF files of a directory,
//! writes one `<collection>.bson` per file and the matching
//! `<collection>.metadata.json` index declarations.
//!
//! # CLI Usage
//!
//! ```bash
//! # Export every EPF file of ./epf into dump/itunes
//! epf2bson --epf ./epf --db-name itunes
//!
//! # Export only two files into a custom dump directory
//! epf2bson -e ./epf -n itunes -d /tmp/dump -l application,genre
//! ```

pub mod config;
pub mod dump;
pub mod files;
pub mod metadata;

pub use config::{parse_include_list, validate_db_name, Config};
pub use dump::{export_file, prepare_dump_dir, run, ExportSummary};
pub use files::list_epf_files;
pub use metadata::{IndexMetadata, IndexSpec};
