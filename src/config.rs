//! Export configuration.

use anyhow::{bail, Result};
use bson_wire::WireEncoder;
use epf_source::SourceOptions;
use std::path::PathBuf;

/// Default dump directory
pub const DEFAULT_DUMP_DIR: &str = "dump";

/// Log a progress line every this many exported entries
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 10_000;

/// Longest accepted database name
const MAX_DB_NAME_LEN: usize = 256;

/// Configuration for an EPF → BSON export run
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the EPF files
    pub epf_dir: PathBuf,

    /// Target database name, used for the dump sub-directory and index namespaces
    pub db_name: String,

    /// Dump directory to create; it must not exist yet
    pub dump_dir: PathBuf,

    /// Base names of the EPF files to export (all files when `None`)
    pub include: Option<Vec<String>>,

    /// EPF reader tuning
    pub source: SourceOptions,

    /// BSON encoder tuning
    pub encoder: WireEncoder,

    /// Number of entries between progress log lines (0 disables them)
    pub progress_interval: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            epf_dir: PathBuf::new(),
            db_name: String::new(),
            dump_dir: PathBuf::from(DEFAULT_DUMP_DIR),
            include: None,
            source: SourceOptions::default(),
            encoder: WireEncoder::default(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

/// Parse a comma separated list of file names.
///
/// Items are trimmed and empty items are dropped.
pub fn parse_include_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Check that a database name only uses `[0-9A-Za-z_-]` and is 1 to 256 characters long.
pub fn validate_db_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > MAX_DB_NAME_LEN {
        bail!("Database name must be between 1 and {MAX_DB_NAME_LEN} characters long");
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        bail!("Invalid database name '{name}': unexpected character '{c}'");
    }
    Ok(())
}
