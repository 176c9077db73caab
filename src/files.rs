//! EPF file discovery.

use anyhow::{anyhow, bail, Context, Result};
use std::path::{Path, PathBuf};

/// List the EPF files of a directory (non-recursive, immediate children only).
///
/// Only regular, non-hidden files are returned, sorted by path. When
/// `include` is given, a file is kept only if its base name is in the list.
pub fn list_epf_files(dir: &Path, include: Option<&[String]>) -> Result<Vec<PathBuf>> {
    let metadata = std::fs::metadata(dir)
        .with_context(|| format!("Failed to open EPF files directory: {}", dir.display()))?;
    if !metadata.is_dir() {
        bail!("EPF files path is not a directory: {}", dir.display());
    }

    let mut results = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let entry_path = entry.path();
        let metadata = entry
            .metadata()
            .with_context(|| format!("Failed to get metadata for: {}", entry_path.display()))?;

        // Only include files, skip directories
        if !metadata.is_file() {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') {
            continue;
        }
        if let Some(include) = include {
            if !include.iter().any(|wanted| *wanted == name) {
                tracing::debug!("Skipping {name}: not in the include list");
                continue;
            }
        }
        results.push(entry_path);
    }

    // Sort for consistent ordering
    results.sort();

    tracing::debug!(
        "Listed {} EPF files in directory: {}",
        results.len(),
        dir.display()
    );

    if results.is_empty() {
        bail!("EPF files directory seems empty: {}", dir.display());
    }
    Ok(results)
}

/// The base name of a file, used as the collection name.
pub fn file_base_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Invalid EPF file name: {}", path.display()))
}
