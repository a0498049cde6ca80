//! Small helpers shared by the library and the CLI: input globbing, input
//! lists, file names and sizes.

use crate::{Result, error::PdfyError};
use std::path::{Path, PathBuf};

/// Expand glob patterns into input paths, pattern by pattern.
///
/// Matches of one pattern are sorted so `chapter-*.pdf` merges in name
/// order. A plain path is passed through even if it does not exist, so the
/// reader can report it as missing instead of it silently vanishing.
///
/// # Errors
///
/// A malformed pattern, or a directory that cannot be read while matching.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut paths = Vec::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        if !pattern.contains(['*', '?', '[']) {
            paths.push(PathBuf::from(pattern));
            continue;
        }

        let matches = glob::glob(pattern)
            .map_err(|err| PdfyError::invalid_config(format!("Bad pattern '{pattern}': {err}")))?;
        let mut matched = matches
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|err| PdfyError::other(err.to_string()))?;
        matched.sort();
        paths.extend(matched);
    }
    Ok(paths)
}

/// Read input paths from a list file, one path per line.
///
/// Empty lines and lines starting with `#` are skipped.
pub async fn read_input_list(path: &Path) -> Result<Vec<PathBuf>> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| PdfyError::FileNotAccessible {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(PathBuf::from)
        .collect())
}

/// `532 bytes`, `1.50 MB` and so on, in binary units.
pub fn format_file_size(size: u64) -> String {
    const UNITS: [(&str, u64); 3] = [("GB", 1 << 30), ("MB", 1 << 20), ("KB", 1 << 10)];

    UNITS
        .iter()
        .find(|(_, scale)| size >= *scale)
        .map(|(unit, scale)| format!("{:.2} {unit}", size as f64 / *scale as f64))
        .unwrap_or_else(|| format!("{size} bytes"))
}

/// File stem of `path`, or `"document"` when it has none.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}
