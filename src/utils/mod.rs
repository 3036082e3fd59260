//! Path collection helpers for the CLI.

use std::path::PathBuf;

use crate::error::{PdfWeaveError, Result};

/// Expand multiple glob patterns into filesystem paths.
///
/// Patterns are expanded in the order given, so the file order on the
/// command line is the file order the script indexes into. A literal
/// path that exists is returned as-is; a pattern that matches nothing
/// contributes nothing.
///
/// Errors:
/// - Propagates `glob` parse errors.
/// - Propagates filesystem errors from the glob iterator.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns.into_iter() {
        let paths = collect_paths_for_pattern(pattern)?;
        resolved_paths.extend(paths);
    }

    Ok(resolved_paths)
}

/// Expand a single glob pattern into filesystem paths.
///
/// Pattern examples:
/// - `"**/*.pdf"`
/// - `"./docs/*.pdf"`
fn collect_paths_for_pattern<P: AsRef<str>>(pattern: P) -> Result<Vec<PathBuf>> {
    let pattern = pattern.as_ref();
    let mut resolved_paths = Vec::new();

    let paths = glob::glob(pattern).map_err(|err| PdfWeaveError::InvalidInputPattern {
        pattern: pattern.to_string(),
        details: err.to_string(),
    })?;

    for entry in paths {
        let path = entry.map_err(|err| PdfWeaveError::InvalidInputPattern {
            pattern: pattern.to_string(),
            details: err.to_string(),
        })?;
        resolved_paths.push(path);
    }

    Ok(resolved_paths)
}
