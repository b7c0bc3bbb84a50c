//! Safety checks before overwriting stage outputs.
//!
//! Filtered and cleaned files are rewritten on every run; the raw corpus is
//! the only copy of scraped data and must never be the target of a write.

use std::path::Path;

use crate::error::{Error, Result};

/// Filename marker of scraped corpora.
const RAW_PATTERN: &str = "raw_data";

/// Validates that a stage output path is safe to overwrite.
///
/// Checks:
/// - Output filename must contain the stage pattern (e.g. "filtered_data")
/// - Output cannot be the same as any of the provided source paths
/// - Output cannot look like a raw corpus file
pub fn validate_output_path(
    output: &Path,
    required_pattern: &str,
    source_paths: &[&Path],
) -> Result<()> {
    let output_name = output.file_name().and_then(|n| n.to_str()).unwrap_or("");

    if !output_name.contains(required_pattern) {
        return Err(Error::UnsafeOutput(format!(
            "output file '{}' must contain '{}' in the name",
            output.display(),
            required_pattern
        )));
    }

    for source in source_paths {
        if output == *source {
            return Err(Error::UnsafeOutput(format!(
                "output '{}' cannot be the same as source '{}'",
                output.display(),
                source.display()
            )));
        }
    }

    if output_name.contains(RAW_PATTERN) && !required_pattern.contains(RAW_PATTERN) {
        return Err(Error::UnsafeOutput(format!(
            "output '{}' matches raw corpus pattern '{}'",
            output.display(),
            RAW_PATTERN
        )));
    }

    Ok(())
}
