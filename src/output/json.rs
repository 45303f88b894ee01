use crate::output::ScrapeResult;
use crate::JihankiError;
use std::path::{Path, PathBuf};

/// File name of the result document inside the output directory
pub const RESULT_FILE_NAME: &str = "machines.json";

/// Writes the result document to `<output_dir>/machines.json`
///
/// The document is pretty-printed UTF-8 with non-ASCII text kept as-is.
/// Missing directories are created.
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written file
/// * `Err(JihankiError)` - Failed to serialize or write
pub fn write_result(result: &ScrapeResult, output_dir: &Path) -> Result<PathBuf, JihankiError> {
    std::fs::create_dir_all(output_dir)?;

    let path = output_dir.join(RESULT_FILE_NAME);
    let json = serde_json::to_string_pretty(result)?;
    std::fs::write(&path, json)?;

    tracing::debug!("Wrote {} records to {}", result.machines.len(), path.display());

    Ok(path)
}
