//! Headline files: one headline per line.

use std::path::Path;

use tracing::info;

use crate::error::InputError;

/// Fail fast if the input file is missing, before any model is loaded.
pub fn ensure_input_exists(path: &Path) -> Result<(), InputError> {
    if path.exists() {
        Ok(())
    } else {
        Err(InputError::NotFound(path.to_path_buf()))
    }
}

/// Read headlines from a UTF-8 text file.
///
/// Lines are trimmed and blank lines dropped; order is preserved.
pub fn read_headlines(path: &Path) -> Result<Vec<String>, InputError> {
    ensure_input_exists(path)?;
    let text = std::fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let headlines = parse_headlines(&text);
    info!(count = headlines.len(), path = %path.display(), "loaded headlines");
    Ok(headlines)
}

/// Split text into trimmed, non-empty lines.
///
/// `\n`, `\r\n` and a lone `\r` all end a line.
pub fn parse_headlines(text: &str) -> Vec<String> {
    text.split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
