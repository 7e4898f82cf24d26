//! File-based properties source.

use std::path::Path;

use tracing::debug;

use super::properties::Properties;
use super::ConfigError;

/// Loads and parses a properties file.
///
/// Returns `Ok(None)` if the file doesn't exist. Any other I/O failure,
/// including invalid UTF-8, is a [`ConfigError::ReadError`].
pub(crate) fn read_properties(path: &Path) -> Result<Option<Properties>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let properties = Properties::parse(&contents).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                line: e.line,
                message: e.message,
            })?;
            debug!(path = %path.display(), keys = properties.len(), "read properties file");
            Ok(Some(properties))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "properties file not found");
            Ok(None)
        }
        Err(e) => Err(ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
