use std::path::PathBuf;
use thiserror::Error;

use super::credentials::CredentialSource;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("signing config from {origin} is missing required key '{field}'")]
    MissingField {
        origin: CredentialSource,
        field: &'static str,
    },

    #[error("signing config from {origin} has an empty value for '{field}'")]
    EmptyField {
        origin: CredentialSource,
        field: &'static str,
    },

    #[error("failed to read signing config '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse signing config '{path}' at line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },
}
