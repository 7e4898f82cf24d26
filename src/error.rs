use crate::config::ConfigError;
use thiserror::Error;

/// Top-level error type for the keystore-signing library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("build context requires a signing configuration")]
    MissingSigning,

    #[error("release signing credentials are not available")]
    ReleaseSigningUnavailable,
}
