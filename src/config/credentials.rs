// SECURITY: the key and store passwords are private and never appear in
// Debug output, log messages, errors or the serializable summary.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::properties::Properties;
use super::ConfigError;

pub const KEY_ALIAS: &str = "keyAlias";
pub const KEY_PASSWORD: &str = "keyPassword";
pub const STORE_FILE: &str = "storeFile";
pub const STORE_PASSWORD: &str = "storePassword";

/// Keys that must all be present and non-empty.
pub const REQUIRED_KEYS: [&str; 4] = [KEY_ALIAS, KEY_PASSWORD, STORE_FILE, STORE_PASSWORD];

/// Where a set of credentials was read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialSource {
    /// A properties file, possibly with environment overrides applied.
    File(PathBuf),
    /// Environment variables alone, named by their pattern.
    Environment(String),
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::File(path) => write!(f, "'{}'", path.display()),
            CredentialSource::Environment(pattern) => {
                write!(f, "environment variables '{pattern}'")
            }
        }
    }
}

/// Release signing credentials read from a properties file.
///
/// Built once per build invocation and never mutated. Passwords are only
/// reachable through [`key_password`](Self::key_password) and
/// [`store_password`](Self::store_password).
#[derive(Clone, PartialEq, Eq)]
pub struct SigningCredentials {
    key_alias: String,
    key_password: String,
    store_file: PathBuf,
    store_password: String,
    source: CredentialSource,
}

impl SigningCredentials {
    /// Builds credentials from parsed properties.
    ///
    /// `storeFile` is resolved against `project_root`. `source` records where
    /// the properties came from and is used in errors.
    pub fn from_properties(
        properties: &Properties,
        project_root: &Path,
        source: CredentialSource,
    ) -> Result<Self, ConfigError> {
        let field = |name: &'static str| -> Result<String, ConfigError> {
            match properties.get(name) {
                None => Err(ConfigError::MissingField {
                    origin: source.clone(),
                    field: name,
                }),
                Some("") => Err(ConfigError::EmptyField {
                    origin: source.clone(),
                    field: name,
                }),
                Some(value) => Ok(value.to_string()),
            }
        };

        Ok(Self {
            key_alias: field(KEY_ALIAS)?,
            key_password: field(KEY_PASSWORD)?,
            store_file: project_root.join(field(STORE_FILE)?),
            store_password: field(STORE_PASSWORD)?,
            source,
        })
    }

    pub fn key_alias(&self) -> &str {
        &self.key_alias
    }

    pub fn key_password(&self) -> &str {
        &self.key_password
    }

    /// Keystore path, already resolved against the project root.
    ///
    /// Whether the file exists is left to the signing step.
    pub fn store_file(&self) -> &Path {
        &self.store_file
    }

    pub fn store_password(&self) -> &str {
        &self.store_password
    }

    /// Where these credentials were read from.
    pub fn source(&self) -> &CredentialSource {
        &self.source
    }

    /// A secret-free view suitable for logs and reports.
    pub fn summary(&self) -> SigningSummary {
        SigningSummary {
            key_alias: self.key_alias.clone(),
            store_file: self.store_file.clone(),
            source: self.source.clone(),
        }
    }
}

impl fmt::Debug for SigningCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningCredentials")
            .field("key_alias", &self.key_alias)
            .field("key_password", &"[REDACTED]")
            .field("store_file", &self.store_file)
            .field("store_password", &"[REDACTED]")
            .field("source", &self.source)
            .finish()
    }
}

/// Non-secret description of loaded credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SigningSummary {
    pub key_alias: String,
    pub store_file: PathBuf,
    pub source: CredentialSource,
}
