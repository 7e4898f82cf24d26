use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::credentials::{CredentialSource, SigningCredentials};
use super::env::EnvOverrides;
use super::file::read_properties;
use super::ConfigError;

/// File name looked up under the project root by default.
pub const DEFAULT_FILE_NAME: &str = "keystore.properties";

/// Loads release signing credentials for a project.
///
/// Looks for `keystore.properties` under the project root. A missing file
/// means "use fallback signing" and loads as `Ok(None)`. A file that exists
/// must define `keyAlias`, `keyPassword`, `storeFile` and `storePassword`;
/// anything less is an error rather than a partially signed release.
///
/// ```properties
/// # keystore.properties
/// storePassword=...
/// keyPassword=...
/// keyAlias=upload
/// storeFile=upload-keystore.jks
/// ```
///
/// ## Example
///
/// ```no_run
/// use keystore_signing::SigningConfigLoader;
///
/// let credentials = SigningConfigLoader::new("android")
///     .with_env("SIGNING", "__")
///     .load()?;
///
/// match credentials {
///     Some(creds) => println!("signing with key '{}'", creds.key_alias()),
///     None => println!("no release keystore, using debug signing"),
/// }
/// # Ok::<(), keystore_signing::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
#[must_use = "loaders do nothing until .load() is called"]
pub struct SigningConfigLoader {
    project_root: PathBuf,
    file_name: PathBuf,
    env: Option<EnvOverrides>,
}

impl SigningConfigLoader {
    /// Creates a loader for the given project root.
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            project_root: project_root.as_ref().to_path_buf(),
            file_name: PathBuf::from(DEFAULT_FILE_NAME),
            env: None,
        }
    }

    /// Uses a different properties file, still resolved against the project root.
    pub fn with_file_name(mut self, file_name: impl AsRef<Path>) -> Self {
        self.file_name = file_name.as_ref().to_path_buf();
        self
    }

    /// Lets `{prefix}{separator}{FIELD}` environment variables override file values.
    ///
    /// If the file is missing but any such variable is set, the environment
    /// alone must then provide all four fields.
    pub fn with_env(mut self, prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        self.env = Some(EnvOverrides::new(prefix, separator));
        self
    }

    /// Full path of the properties file this loader reads.
    pub fn properties_path(&self) -> PathBuf {
        self.project_root.join(&self.file_name)
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Reads the properties file and builds the credentials.
    ///
    /// Returns `Ok(None)` when there is nothing to load. Read-only; calling it
    /// again on an unchanged file yields an equal result.
    pub fn load(&self) -> Result<Option<SigningCredentials>, ConfigError> {
        let path = self.properties_path();
        debug!(path = %path.display(), "loading release signing config");

        let file = read_properties(&path)?;
        let overrides = self
            .env
            .as_ref()
            .map(EnvOverrides::collect)
            .filter(|overrides| !overrides.is_empty());

        let (properties, source) = match (file, overrides) {
            (None, None) => {
                info!(path = %path.display(), "no signing properties found, release signing unavailable");
                return Ok(None);
            }
            (Some(file), None) => {
                info!(path = %path.display(), "release signing config loaded from file");
                (file, CredentialSource::File(path))
            }
            (None, Some(overrides)) => {
                let pattern = self
                    .env
                    .as_ref()
                    .map(EnvOverrides::pattern)
                    .unwrap_or_default();
                info!(keys = overrides.len(), %pattern, "release signing config loaded from environment");
                (overrides, CredentialSource::Environment(pattern))
            }
            (Some(mut file), Some(overrides)) => {
                info!(
                    path = %path.display(),
                    overridden = overrides.len(),
                    "release signing config loaded from file with environment overrides"
                );
                for (key, value) in overrides.iter() {
                    file.insert(key, value);
                }
                (file, CredentialSource::File(path))
            }
        };

        SigningCredentials::from_properties(&properties, &self.project_root, source).map(Some)
    }
}

/// Loads `keystore.properties` from `project_root` with default settings.
pub fn load(project_root: impl AsRef<Path>) -> Result<Option<SigningCredentials>, ConfigError> {
    SigningConfigLoader::new(project_root).load()
}
