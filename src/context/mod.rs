//! Build context carrying the signing decision for one build invocation.

use std::path::Path;

use tracing::warn;

use crate::config::{SigningConfigLoader, SigningCredentials};
use crate::Error;

/// Which signing identity a build should use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningConfig {
    /// Production credentials from `keystore.properties`.
    Release(SigningCredentials),
    /// Non-production signing, typically the debug keystore.
    Fallback,
}

impl SigningConfig {
    pub fn credentials(&self) -> Option<&SigningCredentials> {
        match self {
            SigningConfig::Release(creds) => Some(creds),
            SigningConfig::Fallback => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, SigningConfig::Fallback)
    }
}

impl From<Option<SigningCredentials>> for SigningConfig {
    fn from(credentials: Option<SigningCredentials>) -> Self {
        credentials.map_or(SigningConfig::Fallback, SigningConfig::Release)
    }
}

static FALLBACK: SigningConfig = SigningConfig::Fallback;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildType {
    Debug,
    Release,
}

/// Signing state shared by the steps of a single build.
///
/// ## Example
///
/// ```no_run
/// use keystore_signing::{BuildContext, BuildType};
///
/// let ctx = BuildContext::from_project_root("android")?;
///
/// if ctx.signing_for(BuildType::Release).is_fallback() {
///     println!("release artifact will be debug-signed");
/// }
/// # Ok::<(), keystore_signing::Error>(())
/// ```
#[derive(Debug)]
pub struct BuildContext {
    signing: SigningConfig,
}

impl BuildContext {
    /// Creates a new builder for constructing a `BuildContext`.
    pub fn builder() -> BuildContextBuilder {
        BuildContextBuilder { signing: None }
    }

    /// Loads `keystore.properties` from `project_root` with default settings.
    pub fn from_project_root(project_root: impl AsRef<Path>) -> Result<Self, Error> {
        Self::from_loader(&SigningConfigLoader::new(project_root))
    }

    /// Runs `loader` and records its outcome; no credentials means fallback.
    pub fn from_loader(loader: &SigningConfigLoader) -> Result<Self, Error> {
        Self::builder()
            .with_signing(SigningConfig::from(loader.load()?))
            .build()
    }

    /// The signing config as loaded, independent of build type.
    pub fn signing(&self) -> &SigningConfig {
        &self.signing
    }

    /// The signing config a build of the given type should use.
    ///
    /// Debug builds always use fallback signing. Release builds use the
    /// loaded credentials and fall back with a warning when there are none.
    pub fn signing_for(&self, build_type: BuildType) -> &SigningConfig {
        match (build_type, &self.signing) {
            (BuildType::Debug, _) => &FALLBACK,
            (BuildType::Release, SigningConfig::Fallback) => {
                warn!("no release signing credentials, release build will use fallback signing");
                &FALLBACK
            }
            (BuildType::Release, release) => release,
        }
    }

    /// Release credentials, for pipelines that must not ship fallback-signed artifacts.
    pub fn require_release(&self) -> Result<&SigningCredentials, Error> {
        self.signing
            .credentials()
            .ok_or(Error::ReleaseSigningUnavailable)
    }
}

/// Builder for constructing a [`BuildContext`].
#[derive(Debug)]
#[must_use = "builders do nothing until .build() is called"]
pub struct BuildContextBuilder {
    signing: Option<SigningConfig>,
}

impl BuildContextBuilder {
    /// Attaches the signing config, usually the result of
    /// [`SigningConfigLoader::load`] converted with `SigningConfig::from`.
    pub fn with_signing(mut self, signing: SigningConfig) -> Self {
        self.signing = Some(signing);
        self
    }

    /// Builds the `BuildContext`.
    ///
    /// Returns an error if no signing config was provided.
    pub fn build(self) -> Result<BuildContext, Error> {
        Ok(BuildContext {
            signing: self.signing.ok_or(Error::MissingSigning)?,
        })
    }
}
