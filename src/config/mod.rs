//! Release signing configuration loading.

mod credentials;
mod env;
mod error;
mod file;
mod loader;
mod properties;

pub use credentials::{
    CredentialSource, SigningCredentials, SigningSummary, KEY_ALIAS, KEY_PASSWORD, REQUIRED_KEYS,
    STORE_FILE, STORE_PASSWORD,
};
pub use env::EnvOverrides;
pub use error::ConfigError;
pub use loader::{load, SigningConfigLoader, DEFAULT_FILE_NAME};
pub use properties::{Properties, SyntaxError};
