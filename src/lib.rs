pub mod config;
pub mod context;
mod error;

pub use config::{load, ConfigError, SigningConfigLoader, SigningCredentials};
pub use context::{BuildContext, BuildType, SigningConfig};
pub use error::Error;
