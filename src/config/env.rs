use std::ffi::OsString;

use tracing::{debug, warn};

use super::credentials::REQUIRED_KEYS;
use super::properties::Properties;

/// Signing fields supplied through prefixed environment variables.
///
/// `{prefix}{separator}{FIELD}` maps to the recognized key whose name matches
/// `FIELD` case-insensitively, so `SIGNING__STOREPASSWORD` sets
/// `storePassword`. Unrecognized names are ignored.
#[derive(Debug, Clone)]
pub struct EnvOverrides {
    prefix: String,
    separator: String,
}

impl EnvOverrides {
    pub fn new(prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        let separator = separator.into();
        assert!(!separator.is_empty(), "separator must not be empty");
        Self {
            prefix: prefix.into(),
            separator,
        }
    }

    /// The variable names this source reads, e.g. `SIGNING__*`.
    pub fn pattern(&self) -> String {
        format!("{}{}*", self.prefix, self.separator)
    }

    /// Collects overrides from the process environment.
    pub fn collect(&self) -> Properties {
        self.collect_from(std::env::vars_os())
    }

    /// Collects overrides from the given variables.
    ///
    /// Variables whose name is not UTF-8 never match. A matching variable
    /// with a non-UTF-8 value is skipped with a warning.
    pub fn collect_from<I, K, V>(&self, vars: I) -> Properties
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        let prefix_with_sep = format!("{}{}", self.prefix, self.separator);
        let mut overrides = Properties::new();

        for (name, value) in vars {
            let name: OsString = name.into();
            let Some(name) = name.to_str() else {
                continue;
            };
            let Some(field) = name.strip_prefix(&prefix_with_sep) else {
                continue;
            };

            let Some(key) = REQUIRED_KEYS
                .iter()
                .find(|key| key.eq_ignore_ascii_case(field))
            else {
                debug!(variable = %name, "ignoring unrecognized signing variable");
                continue;
            };

            match value.into().into_string() {
                Ok(value) => {
                    debug!(variable = %name, key = *key, "signing field overridden from environment");
                    overrides.insert(*key, value);
                }
                Err(_) => warn!(variable = %name, "ignoring signing variable with non-UTF-8 value"),
            }
        }

        overrides
    }
}
