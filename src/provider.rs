use crate::configuration::{DEFAULT_NAME, SnowflakeConfiguration};
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::Path};
use tracing::debug;

/// Resolves a snowflake name to its configuration.
///
/// The registry calls this at most once per name. `None` means the name is
/// not configured.
pub trait ConfigurationProvider: Send + Sync {
    fn get(&self, name: &str) -> Option<SnowflakeConfiguration>;
}

impl<F> ConfigurationProvider for F
where
    F: Fn(&str) -> Option<SnowflakeConfiguration> + Send + Sync,
{
    fn get(&self, name: &str) -> Option<SnowflakeConfiguration> {
        self(name)
    }
}

impl ConfigurationProvider for HashMap<String, SnowflakeConfiguration> {
    fn get(&self, name: &str) -> Option<SnowflakeConfiguration> {
        HashMap::get(self, name).cloned()
    }
}

/// Operator-supplied snowflake settings.
///
/// ```json
/// {
///   "default": { "worker_id": 1, "datacenter_id": 2 },
///   "snowflakes": {
///     "orders": { "epoch": 1609459200000, "worker_id": 3 }
///   },
///   "fallback_to_default": false
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowflakeOptions {
    /// Configuration of [`DEFAULT_NAME`].
    pub default: SnowflakeConfiguration,
    /// Named configurations, keyed by snowflake name.
    pub snowflakes: HashMap<String, SnowflakeConfiguration>,
    /// Resolve unknown names to a copy of `default` instead of nothing.
    pub fallback_to_default: bool,
}

impl SnowflakeOptions {
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::ConfigurationSource(Box::new(e)))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let json =
            fs::read_to_string(path).map_err(|e| Error::ConfigurationSource(Box::new(e)))?;
        debug!(path = %path.display(), "loaded snowflake options");
        Self::from_json_str(&json)
    }

    /// Add or replace the configuration for `name`.
    pub fn configure(
        mut self,
        name: impl Into<String>,
        configuration: SnowflakeConfiguration,
    ) -> Self {
        self.snowflakes.insert(name.into(), configuration);
        self
    }

    pub fn fallback_to_default(mut self, fallback: bool) -> Self {
        self.fallback_to_default = fallback;
        self
    }
}

/// A [`ConfigurationProvider`] backed by [`SnowflakeOptions`].
///
/// Resolved configurations always carry the requested name, whatever name
/// the options entry itself was given.
#[derive(Debug, Clone, Default)]
pub struct DefaultConfigurationProvider {
    options: SnowflakeOptions,
}

impl DefaultConfigurationProvider {
    pub fn new(options: SnowflakeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SnowflakeOptions {
        &self.options
    }
}

impl ConfigurationProvider for DefaultConfigurationProvider {
    fn get(&self, name: &str) -> Option<SnowflakeConfiguration> {
        let configuration = match self.options.snowflakes.get(name) {
            Some(configuration) => configuration,
            None if name == DEFAULT_NAME || self.options.fallback_to_default => {
                &self.options.default
            }
            None => return None,
        };

        Some(SnowflakeConfiguration {
            name: name.to_string(),
            ..configuration.clone()
        })
    }
}
