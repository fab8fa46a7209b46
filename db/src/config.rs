//! Store configuration.
//!
//! Configuration is resolved in three layers, later layers winning:
//!
//! 1. built-in defaults ([`StoreConfig::default`]);
//! 2. a YAML file named by the `STOREFRONT_CONFIG` environment variable;
//! 3. the `DATABASE_URL` and `STOREFRONT_LOG` environment variables.
//!
//! # Example YAML
//!
//! ```yaml
//! database_url: sqlite:///app/database.db
//! log_filter: info
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::url::DatabaseUrl;

/// Connection string used when nothing else is configured.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:///app/database.db";

/// Log filter used when nothing else is configured.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Environment variable naming an optional YAML config file.
pub const CONFIG_PATH_ENV: &str = "STOREFRONT_CONFIG";

/// Environment variable overriding [`StoreConfig::database_url`].
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Environment variable overriding [`StoreConfig::log_filter`].
pub const LOG_FILTER_ENV: &str = "STOREFRONT_LOG";

/// Where the store lives and how chatty the programs are.
///
/// # Examples
///
/// ```
/// use storefront_db::StoreConfig;
///
/// let config: StoreConfig = serde_yaml::from_str("database_url: shop.db").unwrap();
/// assert_eq!(config.database_url, "shop.db");
/// assert_eq!(config.log_filter, "info");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Connection string, see [`DatabaseUrl`].
    pub database_url: String,
    /// `tracing-subscriber` `EnvFilter` directive.
    pub log_filter: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl StoreConfig {
    /// Loads configuration from a YAML file. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::ConfigError::IoError) if the file cannot
    /// be read, or [`YamlError`](crate::ConfigError::YamlError) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Resolves configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::resolve(|key| std::env::var(key).ok())
    }

    /// Resolves configuration using `lookup` in place of the process
    /// environment.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Examples
    ///
    /// ```
    /// use storefront_db::StoreConfig;
    ///
    /// let config = StoreConfig::resolve(|key| match key {
    ///     "DATABASE_URL" => Some("sqlite:///tmp/shop.db".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    /// assert_eq!(config.database_url, "sqlite:///tmp/shop.db");
    /// assert_eq!(config.log_filter, "info");
    /// ```
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut config = match lookup(CONFIG_PATH_ENV) {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(url) = lookup(DATABASE_URL_ENV) {
            config.database_url = url;
        }
        if let Some(filter) = lookup(LOG_FILTER_ENV) {
            config.log_filter = filter;
        }
        Ok(config)
    }

    /// Parses [`database_url`](Self::database_url).
    pub fn url(&self) -> Result<DatabaseUrl> {
        DatabaseUrl::parse(&self.database_url)
    }
}
