//! Configuration for the storefront data layer.
//!
//! Resolves where the relational store lives ([`StoreConfig`]) and parses
//! its connection string ([`DatabaseUrl`]).
//!
//! # Quick start
//!
//! ```no_run
//! use storefront_db::StoreConfig;
//!
//! let config = StoreConfig::from_env().unwrap();
//! let url = config.url().unwrap();
//! println!("store at {url}");
//! ```

mod config;
mod error;
mod url;

pub use config::{
    CONFIG_PATH_ENV, DATABASE_URL_ENV, DEFAULT_DATABASE_URL, DEFAULT_LOG_FILTER, LOG_FILTER_ENV,
    StoreConfig,
};
pub use error::{ConfigError, Result};
pub use url::DatabaseUrl;
