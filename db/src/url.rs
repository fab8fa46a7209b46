//! Connection-string parsing.
//!
//! Accepted forms:
//!
//! | Input | Meaning |
//! |---|---|
//! | `sqlite:///app/database.db` | relative path `app/database.db` |
//! | `sqlite:////var/db/shop.db` | absolute path `/var/db/shop.db` |
//! | `sqlite://`, `sqlite:///:memory:`, `:memory:` | in-memory database |
//! | `shop.db` | bare file path |

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{ConfigError, Result};

const SCHEME: &str = "sqlite:";
const MEMORY: &str = ":memory:";

/// Parsed location of the relational store.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use storefront_db::DatabaseUrl;
///
/// let url: DatabaseUrl = "sqlite:///app/database.db".parse().unwrap();
/// assert_eq!(url.path(), Some(Path::new("app/database.db")));
///
/// let memory: DatabaseUrl = "sqlite://".parse().unwrap();
/// assert!(memory.is_memory());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseUrl {
    /// File-backed database at the given path.
    File(PathBuf),
    /// Private in-memory database.
    Memory,
}

impl DatabaseUrl {
    /// Parses a connection string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] for empty or host-qualified
    /// strings, and [`ConfigError::UnsupportedScheme`] for any scheme other
    /// than `sqlite`.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::InvalidUrl(raw.to_string()));
        }

        if let Some(rest) = trimmed.strip_prefix(SCHEME) {
            return match rest {
                "" | "//" | MEMORY => Ok(Self::Memory),
                _ => match rest.strip_prefix("///") {
                    Some(MEMORY) => Ok(Self::Memory),
                    Some("") => Err(ConfigError::InvalidUrl(raw.to_string())),
                    Some(path) => Ok(Self::File(PathBuf::from(path))),
                    // sqlite://host/... names a host, which a file store has none of.
                    None => Err(ConfigError::InvalidUrl(raw.to_string())),
                },
            };
        }

        if let Some((scheme, _)) = trimmed.split_once("://") {
            return Err(ConfigError::UnsupportedScheme(scheme.to_string()));
        }

        if trimmed == MEMORY {
            return Ok(Self::Memory);
        }
        Ok(Self::File(PathBuf::from(trimmed)))
    }

    /// Returns the file path, or `None` for an in-memory database.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Memory => None,
        }
    }

    pub fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl FromStr for DatabaseUrl {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "sqlite:///{}", path.display()),
            Self::Memory => write!(f, "sqlite:///{MEMORY}"),
        }
    }
}
