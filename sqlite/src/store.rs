//! Explicit data-access handle.
//!
//! A [`Store`] knows where the database lives and hands out connections on
//! demand. Connections are owned values: dropping one closes it, so every
//! exit path of a unit of work releases its connection.

use rusqlite::{Connection, OpenFlags};
use storefront_db::{DatabaseUrl, StoreConfig};
use tracing::debug;

use crate::error::Result;

/// Handle to the relational store.
///
/// # Examples
///
/// ```no_run
/// use storefront_db::DatabaseUrl;
/// use storefront_sqlite::Store;
///
/// let store = Store::new(DatabaseUrl::parse("sqlite:///app/database.db").unwrap());
/// let count = store
///     .with_connection(|conn| {
///         Ok(conn.query_row("SELECT COUNT(*) FROM customers", [], |row| row.get::<_, i64>(0))?)
///     })
///     .unwrap();
/// println!("{count} customers");
/// ```
#[derive(Debug, Clone)]
pub struct Store {
    url: DatabaseUrl,
}

impl Store {
    pub fn new(url: DatabaseUrl) -> Self {
        Self { url }
    }

    /// Builds a store from resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ConfigError`](crate::StoreError::ConfigError)
    /// if the connection string does not parse.
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        Ok(Self::new(config.url()?))
    }

    pub fn url(&self) -> &DatabaseUrl {
        &self.url
    }

    /// Opens a read-write connection with foreign-key enforcement on.
    ///
    /// File-backed databases are created if missing; their parent directory
    /// must exist.
    pub fn open(&self) -> Result<Connection> {
        debug!(url = %self.url, "opening connection");
        let conn = match &self.url {
            DatabaseUrl::File(path) => Connection::open(path)?,
            DatabaseUrl::Memory => Connection::open_in_memory()?,
        };
        enable_foreign_keys(&conn)?;
        Ok(conn)
    }

    /// Opens a connection that cannot write.
    ///
    /// A missing database file is an error rather than being created.
    pub fn open_read_only(&self) -> Result<Connection> {
        debug!(url = %self.url, "opening read-only connection");
        let conn = match &self.url {
            DatabaseUrl::File(path) => Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?,
            DatabaseUrl::Memory => {
                let conn = Connection::open_in_memory()?;
                conn.execute_batch("PRAGMA query_only = ON;")?;
                conn
            }
        };
        enable_foreign_keys(&conn)?;
        Ok(conn)
    }

    /// Runs `f` with a fresh read-write connection, closing it afterwards
    /// whether `f` succeeds or not.
    pub fn with_connection<T>(&self, f: impl FnOnce(&mut Connection) -> Result<T>) -> Result<T> {
        let mut conn = self.open()?;
        f(&mut conn)
    }

    /// Read-only counterpart of [`with_connection`](Self::with_connection).
    pub fn with_read_only<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self.open_read_only()?;
        f(&conn)
    }
}

pub(crate) fn enable_foreign_keys(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(())
}
