//! Versioned schema migrations.
//!
//! Revisions form a linear chain, each naming the one it follows. The
//! revision a database is at is recorded in a one-row version table.
//! [`Migration`] walks the chain forwards ([`upgrade`](Migration::upgrade))
//! and backwards ([`downgrade`](Migration::downgrade)); every step runs in
//! its own transaction together with the version bookkeeping.
//!
//! # Example
//!
//! ```no_run
//! use rusqlite::Connection;
//! use storefront_sqlite::Migration;
//!
//! let conn = Connection::open("app/database.db").unwrap();
//! let mut migration = Migration::new(conn).unwrap();
//!
//! migration.upgrade().unwrap();
//! let status = migration.status().unwrap();
//! assert!(status.tables_exist);
//!
//! migration.downgrade().unwrap();
//! assert_eq!(migration.current().unwrap(), None);
//! ```

use rusqlite::{Connection, OptionalExtension, params};
use storefront_core::schema::TABLES;
use tracing::{debug, info};

use crate::convert;
use crate::error::{Result, StoreError};
use crate::schema::{generate_create_sql, generate_drop_sql};
use crate::store::enable_foreign_keys;

/// Table holding the id of the applied head revision.
pub const VERSION_TABLE: &str = "storefront_revision";

/// One step of the schema history.
#[derive(Debug, Clone, Copy)]
pub struct Revision {
    pub id: &'static str,
    /// Revision this one is applied on top of; `None` for the first.
    pub down_revision: Option<&'static str>,
    pub message: &'static str,
    pub upgrade: fn(&Connection) -> rusqlite::Result<()>,
    pub downgrade: fn(&Connection) -> rusqlite::Result<()>,
}

fn create_initial_tables(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(&generate_create_sql(&TABLES))
}

fn drop_initial_tables(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(&generate_drop_sql(&TABLES))
}

/// Creates customers, products, payments, orders and inventory with their
/// id indexes.
pub const INITIAL: Revision = Revision {
    id: "c95b919d1818",
    down_revision: None,
    message: "initial migration",
    upgrade: create_initial_tables,
    downgrade: drop_initial_tables,
};

static REVISIONS: [Revision; 1] = [INITIAL];

/// Every revision, oldest first.
pub fn revisions() -> &'static [Revision] {
    &REVISIONS
}

/// The newest revision.
pub fn head() -> &'static Revision {
    &REVISIONS[REVISIONS.len() - 1]
}

fn position(id: &str) -> Result<usize> {
    REVISIONS
        .iter()
        .position(|rev| rev.id == id)
        .ok_or_else(|| StoreError::MigrationError(format!("database is at unknown revision {id}")))
}

/// Drives a database through the revision chain.
///
/// # Examples
///
/// ```no_run
/// use rusqlite::Connection;
/// use storefront_sqlite::Migration;
///
/// let conn = Connection::open("app/database.db").unwrap();
/// let mut migration = Migration::new(conn).unwrap();
///
/// for applied in migration.upgrade().unwrap() {
///     println!("applied {applied}");
/// }
///
/// for entry in migration.history().unwrap() {
///     println!("{} {}", entry.revision.id, entry.revision.message);
/// }
/// ```
pub struct Migration {
    conn: Connection,
}

impl Migration {
    pub fn new(conn: Connection) -> Result<Self> {
        enable_foreign_keys(&conn)?;
        Ok(Self { conn })
    }

    /// Applies every revision after the current one, oldest first.
    ///
    /// Returns the ids of the applied revisions.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MigrationError`] if the database is already at
    /// head, or if a revision fails. A failing revision leaves the database
    /// at the revision before it; earlier steps of the same call stay
    /// applied.
    pub fn upgrade(&mut self) -> Result<Vec<&'static str>> {
        self.ensure_version_table()?;
        let start = match self.current()? {
            Some(id) => position(&id)? + 1,
            None => 0,
        };
        let pending = &REVISIONS[start..];
        if pending.is_empty() {
            return Err(StoreError::MigrationError(format!(
                "already at head revision {}",
                head().id
            )));
        }

        let mut applied = Vec::with_capacity(pending.len());
        for rev in pending {
            let tx = self.conn.transaction()?;
            (rev.upgrade)(&tx).map_err(|e| {
                StoreError::MigrationError(format!("failed to apply revision {}: {e}", rev.id))
            })?;
            set_version(&tx, Some(rev.id))?;
            tx.commit()?;
            info!(revision = rev.id, message = rev.message, "applied revision");
            applied.push(rev.id);
        }
        Ok(applied)
    }

    /// Reverts the current revision, moving the database to its
    /// predecessor.
    ///
    /// Returns the id of the reverted revision.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MigrationError`] if no revision is applied or
    /// the revert fails; a failed revert changes nothing.
    pub fn downgrade(&mut self) -> Result<&'static str> {
        self.ensure_version_table()?;
        let Some(current) = self.current()? else {
            return Err(StoreError::MigrationError(
                "no revision is applied".to_string(),
            ));
        };
        let rev = &REVISIONS[position(&current)?];

        let tx = self.conn.transaction()?;
        (rev.downgrade)(&tx).map_err(|e| {
            StoreError::MigrationError(format!("failed to revert revision {}: {e}", rev.id))
        })?;
        set_version(&tx, rev.down_revision)?;
        tx.commit()?;
        info!(revision = rev.id, "reverted revision");
        Ok(rev.id)
    }

    /// Id of the applied revision, or `None` for an unmigrated database.
    pub fn current(&self) -> Result<Option<String>> {
        if !table_exists(&self.conn, VERSION_TABLE)? {
            return Ok(None);
        }
        let version = self
            .conn
            .query_row(
                &format!("SELECT version_num FROM {VERSION_TABLE}"),
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(version)
    }

    /// The revision chain, newest first, marked with what is applied.
    pub fn history(&self) -> Result<Vec<HistoryEntry>> {
        let applied_through = match self.current()? {
            Some(id) => Some(position(&id)?),
            None => None,
        };
        Ok(REVISIONS
            .iter()
            .enumerate()
            .rev()
            .map(|(i, revision)| HistoryEntry {
                revision,
                applied: applied_through.is_some_and(|last| i <= last),
                current: applied_through == Some(i),
            })
            .collect())
    }

    /// Snapshot of the revision and of each table's row count.
    pub fn status(&self) -> Result<MigrationStatus> {
        let mut tables = Vec::with_capacity(TABLES.len());
        for table in TABLES {
            let row_count = if table_exists(&self.conn, table.name)? {
                Some(convert::count_table(&self.conn, table.name)?)
            } else {
                None
            };
            tables.push(TableStatus {
                name: table.name,
                row_count,
            });
        }
        Ok(MigrationStatus {
            current: self.current()?,
            head: head().id,
            tables_exist: tables.iter().all(|t| t.row_count.is_some()),
            tables,
        })
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Consumes the migration and returns the underlying connection.
    pub fn into_connection(self) -> Connection {
        self.conn
    }

    fn ensure_version_table(&self) -> Result<()> {
        self.conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {VERSION_TABLE} (
                version_num VARCHAR(32) NOT NULL PRIMARY KEY
            );"
        ))?;
        Ok(())
    }
}

fn set_version(conn: &Connection, id: Option<&str>) -> Result<()> {
    conn.execute(&format!("DELETE FROM {VERSION_TABLE}"), [])?;
    if let Some(id) = id {
        conn.execute(
            &format!("INSERT INTO {VERSION_TABLE} (version_num) VALUES (?1)"),
            params![id],
        )?;
    }
    debug!(revision = ?id, "recorded revision");
    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// One line of [`Migration::history`].
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub revision: &'static Revision,
    pub applied: bool,
    /// Whether this is the revision the database is at.
    pub current: bool,
}

/// Row count of one storefront table; `None` when the table is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStatus {
    pub name: &'static str,
    pub row_count: Option<usize>,
}

/// Returned by [`Migration::status`].
#[derive(Debug, Clone)]
pub struct MigrationStatus {
    /// Applied revision, if any.
    pub current: Option<String>,
    pub head: &'static str,
    /// Whether all five storefront tables exist.
    pub tables_exist: bool,
    pub tables: Vec<TableStatus>,
}

impl MigrationStatus {
    pub fn is_at_head(&self) -> bool {
        self.current.as_deref() == Some(self.head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn migration() -> Migration {
        Migration::new(Connection::open_in_memory().unwrap()).unwrap()
    }

    fn user_objects(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare(
                "SELECT name FROM sqlite_master WHERE name NOT LIKE 'sqlite_%' AND name != ?1 ORDER BY name",
            )
            .unwrap();
        stmt.query_map([VERSION_TABLE], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<Vec<String>>>()
            .unwrap()
    }

    #[test]
    fn test_revision_chain_is_linear() {
        let revs = revisions();
        assert_eq!(revs[0].down_revision, None);
        for pair in revs.windows(2) {
            assert_eq!(pair[1].down_revision, Some(pair[0].id));
        }
        assert_eq!(head().id, "c95b919d1818");
    }

    #[test]
    fn test_status_on_empty_database() {
        let status = migration().status().unwrap();
        assert_eq!(status.current, None);
        assert!(!status.tables_exist);
        assert!(!status.is_at_head());
        assert!(status.tables.iter().all(|t| t.row_count.is_none()));
    }

    #[test]
    fn test_upgrade_creates_tables_and_records_head() {
        let mut migration = migration();
        assert_eq!(migration.upgrade().unwrap(), vec!["c95b919d1818"]);

        let status = migration.status().unwrap();
        assert!(status.tables_exist);
        assert!(status.is_at_head());
        assert!(status.tables.iter().all(|t| t.row_count == Some(0)));

        let objects = user_objects(migration.connection());
        for table in TABLES {
            assert!(objects.contains(&table.name.to_string()));
            assert!(objects.contains(&table.id_index_name()));
        }
    }

    #[test]
    fn test_upgrade_at_head_fails() {
        let mut migration = migration();
        migration.upgrade().unwrap();
        let err = migration.upgrade().unwrap_err();
        assert!(matches!(err, StoreError::MigrationError(_)));
        assert!(migration.status().unwrap().is_at_head());
    }

    #[test]
    fn test_upgrade_over_existing_tables_fails_and_records_nothing() {
        let mut migration = migration();
        migration
            .connection()
            .execute_batch(&generate_create_sql(&TABLES))
            .unwrap();
        let err = migration.upgrade().unwrap_err();
        assert!(err.to_string().contains("c95b919d1818"));
        assert_eq!(migration.current().unwrap(), None);
    }

    #[test]
    fn test_downgrade_removes_tables_and_indexes() {
        let mut migration = migration();
        migration.upgrade().unwrap();
        assert_eq!(migration.downgrade().unwrap(), "c95b919d1818");

        assert!(user_objects(migration.connection()).is_empty());
        assert_eq!(migration.current().unwrap(), None);
    }

    #[test]
    fn test_downgrade_without_revision_fails() {
        let mut migration = migration();
        assert!(matches!(
            migration.downgrade(),
            Err(StoreError::MigrationError(_))
        ));
    }

    #[test]
    fn test_upgrade_after_downgrade() {
        let mut migration = migration();
        migration.upgrade().unwrap();
        migration.downgrade().unwrap();
        migration.upgrade().unwrap();
        assert!(migration.status().unwrap().tables_exist);
    }

    #[test]
    fn test_history_marks_applied() {
        let mut migration = migration();
        let before = migration.history().unwrap();
        assert!(before.iter().all(|e| !e.applied && !e.current));

        migration.upgrade().unwrap();
        let after = migration.history().unwrap();
        assert_eq!(after[0].revision.id, head().id);
        assert!(after[0].applied && after[0].current);
    }
}
