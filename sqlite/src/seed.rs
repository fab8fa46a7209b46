//! Fixture seeding.
//!
//! Seeding replaces the contents of every storefront table with a
//! [`Fixtures`] dataset in a single transaction. Either the whole dataset
//! lands or the tables keep what they held before.

use rusqlite::Connection;
use storefront_core::schema::TABLES;
use storefront_core::{Fixtures, RowId};
use tracing::{debug, info};

use crate::convert;
use crate::error::{Result, StoreError};
use crate::store::enable_foreign_keys;

/// Counts from one [`seed`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Rows deleted across all tables before inserting.
    pub rows_cleared: usize,
    pub customers_inserted: usize,
    pub payments_inserted: usize,
    pub products_inserted: usize,
    pub orders_inserted: usize,
}

impl SeedReport {
    pub fn total_inserted(&self) -> usize {
        self.customers_inserted
            + self.payments_inserted
            + self.products_inserted
            + self.orders_inserted
    }
}

/// Clears all storefront tables and inserts `fixtures`.
///
/// Children reference their parents through the ids returned by the
/// parents' inserts, so the fixture positions need not match any particular
/// id sequence.
///
/// # Errors
///
/// Returns [`StoreError::FixtureError`] if a fixture points at a parent
/// position the dataset does not have, and a database error if the tables
/// are missing or a row violates a constraint. In every case the
/// transaction is rolled back.
///
/// # Examples
///
/// ```no_run
/// use rusqlite::Connection;
/// use storefront_core::Fixtures;
/// use storefront_sqlite::seed;
///
/// let mut conn = Connection::open("app/database.db").unwrap();
/// let report = seed(&mut conn, &Fixtures::standard()).unwrap();
/// assert_eq!(report.customers_inserted, 3);
/// ```
pub fn seed(conn: &mut Connection, fixtures: &Fixtures) -> Result<SeedReport> {
    enable_foreign_keys(conn)?;
    let tx = conn.transaction()?;
    let mut report = SeedReport::default();

    // Children before parents.
    for table in TABLES.iter().rev() {
        let removed = tx.execute(&format!("DELETE FROM {}", table.name), [])?;
        debug!(table = table.name, removed, "cleared table");
        report.rows_cleared += removed;
    }

    let mut customer_ids: Vec<RowId> = Vec::with_capacity(fixtures.customers.len());
    for customer in &fixtures.customers {
        customer_ids.push(convert::insert(&tx, customer)?);
    }
    report.customers_inserted = customer_ids.len();

    let mut payment_ids: Vec<RowId> = Vec::with_capacity(fixtures.payments.len());
    for (pos, fixture) in fixtures.payments.iter().enumerate() {
        let payment = fixture.resolve(&customer_ids).ok_or_else(|| {
            StoreError::FixtureError(format!(
                "payment {pos} refers to missing customer {}",
                fixture.customer
            ))
        })?;
        payment_ids.push(convert::insert(&tx, &payment)?);
    }
    report.payments_inserted = payment_ids.len();

    let mut product_ids: Vec<RowId> = Vec::with_capacity(fixtures.products.len());
    for product in &fixtures.products {
        product_ids.push(convert::insert(&tx, product)?);
    }
    report.products_inserted = product_ids.len();

    for (pos, fixture) in fixtures.orders.iter().enumerate() {
        let order = fixture
            .resolve(&product_ids, &customer_ids, &payment_ids)
            .ok_or_else(|| {
                StoreError::FixtureError(format!(
                    "order {pos} refers to a missing product, customer or payment"
                ))
            })?;
        convert::insert(&tx, &order)?;
        report.orders_inserted += 1;
    }

    tx.commit()?;
    info!(
        cleared = report.rows_cleared,
        inserted = report.total_inserted(),
        "seeded database"
    );
    Ok(report)
}

/// Seeds the standard demo dataset.
pub fn seed_standard(conn: &mut Connection) -> Result<SeedReport> {
    seed(conn, &Fixtures::standard())
}
