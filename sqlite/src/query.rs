//! Typed CRUD access to the storefront tables.
//!
//! Provides [`ShopQuery`] for row-level operations keyed by primary key.
//! Deletes run in a transaction: the store's `ON DELETE CASCADE` rules
//! remove payments and orders, and the application removes inventory rows,
//! which the store does not cascade.
//!
//! # Example
//!
//! ```no_run
//! use rusqlite::Connection;
//! use storefront_core::{Customer, NewCustomer};
//! use storefront_sqlite::ShopQuery;
//!
//! let conn = Connection::open("app/database.db").unwrap();
//! let query = ShopQuery::new(&conn).unwrap();
//!
//! let id = query
//!     .insert(&NewCustomer::new("John", "Doe", "john.doe@example.com"))
//!     .unwrap();
//! let john: Customer = query.get(id).unwrap().unwrap();
//! assert_eq!(john.full_name(), "John Doe");
//!
//! query.delete::<Customer>(id).unwrap();
//! ```

use rusqlite::{Connection, OptionalExtension, params};
use storefront_core::schema::CUSTOMERS;
use storefront_core::{Customer, Inventory, Order, Payment, Product, RowId};

use crate::convert::{self, Insertable, Record};
use crate::error::{Result, StoreError};
use crate::schema::select_sql;
use crate::store::enable_foreign_keys;

/// Query interface over a borrowed connection.
///
/// # Examples
///
/// ```no_run
/// use rusqlite::Connection;
/// use storefront_core::{NewOrder, NewProduct, Order, Product};
/// use storefront_sqlite::ShopQuery;
///
/// let conn = Connection::open("app/database.db").unwrap();
/// let query = ShopQuery::new(&conn).unwrap();
///
/// let mut product: Product = query.get(1).unwrap().unwrap();
/// product.price = 19.99;
/// query.update(&product).unwrap();
///
/// let orders: Vec<Order> = query.orders_for_product(product.id).unwrap();
/// println!("{} orders reference {}", orders.len(), product.product_name);
/// ```
pub struct ShopQuery<'a> {
    conn: &'a Connection,
}

impl<'a> ShopQuery<'a> {
    /// Wraps `conn`, turning on foreign-key enforcement for it.
    pub fn new(conn: &'a Connection) -> Result<Self> {
        enable_foreign_keys(conn)?;
        Ok(Self { conn })
    }

    /// Inserts a row and returns its generated id.
    ///
    /// # Errors
    ///
    /// Fails with a constraint violation (see
    /// [`StoreError::constraint`]) on a duplicate unique value, a missing
    /// required column, or a foreign key naming a row that does not exist.
    /// Nothing is persisted in that case.
    pub fn insert<N: Insertable>(&self, new: &N) -> Result<RowId> {
        convert::insert(self.conn, new)
    }

    /// Loads one row by id, or `None` if it does not exist.
    pub fn get<T: Record>(&self, id: RowId) -> Result<Option<T>> {
        convert::fetch_one(self.conn, id)
    }

    /// Loads every row of the table, ordered by id.
    pub fn all<T: Record>(&self) -> Result<Vec<T>> {
        convert::fetch_all(self.conn)
    }

    pub fn count<T: Record>(&self) -> Result<usize> {
        convert::count::<T>(self.conn)
    }

    /// Overwrites the row identified by `record`'s id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::RowNotFound`] if no such row exists.
    pub fn update<T: Record>(&self, record: &T) -> Result<()> {
        if convert::update(self.conn, record)? == 0 {
            return Err(StoreError::RowNotFound {
                table: T::TABLE.name,
                id: record.id(),
            });
        }
        Ok(())
    }

    /// Deletes a row and everything that depends on it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::RowNotFound`] if no such row exists; the
    /// transaction is rolled back and nothing is removed.
    pub fn delete<T: Record>(&self, id: RowId) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        if convert::delete::<T>(&tx, id)? == 0 {
            return Err(StoreError::RowNotFound {
                table: T::TABLE.name,
                id,
            });
        }
        tx.commit()?;
        Ok(())
    }

    pub fn payments_for_customer(&self, customer_id: RowId) -> Result<Vec<Payment>> {
        convert::fetch_where(self.conn, "customer_id", customer_id)
    }

    pub fn orders_for_customer(&self, customer_id: RowId) -> Result<Vec<Order>> {
        convert::fetch_where(self.conn, "customer_id", customer_id)
    }

    pub fn orders_for_product(&self, product_id: RowId) -> Result<Vec<Order>> {
        convert::fetch_where(self.conn, "product_id", product_id)
    }

    pub fn inventory_for_product(&self, product_id: RowId) -> Result<Vec<Inventory>> {
        convert::fetch_where(self.conn, "product_id", product_id)
    }

    /// Looks a customer up by their unique email.
    pub fn customer_by_email(&self, email_id: &str) -> Result<Option<Customer>> {
        let sql = format!("{} WHERE email_id = ?1", select_sql(&CUSTOMERS));
        let customer = self
            .conn
            .query_row(&sql, params![email_id], Customer::from_row)
            .optional()?;
        Ok(customer)
    }

    /// Sums stock across all inventory rows of a product.
    pub fn stock_of(&self, product: &Product) -> Result<i64> {
        Ok(self
            .inventory_for_product(product.id)?
            .iter()
            .map(|row| row.quantity)
            .sum())
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::generate_create_sql;
    use storefront_core::schema::TABLES;
    use storefront_core::{NewCustomer, NewInventory, NewProduct};

    fn migrated() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(&generate_create_sql(&TABLES)).unwrap();
        conn
    }

    #[test]
    fn test_new_enables_foreign_keys() {
        let conn = migrated();
        let _query = ShopQuery::new(&conn).unwrap();
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_update_missing_row_is_not_found() {
        let conn = migrated();
        let query = ShopQuery::new(&conn).unwrap();
        let ghost = NewCustomer::new("No", "Body", "nobody@example.com").with_id(9);
        let err = query.update(&ghost).unwrap_err();
        assert!(matches!(
            err,
            StoreError::RowNotFound {
                table: "customers",
                id: 9
            }
        ));
    }

    #[test]
    fn test_delete_missing_row_is_not_found() {
        let conn = migrated();
        let query = ShopQuery::new(&conn).unwrap();
        assert!(matches!(
            query.delete::<Product>(1),
            Err(StoreError::RowNotFound { .. })
        ));
    }

    #[test]
    fn test_customer_by_email() {
        let conn = migrated();
        let query = ShopQuery::new(&conn).unwrap();
        let id = query
            .insert(&NewCustomer::new("Jane", "Smith", "jane.smith@example.com"))
            .unwrap();
        let found = query.customer_by_email("jane.smith@example.com").unwrap();
        assert_eq!(found.map(|c| c.id), Some(id));
        assert!(query.customer_by_email("nobody@example.com").unwrap().is_none());
        assert!(query.customer_by_email("JANE.SMITH@example.com").unwrap().is_none());
    }

    #[test]
    fn test_stock_of_sums_inventory() {
        let conn = migrated();
        let query = ShopQuery::new(&conn).unwrap();
        let id = query.insert(&NewProduct::new("Mouse", 25.99)).unwrap();
        query.insert(&NewInventory::new(id, 10)).unwrap();
        query.insert(&NewInventory::new(id, 5)).unwrap();
        let product: Product = query.get(id).unwrap().unwrap();
        assert_eq!(query.stock_of(&product).unwrap(), 15);
    }
}
