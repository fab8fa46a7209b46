//! Conversion between storefront entities and SQLite rows.
//!
//! [`Record`] describes a persisted entity: which table it lives in, how to
//! decode it from a row, and which column values it writes. [`Insertable`]
//! does the same for the id-less shapes. The generic statements in this
//! module ([`fetch_all`], [`insert`], [`update`], ...) are built once from
//! those descriptors instead of per entity.
//!
//! Column names always come from the table descriptors in
//! [`storefront_core::schema`].

use rusqlite::{Connection, OptionalExtension, Row, ToSql, params};
use storefront_core::schema::{self, TableDef};
use storefront_core::{
    Customer, Inventory, NewCustomer, NewInventory, NewOrder, NewPayment, NewProduct, Order,
    Payment, Product, RowId,
};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::schema::select_sql;

/// Column name paired with the value to write into it.
pub type ColumnValue<'a> = (&'static str, &'a dyn ToSql);

fn col<'a>(name: &'static str, value: &'a dyn ToSql) -> ColumnValue<'a> {
    (name, value)
}

/// A persisted entity with a primary key.
pub trait Record: Sized {
    /// Table the entity is stored in.
    const TABLE: &'static TableDef;

    /// Decodes one row selected with the table's full column list.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    fn id(&self) -> RowId;

    /// Non-key column values, used by [`update`].
    fn values(&self) -> Vec<ColumnValue<'_>>;

    /// Deletes rows that reference `id` but that the store does not
    /// cascade on its own. Runs inside the delete's transaction, before
    /// the parent row goes.
    fn delete_dependents(_conn: &Connection, _id: RowId) -> Result<usize> {
        Ok(0)
    }
}

/// An id-less shape that inserts into a [`Record`]'s table.
pub trait Insertable {
    type Record: Record;

    fn values(&self) -> Vec<ColumnValue<'_>>;
}

impl Record for Customer {
    const TABLE: &'static TableDef = &schema::CUSTOMERS;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            address: row.get("address")?,
            city: row.get("city")?,
            state: row.get("state")?,
            country: row.get("country")?,
            zipcode: row.get("zipcode")?,
            phone_number: row.get("phone_number")?,
            email_id: row.get("email_id")?,
        })
    }

    fn id(&self) -> RowId {
        self.id
    }

    fn values(&self) -> Vec<ColumnValue<'_>> {
        vec![
            col("first_name", &self.first_name),
            col("last_name", &self.last_name),
            col("address", &self.address),
            col("city", &self.city),
            col("state", &self.state),
            col("country", &self.country),
            col("zipcode", &self.zipcode),
            col("phone_number", &self.phone_number),
            col("email_id", &self.email_id),
        ]
    }
}

impl Insertable for NewCustomer {
    type Record = Customer;

    fn values(&self) -> Vec<ColumnValue<'_>> {
        vec![
            col("first_name", &self.first_name),
            col("last_name", &self.last_name),
            col("address", &self.address),
            col("city", &self.city),
            col("state", &self.state),
            col("country", &self.country),
            col("zipcode", &self.zipcode),
            col("phone_number", &self.phone_number),
            col("email_id", &self.email_id),
        ]
    }
}

impl Record for Payment {
    const TABLE: &'static TableDef = &schema::PAYMENTS;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            customer_id: row.get("customer_id")?,
            payment_type: row.get("payment_type")?,
            expiration_date: row.get("expiration_date")?,
            email_id: row.get("email_id")?,
        })
    }

    fn id(&self) -> RowId {
        self.id
    }

    fn values(&self) -> Vec<ColumnValue<'_>> {
        vec![
            col("customer_id", &self.customer_id),
            col("payment_type", &self.payment_type),
            col("expiration_date", &self.expiration_date),
            col("email_id", &self.email_id),
        ]
    }
}

impl Insertable for NewPayment {
    type Record = Payment;

    fn values(&self) -> Vec<ColumnValue<'_>> {
        vec![
            col("customer_id", &self.customer_id),
            col("payment_type", &self.payment_type),
            col("expiration_date", &self.expiration_date),
            col("email_id", &self.email_id),
        ]
    }
}

impl Record for Product {
    const TABLE: &'static TableDef = &schema::PRODUCTS;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            product_name: row.get("product_name")?,
            product_type: row.get("product_type")?,
            price: row.get("price")?,
        })
    }

    fn id(&self) -> RowId {
        self.id
    }

    fn values(&self) -> Vec<ColumnValue<'_>> {
        vec![
            col("product_name", &self.product_name),
            col("product_type", &self.product_type),
            col("price", &self.price),
        ]
    }

    /// Inventory rows reference products without a store-level cascade.
    fn delete_dependents(conn: &Connection, id: RowId) -> Result<usize> {
        let removed = conn.execute(
            &format!("DELETE FROM {} WHERE product_id = ?1", schema::INVENTORY.name),
            params![id],
        )?;
        Ok(removed)
    }
}

impl Insertable for NewProduct {
    type Record = Product;

    fn values(&self) -> Vec<ColumnValue<'_>> {
        vec![
            col("product_name", &self.product_name),
            col("product_type", &self.product_type),
            col("price", &self.price),
        ]
    }
}

impl Record for Order {
    const TABLE: &'static TableDef = &schema::ORDERS;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            product_id: row.get("product_id")?,
            customer_id: row.get("customer_id")?,
            payment_id: row.get("payment_id")?,
            shipping_address: row.get("shipping_address")?,
            shipping_city: row.get("shipping_city")?,
            shipping_state: row.get("shipping_state")?,
            shipping_country: row.get("shipping_country")?,
            delivered: row.get("delivered")?,
        })
    }

    fn id(&self) -> RowId {
        self.id
    }

    fn values(&self) -> Vec<ColumnValue<'_>> {
        vec![
            col("product_id", &self.product_id),
            col("customer_id", &self.customer_id),
            col("payment_id", &self.payment_id),
            col("shipping_address", &self.shipping_address),
            col("shipping_city", &self.shipping_city),
            col("shipping_state", &self.shipping_state),
            col("shipping_country", &self.shipping_country),
            col("delivered", &self.delivered),
        ]
    }
}

impl Insertable for NewOrder {
    type Record = Order;

    fn values(&self) -> Vec<ColumnValue<'_>> {
        vec![
            col("product_id", &self.product_id),
            col("customer_id", &self.customer_id),
            col("payment_id", &self.payment_id),
            col("shipping_address", &self.shipping_address),
            col("shipping_city", &self.shipping_city),
            col("shipping_state", &self.shipping_state),
            col("shipping_country", &self.shipping_country),
            col("delivered", &self.delivered),
        ]
    }
}

impl Record for Inventory {
    const TABLE: &'static TableDef = &schema::INVENTORY;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            product_id: row.get("product_id")?,
            quantity: row.get("quantity")?,
        })
    }

    fn id(&self) -> RowId {
        self.id
    }

    fn values(&self) -> Vec<ColumnValue<'_>> {
        vec![col("product_id", &self.product_id), col("quantity", &self.quantity)]
    }
}

impl Insertable for NewInventory {
    type Record = Inventory;

    fn values(&self) -> Vec<ColumnValue<'_>> {
        vec![col("product_id", &self.product_id), col("quantity", &self.quantity)]
    }
}

/// Loads every row of `T`'s table, ordered by primary key.
pub fn fetch_all<T: Record>(conn: &Connection) -> Result<Vec<T>> {
    let sql = format!("{} ORDER BY id", select_sql(T::TABLE));
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], T::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    debug!(table = T::TABLE.name, rows = rows.len(), "fetched all rows");
    Ok(rows)
}

/// Loads one row by primary key.
pub fn fetch_one<T: Record>(conn: &Connection, id: RowId) -> Result<Option<T>> {
    let sql = format!("{} WHERE id = ?1", select_sql(T::TABLE));
    let row = conn
        .query_row(&sql, params![id], T::from_row)
        .optional()?;
    Ok(row)
}

/// Loads the rows of `T` whose `column` equals `value`, ordered by id.
///
/// # Errors
///
/// Returns [`StoreError::ConversionError`] if `column` is not declared on
/// `T`'s table.
pub(crate) fn fetch_where<T: Record>(
    conn: &Connection,
    column: &str,
    value: RowId,
) -> Result<Vec<T>> {
    let column = T::TABLE.column(column).ok_or_else(|| {
        StoreError::ConversionError(format!(
            "table {} has no column {column}",
            T::TABLE.name
        ))
    })?;
    let sql = format!(
        "{} WHERE {} = ?1 ORDER BY id",
        select_sql(T::TABLE),
        column.name
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![value], T::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Inserts a row and returns its generated primary key.
pub fn insert<N: Insertable>(conn: &Connection, new: &N) -> Result<RowId> {
    let values = new.values();
    let columns: Vec<&str> = values.iter().map(|(name, _)| *name).collect();
    let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        N::Record::TABLE.name,
        columns.join(", "),
        placeholders.join(", ")
    );
    let params: Vec<&dyn ToSql> = values.iter().map(|(_, value)| *value).collect();
    conn.execute(&sql, params.as_slice())?;
    Ok(conn.last_insert_rowid())
}

/// Overwrites every non-key column of the row with `record`'s id.
///
/// Returns the number of rows changed (0 or 1).
pub fn update<T: Record>(conn: &Connection, record: &T) -> Result<usize> {
    let values = record.values();
    let assignments: Vec<String> = values
        .iter()
        .enumerate()
        .map(|(i, (name, _))| format!("{name} = ?{}", i + 1))
        .collect();
    let sql = format!(
        "UPDATE {} SET {} WHERE id = ?{}",
        T::TABLE.name,
        assignments.join(", "),
        values.len() + 1
    );
    let id = record.id();
    let mut params: Vec<&dyn ToSql> = values.iter().map(|(_, value)| *value).collect();
    params.push(&id);
    Ok(conn.execute(&sql, params.as_slice())?)
}

/// Deletes the row with the given id, after its non-cascading dependents.
///
/// Returns the number of parent rows removed (0 or 1). The caller owns the
/// transaction.
pub fn delete<T: Record>(conn: &Connection, id: RowId) -> Result<usize> {
    let dependents = T::delete_dependents(conn, id)?;
    if dependents > 0 {
        debug!(table = T::TABLE.name, id, dependents, "removed dependent rows");
    }
    let removed = conn.execute(
        &format!("DELETE FROM {} WHERE id = ?1", T::TABLE.name),
        params![id],
    )?;
    Ok(removed)
}

/// Counts the rows in `T`'s table.
pub fn count<T: Record>(conn: &Connection) -> Result<usize> {
    count_table(conn, T::TABLE.name)
}

pub(crate) fn count_table(conn: &Connection, table: &str) -> Result<usize> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })?;
    row_count(table, count)
}

fn row_count(table: &str, count: i64) -> Result<usize> {
    usize::try_from(count).map_err(|_| {
        StoreError::ConversionError(format!("table {table} reported {count} rows"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::generate_create_sql;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        conn.execute_batch(&generate_create_sql(&schema::TABLES))
            .unwrap();
        conn
    }

    fn value_columns(values: Vec<ColumnValue<'_>>) -> BTreeSet<&'static str> {
        values.into_iter().map(|(name, _)| name).collect()
    }

    fn non_key_columns(table: &TableDef) -> BTreeSet<&'static str> {
        table
            .columns
            .iter()
            .filter(|c| !c.primary_key)
            .map(|c| c.name)
            .collect()
    }

    #[test]
    fn test_value_columns_match_descriptors() {
        let customer = NewCustomer::new("John", "Doe", "john.doe@example.com");
        let payment = NewPayment::new(1, "PayPal");
        let product = NewProduct::new("Mouse", 1.0);
        let order = NewOrder::new(1, 1, 1);
        let inventory = NewInventory::new(1, 5);

        assert_eq!(value_columns(Insertable::values(&customer)), non_key_columns(Customer::TABLE));
        assert_eq!(value_columns(Insertable::values(&payment)), non_key_columns(Payment::TABLE));
        assert_eq!(value_columns(Insertable::values(&product)), non_key_columns(Product::TABLE));
        assert_eq!(value_columns(Insertable::values(&order)), non_key_columns(Order::TABLE));
        assert_eq!(value_columns(Insertable::values(&inventory)), non_key_columns(Inventory::TABLE));

        assert_eq!(
            value_columns(Record::values(&customer.clone().with_id(1))),
            non_key_columns(Customer::TABLE)
        );
        assert_eq!(
            value_columns(Record::values(&order.with_id(1))),
            non_key_columns(Order::TABLE)
        );
    }

    #[test]
    fn test_insert_and_fetch_payment_with_date() {
        let conn = conn();
        let customer_id = insert(&conn, &NewCustomer::new("Jane", "Smith", "jane@example.com")).unwrap();
        let expiry = NaiveDate::from_ymd_opt(2026, 6, 30).unwrap();
        let id = insert(
            &conn,
            &NewPayment::new(customer_id, "PayPal").expiring(expiry),
        )
        .unwrap();

        let payment: Payment = fetch_one(&conn, id).unwrap().unwrap();
        assert_eq!(payment.customer_id, customer_id);
        assert_eq!(payment.expiration_date, Some(expiry));
        assert!(payment.email_id.is_none());

        let stored: String = conn
            .query_row("SELECT expiration_date FROM payments", [], |r| r.get(0))
            .unwrap();
        assert_eq!(stored, "2026-06-30");
    }

    #[test]
    fn test_order_delivered_defaults_and_updates() {
        let conn = conn();
        let c = insert(&conn, &NewCustomer::new("A", "B", "a@b.c")).unwrap();
        let p = insert(&conn, &NewProduct::new("Speaker", 50.0)).unwrap();
        let pay = insert(&conn, &NewPayment::new(c, "Card")).unwrap();
        let id = insert(&conn, &NewOrder::new(p, c, pay)).unwrap();

        let mut order: Order = fetch_one(&conn, id).unwrap().unwrap();
        assert!(!order.delivered);

        order.delivered = true;
        assert_eq!(update(&conn, &order).unwrap(), 1);
        let reloaded: Order = fetch_one(&conn, id).unwrap().unwrap();
        assert!(reloaded.delivered);
    }

    #[test]
    fn test_fetch_all_orders_by_id_and_counts() {
        let conn = conn();
        for name in ["a", "b", "c"] {
            insert(&conn, &NewProduct::new(name, 1.0)).unwrap();
        }
        let products: Vec<Product> = fetch_all(&conn).unwrap();
        let names: Vec<_> = products.iter().map(|p| p.product_name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(count::<Product>(&conn).unwrap(), 3);
        assert_eq!(count::<Customer>(&conn).unwrap(), 0);
    }

    #[test]
    fn test_negative_row_count_is_rejected() {
        assert_eq!(row_count("orders", 3).unwrap(), 3);
        assert!(matches!(
            row_count("orders", -1),
            Err(StoreError::ConversionError(_))
        ));
    }

    #[test]
    fn test_fetch_where_rejects_unknown_column() {
        let conn = conn();
        assert!(fetch_where::<Order>(&conn, "customer_id", 1).unwrap().is_empty());
        assert!(fetch_where::<Order>(&conn, "id; DROP TABLE orders", 1).is_err());
    }

    #[test]
    fn test_update_missing_row_changes_nothing() {
        let conn = conn();
        let ghost = NewProduct::new("Ghost", 1.0).with_id(42);
        assert_eq!(update(&conn, &ghost).unwrap(), 0);
    }

    #[test]
    fn test_delete_product_removes_inventory_first() {
        let conn = conn();
        let p = insert(&conn, &NewProduct::new("Mouse", 25.99)).unwrap();
        insert(&conn, &NewInventory::new(p, 10)).unwrap();
        insert(&conn, &NewInventory::new(p, 4)).unwrap();

        // Without the application-level cascade the store refuses.
        assert!(conn.execute("DELETE FROM products WHERE id = ?1", [p]).is_err());

        assert_eq!(delete::<Product>(&conn, p).unwrap(), 1);
        assert_eq!(count::<Inventory>(&conn).unwrap(), 0);
    }
}
