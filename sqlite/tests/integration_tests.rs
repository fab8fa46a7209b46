//! Integration tests for the storefront-sqlite crate.

use chrono::NaiveDate;
use rusqlite::Connection;
use storefront_core::{
    Customer, Inventory, NewCustomer, NewInventory, NewOrder, NewPayment, NewProduct, Order,
    Payment, Product,
};
use storefront_db::DatabaseUrl;
use storefront_sqlite::{
    ConstraintKind, Migration, ShopQuery, Store, StoreError, build_report, seed_standard,
};

/// Helper to open an in-memory database at head.
fn setup_connection() -> Connection {
    let mut migration = Migration::new(Connection::open_in_memory().unwrap()).unwrap();
    migration.upgrade().unwrap();
    migration.into_connection()
}

/// Helper to build a file-backed store at head inside `dir`.
fn setup_store(dir: &tempfile::TempDir) -> Store {
    let store = Store::new(DatabaseUrl::File(dir.path().join("database.db")));
    Migration::new(store.open().unwrap())
        .unwrap()
        .upgrade()
        .unwrap();
    store
}

fn john() -> NewCustomer {
    NewCustomer::new("John", "Doe", "john.doe@example.com")
        .with_address("123 Elm St", "New York", "NY", "USA", "10001")
}

/// Inserts one customer with a payment and an order for a product.
/// Returns (customer, product, payment, order) ids.
fn one_order(query: &ShopQuery<'_>) -> (i64, i64, i64, i64) {
    let customer = query.insert(&john()).unwrap();
    let product = query
        .insert(&NewProduct::new("Wireless Mouse", 25.99).of_type("Electronics"))
        .unwrap();
    let payment = query
        .insert(
            &NewPayment::new(customer, "Credit Card")
                .expiring(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()),
        )
        .unwrap();
    let order = query
        .insert(&NewOrder::new(product, customer, payment))
        .unwrap();
    (customer, product, payment, order)
}

// =============================================================================
// Migration Lifecycle Tests
// =============================================================================

#[test]
fn test_migration_lifecycle_on_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = setup_store(&dir);

    let mut migration = Migration::new(store.open().unwrap()).unwrap();
    let status = migration.status().unwrap();
    assert!(status.tables_exist);
    assert_eq!(status.current.as_deref(), Some("c95b919d1818"));

    assert!(migration.upgrade().is_err());

    migration.downgrade().unwrap();
    let status = migration.status().unwrap();
    assert!(!status.tables_exist);
    assert_eq!(status.current, None);
}

#[test]
fn test_revision_persists_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let store = setup_store(&dir);
    let migration = Migration::new(store.open().unwrap()).unwrap();
    assert_eq!(migration.current().unwrap().as_deref(), Some("c95b919d1818"));
}

// =============================================================================
// Constraint Tests
// =============================================================================

#[test]
fn test_duplicate_email_rejected() {
    let conn = setup_connection();
    let query = ShopQuery::new(&conn).unwrap();
    query.insert(&john()).unwrap();

    let err = query
        .insert(&NewCustomer::new("Johnny", "Doe", "john.doe@example.com"))
        .unwrap_err();
    assert_eq!(err.constraint(), Some(ConstraintKind::Unique));
    assert_eq!(query.count::<Customer>().unwrap(), 1);
}

#[test]
fn test_dangling_foreign_key_rejected() {
    let conn = setup_connection();
    let query = ShopQuery::new(&conn).unwrap();
    let customer = query.insert(&john()).unwrap();
    let product = query.insert(&NewProduct::new("Wireless Mouse", 25.99)).unwrap();

    let err = query
        .insert(&NewOrder::new(product, customer, 42))
        .unwrap_err();
    assert_eq!(err.constraint(), Some(ConstraintKind::ForeignKey));
    assert_eq!(query.count::<Order>().unwrap(), 0);

    let err = query.insert(&NewInventory::new(99, 5)).unwrap_err();
    assert_eq!(err.constraint(), Some(ConstraintKind::ForeignKey));
}

#[test]
fn test_order_with_missing_product_rejected() {
    let conn = setup_connection();
    let query = ShopQuery::new(&conn).unwrap();
    let customer = query.insert(&john()).unwrap();
    let payment = query
        .insert(&NewPayment::new(customer, "Credit Card"))
        .unwrap();

    let err = query
        .insert(&NewOrder::new(999, customer, payment))
        .unwrap_err();
    assert_eq!(err.constraint(), Some(ConstraintKind::ForeignKey));
    assert_eq!(query.count::<Order>().unwrap(), 0);
}

#[test]
fn test_string_bounds_enforced() {
    let conn = setup_connection();
    let query = ShopQuery::new(&conn).unwrap();

    let long_name = "x".repeat(46);
    let err = query
        .insert(&NewCustomer::new(long_name, "Doe", "x@example.com"))
        .unwrap_err();
    assert_eq!(err.constraint(), Some(ConstraintKind::Check));

    let fits = "x".repeat(45);
    assert!(query
        .insert(&NewCustomer::new(fits, "Doe", "x@example.com"))
        .is_ok());
}

// =============================================================================
// Cascade Tests
// =============================================================================

#[test]
fn test_deleting_customer_cascades_to_payments_and_orders() {
    let conn = setup_connection();
    let query = ShopQuery::new(&conn).unwrap();
    let (customer, product, _, _) = one_order(&query);

    query.delete::<Customer>(customer).unwrap();

    assert_eq!(query.count::<Payment>().unwrap(), 0);
    assert_eq!(query.count::<Order>().unwrap(), 0);
    assert!(query.get::<Product>(product).unwrap().is_some());
}

#[test]
fn test_deleting_payment_cascades_to_orders() {
    let conn = setup_connection();
    let query = ShopQuery::new(&conn).unwrap();
    let (customer, _, payment, _) = one_order(&query);

    query.delete::<Payment>(payment).unwrap();

    assert!(query.orders_for_customer(customer).unwrap().is_empty());
    assert!(query.get::<Customer>(customer).unwrap().is_some());
}

#[test]
fn test_deleting_product_removes_orders_and_inventory() {
    let conn = setup_connection();
    let query = ShopQuery::new(&conn).unwrap();
    let (customer, product, payment, _) = one_order(&query);
    query.insert(&NewInventory::new(product, 12)).unwrap();

    query.delete::<Product>(product).unwrap();

    assert_eq!(query.count::<Order>().unwrap(), 0);
    assert_eq!(query.count::<Inventory>().unwrap(), 0);
    assert!(query.get::<Customer>(customer).unwrap().is_some());
    assert!(query.get::<Payment>(payment).unwrap().is_some());
}

// =============================================================================
// Typed Access Tests
// =============================================================================

#[test]
fn test_order_links_customer_and_payment() {
    let conn = setup_connection();
    let query = ShopQuery::new(&conn).unwrap();
    let (customer_id, product_id, payment_id, order_id) = one_order(&query);

    let customer: Customer = query.get(customer_id).unwrap().unwrap();
    let product: Product = query.get(product_id).unwrap().unwrap();
    let payment: Payment = query.get(payment_id).unwrap().unwrap();
    let order: Order = query.get(order_id).unwrap().unwrap();

    assert_eq!(customer.full_name(), "John Doe");
    assert_eq!(order.customer_id, customer.id);
    assert_eq!(customer.id, payment.customer_id);
    assert_eq!(order.payment_id, payment.id);
    assert_eq!(order.product_id, product.id);
}

#[test]
fn test_relationship_queries() {
    let conn = setup_connection();
    let query = ShopQuery::new(&conn).unwrap();
    let (customer, product, payment, order) = one_order(&query);

    let payments = query.payments_for_customer(customer).unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].id, payment);
    assert_eq!(
        payments[0].expiration_date,
        NaiveDate::from_ymd_opt(2025, 12, 31)
    );

    let orders = query.orders_for_product(product).unwrap();
    assert_eq!(orders.iter().map(|o| o.id).collect::<Vec<_>>(), vec![order]);
    assert!(!orders[0].delivered);
}

#[test]
fn test_update_marks_order_delivered() {
    let conn = setup_connection();
    let query = ShopQuery::new(&conn).unwrap();
    let (_, _, _, order) = one_order(&query);

    let mut row: Order = query.get(order).unwrap().unwrap();
    row.delivered = true;
    row.shipping_city = Some("Boston".to_string());
    query.update(&row).unwrap();

    let reloaded: Order = query.get(order).unwrap().unwrap();
    assert_eq!(reloaded, row);
}

#[test]
fn test_missing_rows_report_not_found() {
    let conn = setup_connection();
    let query = ShopQuery::new(&conn).unwrap();
    assert!(query.get::<Customer>(1).unwrap().is_none());
    let err = query.delete::<Customer>(1).unwrap_err();
    assert!(matches!(err, StoreError::RowNotFound { table: "customers", id: 1 }));
}

// =============================================================================
// Seed and Report Tests
// =============================================================================

#[test]
fn test_seed_is_repeatable() {
    let dir = tempfile::tempdir().unwrap();
    let store = setup_store(&dir);

    for _ in 0..2 {
        store.with_connection(|conn| seed_standard(conn)).unwrap();
    }

    let conn = store.open().unwrap();
    let query = ShopQuery::new(&conn).unwrap();
    assert_eq!(query.count::<Customer>().unwrap(), 3);
    assert_eq!(query.count::<Payment>().unwrap(), 3);
    assert_eq!(query.count::<Product>().unwrap(), 2);
    assert_eq!(query.count::<Order>().unwrap(), 3);

    let jane = query
        .customer_by_email("jane.smith@example.com")
        .unwrap()
        .unwrap();
    assert_eq!(jane.city.as_deref(), Some("Los Angeles"));
}

#[test]
fn test_report_after_seed() {
    let dir = tempfile::tempdir().unwrap();
    let store = setup_store(&dir);
    store.with_connection(|conn| seed_standard(conn)).unwrap();

    let expected = "\
Customers:
John Doe - john.doe@example.com
Jane Smith - jane.smith@example.com
Emily Clark - emily.clark@example.com
Products:
Wireless Mouse - $25.99
Bluetooth Speaker - $50.00
Orders:
Order ID: 1, Product ID: 1, Customer ID: 1
Order ID: 2, Product ID: 2, Customer ID: 2
Order ID: 3, Product ID: 1, Customer ID: 3
Payments:
Payment ID: 1, Customer ID: 1, Type: Credit Card
Payment ID: 2, Customer ID: 2, Type: PayPal
Payment ID: 3, Customer ID: 3, Type: Debit Card
";
    assert_eq!(build_report(&store).to_string(), expected);
}

#[test]
fn test_report_on_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = setup_store(&dir);
    let report = build_report(&store);
    assert!(report.is_complete());
    assert!(report.sections.iter().all(|s| s.lines.is_empty()));
}
