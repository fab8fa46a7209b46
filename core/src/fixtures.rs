//! The fixed demonstration dataset.
//!
//! Child fixtures refer to their parents by position in the parent list
//! rather than by primary key, so the loader can wire them to whatever ids
//! the store hands out.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{NewCustomer, NewOrder, NewPayment, NewProduct, RowId};

/// A payment whose owning customer is given by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentFixture {
    /// Index into [`Fixtures::customers`].
    pub customer: usize,
    pub payment_type: String,
    pub expiration_date: NaiveDate,
    pub email_id: String,
}

impl PaymentFixture {
    /// Builds the insertable payment once customer ids are known.
    ///
    /// Returns `None` if the referenced position has no id.
    pub fn resolve(&self, customer_ids: &[RowId]) -> Option<NewPayment> {
        let customer_id = *customer_ids.get(self.customer)?;
        Some(
            NewPayment::new(customer_id, self.payment_type.clone())
                .expiring(self.expiration_date)
                .with_email(self.email_id.clone()),
        )
    }
}

/// An order whose product, customer, and payment are given by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderFixture {
    pub product: usize,
    pub customer: usize,
    pub payment: usize,
    pub shipping_address: String,
    pub shipping_city: String,
    pub shipping_state: String,
    pub shipping_country: String,
    pub delivered: bool,
}

impl OrderFixture {
    /// Builds the insertable order once parent ids are known.
    pub fn resolve(
        &self,
        product_ids: &[RowId],
        customer_ids: &[RowId],
        payment_ids: &[RowId],
    ) -> Option<NewOrder> {
        let mut order = NewOrder::new(
            *product_ids.get(self.product)?,
            *customer_ids.get(self.customer)?,
            *payment_ids.get(self.payment)?,
        )
        .ship_to(
            self.shipping_address.clone(),
            self.shipping_city.clone(),
            self.shipping_state.clone(),
            self.shipping_country.clone(),
        );
        order.delivered = self.delivered;
        Some(order)
    }
}

/// A complete fixture dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixtures {
    pub customers: Vec<NewCustomer>,
    pub payments: Vec<PaymentFixture>,
    pub products: Vec<NewProduct>,
    pub orders: Vec<OrderFixture>,
}

impl Fixtures {
    /// The standard dataset: 3 customers, one payment each, 2 products, and
    /// 3 undelivered orders cycling through the products.
    ///
    /// # Examples
    ///
    /// ```
    /// use storefront_core::Fixtures;
    ///
    /// let fixtures = Fixtures::standard();
    /// assert_eq!(fixtures.customers.len(), 3);
    /// assert_eq!(fixtures.payments.len(), 3);
    /// assert_eq!(fixtures.products.len(), 2);
    /// assert_eq!(fixtures.orders.len(), 3);
    /// ```
    pub fn standard() -> Self {
        let customers = vec![
            NewCustomer::new("John", "Doe", "john.doe@example.com")
                .with_address("123 Elm St", "New York", "NY", "USA", "10001")
                .with_phone("555-123-4567"),
            NewCustomer::new("Jane", "Smith", "jane.smith@example.com")
                .with_address("456 Oak St", "Los Angeles", "CA", "USA", "90001")
                .with_phone("555-987-6543"),
            NewCustomer::new("Emily", "Clark", "emily.clark@example.com")
                .with_address("789 Pine St", "Chicago", "IL", "USA", "60601")
                .with_phone("555-456-7890"),
        ];

        let payment_plans = [
            ("Credit Card", (2025, 12, 31)),
            ("PayPal", (2026, 6, 30)),
            ("Debit Card", (2025, 11, 30)),
        ];
        let payments = customers
            .iter()
            .zip(payment_plans)
            .enumerate()
            .filter_map(|(pos, (customer, (kind, (y, m, d))))| {
                Some(PaymentFixture {
                    customer: pos,
                    payment_type: kind.to_string(),
                    expiration_date: NaiveDate::from_ymd_opt(y, m, d)?,
                    email_id: customer.email_id.clone(),
                })
            })
            .collect();

        let products = vec![
            NewProduct::new("Wireless Mouse", 25.99).of_type("Electronics"),
            NewProduct::new("Bluetooth Speaker", 50.00).of_type("Electronics"),
        ];

        let orders = customers
            .iter()
            .enumerate()
            .map(|(pos, customer)| OrderFixture {
                product: pos % products.len(),
                customer: pos,
                payment: pos,
                shipping_address: customer.address.clone().unwrap_or_default(),
                shipping_city: customer.city.clone().unwrap_or_default(),
                shipping_state: customer.state.clone().unwrap_or_default(),
                shipping_country: customer.country.clone().unwrap_or_default(),
                delivered: false,
            })
            .collect();

        Self {
            customers,
            payments,
            products,
            orders,
        }
    }
}
