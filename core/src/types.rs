//! Entity type definitions for the storefront data model.
//!
//! Each table has two shapes: a persisted record carrying its primary key
//! (e.g. [`Customer`]) and an insertable shape without one
//! (e.g. [`NewCustomer`]). Relationships are plain foreign-key fields; there
//! are no back-references.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Primary key type shared by every table.
pub type RowId = i64;

/// A customer row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: RowId,
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub zipcode: Option<String>,
    pub phone_number: Option<String>,
    /// Unique across all customers.
    pub email_id: String,
}

impl Customer {
    /// Returns `"{first_name} {last_name}"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use storefront_core::NewCustomer;
    ///
    /// let customer = NewCustomer::new("John", "Doe", "john.doe@example.com").with_id(1);
    /// assert_eq!(customer.full_name(), "John Doe");
    /// ```
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Insertable shape of [`Customer`].
///
/// # Examples
///
/// ```
/// use storefront_core::NewCustomer;
///
/// let customer = NewCustomer::new("Jane", "Smith", "jane.smith@example.com")
///     .with_address("456 Oak St", "Los Angeles", "CA", "USA", "90001")
///     .with_phone("555-987-6543");
/// assert_eq!(customer.city.as_deref(), Some("Los Angeles"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub zipcode: Option<String>,
    pub phone_number: Option<String>,
    pub email_id: String,
}

impl NewCustomer {
    /// Creates a customer with only the required fields set.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email_id: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            address: None,
            city: None,
            state: None,
            country: None,
            zipcode: None,
            phone_number: None,
            email_id: email_id.into(),
        }
    }

    /// Sets the postal address fields.
    pub fn with_address(
        mut self,
        address: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        country: impl Into<String>,
        zipcode: impl Into<String>,
    ) -> Self {
        self.address = Some(address.into());
        self.city = Some(city.into());
        self.state = Some(state.into());
        self.country = Some(country.into());
        self.zipcode = Some(zipcode.into());
        self
    }

    /// Sets the phone number.
    pub fn with_phone(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    /// Attaches a primary key, producing the persisted shape.
    pub fn with_id(self, id: RowId) -> Customer {
        Customer {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            address: self.address,
            city: self.city,
            state: self.state,
            country: self.country,
            zipcode: self.zipcode,
            phone_number: self.phone_number,
            email_id: self.email_id,
        }
    }
}

/// A stored payment method belonging to a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: RowId,
    pub customer_id: RowId,
    pub payment_type: Option<String>,
    pub expiration_date: Option<NaiveDate>,
    pub email_id: Option<String>,
}

/// Insertable shape of [`Payment`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPayment {
    pub customer_id: RowId,
    pub payment_type: Option<String>,
    pub expiration_date: Option<NaiveDate>,
    pub email_id: Option<String>,
}

impl NewPayment {
    pub fn new(customer_id: RowId, payment_type: impl Into<String>) -> Self {
        Self {
            customer_id,
            payment_type: Some(payment_type.into()),
            expiration_date: None,
            email_id: None,
        }
    }

    pub fn expiring(mut self, date: NaiveDate) -> Self {
        self.expiration_date = Some(date);
        self
    }

    pub fn with_email(mut self, email_id: impl Into<String>) -> Self {
        self.email_id = Some(email_id.into());
        self
    }

    pub fn with_id(self, id: RowId) -> Payment {
        Payment {
            id,
            customer_id: self.customer_id,
            payment_type: self.payment_type,
            expiration_date: self.expiration_date,
            email_id: self.email_id,
        }
    }
}

/// A product in the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: RowId,
    pub product_name: String,
    pub product_type: Option<String>,
    /// Unit price. Assumed non-negative; not enforced by the store.
    pub price: f64,
}

/// Insertable shape of [`Product`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub product_name: String,
    pub product_type: Option<String>,
    pub price: f64,
}

impl NewProduct {
    pub fn new(product_name: impl Into<String>, price: f64) -> Self {
        Self {
            product_name: product_name.into(),
            product_type: None,
            price,
        }
    }

    pub fn of_type(mut self, product_type: impl Into<String>) -> Self {
        self.product_type = Some(product_type.into());
        self
    }

    pub fn with_id(self, id: RowId) -> Product {
        Product {
            id,
            product_name: self.product_name,
            product_type: self.product_type,
            price: self.price,
        }
    }
}

/// An order placed by a customer for a single product.
///
/// All three foreign keys are required; deleting the referenced customer,
/// product, or payment deletes the order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: RowId,
    pub product_id: RowId,
    pub customer_id: RowId,
    pub payment_id: RowId,
    pub shipping_address: Option<String>,
    pub shipping_city: Option<String>,
    pub shipping_state: Option<String>,
    pub shipping_country: Option<String>,
    pub delivered: bool,
}

/// Insertable shape of [`Order`].
///
/// # Examples
///
/// ```
/// use storefront_core::NewOrder;
///
/// let order = NewOrder::new(1, 2, 3).ship_to("123 Elm St", "New York", "NY", "USA");
/// assert_eq!(order.product_id, 1);
/// assert_eq!(order.customer_id, 2);
/// assert_eq!(order.payment_id, 3);
/// assert!(!order.delivered);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    pub product_id: RowId,
    pub customer_id: RowId,
    pub payment_id: RowId,
    pub shipping_address: Option<String>,
    pub shipping_city: Option<String>,
    pub shipping_state: Option<String>,
    pub shipping_country: Option<String>,
    pub delivered: bool,
}

impl NewOrder {
    pub fn new(product_id: RowId, customer_id: RowId, payment_id: RowId) -> Self {
        Self {
            product_id,
            customer_id,
            payment_id,
            shipping_address: None,
            shipping_city: None,
            shipping_state: None,
            shipping_country: None,
            delivered: false,
        }
    }

    /// Sets the shipping destination.
    pub fn ship_to(
        mut self,
        address: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        self.shipping_address = Some(address.into());
        self.shipping_city = Some(city.into());
        self.shipping_state = Some(state.into());
        self.shipping_country = Some(country.into());
        self
    }

    pub fn with_id(self, id: RowId) -> Order {
        Order {
            id,
            product_id: self.product_id,
            customer_id: self.customer_id,
            payment_id: self.payment_id,
            shipping_address: self.shipping_address,
            shipping_city: self.shipping_city,
            shipping_state: self.shipping_state,
            shipping_country: self.shipping_country,
            delivered: self.delivered,
        }
    }
}

/// Stock level for a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub id: RowId,
    pub product_id: RowId,
    pub quantity: i64,
}

/// Insertable shape of [`Inventory`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInventory {
    pub product_id: RowId,
    pub quantity: i64,
}

impl NewInventory {
    pub fn new(product_id: RowId, quantity: i64) -> Self {
        Self {
            product_id,
            quantity,
        }
    }

    pub fn with_id(self, id: RowId) -> Inventory {
        Inventory {
            id,
            product_id: self.product_id,
            quantity: self.quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_customer_defaults_optional_fields() {
        let customer = NewCustomer::new("Emily", "Clark", "emily.clark@example.com");
        assert!(customer.address.is_none());
        assert!(customer.phone_number.is_none());
        assert_eq!(customer.email_id, "emily.clark@example.com");
    }

    #[test]
    fn test_with_id_preserves_fields() {
        let payment = NewPayment::new(7, "PayPal")
            .expiring(NaiveDate::from_ymd_opt(2026, 6, 30).unwrap())
            .with_email("jane.smith@example.com")
            .with_id(3);
        assert_eq!(payment.id, 3);
        assert_eq!(payment.customer_id, 7);
        assert_eq!(payment.payment_type.as_deref(), Some("PayPal"));
        assert_eq!(
            payment.expiration_date,
            NaiveDate::from_ymd_opt(2026, 6, 30)
        );
    }

    #[test]
    fn test_new_product_without_type() {
        let product = NewProduct::new("Wireless Mouse", 25.99);
        assert!(product.product_type.is_none());
        assert_eq!(product.with_id(1).price, 25.99);
    }
}
