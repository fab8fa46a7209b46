//! Core types for the storefront data layer.
//!
//! This crate defines the pieces every backend shares:
//!
//! - Entity records and their insertable shapes: [`Customer`],
//!   [`Payment`], [`Product`], [`Order`], [`Inventory`].
//! - [`schema`]: table descriptors (column types, nullability, unique and
//!   foreign-key constraints), listed parents-first in [`schema::TABLES`].
//! - [`Fixtures`]: the fixed demonstration dataset used by the seed loader.
//!
//! # Example
//!
//! ```
//! use storefront_core::*;
//!
//! let customer = NewCustomer::new("John", "Doe", "john.doe@example.com");
//! let order = NewOrder::new(1, 1, 1);
//! assert!(!order.delivered);
//!
//! let orders = schema::table("orders").unwrap();
//! assert_eq!(orders.foreign_keys().count(), 3);
//! assert_eq!(customer.with_id(1).full_name(), "John Doe");
//! ```

mod fixtures;
pub mod schema;
mod types;

pub use fixtures::{Fixtures, OrderFixture, PaymentFixture};
pub use types::*;
