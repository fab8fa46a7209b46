//! Plain-text listing of the store's contents.
//!
//! A [`Report`] has one [`Section`] per entity, each read through its own
//! read-only connection. A section that cannot be read is logged and left
//! empty; the other sections still print.

use std::fmt;

use storefront_core::{Customer, Order, Payment, Product};
use tracing::error;

use crate::convert::{self, Record};
use crate::store::Store;

/// An entity that can be listed in a [`Report`].
pub trait ReportLine: Record {
    /// Section heading, printed followed by a colon.
    const TITLE: &'static str;

    fn report_line(&self) -> String;
}

impl ReportLine for Customer {
    const TITLE: &'static str = "Customers";

    fn report_line(&self) -> String {
        format!("{} {} - {}", self.first_name, self.last_name, self.email_id)
    }
}

impl ReportLine for Product {
    const TITLE: &'static str = "Products";

    fn report_line(&self) -> String {
        format!("{} - ${:.2}", self.product_name, self.price)
    }
}

impl ReportLine for Order {
    const TITLE: &'static str = "Orders";

    fn report_line(&self) -> String {
        format!(
            "Order ID: {}, Product ID: {}, Customer ID: {}",
            self.id, self.product_id, self.customer_id
        )
    }
}

impl ReportLine for Payment {
    const TITLE: &'static str = "Payments";

    fn report_line(&self) -> String {
        format!(
            "Payment ID: {}, Customer ID: {}, Type: {}",
            self.id,
            self.customer_id,
            self.payment_type.as_deref().unwrap_or("None")
        )
    }
}

/// One titled block of a [`Report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: &'static str,
    pub lines: Vec<String>,
    /// Why the section is empty, if reading it failed.
    pub error: Option<String>,
}

/// Reads every row of `T` and renders its lines.
pub fn section<T: ReportLine>(store: &Store) -> Section {
    match store.with_read_only(|conn| convert::fetch_all::<T>(conn)) {
        Ok(rows) => Section {
            title: T::TITLE,
            lines: rows.iter().map(T::report_line).collect(),
            error: None,
        },
        Err(err) => {
            error!(section = T::TITLE, error = %err, "failed to read section");
            Section {
                title: T::TITLE,
                lines: Vec::new(),
                error: Some(err.to_string()),
            }
        }
    }
}

/// Customers, products, orders and payments, in that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub sections: Vec<Section>,
}

impl Report {
    pub fn is_complete(&self) -> bool {
        self.sections.iter().all(|s| s.error.is_none())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            writeln!(f, "{}:", section.title)?;
            for line in &section.lines {
                writeln!(f, "{line}")?;
            }
        }
        Ok(())
    }
}

pub fn build_report(store: &Store) -> Report {
    Report {
        sections: vec![
            section::<Customer>(store),
            section::<Product>(store),
            section::<Order>(store),
            section::<Payment>(store),
        ],
    }
}
