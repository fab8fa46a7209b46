//! SQLite backend for the storefront data layer.
//!
//! Renders the table descriptors from [`storefront_core::schema`] into
//! DDL, versions the schema with a revision chain, maps rows to the entity
//! types, seeds the demo dataset, and prints a plain-text report.
//!
//! # Architecture
//!
//! - **`store`**: the [`Store`] handle that opens connections
//! - **`schema`**: DDL generation from table descriptors
//! - **`migration`**: revision chain (upgrade/downgrade/history/status)
//! - **`convert`**: generic row mapping via [`Record`] and [`Insertable`]
//! - **`query`**: typed CRUD over a connection
//! - **`seed`**: transactional fixture loading
//! - **`report`**: per-entity listing
//!
//! # Quick start
//!
//! ```no_run
//! use storefront_db::DatabaseUrl;
//! use storefront_sqlite::{Migration, Store, build_report, seed_standard};
//!
//! let store = Store::new(DatabaseUrl::parse("sqlite:///app/database.db").unwrap());
//!
//! Migration::new(store.open().unwrap()).unwrap().upgrade().unwrap();
//! seed_standard(&mut store.open().unwrap()).unwrap();
//!
//! print!("{}", build_report(&store));
//! ```

mod convert;
mod error;
mod migration;
mod query;
mod report;
mod schema;
mod seed;
mod store;

pub use convert::{ColumnValue, Insertable, Record};
pub use error::{ConstraintKind, Result, StoreError};
pub use migration::{
    HistoryEntry, INITIAL, Migration, MigrationStatus, Revision, TableStatus, VERSION_TABLE, head,
    revisions,
};
pub use query::ShopQuery;
pub use report::{Report, ReportLine, Section, build_report, section};
pub use schema::{
    generate_create_sql, generate_drop_sql, render_create_index, render_create_table,
    render_drop_index, render_drop_table,
};
pub use seed::{SeedReport, seed, seed_standard};
pub use store::Store;
