//! Declarative table descriptors for the storefront schema.
//!
//! The descriptors are the single source of truth for column names, semantic
//! types, nullability, and uniqueness/foreign-key constraints. The SQLite
//! backend renders its DDL from them and derives its SELECT column lists
//! from them, so the migration and the access layer cannot drift apart.
//!
//! # Dependency order
//!
//! [`TABLES`] lists tables parents-first: customers, products, payments,
//! orders, inventory. Creation follows this order; dropping reverses it.
//!
//! # Examples
//!
//! ```
//! use storefront_core::schema::{self, ColumnType};
//!
//! let customers = schema::table("customers").unwrap();
//! let email = customers.column("email_id").unwrap();
//! assert!(email.unique);
//! assert!(!email.nullable);
//! assert_eq!(email.ty, ColumnType::String(100));
//! ```

/// Semantic column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// 64-bit signed integer.
    Integer,
    /// UTF-8 string with a maximum length in characters.
    String(usize),
    /// Double-precision floating point.
    Float,
    /// Calendar date without time zone.
    Date,
    /// True/false flag.
    Boolean,
}

/// Action applied to child rows when the referenced parent row is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    /// The store deletes child rows along with the parent.
    Cascade,
    /// The store rejects the parent delete while children exist; any
    /// cascade has to be carried out by the application.
    NoAction,
}

/// Foreign-key reference from a column to another table's `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    pub table: &'static str,
    pub column: &'static str,
    pub on_delete: OnDelete,
}

/// Descriptor for a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub ty: ColumnType,
    pub nullable: bool,
    pub unique: bool,
    pub primary_key: bool,
    /// SQL literal used when an insert omits the column.
    pub default: Option<&'static str>,
    pub references: Option<ForeignKey>,
}

impl ColumnDef {
    /// Auto-generated integer primary key.
    pub const fn primary_key(name: &'static str) -> Self {
        Self {
            name,
            ty: ColumnType::Integer,
            nullable: false,
            unique: false,
            primary_key: true,
            default: None,
            references: None,
        }
    }

    /// Non-nullable column.
    pub const fn required(name: &'static str, ty: ColumnType) -> Self {
        Self {
            name,
            ty,
            nullable: false,
            unique: false,
            primary_key: false,
            default: None,
            references: None,
        }
    }

    /// Nullable column.
    pub const fn optional(name: &'static str, ty: ColumnType) -> Self {
        Self {
            nullable: true,
            ..Self::required(name, ty)
        }
    }

    pub const fn unique(self) -> Self {
        Self {
            unique: true,
            ..self
        }
    }

    pub const fn default_value(self, literal: &'static str) -> Self {
        Self {
            default: Some(literal),
            ..self
        }
    }

    /// Marks the column as a foreign key to `table.id`.
    pub const fn references(self, table: &'static str, on_delete: OnDelete) -> Self {
        Self {
            references: Some(ForeignKey {
                table,
                column: "id",
                on_delete,
            }),
            ..self
        }
    }
}

/// Descriptor for a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDef {
    pub name: &'static str,
    /// Columns in declaration order; the primary key comes first.
    pub columns: &'static [ColumnDef],
}

impl TableDef {
    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    /// Name of the secondary index on the primary key (`ix_{table}_id`).
    pub fn id_index_name(&self) -> String {
        format!("ix_{}_id", self.name)
    }

    /// Columns that reference another table.
    pub fn foreign_keys(&self) -> impl Iterator<Item = (&ColumnDef, &ForeignKey)> {
        self.columns
            .iter()
            .filter_map(|c| c.references.as_ref().map(|fk| (c, fk)))
    }
}

pub const CUSTOMERS: TableDef = TableDef {
    name: "customers",
    columns: &[
        ColumnDef::primary_key("id"),
        ColumnDef::required("first_name", ColumnType::String(45)),
        ColumnDef::required("last_name", ColumnType::String(45)),
        ColumnDef::optional("address", ColumnType::String(200)),
        ColumnDef::optional("city", ColumnType::String(45)),
        ColumnDef::optional("state", ColumnType::String(45)),
        ColumnDef::optional("country", ColumnType::String(45)),
        ColumnDef::optional("zipcode", ColumnType::String(10)),
        ColumnDef::optional("phone_number", ColumnType::String(15)),
        ColumnDef::required("email_id", ColumnType::String(100)).unique(),
    ],
};

pub const PRODUCTS: TableDef = TableDef {
    name: "products",
    columns: &[
        ColumnDef::primary_key("id"),
        ColumnDef::required("product_name", ColumnType::String(200)),
        ColumnDef::optional("product_type", ColumnType::String(45)),
        ColumnDef::required("price", ColumnType::Float),
    ],
};

pub const PAYMENTS: TableDef = TableDef {
    name: "payments",
    columns: &[
        ColumnDef::primary_key("id"),
        ColumnDef::required("customer_id", ColumnType::Integer)
            .references("customers", OnDelete::Cascade),
        ColumnDef::optional("payment_type", ColumnType::String(45)),
        ColumnDef::optional("expiration_date", ColumnType::Date),
        ColumnDef::optional("email_id", ColumnType::String(100)),
    ],
};

pub const ORDERS: TableDef = TableDef {
    name: "orders",
    columns: &[
        ColumnDef::primary_key("id"),
        ColumnDef::required("product_id", ColumnType::Integer)
            .references("products", OnDelete::Cascade),
        ColumnDef::required("customer_id", ColumnType::Integer)
            .references("customers", OnDelete::Cascade),
        ColumnDef::required("payment_id", ColumnType::Integer)
            .references("payments", OnDelete::Cascade),
        ColumnDef::optional("shipping_address", ColumnType::String(100)),
        ColumnDef::optional("shipping_city", ColumnType::String(100)),
        ColumnDef::optional("shipping_state", ColumnType::String(2)),
        ColumnDef::optional("shipping_country", ColumnType::String(45)),
        ColumnDef::required("delivered", ColumnType::Boolean).default_value("0"),
    ],
};

pub const INVENTORY: TableDef = TableDef {
    name: "inventory",
    columns: &[
        ColumnDef::primary_key("id"),
        // Product deletes clear inventory in the application, not the store.
        ColumnDef::required("product_id", ColumnType::Integer)
            .references("products", OnDelete::NoAction),
        ColumnDef::required("quantity", ColumnType::Integer),
    ],
};

/// All tables, parents before children.
pub const TABLES: [&TableDef; 5] = [&CUSTOMERS, &PRODUCTS, &PAYMENTS, &ORDERS, &INVENTORY];

/// Looks up a table descriptor by name.
pub fn table(name: &str) -> Option<&'static TableDef> {
    TABLES.iter().copied().find(|t| t.name == name)
}
