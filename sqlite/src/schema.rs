//! SQLite DDL rendering from the table descriptors in
//! [`storefront_core::schema`].
//!
//! Statements are rendered without `IF [NOT] EXISTS` guards: creating a
//! table that already exists, or dropping one that does not, is an error.
//!
//! SQLite ignores declared `VARCHAR` lengths, so bounded strings carry an
//! explicit `CHECK (length(col) <= N)`. Booleans are stored as `0`/`1` and
//! checked to stay that way.

use storefront_core::schema::{ColumnDef, ColumnType, OnDelete, TableDef};

fn sql_type(ty: ColumnType) -> String {
    match ty {
        ColumnType::Integer => "INTEGER".to_string(),
        ColumnType::String(len) => format!("VARCHAR({len})"),
        ColumnType::Float => "FLOAT".to_string(),
        ColumnType::Date => "DATE".to_string(),
        ColumnType::Boolean => "BOOLEAN".to_string(),
    }
}

fn render_column(col: &ColumnDef) -> String {
    let mut sql = format!("{} {}", col.name, sql_type(col.ty));
    if !col.nullable {
        sql.push_str(" NOT NULL");
    }
    if col.primary_key {
        sql.push_str(" PRIMARY KEY");
    }
    if col.unique {
        sql.push_str(" UNIQUE");
    }
    if let Some(literal) = col.default {
        sql.push_str(&format!(" DEFAULT {literal}"));
    }
    match col.ty {
        ColumnType::String(len) => {
            sql.push_str(&format!(" CHECK (length({}) <= {len})", col.name));
        }
        ColumnType::Boolean => {
            sql.push_str(&format!(" CHECK ({} IN (0, 1))", col.name));
        }
        _ => {}
    }
    sql
}

/// Renders `CREATE TABLE` for one table, foreign keys as table constraints.
pub fn render_create_table(table: &TableDef) -> String {
    let mut parts: Vec<String> = table.columns.iter().map(render_column).collect();
    for (col, fk) in table.foreign_keys() {
        let mut constraint = format!(
            "FOREIGN KEY ({}) REFERENCES {} ({})",
            col.name, fk.table, fk.column
        );
        if fk.on_delete == OnDelete::Cascade {
            constraint.push_str(" ON DELETE CASCADE");
        }
        parts.push(constraint);
    }
    format!("CREATE TABLE {} (\n    {}\n)", table.name, parts.join(",\n    "))
}

/// Renders the secondary index on the table's primary key.
pub fn render_create_index(table: &TableDef) -> String {
    format!(
        "CREATE INDEX {} ON {} (id)",
        table.id_index_name(),
        table.name
    )
}

pub fn render_drop_index(table: &TableDef) -> String {
    format!("DROP INDEX {}", table.id_index_name())
}

pub fn render_drop_table(table: &TableDef) -> String {
    format!("DROP TABLE {}", table.name)
}

/// Creates each table followed by its index, in the given order.
///
/// `tables` must be parents-first.
pub fn generate_create_sql(tables: &[&TableDef]) -> String {
    let statements: Vec<String> = tables
        .iter()
        .flat_map(|t| [render_create_table(t), render_create_index(t)])
        .collect();
    format!("{};\n", statements.join(";\n"))
}

/// Drops each index and then its table, in reverse of the given order.
pub fn generate_drop_sql(tables: &[&TableDef]) -> String {
    let statements: Vec<String> = tables
        .iter()
        .rev()
        .flat_map(|t| [render_drop_index(t), render_drop_table(t)])
        .collect();
    format!("{};\n", statements.join(";\n"))
}

/// `SELECT <all columns> FROM <table>`, columns in declaration order.
pub(crate) fn select_sql(table: &TableDef) -> String {
    format!(
        "SELECT {} FROM {}",
        table.column_names().join(", "),
        table.name
    )
}
