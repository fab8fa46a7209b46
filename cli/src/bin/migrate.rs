use clap::{Parser, Subcommand};
use storefront_cli::{bootstrap, exit_on_error};
use storefront_sqlite::{Migration, Store, head};

#[derive(Debug, Parser)]
#[command(name = "migrate", version)]
#[command(about = "Move the storefront schema along its revision chain")]
struct Cli {
    #[command(subcommand)]
    operation: Operation,
}

#[derive(Debug, Subcommand)]
enum Operation {
    /// Apply all pending revisions.
    Upgrade,
    /// Revert the current revision.
    Downgrade,
    /// Print the applied revision.
    Current,
    /// List revisions, newest first.
    History,
    /// Show the revision and per-table row counts.
    Status,
}

fn main() {
    let cli = Cli::parse();
    exit_on_error(run(cli.operation));
}

fn run(operation: Operation) -> Result<(), String> {
    let store = bootstrap()?;
    match operation {
        Operation::Upgrade => run_upgrade(open_migration(&store)?),
        Operation::Downgrade => run_downgrade(open_migration(&store)?),
        Operation::Current => run_current(&inspect_migration(&store)?),
        Operation::History => run_history(&inspect_migration(&store)?),
        Operation::Status => run_status(&inspect_migration(&store)?),
    }
}

fn open_migration(store: &Store) -> Result<Migration, String> {
    let conn = store
        .open()
        .map_err(|e| format!("Failed to open database '{}': {e}", store.url()))?;
    Migration::new(conn).map_err(|e| format!("Failed to initialize migration: {e}"))
}

/// Read-only counterpart of [`open_migration`]; a missing database file is
/// an error rather than being created.
fn inspect_migration(store: &Store) -> Result<Migration, String> {
    let conn = store
        .open_read_only()
        .map_err(|e| format!("Failed to open database '{}': {e}", store.url()))?;
    Migration::new(conn).map_err(|e| format!("Failed to initialize migration: {e}"))
}

fn run_upgrade(mut migration: Migration) -> Result<(), String> {
    let applied = migration
        .upgrade()
        .map_err(|e| format!("Upgrade failed: {e}"))?;
    for id in applied {
        println!("Applied revision {id}.");
    }
    Ok(())
}

fn run_downgrade(mut migration: Migration) -> Result<(), String> {
    let reverted = migration
        .downgrade()
        .map_err(|e| format!("Downgrade failed: {e}"))?;
    println!("Reverted revision {reverted}.");
    Ok(())
}

fn run_current(migration: &Migration) -> Result<(), String> {
    let current = migration
        .current()
        .map_err(|e| format!("Failed to read revision: {e}"))?;
    match current {
        Some(id) if id == head().id => println!("{id} (head)"),
        Some(id) => println!("{id}"),
        None => println!("No revision applied."),
    }
    Ok(())
}

fn run_history(migration: &Migration) -> Result<(), String> {
    let history = migration
        .history()
        .map_err(|e| format!("Failed to read history: {e}"))?;
    for entry in history {
        let base = entry.revision.down_revision.unwrap_or("<base>");
        let marker = if entry.current { " (current)" } else { "" };
        println!(
            "{base} -> {}{marker}, {}",
            entry.revision.id, entry.revision.message
        );
    }
    Ok(())
}

fn run_status(migration: &Migration) -> Result<(), String> {
    let status = migration
        .status()
        .map_err(|e| format!("Failed to get migration status: {e}"))?;
    println!("Migration Status:");
    println!(
        "  Revision: {}",
        status.current.as_deref().unwrap_or("none")
    );
    println!("  Head: {}", status.head);
    println!(
        "  Tables exist: {}",
        if status.tables_exist { "yes" } else { "no" }
    );
    for table in &status.tables {
        match table.row_count {
            Some(count) => println!("  {}: {count} rows", table.name),
            None => println!("  {}: missing", table.name),
        }
    }
    Ok(())
}
