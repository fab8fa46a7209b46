use clap::Parser;
use storefront_cli::{bootstrap, exit_on_error};
use storefront_sqlite::seed_standard;

/// Replace the storefront tables' contents with the demo dataset.
#[derive(Debug, Parser)]
#[command(name = "seed", version)]
struct Cli {}

fn main() {
    let _cli = Cli::parse();
    exit_on_error(run());
}

fn run() -> Result<(), String> {
    let store = bootstrap()?;
    store
        .with_connection(|conn| seed_standard(conn))
        .map_err(|e| format!("Seed failed: {e}"))?;
    println!("Database seeded successfully!");
    Ok(())
}
