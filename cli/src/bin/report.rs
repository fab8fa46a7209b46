use clap::Parser;
use storefront_cli::{bootstrap, exit_on_error};
use storefront_sqlite::build_report;

/// Print customers, products, orders and payments.
///
/// Sections that cannot be read are logged and printed empty.
#[derive(Debug, Parser)]
#[command(name = "report", version)]
struct Cli {}

fn main() {
    let _cli = Cli::parse();
    exit_on_error(run());
}

fn run() -> Result<(), String> {
    let store = bootstrap()?;
    print!("{}", build_report(&store));
    Ok(())
}
