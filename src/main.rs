//! analytics-launcher CLI

use analytics_launcher::cli::Args;
use analytics_launcher::observability::init_tracing;
use analytics_launcher::{launch, LaunchConfig};
use clap::Parser;

fn main() {
    let _args = Args::parse();
    init_tracing();

    match launch(&LaunchConfig::default()) {
        Ok(outcome) => std::process::exit(outcome.exit_code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}
