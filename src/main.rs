//! slimedex CLI entry point
//!
//! Parses arguments and dispatches through `cli::run`; errors are printed to
//! stderr and the process exits non-zero.

use slimedex::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
