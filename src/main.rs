//! pdfweave - Assemble one PDF from many using a merge command script.

use clap::Parser;
use std::process;

use pdfweave::cli::{self, Cli};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Run the application and handle errors
    if let Err(err) = cli::run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}
