// Copyright 2026 Gleaner Contributors
// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code, unused_imports)]

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

#[cfg(feature = "redis-cache")]
mod cache;
mod cli;
mod driver;
mod errors;
mod export;
mod extract;
mod harvest;
mod input;
mod paginate;
mod progress;
mod schema;

#[derive(Parser)]
#[command(
    name = "gleaner",
    about = "Gleaner — harvest paginated StackOverflow listings into CSV",
    version,
    after_help = "Run 'gleaner <command> --help' for details on each command.\nRun 'gleaner' with no command to start an interactive scrape."
)]
struct Cli {
    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape listing pages and export the records to CSV
    Scrape,
    /// Check environment and diagnose issues
    Doctor,
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global flags via environment variables so all modules can check them
    if cli.json {
        std::env::set_var("GLEANER_JSON", "1");
    }
    if cli.quiet {
        std::env::set_var("GLEANER_QUIET", "1");
    }
    if cli.verbose {
        std::env::set_var("GLEANER_VERBOSE", "1");
    }
    if cli.no_color {
        std::env::set_var("GLEANER_NO_COLOR", "1");
    }

    let directive = if cli.verbose {
        "gleaner=debug"
    } else {
        "gleaner=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(directive.parse().unwrap()),
        )
        .init();

    let result = match cli.command {
        // No subcommand → interactive scrape
        None | Some(Commands::Scrape) => cli::scrape_cmd::run().await,
        Some(Commands::Doctor) => cli::doctor::run().await,
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "gleaner", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        if !cli::output::is_quiet() && !cli::output::is_json() {
            eprintln!("  Error: {e:#}");
        }
        if cli::output::is_json() {
            cli::output::print_json(&serde_json::json!({
                "error": true,
                "message": format!("{e:#}"),
            }));
        }
        std::process::exit(1);
    }

    result
}
