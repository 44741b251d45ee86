//! esnap CLI
//!
//! Rotates search-engine snapshots: deletes the ones beyond the retention
//! limit, creates a new one and exits with its verdict.

use clap::{Parser, Subcommand};
use esnap_core::logging_facility::{init, Profile};
use esnap_core::EXIT_FATAL;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "esnap")]
#[command(about = "esnap - search engine snapshot rotation", long_about = None)]
struct Cli {
    /// Log output format on stderr (pretty or json)
    #[arg(long, global = true, env = "ESNAP_LOG_FORMAT", default_value = "pretty")]
    log_format: Profile,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Delete old snapshots, create a new one and verify it (default)
    Rotate(commands::rotate::RotateArgs),
    /// List snapshots in the repository
    List,
}

fn main() {
    // A missing .env file is fine; real environment values always win.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init(cli.log_format);

    let result = match cli.command {
        None => commands::rotate::execute(Default::default()),
        Some(Commands::Rotate(args)) => commands::rotate::execute(args),
        Some(Commands::List) => commands::list::execute(),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(EXIT_FATAL);
        }
    }
}
