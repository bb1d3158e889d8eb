// SPDX-FileCopyrightText: 2026 Memento Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memento - weekly recurring reminders.
//!
//! This is the binary entry point for the Memento service.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;
mod upcoming;

use clap::{Parser, Subcommand};
use memento_config::MementoConfig;
use memento_core::MementoError;

/// Memento - weekly recurring reminders.
#[derive(Parser, Debug)]
#[command(name = "memento", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the scheduler and the HTTP API until interrupted.
    Serve,
    /// Print the resolved configuration as TOML.
    Config,
    /// List each stored reminder's next occurrence.
    Upcoming,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let config = match memento_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            memento_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Config) => print_config(&config),
        Some(Commands::Upcoming) => upcoming::run_upcoming(&config).await,
        None => {
            println!("memento: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn print_config(config: &MementoConfig) -> Result<(), MementoError> {
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| MementoError::Config(format!("failed to render configuration: {e}")))?;
    print!("{rendered}");
    Ok(())
}
