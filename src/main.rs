// src/main.rs
//! aurum - AUR helper CLI entry point

use anyhow::Result;
use aurum::{Config, SortMode};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::Path;

mod commands;

// =============================================================================
// CLI Definitions
// =============================================================================

#[derive(Parser)]
#[command(name = "aurum")]
#[command(author = "Aurum Project")]
#[command(version)]
#[command(about = "AUR helper with dependency resolution and conflict checking", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve targets against the repositories and the AUR and print the build plan
    Resolve {
        /// Packages or dependency expressions to resolve
        #[arg(required = true)]
        targets: Vec<String>,

        /// Path to a JSON configuration file
        #[arg(short, long)]
        config: Option<String>,

        /// Never prompt; fail when interaction would be required
        #[arg(long)]
        no_confirm: bool,

        /// Defer conflict confirmation to the package manager
        #[arg(long)]
        ask: bool,

        /// Print plans bottom-up
        #[arg(long)]
        bottom_up: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// =============================================================================
// Main Entry Point
// =============================================================================

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Resolve { targets, config, no_confirm, ask, bottom_up }) => {
            let mut cfg = match config {
                Some(path) => Config::load(Path::new(&path))?,
                None => Config::default(),
            };
            if no_confirm {
                cfg.no_confirm = true;
            }
            if ask {
                cfg.use_ask = true;
            }
            if bottom_up {
                cfg.sort_mode = SortMode::BottomUp;
            }

            commands::cmd_resolve(&targets, &cfg)
        }

        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "aurum", &mut io::stdout());
            Ok(())
        }

        None => {
            println!("Aurum v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'aurum --help' for usage information");
            Ok(())
        }
    }
}
