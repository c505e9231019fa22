// SPDX-FileCopyrightText: 2026 Tokenhub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tokenhub - a cost- and capability-aware LLM request router.
//!
//! This is the binary entry point for Tokenhub.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod chat;
mod hub;
mod inventory;

use clap::{Parser, Subcommand};

use crate::chat::ChatArgs;
use crate::hub::Hub;

/// Tokenhub - a cost- and capability-aware LLM request router.
#[derive(Parser, Debug)]
#[command(name = "tokenhub", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Send one message through routing and orchestration.
    Chat(ChatArgs),
    /// List catalog models.
    Models {
        /// Only list models served by this provider.
        #[arg(long)]
        provider: Option<String>,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Validate provider credentials.
    Providers {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// Print the effective configuration as TOML.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match tokenhub_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            tokenhub_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.hub.log_level);

    if let Some(Commands::Config) = cli.command {
        match toml::to_string_pretty(&config) {
            Ok(rendered) => print!("{rendered}"),
            Err(e) => {
                eprintln!("error: failed to render config: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    let hub = match Hub::from_config(&config) {
        Ok(hub) => hub,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let outcome = match cli.command {
        Some(Commands::Chat(args)) => chat::run_chat(&hub, &args).await,
        Some(Commands::Models { provider, json }) => {
            inventory::run_models(&hub, provider.as_deref(), json)
        }
        Some(Commands::Providers { plain }) => inventory::run_providers(&hub, plain).await,
        Some(Commands::Config) => Ok(()),
        None => {
            println!("tokenhub: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = outcome {
        eprintln!("error [{}]: {e}", e.kind());
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tokenhub={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
