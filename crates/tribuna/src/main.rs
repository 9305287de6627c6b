// SPDX-FileCopyrightText: 2026 Tribuna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tribuna - a tenant-scoped search gateway for Brazilian judicial records.
//!
//! This is the binary entry point for the Tribuna gateway.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod serve;

/// Tribuna - a tenant-scoped search gateway for Brazilian judicial records.
#[derive(Parser, Debug)]
#[command(name = "tribuna", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the gateway server.
    Serve,
    /// Print the effective configuration with secrets masked.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let config = match tribuna_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            tribuna_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(err) = serve::run(config).await {
                eprintln!("tribuna serve: {err}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => {
            println!("{}", tribuna_config::render_redacted(&config));
        }
        None => {
            println!("tribuna: use --help for available commands");
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Verify jemalloc is the global allocator by advancing the epoch.
        // Only jemalloc supports this -- the system allocator would fail.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn binary_loads_config_defaults() {
        // Empty TOML resolves to compiled defaults without touching the
        // XDG hierarchy or the process environment.
        let config = tribuna_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.gateway.port, 3000);
        assert_eq!(config.quota.limit, 100);
    }
}
