// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # banker
//!
//! Command-line interface for the banker allocator.
//!
//! ## Usage
//! ```bash
//! # Simulate five customers against 10, 5 and 7 units of three resources
//! banker run 10 5 7
//!
//! # Same, reproducibly, with more customers and a JSON report
//! banker run 10,5,7 --customers 8 --seed 42 --json
//!
//! # Evaluate the textbook safe-state example, or a scenario file
//! banker check
//! banker check --scenario ./scenario.toml
//! ```

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "banker",
    about = "Deadlock-avoiding resource allocation with the Banker's algorithm",
    version,
    author
)]
struct Cli {
    /// Path to a TOML simulation config (overrides `run` arguments).
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run concurrent customers against a bank and report the outcome.
    Run {
        /// Units of each resource type, e.g. `10 5 7` or `10,5,7`.
        totals: Vec<String>,

        /// Number of customers (one task each).
        #[arg(short = 'n', long, default_value_t = 5)]
        customers: usize,

        /// Seed for claims and customer behaviour (random if omitted).
        #[arg(short, long)]
        seed: Option<u64>,

        /// Request attempts per customer.
        #[arg(short, long, default_value_t = 20)]
        rounds: usize,

        /// Retries of a denied request before a customer gives up on it.
        #[arg(long, default_value_t = 10)]
        max_retries: usize,

        /// Upper bound of the random pause between customer actions.
        #[arg(long, default_value_t = 5)]
        max_delay_ms: u64,

        /// Print the report as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Evaluate whether a fixed allocation state is safe.
    Check {
        /// Scenario TOML file (defaults to the classic 5×3 example).
        #[arg(short = 'f', long)]
        scenario: Option<std::path::PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            totals,
            customers,
            seed,
            rounds,
            max_retries,
            max_delay_ms,
            json,
        } => {
            let config = match cli.config {
                Some(path) => simulation::SimulationConfig::from_file(&path)?,
                None => commands::run::config_from_args(
                    &totals,
                    customers,
                    seed,
                    rounds,
                    max_retries,
                    max_delay_ms,
                )?,
            };
            commands::run::execute(config, json).await
        }
        Commands::Check { scenario } => commands::check::execute(scenario),
    }
}
