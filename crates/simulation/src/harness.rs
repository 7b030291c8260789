// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The simulation harness: one task per customer against a shared bank.
//!
//! ```text
//! SimulationConfig ─► Simulation::new ─► Bank
//!                                          │ clone per customer
//!                 ┌────────────┬───────────┼────────────┐
//!                 ▼            ▼           ▼            ▼
//!             Customer 0   Customer 1    ...      Customer N-1   (tokio tasks)
//!                 └────────────┴─────┬─────┴────────────┘
//!                                    ▼ join
//!                 conservation check ─► SimulationReport
//! ```

use crate::{Customer, RetryPolicy, SimulationConfig, SimulationError, SimulationReport};
use banker::Bank;
use std::time::Instant;

/// A configured run, ready to start.
pub struct Simulation {
    config: SimulationConfig,
    bank: Bank,
    seed: u64,
}

impl Simulation {
    /// Validates the configuration and builds the bank.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        let seed = config.resolve_seed();
        let bank = config.build_bank(seed)?;
        tracing::info!(seed, "simulation prepared: {} customers", config.customers);
        Ok(Self { config, bank, seed })
    }

    /// The shared bank.
    pub fn bank(&self) -> &Bank {
        &self.bank
    }

    /// The seed in use.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Runs every customer to completion and checks that all units came
    /// back.
    pub async fn run(self) -> Result<SimulationReport, SimulationError> {
        let start = Instant::now();
        let policy = RetryPolicy {
            rounds: self.config.rounds,
            max_retries: self.config.max_retries,
            max_delay: self.config.max_delay(),
        };

        tracing::info!(
            customers = self.config.customers,
            rounds = policy.rounds,
            "simulation started"
        );

        let handles: Vec<_> = (0..self.config.customers)
            .map(|id| {
                let customer = Customer::new(id, self.bank.clone(), customer_seed(self.seed, id), policy);
                tokio::spawn(customer.run())
            })
            .collect();

        let mut customers = Vec::with_capacity(handles.len());
        for handle in handles {
            let report = handle
                .await
                .map_err(|e| SimulationError::Worker(e.to_string()))?;
            customers.push(report);
        }

        let final_state = self.bank.snapshot();
        final_state
            .check_invariants()
            .map_err(|e| SimulationError::ConservationViolated(e.to_string()))?;
        if final_state.available != final_state.total {
            return Err(SimulationError::ConservationViolated(format!(
                "available {:?} != totals {:?} after every customer released",
                final_state.available, final_state.total
            )));
        }

        let report = SimulationReport {
            seed: self.seed,
            customers,
            stats: self.bank.stats(),
            final_state,
            duration: start.elapsed(),
        };
        tracing::info!("simulation finished: {}", report.stats.summary());
        Ok(report)
    }
}

/// Derives a per-customer seed so customers draw independent streams.
fn customer_seed(seed: u64, customer: usize) -> u64 {
    seed ^ (customer as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
