// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the simulation harness.

/// Errors that can occur while configuring or running a simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// The bank could not be built from the configuration.
    #[error("bank error: {0}")]
    Bank(#[from] banker::BankError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A customer task panicked or was cancelled.
    #[error("customer task failed: {0}")]
    Worker(String),

    /// The final state did not account for every unit.
    #[error("conservation check failed after the run: {0}")]
    ConservationViolated(String),
}
