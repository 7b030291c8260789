// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # simulation
//!
//! Drives a [`banker::Bank`] with a population of concurrent customers.
//!
//! The simulation takes:
//! - A [`SimulationConfig`] (totals, customer count, optional claims, seed,
//!   pacing knobs), usually loaded from TOML.
//!
//! And runs one tokio task per customer. Each [`Customer`] requests random
//! slices of its remaining claim, retries denials caused by scarcity or
//! unsafety after a random pause, and gives units back over time. When all
//! tasks finish the harness checks that every unit has been returned.
//!
//! [`Scenario`] covers the static case: load a fixed allocation state,
//! evaluate its safety, and replay a list of requests against it.
//!
//! # Reproducibility
//! Claims and every customer decision derive from one `u64` seed recorded
//! in the [`SimulationReport`]. Interleavings still depend on the
//! scheduler, so two runs with the same seed share claims but not
//! necessarily outcomes.

mod config;
mod customer;
mod error;
mod harness;
mod report;
mod scenario;

pub use config::SimulationConfig;
pub use customer::{Customer, CustomerReport, RetryPolicy};
pub use error::SimulationError;
pub use harness::Simulation;
pub use report::SimulationReport;
pub use scenario::{Scenario, ScenarioRequest};
