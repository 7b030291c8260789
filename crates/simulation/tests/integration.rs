// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Integration tests: configuration → bank → concurrent customers → report.
//!
//! These tests run the full harness on a multi-threaded runtime and check
//! that, however the customers interleave, the bank ends with every unit
//! back in Available and its counters agree with the customers' own.

use banker::ResourceTotals;
use simulation::{Scenario, Simulation, SimulationConfig, SimulationError};

// ── Helpers ────────────────────────────────────────────────────

fn config(totals: Vec<u32>, customers: usize, seed: u64) -> SimulationConfig {
    let mut c = SimulationConfig::new(ResourceTotals::new(totals).unwrap());
    c.customers = customers;
    c.seed = Some(seed);
    c.rounds = 30;
    c.max_retries = 5;
    c.max_delay_ms = 1;
    c
}

// ── Full runs ──────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_classic_totals_random_claims() {
    let report = Simulation::new(config(vec![10, 5, 7], 5, 42))
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.seed, 42);
    assert_eq!(report.customers.len(), 5);
    assert_eq!(report.final_state.available, report.final_state.total);
    report.final_state.check_invariants().unwrap();

    // Customers only ask within their need, so nothing is ever invalid.
    assert_eq!(report.stats.invalid_requests, 0);
    assert_eq!(report.stats.claim_exceeded, 0);
    assert_eq!(report.stats.over_releases, 0);
    assert_eq!(report.stats.granted, report.total_granted());

    let issued: u64 = report.customers.iter().map(|c| c.requests + c.retries).sum();
    assert_eq!(report.stats.requests, issued);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_configured_claims() {
    let toml = r#"
totals = [10, 5, 7]
customers = 5
maximum = [[7, 5, 3], [3, 2, 2], [9, 0, 2], [2, 2, 2], [4, 3, 3]]
seed = 7
rounds = 25
max_delay_ms = 0
"#;
    let config = SimulationConfig::from_toml(toml).unwrap();
    let sim = Simulation::new(config).unwrap();
    assert_eq!(sim.bank().need(2), Some(vec![9, 0, 2]));

    let report = sim.run().await.unwrap();
    assert_eq!(report.final_state.available, vec![10, 5, 7]);
    assert!(report.total_granted() > 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_many_customers_scarce_resources() {
    let report = Simulation::new(config(vec![3, 2], 16, 2024))
        .unwrap()
        .run()
        .await
        .unwrap();
    assert_eq!(report.final_state.available, vec![3, 2]);
    assert_eq!(report.customers.len(), 16);
}

#[tokio::test]
async fn test_single_threaded_runtime() {
    let report = Simulation::new(config(vec![4, 4, 4, 4], 3, 5))
        .unwrap()
        .run()
        .await
        .unwrap();
    assert_eq!(report.final_state.available, vec![4, 4, 4, 4]);
}

#[test]
fn test_same_seed_same_claims() {
    let a = Simulation::new(config(vec![10, 5, 7], 5, 99)).unwrap();
    let b = Simulation::new(config(vec![10, 5, 7], 5, 99)).unwrap();
    assert_eq!(a.bank().snapshot(), b.bank().snapshot());
}

// ── Configuration errors ───────────────────────────────────────

#[test]
fn test_config_errors_surface() {
    let mut c = config(vec![10, 5, 7], 2, 1);
    c.maximum = Some(vec![vec![11, 0, 0], vec![0, 0, 0]]);
    assert!(matches!(Simulation::new(c), Err(SimulationError::Bank(_))));

    assert!(matches!(
        SimulationConfig::from_toml("customers = 3"),
        Err(SimulationError::Config(_))
    ));
}

#[test]
fn test_config_toml_roundtrip() {
    let c = config(vec![10, 5, 7], 5, 3);
    let toml = c.to_toml().unwrap();
    let back = SimulationConfig::from_toml(&toml).unwrap();
    assert_eq!(back, c);
}

// ── Scenarios ──────────────────────────────────────────────────

#[test]
fn test_classic_scenario_state_is_unchanged_by_denials() {
    let scenario = Scenario::classic();
    let bank = scenario.build_bank().unwrap();
    bank.request(1, &[1, 0, 2]).unwrap();

    let before = bank.snapshot();
    assert!(bank.request(0, &[1, 0, 2]).is_err());
    assert!(bank.request(0, &[0, 2, 0]).is_err());
    assert!(bank.request(0, &[8, 0, 0]).is_err());
    assert_eq!(bank.snapshot(), before);
}
