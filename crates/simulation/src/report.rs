// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Simulation results.

use crate::CustomerReport;
use banker::{BankStats, StateSnapshot};
use std::time::Duration;

/// Aggregate results of a simulation run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SimulationReport {
    /// Seed the run used; pass it back in to reproduce the claims and
    /// customer decisions.
    pub seed: u64,
    /// Per-customer results, in customer order.
    pub customers: Vec<CustomerReport>,
    /// The bank's own outcome counters.
    pub stats: BankStats,
    /// State after every customer finished.
    pub final_state: StateSnapshot,
    /// Wall-clock time of the run.
    pub duration: Duration,
}

impl SimulationReport {
    /// Requests granted across all customers.
    pub fn total_granted(&self) -> u64 {
        self.customers.iter().map(|c| c.granted).sum()
    }

    /// Retries across all customers.
    pub fn total_retries(&self) -> u64 {
        self.customers.iter().map(|c| c.retries).sum()
    }

    /// Claim completions across all customers.
    pub fn total_completions(&self) -> u64 {
        self.customers.iter().map(|c| c.completions).sum()
    }

    /// Returns a human-readable summary.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "Simulation (seed {}): {} customers, {} resource types, {:.2} ms\n",
            self.seed,
            self.customers.len(),
            self.final_state.resources(),
            self.duration.as_secs_f64() * 1000.0,
        );
        for c in &self.customers {
            out.push_str(&format!(
                "  C{}: {} requests, {} granted, {} retries, {} abandoned, {} releases, {} completions\n",
                c.customer, c.requests, c.granted, c.retries, c.gave_up, c.releases, c.completions,
            ));
        }
        out.push_str(&self.stats.summary());
        out.push_str(&format!(
            "\nFinal available {:?} of totals {:?}",
            self.final_state.available, self.final_state.total
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banker::{Bank, Matrix};

    fn report() -> SimulationReport {
        let bank = Bank::new(vec![2], Matrix::from_rows(vec![vec![1], vec![2]], 1).unwrap()).unwrap();
        SimulationReport {
            seed: 3,
            customers: vec![
                CustomerReport {
                    customer: 0,
                    requests: 4,
                    granted: 3,
                    retries: 2,
                    completions: 1,
                    ..Default::default()
                },
                CustomerReport {
                    customer: 1,
                    requests: 2,
                    granted: 2,
                    retries: 1,
                    ..Default::default()
                },
            ],
            stats: bank.stats(),
            final_state: bank.snapshot(),
            duration: Duration::from_millis(12),
        }
    }

    #[test]
    fn test_totals() {
        let r = report();
        assert_eq!(r.total_granted(), 5);
        assert_eq!(r.total_retries(), 3);
        assert_eq!(r.total_completions(), 1);
    }

    #[test]
    fn test_summary() {
        let s = report().summary();
        assert!(s.contains("seed 3"));
        assert!(s.contains("2 customers"));
        assert!(s.contains("C1: 2 requests, 2 granted"));
        assert!(s.contains("Final available [2] of totals [2]"));
    }

    #[test]
    fn test_serializes_to_json() {
        let json = serde_json::to_value(report()).unwrap();
        assert_eq!(json["seed"], 3);
        assert_eq!(json["customers"][0]["granted"], 3);
        assert_eq!(json["final_state"]["available"][0], 2);
    }
}
