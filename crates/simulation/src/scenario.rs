// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Static allocation scenarios for one-off safety evaluation.
//!
//! # TOML Format
//! ```toml
//! totals = [10, 5, 7]
//! maximum = [[7, 5, 3], [3, 2, 2], [9, 0, 2], [2, 2, 2], [4, 3, 3]]
//! allocation = [[0, 1, 0], [2, 0, 0], [3, 0, 2], [2, 1, 1], [0, 0, 2]]
//!
//! # Optional requests to try in order after loading.
//! [[requests]]
//! customer = 1
//! units = [1, 0, 2]
//! ```

use crate::SimulationError;
use banker::{Bank, Matrix, RequestError, ResourceTotals};
use std::path::Path;

/// A request to replay against a scenario.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScenarioRequest {
    /// Index of the requesting customer.
    pub customer: usize,
    /// Units asked for, one entry per resource type.
    pub units: Vec<u32>,
}

/// A fixed bank state: totals, claims, and what each customer holds.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Scenario {
    /// Units owned per resource type.
    pub totals: ResourceTotals,
    /// Declared maximum claims, one row per customer.
    pub maximum: Vec<Vec<u32>>,
    /// Units each customer already holds. Defaults to nothing allocated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocation: Option<Vec<Vec<u32>>>,
    /// Requests to replay, in order, after loading.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requests: Vec<ScenarioRequest>,
}

impl Scenario {
    /// The five-customer, three-resource textbook example, with the request
    /// sequence that exercises every denial path.
    pub fn classic() -> Self {
        Self {
            totals: ResourceTotals::new(vec![10, 5, 7]).expect("classic totals are positive"),
            maximum: vec![
                vec![7, 5, 3],
                vec![3, 2, 2],
                vec![9, 0, 2],
                vec![2, 2, 2],
                vec![4, 3, 3],
            ],
            allocation: Some(vec![
                vec![0, 1, 0],
                vec![2, 0, 0],
                vec![3, 0, 2],
                vec![2, 1, 1],
                vec![0, 0, 2],
            ]),
            requests: vec![
                ScenarioRequest { customer: 1, units: vec![1, 0, 2] },
                ScenarioRequest { customer: 0, units: vec![1, 0, 2] },
                ScenarioRequest { customer: 0, units: vec![0, 2, 0] },
                ScenarioRequest { customer: 0, units: vec![8, 0, 0] },
            ],
        }
    }

    /// Loads a scenario from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, SimulationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SimulationError::Config(format!("cannot read scenario '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses a scenario from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, SimulationError> {
        toml::from_str(toml_str)
            .map_err(|e| SimulationError::Config(format!("TOML parse error: {e}")))
    }

    /// Builds a bank in the scenario's state.
    pub fn build_bank(&self) -> Result<Bank, SimulationError> {
        let cols = self.totals.len();
        let maximum = Matrix::from_rows(self.maximum.clone(), cols)?;
        let allocation = match &self.allocation {
            Some(rows) => Matrix::from_rows(rows.clone(), cols)?,
            None => Matrix::zeros(maximum.rows(), cols),
        };
        Ok(Bank::from_parts(self.totals.as_slice().to_vec(), maximum, allocation)?)
    }

    /// Replays the scenario's requests in order against `bank`, returning
    /// each outcome.
    pub fn replay(&self, bank: &Bank) -> Vec<(ScenarioRequest, Result<(), RequestError>)> {
        self.requests
            .iter()
            .map(|r| (r.clone(), bank.request(r.customer, &r.units)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_builds_safe_bank() {
        let bank = Scenario::classic().build_bank().unwrap();
        assert_eq!(bank.available(), vec![3, 3, 2]);
        assert_eq!(bank.safe_sequence(), Some(vec![1, 3, 0, 2, 4]));
    }

    #[test]
    fn test_classic_replay_outcomes() {
        let scenario = Scenario::classic();
        let bank = scenario.build_bank().unwrap();
        let outcomes: Vec<_> = scenario.replay(&bank).into_iter().map(|(_, o)| o).collect();

        assert_eq!(outcomes[0], Ok(()));
        assert!(matches!(outcomes[1], Err(RequestError::InsufficientAvailable { .. })));
        assert_eq!(outcomes[2], Err(RequestError::Unsafe { customer: 0 }));
        assert!(matches!(outcomes[3], Err(RequestError::ClaimExceeded { .. })));
    }

    #[test]
    fn test_from_toml() {
        let toml = r#"
totals = [3]
maximum = [[2], [2]]
allocation = [[1], [1]]

[[requests]]
customer = 0
units = [1]
"#;
        let s = Scenario::from_toml(toml).unwrap();
        assert_eq!(s.requests.len(), 1);
        let bank = s.build_bank().unwrap();
        assert_eq!(bank.available(), vec![1]);
        let outcomes = s.replay(&bank);
        assert_eq!(outcomes[0].1, Ok(()));
    }

    #[test]
    fn test_missing_allocation_means_empty() {
        let s = Scenario::from_toml("totals = [3]\nmaximum = [[2]]").unwrap();
        let bank = s.build_bank().unwrap();
        assert_eq!(bank.available(), vec![3]);
    }

    #[test]
    fn test_ragged_maximum_rejected() {
        let s = Scenario::from_toml("totals = [3, 3]\nmaximum = [[2]]").unwrap();
        assert!(matches!(s.build_bank(), Err(SimulationError::Bank(_))));
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let s = Scenario::classic();
        let text = toml::to_string(&s).unwrap();
        assert_eq!(Scenario::from_toml(&text).unwrap(), s);
    }
}
