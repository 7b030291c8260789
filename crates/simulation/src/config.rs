// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Simulation configuration loaded from TOML files or constructed
//! programmatically.
//!
//! # TOML Format
//! ```toml
//! totals = [10, 5, 7]
//! customers = 5
//! # maximum = [[7, 5, 3], [3, 2, 2], [9, 0, 2], [2, 2, 2], [4, 3, 3]]
//! seed = 42
//! rounds = 20
//! max_retries = 10
//! max_delay_ms = 5
//! ```

use crate::SimulationError;
use banker::{claims, Bank, Matrix, ResourceTotals};
use std::path::Path;
use std::time::Duration;

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SimulationConfig {
    /// Units owned per resource type.
    pub totals: ResourceTotals,
    /// Number of customers (one task each).
    #[serde(default = "default_customers")]
    pub customers: usize,
    /// Declared maximum claims, one row per customer. Drawn at random from
    /// the seed when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Vec<Vec<u32>>>,
    /// Seed for claim generation and customer behaviour. A fresh random
    /// seed is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Request attempts per customer.
    #[serde(default = "default_rounds")]
    pub rounds: usize,
    /// How often a customer re-issues a request denied for scarcity or
    /// unsafety before giving up on it.
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
    /// Upper bound of the randomized pause between customer actions.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

fn default_customers() -> usize {
    5
}

fn default_rounds() -> usize {
    20
}

fn default_max_retries() -> usize {
    10
}

fn default_max_delay_ms() -> u64 {
    5
}

impl SimulationConfig {
    /// Creates a configuration with default knobs for the given totals.
    pub fn new(totals: ResourceTotals) -> Self {
        Self {
            totals,
            customers: default_customers(),
            maximum: None,
            seed: None,
            rounds: default_rounds(),
            max_retries: default_max_retries(),
            max_delay_ms: default_max_delay_ms(),
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, SimulationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SimulationError::Config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, SimulationError> {
        toml::from_str(toml_str)
            .map_err(|e| SimulationError::Config(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, SimulationError> {
        toml::to_string_pretty(self)
            .map_err(|e| SimulationError::Config(format!("TOML serialise error: {e}")))
    }

    /// Checks the knobs that the type system does not.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.customers == 0 {
            return Err(SimulationError::Config("customers must be at least 1".into()));
        }
        if self.rounds == 0 {
            return Err(SimulationError::Config("rounds must be at least 1".into()));
        }
        if let Some(maximum) = &self.maximum {
            if maximum.len() != self.customers {
                return Err(SimulationError::Config(format!(
                    "maximum has {} rows but {} customers are configured",
                    maximum.len(),
                    self.customers
                )));
            }
            if let Some((i, row)) = maximum
                .iter()
                .enumerate()
                .find(|(_, row)| row.len() != self.totals.len())
            {
                return Err(SimulationError::Config(format!(
                    "maximum row {i} has {} entries but there are {} resource types",
                    row.len(),
                    self.totals.len()
                )));
            }
        }
        Ok(())
    }

    /// Returns the configured seed, or draws a fresh one.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    /// Returns the maximum-claim matrix: the configured one, or one drawn
    /// from `seed`.
    pub fn resolve_maximum(&self, seed: u64) -> Result<Matrix, SimulationError> {
        match &self.maximum {
            Some(rows) => Ok(Matrix::from_rows(rows.clone(), self.totals.len())?),
            None => Ok(claims::seeded_maximum(seed, self.totals.as_slice(), self.customers)),
        }
    }

    /// Builds the bank described by this configuration.
    pub fn build_bank(&self, seed: u64) -> Result<Bank, SimulationError> {
        self.validate()?;
        let maximum = self.resolve_maximum(seed)?;
        Ok(Bank::new(self.totals.as_slice().to_vec(), maximum)?)
    }

    /// The pause bound as a [`Duration`].
    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals() -> ResourceTotals {
        ResourceTotals::new(vec![10, 5, 7]).unwrap()
    }

    #[test]
    fn test_defaults() {
        let c = SimulationConfig::new(totals());
        assert_eq!(c.customers, 5);
        assert_eq!(c.rounds, 20);
        assert_eq!(c.max_retries, 10);
        assert_eq!(c.max_delay(), Duration::from_millis(5));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_from_toml_minimal() {
        let c = SimulationConfig::from_toml("totals = [3, 4]").unwrap();
        assert_eq!(c.totals.as_slice(), &[3, 4]);
        assert_eq!(c.customers, 5);
        assert_eq!(c.seed, None);
        assert_eq!(c.maximum, None);
    }

    #[test]
    fn test_from_toml_full() {
        let toml = r#"
totals = [10, 5, 7]
customers = 2
maximum = [[7, 5, 3], [3, 2, 2]]
seed = 42
rounds = 3
max_retries = 1
max_delay_ms = 0
"#;
        let c = SimulationConfig::from_toml(toml).unwrap();
        assert_eq!(c.customers, 2);
        assert_eq!(c.maximum, Some(vec![vec![7, 5, 3], vec![3, 2, 2]]));
        assert_eq!(c.seed, Some(42));
        assert_eq!(c.resolve_seed(), 42);
        assert_eq!(c.rounds, 3);
        assert_eq!(c.max_retries, 1);
        assert_eq!(c.max_delay_ms, 0);
    }

    #[test]
    fn test_from_toml_rejects_zero_total() {
        assert!(SimulationConfig::from_toml("totals = [3, 0]").is_err());
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let mut c = SimulationConfig::new(totals());
        c.seed = Some(9);
        let toml = c.to_toml().unwrap();
        let back = SimulationConfig::from_toml(&toml).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_validate() {
        let mut c = SimulationConfig::new(totals());
        c.customers = 0;
        assert!(c.validate().is_err());

        let mut c = SimulationConfig::new(totals());
        c.rounds = 0;
        assert!(c.validate().is_err());

        let mut c = SimulationConfig::new(totals());
        c.customers = 2;
        c.maximum = Some(vec![vec![1, 1, 1]]);
        assert!(c.validate().is_err());

        c.maximum = Some(vec![vec![1, 1, 1], vec![1, 1]]);
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_build_bank_with_configured_claims() {
        let mut c = SimulationConfig::new(totals());
        c.customers = 2;
        c.maximum = Some(vec![vec![7, 5, 3], vec![3, 2, 2]]);
        let bank = c.build_bank(0).unwrap();
        assert_eq!(bank.need(1), Some(vec![3, 2, 2]));
    }

    #[test]
    fn test_build_bank_rejects_claim_above_total() {
        let mut c = SimulationConfig::new(totals());
        c.customers = 1;
        c.maximum = Some(vec![vec![11, 0, 0]]);
        assert!(matches!(c.build_bank(0), Err(SimulationError::Bank(_))));
    }

    #[test]
    fn test_build_bank_random_claims_follow_seed() {
        let c = SimulationConfig::new(totals());
        let a = c.build_bank(17).unwrap().snapshot();
        let b = c.build_bank(17).unwrap().snapshot();
        assert_eq!(a, b);
        assert_eq!(a.customers(), 5);
    }
}
