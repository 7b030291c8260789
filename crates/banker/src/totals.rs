// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Resource totals configuration and parsing.
//!
//! [`ResourceTotals`] is the number of units of each resource type the
//! system owns. It supports compact string parsing for CLI ergonomics.

use crate::BankError;
use std::fmt;

/// Units owned per resource type. Every entry is positive.
///
/// # Parsing
/// Accepts comma- and/or whitespace-separated positive integers:
/// - `"10,5,7"`
/// - `"10 5 7"`
/// - `" 10, 5, 7 "`
///
/// # Examples
/// ```
/// use banker::ResourceTotals;
///
/// let t = ResourceTotals::parse("10,5,7").unwrap();
/// assert_eq!(t.as_slice(), &[10, 5, 7]);
/// assert_eq!(t.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct ResourceTotals {
    units: Vec<u32>,
}

impl ResourceTotals {
    /// Creates totals from a vector, rejecting an empty list or a zero entry.
    pub fn new(units: Vec<u32>) -> Result<Self, BankError> {
        if units.is_empty() {
            return Err(BankError::NoResources);
        }
        if let Some(resource) = units.iter().position(|&u| u == 0) {
            return Err(BankError::ZeroTotal { resource });
        }
        Ok(Self { units })
    }

    /// Parses a totals string such as `"10,5,7"`.
    pub fn parse(s: &str) -> Result<Self, BankError> {
        let invalid = |reason: String| BankError::InvalidTotals {
            input: s.to_string(),
            reason,
        };

        let items: Vec<&str> = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|item| !item.is_empty())
            .collect();
        if items.is_empty() {
            return Err(invalid("expected at least one unit count".into()));
        }

        let mut units = Vec::with_capacity(items.len());
        for item in items {
            let value: u32 = item
                .parse()
                .map_err(|_| invalid(format!("'{item}' is not a non-negative integer")))?;
            if value == 0 {
                return Err(invalid("every resource needs at least one unit".into()));
            }
            units.push(value);
        }

        Ok(Self { units })
    }

    /// Number of resource types.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Always `false`: construction rejects empty totals.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Returns the unit counts.
    pub fn as_slice(&self) -> &[u32] {
        &self.units
    }

    /// Consumes the totals, returning the unit counts.
    pub fn into_vec(self) -> Vec<u32> {
        self.units
    }
}

impl TryFrom<Vec<u32>> for ResourceTotals {
    type Error = BankError;

    fn try_from(units: Vec<u32>) -> Result<Self, Self::Error> {
        Self::new(units)
    }
}

impl From<ResourceTotals> for Vec<u32> {
    fn from(totals: ResourceTotals) -> Self {
        totals.units
    }
}

impl fmt::Display for ResourceTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.units)
    }
}
