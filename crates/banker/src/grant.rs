// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! RAII guard that returns granted units to the bank on drop.
//!
//! [`Grant`] pairs a successful request with its release: the units stay
//! allocated to the customer for as long as the guard lives, and dropping
//! the guard hands them back.

use crate::{Bank, ReleaseError};

/// Units granted to one customer, released when the guard is dropped.
///
/// # Example
/// ```
/// use banker::{Bank, Matrix};
///
/// let bank = Bank::new(vec![3], Matrix::from_rows(vec![vec![2]], 1).unwrap()).unwrap();
///
/// let grant = bank.acquire(0, &[2]).unwrap();
/// assert_eq!(bank.available(), vec![1]);
///
/// drop(grant);
/// assert_eq!(bank.available(), vec![3]);
/// ```
#[must_use = "dropping a Grant immediately releases its units"]
pub struct Grant {
    bank: Bank,
    customer: usize,
    /// `None` once the units have been handed back.
    units: Option<Vec<u32>>,
}

impl Grant {
    pub(crate) fn new(bank: Bank, customer: usize, units: Vec<u32>) -> Self {
        Self {
            bank,
            customer,
            units: Some(units),
        }
    }

    /// The customer holding this grant.
    pub fn customer(&self) -> usize {
        self.customer
    }

    /// The units held through this grant.
    pub fn units(&self) -> &[u32] {
        self.units.as_deref().unwrap_or(&[])
    }

    /// Releases the units now, reporting any failure instead of logging it.
    pub fn release(mut self) -> Result<(), ReleaseError> {
        match self.units.take() {
            Some(units) => self.bank.release(self.customer, &units),
            None => Ok(()),
        }
    }
}

impl Drop for Grant {
    fn drop(&mut self) {
        if let Some(units) = self.units.take() {
            if let Err(error) = self.bank.release(self.customer, &units) {
                tracing::error!(
                    %error,
                    customer = self.customer,
                    "failed to release grant on drop"
                );
            }
        }
    }
}

impl std::fmt::Debug for Grant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grant")
            .field("customer", &self.customer)
            .field("units", &self.units)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Bank, Matrix, ReleaseError, RequestError};

    fn bank() -> Bank {
        let maximum = Matrix::from_rows(vec![vec![2, 1], vec![1, 2]], 2).unwrap();
        Bank::new(vec![2, 2], maximum).unwrap()
    }

    #[test]
    fn test_drop_releases() {
        let bank = bank();
        {
            let grant = bank.acquire(0, &[1, 1]).unwrap();
            assert_eq!(grant.customer(), 0);
            assert_eq!(grant.units(), &[1, 1]);
            assert_eq!(bank.allocation(0), Some(vec![1, 1]));
        }
        assert_eq!(bank.allocation(0), Some(vec![0, 0]));
        assert_eq!(bank.available(), vec![2, 2]);
    }

    #[test]
    fn test_explicit_release() {
        let bank = bank();
        let grant = bank.acquire(1, &[1, 2]).unwrap();
        assert_eq!(grant.release(), Ok(()));
        assert_eq!(bank.available(), vec![2, 2]);
        // Dropping after an explicit release must not release twice.
        assert_eq!(bank.stats().released, 1);
    }

    #[test]
    fn test_denied_acquire_returns_error() {
        let bank = bank();
        let _held = bank.acquire(0, &[1, 1]).unwrap();
        assert!(matches!(
            bank.acquire(1, &[1, 0]),
            Err(RequestError::Unsafe { customer: 1 })
        ));
    }

    #[test]
    fn test_release_after_manual_release_reports_over_release() {
        let bank = bank();
        let grant = bank.acquire(0, &[1, 0]).unwrap();
        bank.release(0, &[1, 0]).unwrap();
        assert!(matches!(
            grant.release(),
            Err(ReleaseError::OverRelease { customer: 0, .. })
        ));
        bank.snapshot().check_invariants().unwrap();
    }

    #[test]
    fn test_drop_failure_does_not_panic() {
        let bank = bank();
        let grant = bank.acquire(0, &[1, 0]).unwrap();
        bank.release_all(0).unwrap();
        drop(grant);
        assert_eq!(bank.available(), vec![2, 2]);
    }
}
