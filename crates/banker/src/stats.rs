// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Outcome counters for profiling and diagnostics.
//!
//! [`BankStats`] tracks how requests and releases resolved over the bank's
//! lifetime: how often customers were granted, and why they were not.

use crate::{ReleaseError, RequestError};

/// Cumulative statistics about bank usage.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct BankStats {
    /// Total number of request calls.
    pub requests: u64,
    /// Requests that were granted.
    pub granted: u64,
    /// Requests rejected for an unknown customer or malformed vector.
    pub invalid_requests: u64,
    /// Requests that exceeded the customer's remaining claim.
    pub claim_exceeded: u64,
    /// Requests for units that were not available.
    pub insufficient_available: u64,
    /// Requests that would have left the system unsafe.
    pub denied_unsafe: u64,
    /// Number of times the safety check ran.
    pub safety_checks: u64,
    /// Total number of release calls.
    pub releases: u64,
    /// Releases that were applied.
    pub released: u64,
    /// Releases rejected for an unknown customer or malformed vector.
    pub invalid_releases: u64,
    /// Releases of more than the customer held.
    pub over_releases: u64,
}

impl BankStats {
    /// Returns the fraction of requests that were granted, in `[0.0, 1.0]`.
    ///
    /// Returns `0.0` if no requests have been made.
    pub fn grant_ratio(&self) -> f64 {
        if self.requests == 0 {
            return 0.0;
        }
        self.granted as f64 / self.requests as f64
    }

    /// Total number of denied requests.
    pub fn denied(&self) -> u64 {
        self.requests - self.granted
    }

    pub(crate) fn record_request(&mut self, outcome: &Result<(), RequestError>) {
        self.requests += 1;
        match outcome {
            Ok(()) => self.granted += 1,
            Err(RequestError::InvalidCustomer { .. } | RequestError::InvalidVector { .. }) => {
                self.invalid_requests += 1
            }
            Err(RequestError::ClaimExceeded { .. }) => self.claim_exceeded += 1,
            Err(RequestError::InsufficientAvailable { .. }) => self.insufficient_available += 1,
            Err(RequestError::Unsafe { .. }) => self.denied_unsafe += 1,
        }
    }

    pub(crate) fn record_safety_check(&mut self) {
        self.safety_checks += 1;
    }

    pub(crate) fn record_release(&mut self, outcome: &Result<(), ReleaseError>) {
        self.releases += 1;
        match outcome {
            Ok(()) => self.released += 1,
            Err(ReleaseError::InvalidCustomer { .. } | ReleaseError::InvalidVector { .. }) => {
                self.invalid_releases += 1
            }
            Err(ReleaseError::OverRelease { .. }) => self.over_releases += 1,
        }
    }

    /// Returns a human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "Requests: {} total ({} granted, {:.0}% grant rate; denied: {} unsafe, \
             {} insufficient, {} over claim, {} invalid), {} safety checks, \
             releases: {} total ({} applied, {} over-release, {} invalid)",
            self.requests,
            self.granted,
            self.grant_ratio() * 100.0,
            self.denied_unsafe,
            self.insufficient_available,
            self.claim_exceeded,
            self.invalid_requests,
            self.safety_checks,
            self.releases,
            self.released,
            self.over_releases,
            self.invalid_releases,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let s = BankStats::default();
        assert_eq!(s.requests, 0);
        assert_eq!(s.grant_ratio(), 0.0);
    }

    #[test]
    fn test_request_classification() {
        let mut s = BankStats::default();
        s.record_request(&Ok(()));
        s.record_request(&Ok(()));
        s.record_request(&Err(RequestError::Unsafe { customer: 0 }));
        s.record_request(&Err(RequestError::InvalidVector {
            expected: 3,
            actual: 1,
        }));
        s.record_request(&Err(RequestError::InsufficientAvailable {
            resource: 0,
            requested: 2,
            available: 1,
        }));
        assert_eq!(s.requests, 5);
        assert_eq!(s.granted, 2);
        assert_eq!(s.denied(), 3);
        assert_eq!(s.denied_unsafe, 1);
        assert_eq!(s.invalid_requests, 1);
        assert_eq!(s.insufficient_available, 1);
        assert!((s.grant_ratio() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_release_classification() {
        let mut s = BankStats::default();
        s.record_release(&Ok(()));
        s.record_release(&Err(ReleaseError::OverRelease {
            customer: 0,
            resource: 0,
            released: 3,
            held: 1,
        }));
        assert_eq!(s.releases, 2);
        assert_eq!(s.released, 1);
        assert_eq!(s.over_releases, 1);
    }

    #[test]
    fn test_summary() {
        let mut s = BankStats::default();
        s.record_request(&Ok(()));
        s.record_safety_check();
        s.record_release(&Ok(()));
        let summary = s.summary();
        assert!(summary.contains("1 total (1 granted"));
        assert!(summary.contains("1 safety checks"));
    }
}
