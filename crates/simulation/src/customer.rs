// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The customer workload.
//!
//! A [`Customer`] repeatedly asks the bank for a random slice of its
//! remaining claim, holds it for a moment, and gives some of it back. When
//! its claim is fully satisfied it returns everything. Denials caused by
//! scarcity or unsafety are retried after a random pause; the bank itself
//! never makes anyone wait.

use banker::Bank;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// How a customer paces and retries its requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Request attempts.
    pub rounds: usize,
    /// Re-issues of a retryable denial before giving up on that request.
    pub max_retries: usize,
    /// Upper bound of the random pause between actions.
    pub max_delay: Duration,
}

/// What one customer did during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct CustomerReport {
    /// Customer index.
    pub customer: usize,
    /// Distinct requests issued (retries not included).
    pub requests: u64,
    /// Requests eventually granted.
    pub granted: u64,
    /// Re-issues after a retryable denial.
    pub retries: u64,
    /// Requests abandoned after exhausting the retry budget.
    pub gave_up: u64,
    /// Requests denied for a reason retrying cannot fix.
    pub permanent_denials: u64,
    /// Successful release calls, including the final one.
    pub releases: u64,
    /// Times the full claim was held and everything handed back.
    pub completions: u64,
    /// Total units granted across all resource types.
    pub units_granted: u64,
}

/// One simulated customer bound to a bank.
pub struct Customer {
    id: usize,
    bank: Bank,
    rng: StdRng,
    policy: RetryPolicy,
}

impl Customer {
    /// Creates customer `id` with its own seeded generator.
    pub fn new(id: usize, bank: Bank, seed: u64, policy: RetryPolicy) -> Self {
        Self {
            id,
            bank,
            rng: StdRng::seed_from_u64(seed),
            policy,
        }
    }

    /// Runs the workload to completion. Everything the customer holds is
    /// released before this returns.
    pub async fn run(mut self) -> CustomerReport {
        let mut report = CustomerReport {
            customer: self.id,
            ..Default::default()
        };
        tracing::debug!(customer = self.id, "customer started");

        for _ in 0..self.policy.rounds {
            let Some(need) = self.bank.need(self.id) else {
                tracing::warn!(customer = self.id, "bank does not know this customer");
                break;
            };

            if need.iter().all(|&n| n == 0) {
                // Full claim held: finish and start over.
                if self.release_everything(&mut report) {
                    report.completions += 1;
                }
                continue;
            }

            let request: Vec<u32> = need.iter().map(|&n| self.rng.random_range(0..=n)).collect();
            if request.iter().all(|&r| r == 0) {
                self.pause().await;
                continue;
            }

            report.requests += 1;
            let granted = self.request_with_retry(&request, &mut report).await;
            self.pause().await;

            if granted && self.rng.random_bool(0.5) {
                self.release_some(&mut report);
            }
        }

        self.release_everything(&mut report);
        tracing::debug!(customer = self.id, ?report, "customer finished");
        report
    }

    async fn request_with_retry(&mut self, request: &[u32], report: &mut CustomerReport) -> bool {
        let mut attempts = 0;
        loop {
            match self.bank.request(self.id, request) {
                Ok(()) => {
                    report.granted += 1;
                    report.units_granted += request.iter().map(|&r| u64::from(r)).sum::<u64>();
                    return true;
                }
                Err(e) if e.is_retryable() && attempts < self.policy.max_retries => {
                    attempts += 1;
                    report.retries += 1;
                    self.pause().await;
                }
                Err(e) if e.is_retryable() => {
                    tracing::debug!(customer = self.id, "giving up after {attempts} retries: {e}");
                    report.gave_up += 1;
                    return false;
                }
                Err(e) => {
                    tracing::warn!(customer = self.id, "request rejected: {e}");
                    report.permanent_denials += 1;
                    return false;
                }
            }
        }
    }

    /// Returns a random portion of the current holdings.
    fn release_some(&mut self, report: &mut CustomerReport) {
        let Some(held) = self.bank.allocation(self.id) else {
            return;
        };
        let release: Vec<u32> = held.iter().map(|&h| self.rng.random_range(0..=h)).collect();
        if release.iter().all(|&r| r == 0) {
            return;
        }
        match self.bank.release(self.id, &release) {
            Ok(()) => report.releases += 1,
            Err(e) => tracing::warn!(customer = self.id, "release rejected: {e}"),
        }
    }

    /// Returns all holdings. Returns `true` if anything was released.
    fn release_everything(&mut self, report: &mut CustomerReport) -> bool {
        match self.bank.release_all(self.id) {
            Ok(released) if released.iter().any(|&r| r > 0) => {
                report.releases += 1;
                true
            }
            Ok(_) => false,
            Err(e) => {
                tracing::warn!(customer = self.id, "release-all rejected: {e}");
                false
            }
        }
    }

    async fn pause(&mut self) {
        let micros = match pause_bound_micros(self.policy.max_delay) {
            0 => 0,
            max => self.rng.random_range(0..=max),
        };
        if micros == 0 {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(Duration::from_micros(micros)).await;
        }
    }
}

/// Upper bound of a pause in microseconds, saturating at `u64::MAX`.
fn pause_bound_micros(max_delay: Duration) -> u64 {
    u64::try_from(max_delay.as_micros()).unwrap_or(u64::MAX)
}
