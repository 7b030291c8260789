// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The bank: a lock-guarded allocation state with the request and release
//! protocols.
//!
//! Every public method takes the lock exactly once and holds it for its
//! whole body, so calls are totally ordered and no caller ever observes a
//! tentatively applied request:
//!
//! ```text
//! request(c, v)
//!   lock ─► validate (customer, shape, claim, availability)
//!        ─► apply v tentatively
//!        ─► safety check ── safe ──► commit         ─► Ok(())
//!                        └─ unsafe ► roll back v    ─► Err(Unsafe)
//!   unlock ─► log outcome
//! ```
//!
//! Requests never wait for resources: scarcity and unsafety are reported
//! immediately and retrying is the caller's policy.
//!
//! # Thread Safety
//! `Bank` is a cheap `Clone` handle over `Arc<Mutex<..>>` and is
//! `Send + Sync`. The lock is a `parking_lot::Mutex` and does not poison.
//! Log events are emitted only after the lock is released.

use crate::state::State;
use crate::{
    claims, BankError, BankStats, Grant, Matrix, ReleaseError, RequestError, StateSnapshot,
};
use parking_lot::Mutex;
use rand::Rng;
use std::sync::Arc;

/// Everything behind the lock.
#[derive(Debug)]
struct Ledger {
    state: State,
    stats: BankStats,
}

impl Ledger {
    fn request(&mut self, customer: usize, request: &[u32]) -> Result<(), RequestError> {
        self.state.validate_request(customer, request)?;

        self.state.apply_request(customer, request);
        self.stats.record_safety_check();
        if !self.state.is_safe() {
            self.state.rollback_request(customer, request);
            return Err(RequestError::Unsafe { customer });
        }

        debug_assert!(self.state.check_invariants().is_ok());
        Ok(())
    }

    fn release(&mut self, customer: usize, release: &[u32]) -> Result<(), ReleaseError> {
        self.state.validate_release(customer, release)?;
        self.state.apply_release(customer, release);
        debug_assert!(self.state.check_invariants().is_ok());
        Ok(())
    }
}

/// A Banker's-algorithm allocator shared by a fixed set of customers.
///
/// # Example
/// ```
/// use banker::{Bank, Matrix, RequestError};
///
/// let maximum = Matrix::from_rows(vec![vec![2, 1], vec![1, 2]], 2).unwrap();
/// let bank = Bank::new(vec![2, 2], maximum).unwrap();
///
/// bank.request(0, &[1, 1]).unwrap();
/// assert_eq!(bank.available(), vec![1, 1]);
///
/// // Customer 1 may not take the last unit of resource 0: neither
/// // customer could then finish.
/// assert!(matches!(bank.request(1, &[1, 0]), Err(RequestError::Unsafe { .. })));
///
/// bank.release(0, &[1, 1]).unwrap();
/// assert_eq!(bank.available(), vec![2, 2]);
/// ```
#[derive(Clone)]
pub struct Bank {
    inner: Arc<Mutex<Ledger>>,
}

impl Bank {
    /// Opens a bank where nothing is allocated yet.
    ///
    /// `maximum` has one row per customer and one column per resource type;
    /// every claim must fit within the corresponding total.
    pub fn new(totals: Vec<u32>, maximum: Matrix) -> Result<Self, BankError> {
        let allocation = Matrix::zeros(maximum.rows(), maximum.cols());
        Self::from_parts(totals, maximum, allocation)
    }

    /// Opens a bank whose customers already hold `allocation`.
    ///
    /// Available is derived as `totals - Σ allocation`. The initial state
    /// is not required to be safe; an unsafe start is logged.
    pub fn from_parts(totals: Vec<u32>, maximum: Matrix, allocation: Matrix) -> Result<Self, BankError> {
        let state = State::new(totals, maximum, allocation)?;

        tracing::info!(
            customers = state.customers(),
            resources = state.resources(),
            "bank opened with totals {:?}, available {:?}",
            state.total(),
            state.available(),
        );
        if !state.is_safe() {
            tracing::warn!("bank opened in an unsafe state; some requests can never be granted");
        }

        Ok(Self {
            inner: Arc::new(Mutex::new(Ledger {
                state,
                stats: BankStats::default(),
            })),
        })
    }

    /// Opens a bank whose maximum claims are drawn from `rng`.
    ///
    /// See [`claims::random_maximum`].
    pub fn with_random_claims<R: Rng + ?Sized>(
        totals: Vec<u32>,
        customers: usize,
        rng: &mut R,
    ) -> Result<Self, BankError> {
        let maximum = claims::random_maximum(rng, &totals, customers);
        Self::new(totals, maximum)
    }

    /// Requests `request[j]` more units of each resource `j` for `customer`.
    ///
    /// Checks, in order: the customer index, the vector length, the
    /// customer's remaining claim, current availability, and finally
    /// whether the resulting state is safe. Returns `Ok(())` when granted;
    /// on any error the state is left exactly as it was.
    pub fn request(&self, customer: usize, request: &[u32]) -> Result<(), RequestError> {
        let outcome = {
            let mut ledger = self.inner.lock();
            let outcome = ledger.request(customer, request);
            ledger.stats.record_request(&outcome);
            outcome
        };

        match &outcome {
            Ok(()) => tracing::debug!(customer, ?request, "request granted"),
            Err(e) => tracing::debug!(customer, ?request, "request denied: {e}"),
        }
        outcome
    }

    /// Returns `release[j]` units of each resource `j` held by `customer`.
    ///
    /// Releasing only ever increases availability, so no safety check is
    /// needed. Returns `Err(OverRelease)` without modifying anything if the
    /// customer holds fewer units than it tries to return.
    pub fn release(&self, customer: usize, release: &[u32]) -> Result<(), ReleaseError> {
        let outcome = {
            let mut ledger = self.inner.lock();
            let outcome = ledger.release(customer, release);
            ledger.stats.record_release(&outcome);
            outcome
        };

        match &outcome {
            Ok(()) => tracing::debug!(customer, ?release, "released"),
            Err(e) => tracing::debug!(customer, ?release, "release rejected: {e}"),
        }
        outcome
    }

    /// Returns everything `customer` holds, in a single critical section.
    ///
    /// Returns the vector that was released.
    pub fn release_all(&self, customer: usize) -> Result<Vec<u32>, ReleaseError> {
        let outcome = {
            let mut ledger = self.inner.lock();
            let outcome = if customer < ledger.state.customers() {
                let held = ledger.state.allocation(customer).to_vec();
                ledger.release(customer, &held).map(|()| held)
            } else {
                Err(ReleaseError::InvalidCustomer {
                    customer,
                    customers: ledger.state.customers(),
                })
            };
            ledger
                .stats
                .record_release(&outcome.as_ref().map(|_| ()).map_err(ReleaseError::clone));
            outcome
        };

        match &outcome {
            Ok(held) => tracing::debug!(customer, released = ?held, "released all holdings"),
            Err(e) => tracing::debug!(customer, "release-all rejected: {e}"),
        }
        outcome
    }

    /// Requests `request` and wraps the grant in a guard that releases it
    /// when dropped.
    pub fn acquire(&self, customer: usize, request: &[u32]) -> Result<Grant, RequestError> {
        self.request(customer, request)?;
        Ok(Grant::new(self.clone(), customer, request.to_vec()))
    }

    /// Number of customers served.
    pub fn customers(&self) -> usize {
        self.inner.lock().state.customers()
    }

    /// Number of resource types managed.
    pub fn resources(&self) -> usize {
        self.inner.lock().state.resources()
    }

    /// Units owned per resource type.
    pub fn totals(&self) -> Vec<u32> {
        self.inner.lock().state.total().to_vec()
    }

    /// Units currently free per resource type.
    pub fn available(&self) -> Vec<u32> {
        self.inner.lock().state.available().to_vec()
    }

    /// Remaining claim of `customer`, or `None` for an unknown customer.
    pub fn need(&self, customer: usize) -> Option<Vec<u32>> {
        let ledger = self.inner.lock();
        (customer < ledger.state.customers()).then(|| ledger.state.need(customer).to_vec())
    }

    /// Units held by `customer`, or `None` for an unknown customer.
    pub fn allocation(&self, customer: usize) -> Option<Vec<u32>> {
        let ledger = self.inner.lock();
        (customer < ledger.state.customers()).then(|| ledger.state.allocation(customer).to_vec())
    }

    /// Copies the full state.
    pub fn snapshot(&self) -> StateSnapshot {
        self.inner.lock().state.snapshot()
    }

    /// Runs the safety check on the current state.
    pub fn is_safe(&self) -> bool {
        self.inner.lock().state.is_safe()
    }

    /// Returns a safe completion order for the current state, if one exists.
    pub fn safe_sequence(&self) -> Option<Vec<usize>> {
        self.inner.lock().state.safe_sequence()
    }

    /// Returns a copy of the outcome counters.
    pub fn stats(&self) -> BankStats {
        self.inner.lock().stats.clone()
    }
}

impl std::fmt::Debug for Bank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (customers, totals, available) = {
            let ledger = self.inner.lock();
            (
                ledger.state.customers(),
                ledger.state.total().to_vec(),
                ledger.state.available().to_vec(),
            )
        };
        f.debug_struct("Bank")
            .field("customers", &customers)
            .field("totals", &totals)
            .field("available", &available)
            .finish()
    }
}
