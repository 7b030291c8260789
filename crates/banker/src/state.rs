// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The allocation state: Available, Maximum, Allocation and Need.
//!
//! Outside a critical section the state always satisfies, for every
//! customer `i` and resource `j`:
//!
//! 1. `need[i][j] == maximum[i][j] - allocation[i][j]`
//! 2. `allocation[i][j] <= maximum[i][j]`
//! 3. `available[j] + Σ_i allocation[i][j] == total[j]`
//!
//! Non-negativity comes from the unsigned unit type.
//!
//! [`State`] is crate-private and only mutated by the protocol code in
//! [`Bank`](crate::Bank). Callers see [`StateSnapshot`]s.

use crate::{safety, BankError, Matrix, ReleaseError, RequestError};

/// An owned copy of the full allocation state at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StateSnapshot {
    /// Units owned per resource type. Fixed for the bank's lifetime.
    pub total: Vec<u32>,
    /// Units currently free per resource type.
    pub available: Vec<u32>,
    /// Declared maximum claim per customer and resource.
    pub maximum: Matrix,
    /// Units currently held per customer and resource.
    pub allocation: Matrix,
    /// Remaining claim per customer and resource.
    pub need: Matrix,
}

impl StateSnapshot {
    /// Verifies the state invariants, reporting the first violation.
    pub fn check_invariants(&self) -> Result<(), BankError> {
        check_invariants(
            &self.total,
            &self.available,
            &self.maximum,
            &self.allocation,
            &self.need,
        )
    }

    /// Runs the safety check on this snapshot.
    pub fn is_safe(&self) -> bool {
        safety::is_safe(&self.available, &self.allocation, &self.need)
    }

    /// Returns a safe completion order for this snapshot, if one exists.
    pub fn safe_sequence(&self) -> Option<Vec<usize>> {
        safety::safe_sequence(&self.available, &self.allocation, &self.need)
    }

    /// Number of customers.
    pub fn customers(&self) -> usize {
        self.maximum.rows()
    }

    /// Number of resource types.
    pub fn resources(&self) -> usize {
        self.total.len()
    }
}

/// The live allocation state guarded by the bank's lock.
#[derive(Debug)]
pub(crate) struct State {
    total: Vec<u32>,
    available: Vec<u32>,
    maximum: Matrix,
    allocation: Matrix,
    need: Matrix,
}

impl State {
    /// Builds a state from totals, claims and an initial allocation.
    ///
    /// Available is derived as `total - Σ allocation`.
    pub(crate) fn new(total: Vec<u32>, maximum: Matrix, allocation: Matrix) -> Result<Self, BankError> {
        let resources = total.len();
        let customers = maximum.rows();

        if resources == 0 {
            return Err(BankError::NoResources);
        }
        if customers == 0 {
            return Err(BankError::NoCustomers);
        }
        if let Some(resource) = total.iter().position(|&t| t == 0) {
            return Err(BankError::ZeroTotal { resource });
        }
        shape_check("maximum columns", resources, maximum.cols())?;
        shape_check("allocation rows", customers, allocation.rows())?;
        shape_check("allocation columns", resources, allocation.cols())?;

        for i in 0..customers {
            for j in 0..resources {
                let claim = maximum.get(i, j);
                if claim > total[j] {
                    return Err(BankError::ClaimExceedsTotal {
                        customer: i,
                        resource: j,
                        claim,
                        total: total[j],
                    });
                }
                let allocated = allocation.get(i, j);
                if allocated > claim {
                    return Err(BankError::AllocationExceedsClaim {
                        customer: i,
                        resource: j,
                        allocated,
                        claim,
                    });
                }
            }
        }

        let mut available = Vec::with_capacity(resources);
        for (j, &t) in total.iter().enumerate() {
            let allocated = allocation.column_sum(j);
            let free = u64::from(t).checked_sub(allocated).ok_or(
                BankError::AllocationExceedsTotal {
                    resource: j,
                    allocated,
                    total: t,
                },
            )?;
            // free <= t, so it fits.
            available.push(free as u32);
        }

        let mut need = maximum.clone();
        for i in 0..customers {
            for (n, &held) in need.row_mut(i).iter_mut().zip(allocation.row(i)) {
                *n -= held;
            }
        }

        Ok(Self {
            total,
            available,
            maximum,
            allocation,
            need,
        })
    }

    pub(crate) fn customers(&self) -> usize {
        self.maximum.rows()
    }

    pub(crate) fn resources(&self) -> usize {
        self.total.len()
    }

    pub(crate) fn total(&self) -> &[u32] {
        &self.total
    }

    pub(crate) fn available(&self) -> &[u32] {
        &self.available
    }

    pub(crate) fn need(&self, customer: usize) -> &[u32] {
        self.need.row(customer)
    }

    pub(crate) fn allocation(&self, customer: usize) -> &[u32] {
        self.allocation.row(customer)
    }

    /// Validates a request against customer index, shape, claim and
    /// availability, in that order. Does not mutate.
    pub(crate) fn validate_request(&self, customer: usize, request: &[u32]) -> Result<(), RequestError> {
        if customer >= self.customers() {
            return Err(RequestError::InvalidCustomer {
                customer,
                customers: self.customers(),
            });
        }
        if request.len() != self.resources() {
            return Err(RequestError::InvalidVector {
                expected: self.resources(),
                actual: request.len(),
            });
        }

        let need = self.need.row(customer);
        if let Some(j) = (0..request.len()).find(|&j| request[j] > need[j]) {
            return Err(RequestError::ClaimExceeded {
                customer,
                resource: j,
                requested: request[j],
                need: need[j],
            });
        }

        if let Some(j) = (0..request.len()).find(|&j| request[j] > self.available[j]) {
            return Err(RequestError::InsufficientAvailable {
                resource: j,
                requested: request[j],
                available: self.available[j],
            });
        }

        Ok(())
    }

    /// Moves `request` from Available to the customer's Allocation.
    ///
    /// Callers must have passed [`State::validate_request`] first.
    pub(crate) fn apply_request(&mut self, customer: usize, request: &[u32]) {
        let allocation = self.allocation.row_mut(customer);
        let need = self.need.row_mut(customer);
        for j in 0..request.len() {
            self.available[j] -= request[j];
            allocation[j] += request[j];
            need[j] -= request[j];
        }
    }

    /// Exact inverse of [`State::apply_request`].
    pub(crate) fn rollback_request(&mut self, customer: usize, request: &[u32]) {
        let allocation = self.allocation.row_mut(customer);
        let need = self.need.row_mut(customer);
        for j in 0..request.len() {
            self.available[j] += request[j];
            allocation[j] -= request[j];
            need[j] += request[j];
        }
    }

    /// Validates a release against customer index, shape and holdings.
    pub(crate) fn validate_release(&self, customer: usize, release: &[u32]) -> Result<(), ReleaseError> {
        if customer >= self.customers() {
            return Err(ReleaseError::InvalidCustomer {
                customer,
                customers: self.customers(),
            });
        }
        if release.len() != self.resources() {
            return Err(ReleaseError::InvalidVector {
                expected: self.resources(),
                actual: release.len(),
            });
        }

        let held = self.allocation.row(customer);
        if let Some(j) = (0..release.len()).find(|&j| release[j] > held[j]) {
            return Err(ReleaseError::OverRelease {
                customer,
                resource: j,
                released: release[j],
                held: held[j],
            });
        }

        Ok(())
    }

    /// Moves `release` from the customer's Allocation back to Available.
    ///
    /// Callers must have passed [`State::validate_release`] first.
    pub(crate) fn apply_release(&mut self, customer: usize, release: &[u32]) {
        // Same arithmetic as undoing a request.
        self.rollback_request(customer, release);
    }

    pub(crate) fn is_safe(&self) -> bool {
        safety::is_safe(&self.available, &self.allocation, &self.need)
    }

    pub(crate) fn safe_sequence(&self) -> Option<Vec<usize>> {
        safety::safe_sequence(&self.available, &self.allocation, &self.need)
    }

    pub(crate) fn check_invariants(&self) -> Result<(), BankError> {
        check_invariants(
            &self.total,
            &self.available,
            &self.maximum,
            &self.allocation,
            &self.need,
        )
    }

    pub(crate) fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            total: self.total.clone(),
            available: self.available.clone(),
            maximum: self.maximum.clone(),
            allocation: self.allocation.clone(),
            need: self.need.clone(),
        }
    }
}

fn shape_check(what: &str, expected: usize, actual: usize) -> Result<(), BankError> {
    if expected != actual {
        return Err(BankError::DimensionMismatch {
            what: what.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

fn check_invariants(
    total: &[u32],
    available: &[u32],
    maximum: &Matrix,
    allocation: &Matrix,
    need: &Matrix,
) -> Result<(), BankError> {
    let violation = |msg: String| Err(BankError::InvariantViolation(msg));

    let resources = total.len();
    let customers = maximum.rows();
    if available.len() != resources
        || maximum.cols() != resources
        || allocation.cols() != resources
        || need.cols() != resources
        || allocation.rows() != customers
        || need.rows() != customers
    {
        return violation("matrix shapes disagree".into());
    }

    for i in 0..customers {
        for j in 0..resources {
            let (max, held, remaining) = (maximum.get(i, j), allocation.get(i, j), need.get(i, j));
            if held > max {
                return violation(format!(
                    "customer {i} holds {held} of resource {j}, above its claim of {max}"
                ));
            }
            if remaining != max - held {
                return violation(format!(
                    "customer {i} need for resource {j} is {remaining}, expected {}",
                    max - held
                ));
            }
        }
    }

    for j in 0..resources {
        let accounted = u64::from(available[j]) + allocation.column_sum(j);
        if accounted != u64::from(total[j]) {
            return violation(format!(
                "resource {j}: available + allocated = {accounted}, total is {}",
                total[j]
            ));
        }
    }

    Ok(())
}
