// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the allocator.
//!
//! Construction problems are reported as [`BankError`]. Denied requests and
//! rejected releases are ordinary steady-state outcomes, reported as
//! [`RequestError`] and [`ReleaseError`]; none of them leave the bank in a
//! modified state.

/// Errors that can occur while building a [`Bank`](crate::Bank) or parsing
/// its initial configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BankError {
    /// No resource types were configured.
    #[error("at least one resource type is required")]
    NoResources,

    /// No customers were configured.
    #[error("at least one customer is required")]
    NoCustomers,

    /// A resource type was configured with a total of zero units.
    #[error("resource {resource} has a total of zero units")]
    ZeroTotal { resource: usize },

    /// A matrix or vector had the wrong shape.
    #[error("{what}: expected length {expected}, got {actual}")]
    DimensionMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    /// A customer declared a maximum claim larger than the system owns.
    #[error("customer {customer} claims {claim} units of resource {resource}, but only {total} exist")]
    ClaimExceedsTotal {
        customer: usize,
        resource: usize,
        claim: u32,
        total: u32,
    },

    /// An initial allocation exceeds the customer's declared claim.
    #[error("customer {customer} starts with {allocated} units of resource {resource}, above its claim of {claim}")]
    AllocationExceedsClaim {
        customer: usize,
        resource: usize,
        allocated: u32,
        claim: u32,
    },

    /// The initial allocations of a resource add up to more than its total.
    #[error("resource {resource} is over-allocated: {allocated} units handed out, total is {total}")]
    AllocationExceedsTotal {
        resource: usize,
        allocated: u64,
        total: u32,
    },

    /// A resource-totals string could not be parsed.
    #[error("invalid resource totals '{input}': {reason}")]
    InvalidTotals { input: String, reason: String },

    /// The allocation state broke one of its invariants.
    #[error("state invariant violated: {0}")]
    InvariantViolation(String),
}

/// Why a request was not granted.
///
/// The variants are checked in declaration order: customer, vector shape,
/// claim, availability, then safety.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// The customer index is outside `0..customers`.
    #[error("invalid customer {customer} (bank serves {customers} customers)")]
    InvalidCustomer { customer: usize, customers: usize },

    /// The request vector does not have one entry per resource type.
    #[error("request vector has {actual} entries, expected {expected}")]
    InvalidVector { expected: usize, actual: usize },

    /// The customer asked for more than its remaining declared need.
    #[error("customer {customer} requested {requested} units of resource {resource}, but its remaining claim is {need}")]
    ClaimExceeded {
        customer: usize,
        resource: usize,
        requested: u32,
        need: u32,
    },

    /// The units do not exist right now.
    #[error("requested {requested} units of resource {resource}, only {available} available")]
    InsufficientAvailable {
        resource: usize,
        requested: u32,
        available: u32,
    },

    /// Granting the request would leave the system in an unsafe state.
    #[error("granting the request of customer {customer} would leave the system unsafe")]
    Unsafe { customer: usize },
}

impl RequestError {
    /// Returns `true` if re-issuing the same request later may succeed.
    ///
    /// Scarcity and unsafety depend on what other customers hold; the other
    /// denials will fail identically every time.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RequestError::InsufficientAvailable { .. } | RequestError::Unsafe { .. }
        )
    }
}

/// Why a release was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReleaseError {
    /// The customer index is outside `0..customers`.
    #[error("invalid customer {customer} (bank serves {customers} customers)")]
    InvalidCustomer { customer: usize, customers: usize },

    /// The release vector does not have one entry per resource type.
    #[error("release vector has {actual} entries, expected {expected}")]
    InvalidVector { expected: usize, actual: usize },

    /// The customer tried to return more than it holds.
    #[error("customer {customer} tried to release {released} units of resource {resource}, but holds {held}")]
    OverRelease {
        customer: usize,
        resource: usize,
        released: u32,
        held: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(RequestError::Unsafe { customer: 0 }.is_retryable());
        assert!(RequestError::InsufficientAvailable {
            resource: 1,
            requested: 3,
            available: 2
        }
        .is_retryable());
        assert!(!RequestError::InvalidCustomer {
            customer: 9,
            customers: 5
        }
        .is_retryable());
        assert!(!RequestError::ClaimExceeded {
            customer: 0,
            resource: 0,
            requested: 8,
            need: 7
        }
        .is_retryable());
        assert!(!RequestError::InvalidVector {
            expected: 3,
            actual: 2
        }
        .is_retryable());
    }

    #[test]
    fn test_messages_name_the_offender() {
        let e = RequestError::ClaimExceeded {
            customer: 2,
            resource: 1,
            requested: 4,
            need: 3,
        };
        let msg = e.to_string();
        assert!(msg.contains("customer 2"));
        assert!(msg.contains("resource 1"));

        let e = ReleaseError::OverRelease {
            customer: 4,
            resource: 0,
            released: 5,
            held: 1,
        };
        assert!(e.to_string().contains("holds 1"));
    }
}
