// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # banker
//!
//! A deadlock-avoiding allocator for a fixed set of customers sharing a
//! fixed pool of reusable resource types, built on Dijkstra's Banker's
//! algorithm.
//!
//! Each customer declares up front the most it will ever hold of each
//! resource type. A request is granted only if, afterwards, there is still
//! some order in which every customer could obtain its full remaining claim
//! and finish. Requests that cannot be granted right now are denied
//! immediately; nothing blocks.
//!
//! # Key Components
//!
//! - [`Bank`]: the shared allocator, which validates and applies requests and
//!   releases under a single lock.
//! - [`safety`]: the pure safety check over a state.
//! - [`StateSnapshot`]: an owned copy of Available, Maximum, Allocation and
//!   Need, with invariant checking.
//! - [`Grant`]: an RAII guard that releases its units on drop.
//! - [`ResourceTotals`]: parsing of `"10,5,7"`-style totals.
//! - [`claims`]: seedable random generation of maximum claims.
//! - [`BankStats`]: cumulative outcome counters.
//!
//! # Data Model
//!
//! ```text
//!              resource j ─►
//!            ┌─────────────┐
//! Available  │ 3   3   2   │                      free units
//!            └─────────────┘
//!            ┌─────────────┐ ┌─────────────┐ ┌─────────────┐
//! customer i │ Maximum     │=│ Allocation  │+│ Need        │
//!     │      │ 7   5   3   │ │ 0   1   0   │ │ 7   4   3   │
//!     ▼      │ ...         │ │ ...         │ │ ...         │
//!            └─────────────┘ └─────────────┘ └─────────────┘
//!
//! Available[j] + Σ_i Allocation[i][j] == Total[j]
//! ```
//!
//! # Example
//! ```
//! use banker::{Bank, Matrix, RequestError};
//!
//! let maximum = Matrix::from_rows(
//!     vec![
//!         vec![7, 5, 3],
//!         vec![3, 2, 2],
//!         vec![9, 0, 2],
//!         vec![2, 2, 2],
//!         vec![4, 3, 3],
//!     ],
//!     3,
//! )
//! .unwrap();
//! let allocation = Matrix::from_rows(
//!     vec![
//!         vec![0, 1, 0],
//!         vec![2, 0, 0],
//!         vec![3, 0, 2],
//!         vec![2, 1, 1],
//!         vec![0, 0, 2],
//!     ],
//!     3,
//! )
//! .unwrap();
//! let bank = Bank::from_parts(vec![10, 5, 7], maximum, allocation).unwrap();
//!
//! assert_eq!(bank.available(), vec![3, 3, 2]);
//! assert_eq!(bank.safe_sequence(), Some(vec![1, 3, 0, 2, 4]));
//!
//! bank.request(1, &[1, 0, 2]).unwrap();
//! assert!(matches!(
//!     bank.request(0, &[1, 0, 2]),
//!     Err(RequestError::InsufficientAvailable { .. })
//! ));
//! ```

mod bank;
pub mod claims;
mod error;
mod grant;
mod matrix;
pub mod safety;
mod state;
mod stats;
mod totals;

pub use bank::Bank;
pub use error::{BankError, ReleaseError, RequestError};
pub use grant::Grant;
pub use matrix::Matrix;
pub use state::StateSnapshot;
pub use stats::BankStats;
pub use totals::ResourceTotals;
