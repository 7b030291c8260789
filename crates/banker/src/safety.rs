// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The Banker's safety check.
//!
//! A state is *safe* when the customers can be ordered so that each one, in
//! turn, can be handed its entire remaining need out of the units that are
//! free at that point, run to completion, and give back everything it holds.
//!
//! The simulation keeps a *work* vector of units that would be free. It
//! scans customers in ascending index order; the first unfinished customer
//! whose need fits into `work` is marked finished, its allocation is added to
//! `work`, and the scan restarts from customer 0. When a full scan finishes
//! nobody new, the state is safe iff everybody finished.
//!
//! ```text
//!   work = available
//!   ┌──────────────────────────────────────────────┐
//!   │ for i in 0..N (restart at 0 after a finish): │
//!   │   !finish[i] && need[i] <= work ?            │
//!   │       work += allocation[i]; finish[i] = true│
//!   └──────────────────────────────────────────────┘
//!   safe  ⇔  finish == [true; N]
//! ```
//!
//! Worst case O(N² · R). Both functions are pure: they only read their
//! arguments.

use crate::Matrix;

/// Returns `true` if the state described by the arguments is safe.
///
/// `allocation` and `need` must have the same shape and as many columns as
/// `available` has entries.
pub fn is_safe(available: &[u32], allocation: &Matrix, need: &Matrix) -> bool {
    run(available, allocation, need, |_| {})
}

/// Returns a completion order proving the state safe, or `None` if it is
/// unsafe.
///
/// The order is the one produced by the ascending, restart-from-zero scan,
/// so it is deterministic for a given state.
pub fn safe_sequence(available: &[u32], allocation: &Matrix, need: &Matrix) -> Option<Vec<usize>> {
    let mut order = Vec::with_capacity(need.rows());
    let safe = run(available, allocation, need, |i| order.push(i));
    safe.then_some(order)
}

fn run(
    available: &[u32],
    allocation: &Matrix,
    need: &Matrix,
    mut on_finish: impl FnMut(usize),
) -> bool {
    debug_assert_eq!(allocation.rows(), need.rows());
    debug_assert_eq!(allocation.cols(), available.len());
    debug_assert_eq!(need.cols(), available.len());

    let customers = need.rows();
    let mut work: Vec<u64> = available.iter().map(|&u| u64::from(u)).collect();
    let mut finish = vec![false; customers];
    let mut finished = 0;

    'scan: while finished < customers {
        for i in 0..customers {
            if finish[i] || !fits(need.row(i), &work) {
                continue;
            }
            for (w, &held) in work.iter_mut().zip(allocation.row(i)) {
                *w += u64::from(held);
            }
            finish[i] = true;
            finished += 1;
            on_finish(i);
            continue 'scan;
        }
        // A full pass finished nobody.
        break;
    }

    finished == customers
}

fn fits(need: &[u32], work: &[u64]) -> bool {
    need.iter().zip(work).all(|(&n, &w)| u64::from(n) <= w)
}
