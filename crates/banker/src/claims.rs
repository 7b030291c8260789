// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Random maximum-claim generation.
//!
//! When a deployment does not declare its customers' maximum claims, each
//! `Maximum[i][j]` is drawn uniformly from `0..=Total[j]`. The generator is
//! injected so runs are reproducible.

use crate::Matrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Draws a `customers × totals.len()` maximum-claim matrix from `rng`.
pub fn random_maximum<R: Rng + ?Sized>(rng: &mut R, totals: &[u32], customers: usize) -> Matrix {
    let mut maximum = Matrix::zeros(customers, totals.len());
    for i in 0..customers {
        for (claim, &total) in maximum.row_mut(i).iter_mut().zip(totals) {
            *claim = rng.random_range(0..=total);
        }
    }
    maximum
}

/// Like [`random_maximum`], seeding a [`StdRng`] from `seed`.
///
/// # Examples
/// ```
/// use banker::claims::seeded_maximum;
///
/// let a = seeded_maximum(7, &[10, 5, 7], 5);
/// let b = seeded_maximum(7, &[10, 5, 7], 5);
/// assert_eq!(a, b);
/// ```
pub fn seeded_maximum(seed: u64, totals: &[u32], customers: usize) -> Matrix {
    let mut rng = StdRng::seed_from_u64(seed);
    random_maximum(&mut rng, totals, customers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape() {
        let m = seeded_maximum(1, &[10, 5, 7], 4);
        assert_eq!(m.rows(), 4);
        assert_eq!(m.cols(), 3);
    }

    #[test]
    fn test_claims_bounded_by_totals() {
        let totals = [10, 5, 7, 1];
        for seed in 0..50 {
            let m = seeded_maximum(seed, &totals, 8);
            for row in m.iter_rows() {
                for (&claim, &total) in row.iter().zip(&totals) {
                    assert!(claim <= total);
                }
            }
        }
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        assert_eq!(
            seeded_maximum(99, &[10, 5, 7], 5),
            seeded_maximum(99, &[10, 5, 7], 5)
        );
    }

    #[test]
    fn test_different_seeds_differ() {
        // 50 entries drawn from 0..=1000; equal matrices mean the seed is ignored.
        let a = seeded_maximum(1, &[1000; 10], 5);
        let b = seeded_maximum(2, &[1000; 10], 5);
        assert_ne!(a, b);
    }

    #[test]
    fn test_injected_rng() {
        let mut rng = StdRng::seed_from_u64(5);
        let m = random_maximum(&mut rng, &[3, 3], 2);
        assert_eq!(m, seeded_maximum(5, &[3, 3], 2));
    }
}
