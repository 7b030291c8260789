// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Dense customer × resource matrix of unit counts.

use crate::BankError;
use std::fmt;

/// A row-major `rows × cols` matrix of unit counts.
///
/// Row `i` is customer `i`, column `j` is resource type `j`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawMatrix")]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<u32>,
}

/// Unchecked wire form of [`Matrix`].
#[derive(serde::Deserialize)]
struct RawMatrix {
    rows: usize,
    cols: usize,
    data: Vec<u32>,
}

impl TryFrom<RawMatrix> for Matrix {
    type Error = BankError;

    fn try_from(raw: RawMatrix) -> Result<Self, Self::Error> {
        let expected = raw.rows.checked_mul(raw.cols).ok_or(BankError::DimensionMismatch {
            what: "matrix data".into(),
            expected: usize::MAX,
            actual: raw.data.len(),
        })?;
        if raw.data.len() != expected {
            return Err(BankError::DimensionMismatch {
                what: "matrix data".into(),
                expected,
                actual: raw.data.len(),
            });
        }
        Ok(Self {
            rows: raw.rows,
            cols: raw.cols,
            data: raw.data,
        })
    }
}

impl Matrix {
    /// Creates a zero-filled matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0; rows * cols],
        }
    }

    /// Builds a matrix from nested rows, checking every row has `cols` entries.
    pub fn from_rows(rows: Vec<Vec<u32>>, cols: usize) -> Result<Self, BankError> {
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(BankError::DimensionMismatch {
                    what: format!("row {i}"),
                    expected: cols,
                    actual: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Number of rows (customers).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (resource types).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns row `i`.
    ///
    /// # Panics
    /// Panics if `i >= rows`.
    pub fn row(&self, i: usize) -> &[u32] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Returns row `i` mutably.
    ///
    /// # Panics
    /// Panics if `i >= rows`.
    pub fn row_mut(&mut self, i: usize) -> &mut [u32] {
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Returns entry `(i, j)`.
    pub fn get(&self, i: usize, j: usize) -> u32 {
        self.data[i * self.cols + j]
    }

    /// Iterates over the rows in index order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[u32]> {
        // `chunks_exact(0)` panics, and a zero-column matrix has no data anyway.
        self.data.chunks_exact(self.cols.max(1)).take(self.rows)
    }

    /// Sum of column `j` across all rows, widened so it cannot overflow.
    pub fn column_sum(&self, j: usize) -> u64 {
        (0..self.rows).map(|i| u64::from(self.get(i, j))).sum()
    }

    /// Converts back into nested rows.
    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        self.iter_rows().map(<[u32]>::to_vec).collect()
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.iter_rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "C{i}: {row:?}")?;
        }
        Ok(())
    }
}
