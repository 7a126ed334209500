//! Shared test helpers for the kernel integration test suite.
//!
//! Provides deterministic random generators, model problem builders, dense
//! reference implementations, and a fault-injecting communicator used across
//! all test modules.

#![allow(dead_code)]

use sparsemg::comm::Communicator;
use sparsemg::error::CommError;
use sparsemg::types::{MgLinkage, SparseMatrix, Vector};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Random number generator (simple LCG for deterministic reproducibility)
// ---------------------------------------------------------------------------

/// A minimal linear congruential generator for deterministic test data.
///
/// Uses the Numerical Recipes LCG parameters. Not cryptographically secure,
/// but perfectly adequate for generating reproducible test vectors.
pub struct Lcg {
    state: u64,
}

impl Lcg {
    /// Create a new LCG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Generate the next u64 value.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    /// Generate a uniform f64 in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Generate a uniform f64 in [lo, hi).
    pub fn next_f64_range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

// ---------------------------------------------------------------------------
// Model problems
// ---------------------------------------------------------------------------

/// 1-D Laplacian (tridiagonal [-1, 2, -1]) of dimension `n`, no halo columns.
///
/// Symmetric positive-definite, which makes it a faithful stand-in for the
/// solver's model problem on a single process.
pub fn laplacian_1d(n: usize) -> SparseMatrix {
    let mut entries = Vec::with_capacity(3 * n);
    for i in 0..n {
        if i > 0 {
            entries.push((i, i - 1, -1.0));
        }
        entries.push((i, i, 2.0));
        if i + 1 < n {
            entries.push((i, i + 1, -1.0));
        }
    }
    SparseMatrix::from_coo(n, n, entries).unwrap()
}

/// Deterministic random vector of length `n`, values in [-1, 1).
pub fn random_vector(n: usize, seed: u64) -> Vector {
    let mut rng = Lcg::new(seed);
    Vector::from_values((0..n).map(|_| rng.next_f64_range(-1.0, 1.0)).collect())
}

/// Dense reference SpMV: `y[i] = Σ_j a[i][j] * x[j]` via row iteration.
pub fn dense_spmv_reference(a: &SparseMatrix, x: &[f64]) -> Vec<f64> {
    (0..a.local_rows)
        .map(|i| a.row_entries(i).map(|(c, v)| v * x[c]).sum())
        .collect()
}

/// Residual `b - A*x` computed with the dense reference product.
pub fn residual(a: &SparseMatrix, x: &[f64], b: &[f64]) -> Vec<f64> {
    dense_spmv_reference(a, x)
        .iter()
        .zip(b.iter())
        .map(|(ax, bi)| bi - ax)
        .collect()
}

/// Euclidean norm.
pub fn l2_norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Build a two-level hierarchy: a fine 1-D Laplacian of dimension `n` linked
/// to a coarse Laplacian of dimension `n / 2` by injection at even fine rows.
pub fn two_level_laplacian(n: usize) -> SparseMatrix {
    assert!(n % 2 == 0, "two_level_laplacian: n must be even");
    let mut fine = laplacian_1d(n);
    let coarse = Arc::new(laplacian_1d(n / 2));
    let f2c: Vec<usize> = (0..n / 2).map(|c| 2 * c).collect();
    let mg = MgLinkage::new(coarse, f2c, n).unwrap();
    fine.attach_coarse(mg);
    fine
}

// ---------------------------------------------------------------------------
// Fault-injecting communicator
// ---------------------------------------------------------------------------

/// Communicator that fails on demand, for exercising the kernels' abort
/// paths without a real message-passing backend.
pub struct FaultyComm {
    /// Fail every halo exchange.
    pub fail_halo: bool,
    /// Fail every sum reduction.
    pub fail_reduce: bool,
}

impl Communicator for FaultyComm {
    fn rank(&self) -> usize {
        0
    }

    fn num_ranks(&self) -> usize {
        2
    }

    fn halo_exchange(
        &self,
        _matrix: &SparseMatrix,
        _x: &mut Vector,
    ) -> Result<(), CommError> {
        if self.fail_halo {
            Err(CommError::HaloExchange("neighbor rank 1 unreachable".into()))
        } else {
            Ok(())
        }
    }

    fn allreduce_sum(&self, local: f64) -> Result<f64, CommError> {
        if self.fail_reduce {
            Err(CommError::Reduction("rank 1 did not contribute".into()))
        } else {
            Ok(local)
        }
    }
}
