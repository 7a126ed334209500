//! Symmetric Gauss-Seidel smoother.
//!
//! One full symmetric sweep: a forward pass over rows in increasing order,
//! then a backward pass in decreasing order. Each row's update reads the
//! just-updated values of rows already processed in the same pass — true
//! Gauss-Seidel, not Jacobi — so the row loop of each sweep is inherently
//! sequential. Parallelizing across rows within a sweep changes numerical
//! results and is a correctness violation, not an optimization; only the
//! per-row inner product goes through the vectorizable row-reduction
//! strategy.
//!
//! # Update formula
//!
//! For row `i` with diagonal `d`, both sweeps compute
//!
//! ```text
//! sum  = r[i] - Σ_j values[i][j] * x[col[i][j]]   (full row, diagonal included)
//! sum += x[i] * d                                 (cancel the diagonal term)
//! x[i] = sum / d
//! ```
//!
//! The full-row sum followed by the add-back is kept deliberately instead of
//! skipping the diagonal inside the loop: the two evaluations round
//! differently, and downstream convergence comparisons rely on this exact
//! order bit-for-bit.

use tracing::trace;

use crate::comm::Communicator;
use crate::error::{KernelError, ValidationError};
use crate::simd::row_dot;
use crate::types::{SparseMatrix, Vector};

/// Apply one symmetric Gauss-Seidel sweep: `x` is smoothed in place against
/// the right-hand side `r`.
///
/// Halo values of `x` are synchronized first; a failed exchange aborts the
/// call before any row is updated. `x` must have length exactly
/// `A.local_cols` so the halo slots exist.
///
/// # Errors
///
/// Returns [`KernelError::InvalidInput`] if `x` does not cover the halo
/// columns or `r` is shorter than the owned row count, and
/// [`KernelError::Communication`] if the halo exchange fails.
pub fn symgs<C: Communicator>(
    a: &SparseMatrix,
    r: &Vector,
    x: &mut Vector,
    comm: &C,
) -> Result<(), KernelError> {
    if x.len() != a.local_cols {
        return Err(ValidationError::DimensionMismatch(format!(
            "x has length {}, symgs requires exactly local_cols = {} to hold halo slots",
            x.len(),
            a.local_cols,
        ))
        .into());
    }
    if r.len() < a.local_rows {
        return Err(ValidationError::VectorTooShort {
            role: "r",
            needed: a.local_rows,
            actual: r.len(),
        }
        .into());
    }

    comm.halo_exchange(a, x)?;

    let nrow = a.local_rows;
    let rv = r.as_slice();
    let xv = x.as_mut_slice();

    // Forward sweep. Row order is load-bearing: row i reads the values
    // rows 0..i wrote earlier in this same pass.
    for i in 0..nrow {
        let (vals, cols) = a.row(i);
        let diag = a.diagonal(i);
        let mut sum = rv[i] - row_dot(vals, cols, xv);
        sum += xv[i] * diag;
        xv[i] = sum / diag;
    }

    // Backward sweep: an independent second pass, same update rule,
    // decreasing row order.
    for i in (0..nrow).rev() {
        let (vals, cols) = a.row(i);
        let diag = a.diagonal(i);
        let mut sum = rv[i] - row_dot(vals, cols, xv);
        sum += xv[i] * diag;
        xv[i] = sum / diag;
    }

    trace!(rows = nrow, "symmetric Gauss-Seidel sweep");
    Ok(())
}
