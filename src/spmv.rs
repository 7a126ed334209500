//! Sparse matrix-vector multiply over the distributed row layout.
//!
//! Computes `y = A * x` for the locally owned rows. Off-process column
//! values of `x` are synchronized by a halo exchange before any row is
//! touched, so the gather inside each row reads only locally resident data.
//! Rows are independent: no row's computation observes another row's output,
//! which is what permits unordered parallel execution across rows.

use tracing::trace;

use crate::comm::Communicator;
use crate::error::{KernelError, ValidationError};
use crate::simd::row_dot;
use crate::types::{SparseMatrix, Vector};

/// Compute `y[i] = Σ_j A.values[i][j] * x[A.col_indices[i][j]]` for every
/// locally owned row `i`.
///
/// The halo exchange runs first; its failure aborts the call before `y` is
/// written. Each row's accumulation is a full sum over exactly that row's
/// nonzero set (the diagonal included, nothing truncated); the per-row
/// reduction order is unspecified and depends on the active row-reduction
/// strategy.
///
/// # Errors
///
/// Returns [`KernelError::InvalidInput`] if `x` is shorter than
/// `A.local_cols` or `y` is shorter than `A.local_rows`, and
/// [`KernelError::Communication`] if the halo exchange fails.
pub fn spmv<C: Communicator>(
    a: &SparseMatrix,
    x: &mut Vector,
    y: &mut Vector,
    comm: &C,
) -> Result<(), KernelError> {
    if x.len() < a.local_cols {
        return Err(ValidationError::VectorTooShort {
            role: "x",
            needed: a.local_cols,
            actual: x.len(),
        }
        .into());
    }
    if y.len() < a.local_rows {
        return Err(ValidationError::VectorTooShort {
            role: "y",
            needed: a.local_rows,
            actual: y.len(),
        }
        .into());
    }

    comm.halo_exchange(a, x)?;

    let xv = x.as_slice();
    let yv = y.as_mut_slice();
    for i in 0..a.local_rows {
        let (vals, cols) = a.row(i);
        yv[i] = row_dot(vals, cols, xv);
    }

    trace!(rows = a.local_rows, nnz = a.nnz(), "spmv");
    Ok(())
}
