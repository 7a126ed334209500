//! Prolongation: scatter the coarse-grid correction back onto the fine grid.
//!
//! For each coarse row `c`, `xf[f2c[c]] += coarse_correction[c]`. The f2c
//! map is injective (no fine row appears twice, enforced when the linkage is
//! built), so every update targets a distinct fine element: the scatter is a
//! set of independent stores, never a true accumulation needing atomicity,
//! and may be vectorized or parallelized freely.

use tracing::trace;

use crate::error::{KernelError, ValidationError};
use crate::types::{SparseMatrix, Vector};

/// Apply the coarse-grid correction to the fine-grid solution `xf` in place.
///
/// # Errors
///
/// Returns [`KernelError::MissingCoarseLevel`] if `a` carries no multigrid
/// linkage, and [`KernelError::InvalidInput`] if `xf` is shorter than the
/// fine level's owned row count.
pub fn prolong(a: &SparseMatrix, xf: &mut Vector) -> Result<(), KernelError> {
    let mg = a.mg.as_ref().ok_or(KernelError::MissingCoarseLevel)?;

    if xf.len() < a.local_rows {
        return Err(ValidationError::VectorTooShort {
            role: "xf",
            needed: a.local_rows,
            actual: xf.len(),
        }
        .into());
    }

    let xfv = xf.as_mut_slice();
    let xcv = mg.coarse_correction.as_slice();
    for (&f, &xc) in mg.f2c.iter().zip(xcv.iter()) {
        xfv[f] += xc;
    }

    trace!(coarse_rows = mg.f2c.len(), "prolongation");
    Ok(())
}
