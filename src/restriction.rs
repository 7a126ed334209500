//! Restriction: inject the fine-grid residual into the coarse level.
//!
//! The fine-grid residual is never built in full. Only the fine rows that
//! feed a coarse row are evaluated: for each coarse row `c`,
//! `coarse_residual[c] = rf[f2c[c]] - fine_spmv[f2c[c]]`, where `fine_spmv`
//! is an SpMV result staged on the matrix's auxiliary vector by the caller.
//! Coarse rows are mutually independent (pure gather, no aliasing between
//! source and destination), so the loop is fully parallelizable.

use tracing::trace;

use crate::error::{KernelError, ValidationError};
use crate::types::{SparseMatrix, Vector};

/// Compute the coarse-level residual from the fine-grid RHS `rf` and the
/// staged fine-grid matrix-vector product.
///
/// # Errors
///
/// Returns [`KernelError::MissingCoarseLevel`] if `a` carries no multigrid
/// linkage, and [`KernelError::InvalidInput`] if `rf` or the staged product
/// is shorter than the fine level's owned row count.
pub fn restrict(a: &mut SparseMatrix, rf: &Vector) -> Result<(), KernelError> {
    let nrow = a.local_rows;
    let mg = a.mg.as_mut().ok_or(KernelError::MissingCoarseLevel)?;

    if rf.len() < nrow {
        return Err(ValidationError::VectorTooShort {
            role: "rf",
            needed: nrow,
            actual: rf.len(),
        }
        .into());
    }
    if mg.fine_spmv.len() < nrow {
        return Err(ValidationError::VectorTooShort {
            role: "fine_spmv",
            needed: nrow,
            actual: mg.fine_spmv.len(),
        }
        .into());
    }

    let rfv = rf.as_slice();
    let axfv = mg.fine_spmv.as_slice();
    let rcv = mg.coarse_residual.as_mut_slice();
    for (rc, &f) in rcv.iter_mut().zip(mg.f2c.iter()) {
        *rc = rfv[f] - axfv[f];
    }

    trace!(coarse_rows = mg.f2c.len(), "restriction");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MgLinkage;
    use std::sync::Arc;

    fn two_level_fine() -> SparseMatrix {
        let mut fine = SparseMatrix::identity(4);
        let coarse = Arc::new(SparseMatrix::identity(2));
        let mg = MgLinkage::new(coarse, vec![0, 2], 4).unwrap();
        fine.attach_coarse(mg);
        fine
    }

    #[test]
    fn injects_residual_at_mapped_fine_rows() {
        let mut fine = two_level_fine();
        fine.mg.as_mut().unwrap().fine_spmv = Vector::from_values(vec![1.0; 4]);
        let rf = Vector::from_values(vec![5.0; 4]);

        restrict(&mut fine, &rf).unwrap();
        assert_eq!(fine.mg.as_ref().unwrap().coarse_residual.values, vec![4.0, 4.0]);
    }

    #[test]
    fn reads_only_mapped_entries() {
        let mut fine = two_level_fine();
        fine.mg.as_mut().unwrap().fine_spmv =
            Vector::from_values(vec![1.0, 100.0, 2.0, 100.0]);
        let rf = Vector::from_values(vec![10.0, -100.0, 20.0, -100.0]);

        restrict(&mut fine, &rf).unwrap();
        assert_eq!(fine.mg.as_ref().unwrap().coarse_residual.values, vec![9.0, 18.0]);
    }

    #[test]
    fn missing_linkage_is_an_error() {
        let mut a = SparseMatrix::identity(4);
        let rf = Vector::zeros(4);
        let err = restrict(&mut a, &rf).unwrap_err();
        assert!(matches!(err, KernelError::MissingCoarseLevel));
    }

    #[test]
    fn short_rhs_is_an_error() {
        let mut fine = two_level_fine();
        let rf = Vector::zeros(3);
        let err = restrict(&mut fine, &rf).unwrap_err();
        assert!(matches!(err, KernelError::InvalidInput(_)));
    }
}
