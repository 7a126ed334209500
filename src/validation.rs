//! Construction-time structural validation.
//!
//! The kernels assume the structural invariants of the data model
//! (triangular row ordering, present non-zero diagonal, injective f2c map)
//! and check only basic lengths at call time. These functions are the
//! construction-time gate: run them once after problem setup, before the
//! first kernel call, so violations surface as clear diagnostics instead of
//! silently wrong numerics.
//!
//! All checks report the first violation found. Hard resource limits are
//! enforced to catch corrupted dimension fields before they turn into
//! enormous allocations.

use tracing::debug;

use crate::error::ValidationError;
use crate::types::SparseMatrix;

// ---------------------------------------------------------------------------
// Resource limits
// ---------------------------------------------------------------------------

/// Maximum number of locally owned rows or referenced columns.
pub const MAX_LOCAL_ROWS: usize = 10_000_000;

/// Maximum number of stored non-zero entries.
pub const MAX_NONZEROS: usize = 100_000_000;

// ---------------------------------------------------------------------------
// Matrix validation
// ---------------------------------------------------------------------------

/// Validate the structural integrity of a [`SparseMatrix`].
///
/// Performs the following checks in order:
///
/// 1. `local_rows` and `local_cols` are within [`MAX_LOCAL_ROWS`] and
///    `local_cols >= local_rows`.
/// 2. `nnz` is within [`MAX_NONZEROS`]; `col_indices` and `values` lengths
///    agree.
/// 3. `row_ptr` has length `local_rows + 1`, starts at 0, ends at `nnz`,
///    and is monotonically non-decreasing.
/// 4. Every column index is less than `local_cols`; every value is finite.
/// 5. `diag_idx` has one in-row entry per row, pointing at column `i` with
///    a non-zero value.
/// 6. Triangular ordering within each row: entries before the diagonal have
///    `col < i`, entries after it have `col > i` (order inside each block
///    is unconstrained).
///
/// # Errors
///
/// Returns [`ValidationError`] describing the first violation found.
pub fn validate_matrix(matrix: &SparseMatrix) -> Result<(), ValidationError> {
    // 1. Dimension bounds
    if matrix.local_rows > MAX_LOCAL_ROWS || matrix.local_cols > MAX_LOCAL_ROWS {
        return Err(ValidationError::MatrixTooLarge {
            rows: matrix.local_rows,
            cols: matrix.local_cols,
            max_dim: MAX_LOCAL_ROWS,
        });
    }
    if matrix.local_cols < matrix.local_rows {
        return Err(ValidationError::DimensionMismatch(format!(
            "local_cols {} is smaller than local_rows {}",
            matrix.local_cols, matrix.local_rows,
        )));
    }

    // 2. NNZ bounds and parallel-array agreement
    let nnz = matrix.values.len();
    if nnz > MAX_NONZEROS {
        return Err(ValidationError::DimensionMismatch(format!(
            "nnz {} exceeds maximum allowed {}",
            nnz, MAX_NONZEROS,
        )));
    }
    if matrix.col_indices.len() != nnz {
        return Err(ValidationError::DimensionMismatch(format!(
            "col_indices length {} does not match values length {}",
            matrix.col_indices.len(),
            nnz,
        )));
    }

    // 3. row_ptr shape
    if matrix.row_ptr.len() != matrix.local_rows + 1 {
        return Err(ValidationError::DimensionMismatch(format!(
            "row_ptr length {} does not equal local_rows + 1 = {}",
            matrix.row_ptr.len(),
            matrix.local_rows + 1,
        )));
    }
    if matrix.row_ptr[0] != 0 {
        return Err(ValidationError::DimensionMismatch(format!(
            "row_ptr[0] = {} (expected 0)",
            matrix.row_ptr[0],
        )));
    }
    for i in 1..matrix.row_ptr.len() {
        if matrix.row_ptr[i] < matrix.row_ptr[i - 1] {
            return Err(ValidationError::NonMonotonicRowPtr { position: i });
        }
    }
    if matrix.row_ptr[matrix.local_rows] != nnz {
        return Err(ValidationError::DimensionMismatch(format!(
            "values length {} does not match row_ptr[local_rows] = {}",
            nnz,
            matrix.row_ptr[matrix.local_rows],
        )));
    }

    // 4. Column bounds and finiteness
    for row in 0..matrix.local_rows {
        let start = matrix.row_ptr[row];
        let end = matrix.row_ptr[row + 1];
        for idx in start..end {
            let col = matrix.col_indices[idx];
            if col >= matrix.local_cols {
                return Err(ValidationError::IndexOutOfBounds {
                    index: col,
                    row,
                    cols: matrix.local_cols,
                });
            }
            let val = matrix.values[idx];
            if !val.is_finite() {
                return Err(ValidationError::NonFiniteValue(format!(
                    "matrix[{}, {}] = {}",
                    row, col, val,
                )));
            }
        }
    }

    // 5. Diagonal index integrity
    if matrix.diag_idx.len() != matrix.local_rows {
        return Err(ValidationError::DimensionMismatch(format!(
            "diag_idx length {} does not match local_rows {}",
            matrix.diag_idx.len(),
            matrix.local_rows,
        )));
    }
    for row in 0..matrix.local_rows {
        let idx = matrix.diag_idx[row];
        let start = matrix.row_ptr[row];
        let end = matrix.row_ptr[row + 1];
        if idx < start || idx >= end || matrix.col_indices[idx] != row {
            return Err(ValidationError::MissingDiagonal { row });
        }
        if matrix.values[idx] == 0.0 {
            return Err(ValidationError::ZeroDiagonal { row });
        }
    }

    // 6. Triangular ordering within each row
    for row in 0..matrix.local_rows {
        let start = matrix.row_ptr[row];
        let end = matrix.row_ptr[row + 1];
        let diag = matrix.diag_idx[row];
        for idx in start..end {
            let col = matrix.col_indices[idx];
            let misplaced = if idx < diag {
                col >= row
            } else if idx > diag {
                col <= row
            } else {
                false
            };
            if misplaced {
                return Err(ValidationError::RowOrderViolation {
                    row,
                    position: idx - start,
                });
            }
        }
    }

    debug!(
        rows = matrix.local_rows,
        cols = matrix.local_cols,
        nnz,
        halo_slots = matrix.local_cols - matrix.local_rows,
        "matrix structure validated"
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Multigrid linkage validation
// ---------------------------------------------------------------------------

/// Validate a fine-to-coarse injection map.
///
/// Every entry must be a valid fine row index and no fine row may appear
/// twice: a repeated index would turn the prolongation's independent
/// scatter-stores into racing accumulations.
///
/// # Errors
///
/// Returns [`ValidationError::DimensionMismatch`] for out-of-bounds entries
/// and [`ValidationError::DuplicateFineIndex`] for repeats.
pub fn validate_f2c(f2c: &[usize], fine_rows: usize) -> Result<(), ValidationError> {
    let mut seen_by: Vec<Option<usize>> = vec![None; fine_rows];
    for (coarse, &fine) in f2c.iter().enumerate() {
        if fine >= fine_rows {
            return Err(ValidationError::DimensionMismatch(format!(
                "f2c[{}] = {} out of bounds (fine rows = {})",
                coarse, fine, fine_rows,
            )));
        }
        if let Some(first) = seen_by[fine] {
            return Err(ValidationError::DuplicateFineIndex {
                fine,
                coarse_a: first,
                coarse_b: coarse,
            });
        }
        seen_by[fine] = Some(coarse);
    }
    Ok(())
}

/// Validate the multigrid linkage attached to a fine-level matrix.
///
/// Checks that the injection map agrees with the coarse level's row count
/// and is injective into the fine level, and that the auxiliary vectors are
/// sized for the grids they belong to. A matrix without linkage passes
/// trivially.
///
/// # Errors
///
/// Returns [`ValidationError`] describing the first violation found.
pub fn validate_mg_linkage(matrix: &SparseMatrix) -> Result<(), ValidationError> {
    let Some(mg) = matrix.mg.as_ref() else {
        return Ok(());
    };

    let nc = mg.coarse.local_rows;
    if mg.f2c.len() != nc {
        return Err(ValidationError::DimensionMismatch(format!(
            "f2c length {} does not match coarse local_rows {}",
            mg.f2c.len(),
            nc,
        )));
    }
    validate_f2c(&mg.f2c, matrix.local_rows)?;

    if mg.coarse_residual.len() < nc {
        return Err(ValidationError::VectorTooShort {
            role: "coarse_residual",
            needed: nc,
            actual: mg.coarse_residual.len(),
        });
    }
    if mg.coarse_correction.len() < nc {
        return Err(ValidationError::VectorTooShort {
            role: "coarse_correction",
            needed: nc,
            actual: mg.coarse_correction.len(),
        });
    }
    if mg.fine_spmv.len() < matrix.local_rows {
        return Err(ValidationError::VectorTooShort {
            role: "fine_spmv",
            needed: matrix.local_rows,
            actual: mg.fine_spmv.len(),
        });
    }

    debug!(
        coarse_rows = nc,
        fine_rows = matrix.local_rows,
        "multigrid linkage validated"
    );
    Ok(())
}
