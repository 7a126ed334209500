//! Core data types for the distributed multigrid kernels.
//!
//! Provides [`Vector`] for process-local dense storage, [`SparseMatrix`] for
//! row-compressed distributed sparse storage with halo columns, and
//! [`MgLinkage`] connecting a fine grid level to its coarser neighbor.
//!
//! # Distributed layout
//!
//! Each process owns rows `0..local_rows` of the global matrix. Column
//! indices in `local_rows..local_cols` are *halo columns*: they reference
//! rows owned by neighboring processes, and the corresponding slots of any
//! input vector must be filled by a halo exchange before a kernel reads them.

use std::sync::Arc;

use crate::error::ValidationError;
use crate::validation::validate_f2c;

// ---------------------------------------------------------------------------
// Vector
// ---------------------------------------------------------------------------

/// A dense, process-local vector of `f64` values.
///
/// The logical length equals the allocation length. Vectors passed into
/// kernels are owned by the caller; kernels only read or mutate the buffers
/// their contract designates.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector {
    /// The stored values.
    pub values: Vec<f64>,
}

impl Vector {
    /// Create a zero-filled vector of length `n`.
    pub fn zeros(n: usize) -> Self {
        Self {
            values: vec![0.0; n],
        }
    }

    /// Wrap an existing value buffer.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Length of the vector.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` if the vector holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Set every element to `value`.
    pub fn fill(&mut self, value: f64) {
        self.values.fill(value);
    }

    /// Borrow the values as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Borrow the values as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.values
    }
}

// ---------------------------------------------------------------------------
// SparseMatrix
// ---------------------------------------------------------------------------

/// Row-compressed distributed sparse matrix.
///
/// Immutable after construction for the lifetime of a solve, except for the
/// auxiliary vectors inside [`MgLinkage`] which the grid-transfer kernels
/// overwrite on every call.
///
/// # Layout
///
/// For `local_rows` owned rows and `nnz` stored entries:
/// - `row_ptr` has length `local_rows + 1`; row `i` spans
///   `row_ptr[i]..row_ptr[i + 1]` in `col_indices`/`values`.
/// - `col_indices[j] < local_cols`; indices `>= local_rows` are halo columns
///   owned by other processes.
/// - `diag_idx[i]` is the absolute index into `values` of the entry at
///   `(i, i)`, guaranteed present and non-zero by construction.
///
/// # Row ordering invariant
///
/// Within each row, lower-triangular entries (`col < i`) precede the
/// diagonal and upper-triangular entries (`col > i`) follow it. Entries
/// within each triangular block may appear in any order. The Gauss-Seidel
/// smoother relies on this layout only through `diag_idx`; the invariant is
/// checked by [`validate_matrix`](crate::validation::validate_matrix), never
/// by the kernels.
#[derive(Debug, Clone)]
pub struct SparseMatrix {
    /// Row pointers, length `local_rows + 1`.
    pub row_ptr: Vec<usize>,
    /// Column indices in local numbering, one per stored entry.
    pub col_indices: Vec<usize>,
    /// Coefficients, parallel to `col_indices`.
    pub values: Vec<f64>,
    /// Per-row absolute index into `values` of the diagonal entry.
    pub diag_idx: Vec<usize>,
    /// Number of rows owned by this process.
    pub local_rows: usize,
    /// Number of referenced columns; `local_cols - local_rows` are halo slots.
    pub local_cols: usize,
    /// Link to the next-coarser grid level, present only on fine-level
    /// matrices of a multigrid hierarchy.
    pub mg: Option<MgLinkage>,
}

impl SparseMatrix {
    /// Build a matrix from COO (coordinate) triplets.
    ///
    /// Entries are sorted by `(row, col)` internally, which satisfies the
    /// triangular row-ordering invariant. Duplicate positions are kept as
    /// separate entries (callers should pre-merge if needed).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if an index is out of bounds, if
    /// `local_cols < local_rows`, or if any owned row lacks a non-zero
    /// diagonal entry.
    pub fn from_coo(
        local_rows: usize,
        local_cols: usize,
        entries: impl IntoIterator<Item = (usize, usize, f64)>,
    ) -> Result<Self, ValidationError> {
        if local_cols < local_rows {
            return Err(ValidationError::DimensionMismatch(format!(
                "local_cols {} is smaller than local_rows {}",
                local_cols, local_rows,
            )));
        }

        let mut sorted: Vec<_> = entries.into_iter().collect();
        sorted.sort_unstable_by_key(|(r, c, _)| (*r, *c));

        let nnz = sorted.len();
        let mut row_ptr = vec![0usize; local_rows + 1];
        let mut col_indices = Vec::with_capacity(nnz);
        let mut values = Vec::with_capacity(nnz);

        for &(r, c, _) in &sorted {
            if r >= local_rows {
                return Err(ValidationError::DimensionMismatch(format!(
                    "row index {} out of bounds (local_rows={})",
                    r, local_rows,
                )));
            }
            if c >= local_cols {
                return Err(ValidationError::IndexOutOfBounds {
                    index: c,
                    row: r,
                    cols: local_cols,
                });
            }
            row_ptr[r + 1] += 1;
        }
        for i in 1..=local_rows {
            row_ptr[i] += row_ptr[i - 1];
        }
        for (_, c, v) in sorted {
            col_indices.push(c);
            values.push(v);
        }

        let mut diag_idx = Vec::with_capacity(local_rows);
        for i in 0..local_rows {
            let start = row_ptr[i];
            let end = row_ptr[i + 1];
            let offset = col_indices[start..end]
                .iter()
                .position(|&c| c == i)
                .ok_or(ValidationError::MissingDiagonal { row: i })?;
            let idx = start + offset;
            if values[idx] == 0.0 {
                return Err(ValidationError::ZeroDiagonal { row: i });
            }
            diag_idx.push(idx);
        }

        Ok(Self {
            row_ptr,
            col_indices,
            values,
            diag_idx,
            local_rows,
            local_cols,
            mg: None,
        })
    }

    /// Build a square identity matrix of dimension `n` (no halo columns).
    pub fn identity(n: usize) -> Self {
        Self {
            row_ptr: (0..=n).collect(),
            col_indices: (0..n).collect(),
            values: vec![1.0; n],
            diag_idx: (0..n).collect(),
            local_rows: n,
            local_cols: n,
            mg: None,
        }
    }

    /// Number of stored entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Number of stored entries in row `i`.
    #[inline]
    pub fn nonzeros_in_row(&self, i: usize) -> usize {
        self.row_ptr[i + 1] - self.row_ptr[i]
    }

    /// Borrow the coefficients and column indices of row `i`.
    #[inline]
    pub fn row(&self, i: usize) -> (&[f64], &[usize]) {
        let start = self.row_ptr[i];
        let end = self.row_ptr[i + 1];
        (&self.values[start..end], &self.col_indices[start..end])
    }

    /// Iterate over `(col_index, value)` pairs of row `i`.
    #[inline]
    pub fn row_entries(&self, i: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let (vals, cols) = self.row(i);
        cols.iter().copied().zip(vals.iter().copied())
    }

    /// Value of the diagonal entry of row `i`.
    #[inline]
    pub fn diagonal(&self, i: usize) -> f64 {
        self.values[self.diag_idx[i]]
    }

    /// Attach a coarse-level linkage, making this matrix the fine level of a
    /// two-level hierarchy.
    pub fn attach_coarse(&mut self, mg: MgLinkage) {
        self.mg = Some(mg);
    }
}

// ---------------------------------------------------------------------------
// MgLinkage
// ---------------------------------------------------------------------------

/// Multigrid linkage from a fine-level matrix to its coarser neighbor.
///
/// The coarse matrix is shared, not owned: its lifetime is tied to the
/// hierarchy, and several fine-level references may point at it. The
/// auxiliary vectors are scratch space overwritten by each restriction or
/// prolongation call; everything else is read-only during a solve.
#[derive(Debug, Clone)]
pub struct MgLinkage {
    /// The next-coarser grid level.
    pub coarse: Arc<SparseMatrix>,
    /// Injection operator: `f2c[c]` is the fine row injected into coarse
    /// row `c`. No fine row appears twice (checked at construction), which
    /// is what makes the prolongation scatter safe to run unsynchronized.
    pub f2c: Vec<usize>,
    /// Coarse-grid residual written by restriction; doubles as the coarse
    /// level's right-hand side.
    pub coarse_residual: Vector,
    /// Coarse-grid correction read by prolongation.
    pub coarse_correction: Vector,
    /// Fine-grid matrix-vector product staged externally (an SpMV result)
    /// and consumed by restriction.
    pub fine_spmv: Vector,
}

impl MgLinkage {
    /// Build the linkage for a fine level with `fine_rows` owned rows.
    ///
    /// Allocates the auxiliary vectors: the coarse residual and correction
    /// at the coarse level's row count, the staged matrix-vector product at
    /// the fine level's.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `f2c` does not have exactly one entry
    /// per coarse row, if any entry is out of bounds for the fine level, or
    /// if the map is not injective.
    pub fn new(
        coarse: Arc<SparseMatrix>,
        f2c: Vec<usize>,
        fine_rows: usize,
    ) -> Result<Self, ValidationError> {
        if f2c.len() != coarse.local_rows {
            return Err(ValidationError::DimensionMismatch(format!(
                "f2c length {} does not match coarse local_rows {}",
                f2c.len(),
                coarse.local_rows,
            )));
        }
        validate_f2c(&f2c, fine_rows)?;

        let nc = coarse.local_rows;
        Ok(Self {
            coarse,
            f2c,
            coarse_residual: Vector::zeros(nc),
            coarse_correction: Vector::zeros(nc),
            fine_spmv: Vector::zeros(fine_rows),
        })
    }

    /// Local row count of the coarse level.
    #[inline]
    pub fn coarse_rows(&self) -> usize {
        self.coarse.local_rows
    }
}
