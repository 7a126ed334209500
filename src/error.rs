//! Error types for the kernel crate.
//!
//! Three layers mirror the failure taxonomy of the kernels: [`ValidationError`]
//! for length and structural violations detected before any arithmetic runs,
//! [`CommError`] for halo-exchange and reduction faults raised by a
//! [`Communicator`](crate::comm::Communicator) backend, and [`KernelError`] as
//! the status every kernel returns. All errors implement `std::error::Error`
//! via `thiserror`; no kernel signals failure through any other channel.

/// Primary error type returned by every compute kernel.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    /// A precondition on vector lengths or matrix structure was violated.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// Halo exchange or the cross-process reduction failed. Retry policy is
    /// the communicator's responsibility; kernels propagate and abort.
    #[error("communication failure: {0}")]
    Communication(#[from] CommError),

    /// A grid-transfer kernel was invoked on a matrix without multigrid
    /// linkage (no coarser level attached).
    #[error("matrix has no coarse level attached")]
    MissingCoarseLevel,
}

/// Validation errors for kernel inputs and matrix structure.
///
/// Length checks are performed eagerly by each kernel; the structural
/// variants are produced by construction-time validation in
/// [`validation`](crate::validation) and never by the kernels themselves.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// A vector is shorter than the length the kernel requires of it.
    #[error("{role} has length {actual}, kernel requires at least {needed}")]
    VectorTooShort {
        /// Which argument was too short (e.g. `"x"`, `"rhs"`).
        role: &'static str,
        /// Minimum length required by the kernel contract.
        needed: usize,
        /// Actual length supplied.
        actual: usize,
    },

    /// Matrix dimensions are internally inconsistent (e.g. `row_ptr` length
    /// versus row count).
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// The `row_ptr` array is not monotonically non-decreasing.
    #[error("row_ptr is not monotonically non-decreasing at position {position}")]
    NonMonotonicRowPtr {
        /// Position in `row_ptr` where the violation was detected.
        position: usize,
    },

    /// A column index is out of bounds for the declared column count.
    #[error("column index {index} out of bounds for {cols} columns (row {row})")]
    IndexOutOfBounds {
        /// Offending column index.
        index: usize,
        /// Row containing the offending entry.
        row: usize,
        /// Declared column count (owned rows plus halo slots).
        cols: usize,
    },

    /// A value is NaN or infinite where a finite number is required.
    #[error("non-finite value detected: {0}")]
    NonFiniteValue(String),

    /// An owned row has no stored entry at `(i, i)`.
    #[error("row {row} has no diagonal entry")]
    MissingDiagonal {
        /// Row lacking a diagonal.
        row: usize,
    },

    /// The diagonal entry of a row is exactly zero, which would make the
    /// Gauss-Seidel update divide by zero.
    #[error("row {row} has a zero diagonal entry")]
    ZeroDiagonal {
        /// Row with the zero diagonal.
        row: usize,
    },

    /// Within a row, a lower-triangular entry was found after the diagonal
    /// or an upper-triangular entry before it.
    #[error("row {row} violates triangular ordering at entry {position}")]
    RowOrderViolation {
        /// Row containing the misplaced entry.
        row: usize,
        /// Offset of the misplaced entry within the row.
        position: usize,
    },

    /// The fine-to-coarse injection map references the same fine row twice,
    /// which would turn independent scatter-stores into racing accumulations.
    #[error(
        "f2c operator maps coarse rows {coarse_a} and {coarse_b} to the same fine row {fine}"
    )]
    DuplicateFineIndex {
        /// Fine row referenced twice.
        fine: usize,
        /// First coarse row mapping to it.
        coarse_a: usize,
        /// Second coarse row mapping to it.
        coarse_b: usize,
    },

    /// Matrix size exceeds the implementation limit.
    #[error("matrix size {rows}x{cols} exceeds maximum supported dimension {max_dim}")]
    MatrixTooLarge {
        /// Number of local rows.
        rows: usize,
        /// Number of local columns.
        cols: usize,
        /// Maximum supported dimension.
        max_dim: usize,
    },
}

/// Communication-layer errors surfaced by a [`Communicator`] backend.
///
/// [`Communicator`]: crate::comm::Communicator
#[derive(Debug, thiserror::Error)]
pub enum CommError {
    /// The halo exchange did not complete (a neighbor failed to deliver its
    /// boundary values).
    #[error("halo exchange failed: {0}")]
    HaloExchange(String),

    /// The global sum reduction did not complete.
    #[error("allreduce failed: {0}")]
    Reduction(String),
}
