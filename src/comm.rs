//! Communication seam for distributed execution.
//!
//! The kernels never touch a communicator handle directly; they receive a
//! [`Communicator`] and call exactly two operations on it: a halo exchange
//! before reading off-process columns, and a global sum reduction inside the
//! dot product. Message-passing backends (MPI or otherwise) live outside
//! this crate and plug in by implementing the trait. [`SingleProcess`]
//! covers the communicator-free configuration.

use tracing::trace;

use crate::error::CommError;
use crate::types::{SparseMatrix, Vector};

/// Explicit communication context threaded through the kernels that need it.
///
/// Both operations block: the halo exchange until every neighbor's boundary
/// values have arrived, the reduction until every rank has contributed its
/// partial sum. Neither is retried here; a failure aborts the enclosing
/// kernel call and retry policy belongs to the backend.
pub trait Communicator: Send + Sync {
    /// Rank of this process within the group.
    fn rank(&self) -> usize;

    /// Total number of processes in the group.
    fn num_ranks(&self) -> usize;

    /// Populate the halo slots `x[local_rows..local_cols]` with the current
    /// values of the rows owned by neighboring processes.
    ///
    /// # Errors
    ///
    /// Returns [`CommError::HaloExchange`] if any neighbor fails to deliver
    /// its boundary values.
    fn halo_exchange(&self, matrix: &SparseMatrix, x: &mut Vector) -> Result<(), CommError>;

    /// Sum-reduce `local` across the full process group, returning the same
    /// globally agreed scalar on every rank.
    ///
    /// # Errors
    ///
    /// Returns [`CommError::Reduction`] if the reduction does not complete.
    fn allreduce_sum(&self, local: f64) -> Result<f64, CommError>;
}

/// Single-process communicator: no halo traffic, identity reduction.
///
/// In a one-rank run every referenced column is locally owned
/// (`local_cols == local_rows`), so the halo exchange has nothing to move
/// and the global sum is the local sum.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleProcess;

impl Communicator for SingleProcess {
    fn rank(&self) -> usize {
        0
    }

    fn num_ranks(&self) -> usize {
        1
    }

    fn halo_exchange(&self, matrix: &SparseMatrix, _x: &mut Vector) -> Result<(), CommError> {
        trace!(
            halo_slots = matrix.local_cols - matrix.local_rows,
            "single-process halo exchange (no-op)"
        );
        Ok(())
    }

    fn allreduce_sum(&self, local: f64) -> Result<f64, CommError> {
        Ok(local)
    }
}
