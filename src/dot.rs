//! Dot-product reduction with cross-process summation.
//!
//! Reduces two process-local vectors to one globally agreed scalar: each
//! rank computes its partial sum over the first `n` local elements, then a
//! single sum reduction across the full process group combines them. The
//! wall-clock time spent inside the reduction is added to a caller-supplied
//! accumulator so the solver driver can attribute communication cost across
//! calls.

use std::time::Instant;

use tracing::trace;

use crate::comm::Communicator;
use crate::error::{KernelError, ValidationError};
use crate::simd::{local_dot, local_dot_self};
use crate::types::Vector;

/// Compute the global dot product `Σ_{i<n} x[i] * y[i]`.
///
/// When `x` and `y` are the same buffer the partial sum is computed as
/// `Σ x[i]^2`, reading each element once. This is an allowed optimization,
/// not a behavior change: both paths sum the identical term set and agree
/// to within standard floating-point reduction tolerance.
///
/// The local summation order is unspecified (and differs between the scalar
/// and SIMD row-reduction strategies) but is always a valid reassociation
/// of the same terms.
///
/// # Arguments
///
/// * `n` - number of local elements to reduce over.
/// * `x`, `y` - input vectors, each of length at least `n`.
/// * `comm` - communication context for the global reduction.
/// * `time_allreduce` - accumulator for reduction wall time, additive
///   across calls.
///
/// # Errors
///
/// Returns [`KernelError::InvalidInput`] if `n` exceeds either vector's
/// length, or [`KernelError::Communication`] if the reduction fails.
pub fn dot_product<C: Communicator>(
    n: usize,
    x: &Vector,
    y: &Vector,
    comm: &C,
    time_allreduce: &mut f64,
) -> Result<f64, KernelError> {
    if x.len() < n {
        return Err(ValidationError::VectorTooShort {
            role: "x",
            needed: n,
            actual: x.len(),
        }
        .into());
    }
    if y.len() < n {
        return Err(ValidationError::VectorTooShort {
            role: "y",
            needed: n,
            actual: y.len(),
        }
        .into());
    }

    let local_result = if std::ptr::eq(x, y) {
        local_dot_self(&x.values, n)
    } else {
        local_dot(&x.values, &y.values, n)
    };

    let t0 = Instant::now();
    let global_result = comm.allreduce_sum(local_result)?;
    let elapsed = t0.elapsed().as_secs_f64();
    *time_allreduce += elapsed;

    trace!(n, local_result, global_result, elapsed, "dot product");
    Ok(global_result)
}
