//! Row-reduction strategy: scalar and SIMD-accelerated gather/reduce loops.
//!
//! The kernels funnel every performance-critical reduction through three
//! entry points: [`row_dot`] (indexed gather over one matrix row, used by
//! SpMV and the Gauss-Seidel inner product), [`local_dot`] and
//! [`local_dot_self`] (contiguous reductions used by the dot product). Each
//! dispatches to an AVX2 implementation when built with the `simd` feature
//! on a capable x86_64 CPU, and falls back to a portable scalar loop
//! otherwise.
//!
//! Every path computes a plain reassociation of the same term set: no term
//! is dropped or duplicated, so results agree with the scalar loop to within
//! standard floating-point reduction tolerance and the numerical contracts
//! of the kernels hold identically under either strategy.

/// Gather-and-reduce over one sparse row: `Σ_j values[j] * x[cols[j]]`.
///
/// # Panics
///
/// Debug-asserts that `values` and `cols` have equal length and that every
/// column index is in bounds for `x`.
#[inline]
pub fn row_dot(values: &[f64], cols: &[usize], x: &[f64]) -> f64 {
    debug_assert_eq!(values.len(), cols.len(), "row_dot: ragged row");

    #[cfg(all(feature = "simd", target_arch = "x86_64"))]
    {
        if is_x86_feature_detected!("avx2") {
            // SAFETY: AVX2 support checked at runtime; slice lengths are
            // equal by the debug assertion and column indices are in bounds
            // by the CSR structural invariant.
            return unsafe { row_dot_avx2(values, cols, x) };
        }
    }

    row_dot_scalar(values, cols, x)
}

/// Portable scalar gather-and-reduce over one sparse row.
#[inline]
pub fn row_dot_scalar(values: &[f64], cols: &[usize], x: &[f64]) -> f64 {
    let mut sum = 0.0;
    for (&v, &c) in values.iter().zip(cols.iter()) {
        sum += v * x[c];
    }
    sum
}

/// AVX2 gather-and-reduce over one sparse row.
///
/// # Safety
///
/// - The caller must ensure AVX2 is supported on the current CPU (checked
///   at runtime via `is_x86_feature_detected!("avx2")` in [`row_dot`]).
/// - `values` and `cols` must have equal length and every `cols[j]` must be
///   in bounds for `x`. Both hold for any matrix accepted by
///   [`crate::validation::validate_matrix`].
#[cfg(all(feature = "simd", target_arch = "x86_64"))]
#[target_feature(enable = "avx2")]
unsafe fn row_dot_avx2(values: &[f64], cols: &[usize], x: &[f64]) -> f64 {
    use std::arch::x86_64::*;

    let len = values.len();
    let chunks = len / 4;
    let remainder = len % 4;

    let mut accum = _mm256_setzero_pd();

    for chunk in 0..chunks {
        let base = chunk * 4;

        // SAFETY: `base + 3 < len` because `chunk < chunks`.
        let vals = _mm256_loadu_pd(values.as_ptr().add(base));

        let mut x_buf = [0.0f64; 4];
        for k in 0..4 {
            // SAFETY: `base + k < len`; `cols[base + k] < x.len()` by the
            // structural invariant.
            let col = *cols.get_unchecked(base + k);
            x_buf[k] = *x.get_unchecked(col);
        }
        let x_vec = _mm256_loadu_pd(x_buf.as_ptr());

        accum = _mm256_add_pd(accum, _mm256_mul_pd(vals, x_vec));
    }

    let mut sum = horizontal_sum_f64x4(accum);

    let tail_start = chunks * 4;
    for idx in tail_start..(tail_start + remainder) {
        // SAFETY: `idx < len` and `cols[idx] < x.len()` as above.
        let col = *cols.get_unchecked(idx);
        sum += *values.get_unchecked(idx) * *x.get_unchecked(col);
    }

    sum
}

/// Horizontal sum of an AVX2 register (4 x f64 -> 1 x f64).
#[cfg(all(feature = "simd", target_arch = "x86_64"))]
#[target_feature(enable = "avx2")]
unsafe fn horizontal_sum_f64x4(v: std::arch::x86_64::__m256d) -> f64 {
    use std::arch::x86_64::*;

    let hi = _mm256_extractf128_pd(v, 1);
    let lo = _mm256_castpd256_pd128(v);
    let sum128 = _mm_add_pd(lo, hi);
    let hi64 = _mm_unpackhi_pd(sum128, sum128);
    let result = _mm_add_sd(sum128, hi64);
    _mm_cvtsd_f64(result)
}

/// Contiguous dot product over the first `n` elements: `Σ_{i<n} x[i]*y[i]`.
///
/// The scalar path uses a 4-wide accumulator split to shorten the
/// floating-point dependency chain; the AVX2 path uses one vector
/// accumulator. Both are reassociations of the same term set.
///
/// # Panics
///
/// Debug-asserts that both slices have at least `n` elements (the kernel
/// layer checks this eagerly and reports it as an error).
#[inline]
pub fn local_dot(x: &[f64], y: &[f64], n: usize) -> f64 {
    debug_assert!(x.len() >= n && y.len() >= n, "local_dot: slice too short");

    #[cfg(all(feature = "simd", target_arch = "x86_64"))]
    {
        if is_x86_feature_detected!("avx2") {
            // SAFETY: AVX2 checked at runtime; lengths checked above.
            return unsafe { local_dot_avx2(&x[..n], &y[..n]) };
        }
    }

    local_dot_scalar(&x[..n], &y[..n])
}

/// Contiguous sum of squares over the first `n` elements: `Σ_{i<n} x[i]^2`.
///
/// Mathematically identical to `local_dot(x, x, n)`; provided so the aliased
/// fast path of the dot-product kernel reads each element once.
#[inline]
pub fn local_dot_self(x: &[f64], n: usize) -> f64 {
    debug_assert!(x.len() >= n, "local_dot_self: slice too short");

    #[cfg(all(feature = "simd", target_arch = "x86_64"))]
    {
        if is_x86_feature_detected!("avx2") {
            // SAFETY: AVX2 checked at runtime; length checked above.
            return unsafe { local_dot_avx2(&x[..n], &x[..n]) };
        }
    }

    let x = &x[..n];
    let chunks = n / 4;
    let remainder = n % 4;

    let mut acc0 = 0.0;
    let mut acc1 = 0.0;
    let mut acc2 = 0.0;
    let mut acc3 = 0.0;

    for i in 0..chunks {
        let j = i * 4;
        acc0 += x[j] * x[j];
        acc1 += x[j + 1] * x[j + 1];
        acc2 += x[j + 2] * x[j + 2];
        acc3 += x[j + 3] * x[j + 3];
    }

    let base = chunks * 4;
    for i in 0..remainder {
        acc0 += x[base + i] * x[base + i];
    }

    (acc0 + acc1) + (acc2 + acc3)
}

/// Scalar 4-wide-accumulator dot product.
#[inline]
fn local_dot_scalar(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len();
    let chunks = n / 4;
    let remainder = n % 4;

    let mut acc0 = 0.0;
    let mut acc1 = 0.0;
    let mut acc2 = 0.0;
    let mut acc3 = 0.0;

    for i in 0..chunks {
        let j = i * 4;
        acc0 += x[j] * y[j];
        acc1 += x[j + 1] * y[j + 1];
        acc2 += x[j + 2] * y[j + 2];
        acc3 += x[j + 3] * y[j + 3];
    }

    let base = chunks * 4;
    for i in 0..remainder {
        acc0 += x[base + i] * y[base + i];
    }

    (acc0 + acc1) + (acc2 + acc3)
}

/// AVX2 contiguous dot product.
///
/// # Safety
///
/// Caller must ensure AVX2 support and `x.len() == y.len()`.
#[cfg(all(feature = "simd", target_arch = "x86_64"))]
#[target_feature(enable = "avx2")]
unsafe fn local_dot_avx2(x: &[f64], y: &[f64]) -> f64 {
    use std::arch::x86_64::*;

    let n = x.len();
    let chunks = n / 4;
    let remainder = n % 4;

    let mut accum = _mm256_setzero_pd();
    for chunk in 0..chunks {
        let base = chunk * 4;
        // SAFETY: `base + 3 < n` because `chunk < chunks`.
        let xv = _mm256_loadu_pd(x.as_ptr().add(base));
        let yv = _mm256_loadu_pd(y.as_ptr().add(base));
        accum = _mm256_add_pd(accum, _mm256_mul_pd(xv, yv));
    }

    let mut sum = horizontal_sum_f64x4(accum);

    let base = chunks * 4;
    for i in 0..remainder {
        // SAFETY: `base + i < n`.
        sum += *x.get_unchecked(base + i) * *y.get_unchecked(base + i);
    }

    sum
}
