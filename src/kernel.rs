//! Pairwise inverse-square-law force kernel.
//!
//! The kernel computes the contribution of a unit mass at a source position
//! acting on a probe at a target position. Callers scale the result by the
//! source's actual mass, and are responsible for excluding self-interaction
//! (the softening term alone does not make the self-contribution zero).

/// Softening constant added to the squared distance so the kernel stays
/// finite when target and source nearly coincide.
pub const SOFTENING: f64 = 1e-9;

/// Computes the unit-mass force contribution at `target` from a source at
/// `source`.
///
/// With displacement `d = target - source` and softened squared distance
/// `r2 = d.x^2 + d.y^2 + SOFTENING`, the result is `d * r2^(-3/2)`: an
/// inverse-square-law vector whose magnitude falls off as `1/r^2`.
///
/// # Examples
///
/// ```
/// use quadgrav::kernel::kernel;
///
/// let (kx, ky) = kernel((0.0, 0.0), (1.0, 0.0));
/// // Unit separation along x: magnitude ~1, pointing along -x.
/// assert!((kx + 1.0).abs() < 1e-6);
/// assert!(ky.abs() < 1e-12);
/// ```
pub fn kernel(target: (f64, f64), source: (f64, f64)) -> (f64, f64) {
    let dx = target.0 - source.0;
    let dy = target.1 - source.1;
    let dist_sq = dx * dx + dy * dy + SOFTENING;
    let inv_dist = 1.0 / dist_sq.sqrt();
    let inv_dist3 = inv_dist * inv_dist * inv_dist;
    (dx * inv_dist3, dy * inv_dist3)
}

/// Same contract as [`kernel`], evaluated with [`fast_inv_sqrt`] instead of
/// exact library math.
///
/// Relative error stays well below 1e-3, which is accurate enough for force
/// evaluation; the tree itself uses the exact variant so that all traversal
/// strategies agree to tight tolerance.
pub fn kernel_fast(target: (f64, f64), source: (f64, f64)) -> (f64, f64) {
    let dx = target.0 - source.0;
    let dy = target.1 - source.1;
    let dist_sq = dx * dx + dy * dy + SOFTENING;
    let inv_dist = fast_inv_sqrt(dist_sq);
    let inv_dist3 = inv_dist * inv_dist * inv_dist;
    (dx * inv_dist3, dy * inv_dist3)
}

/// Approximate `1/sqrt(x)` for positive finite `x` using the bit-trick
/// initial guess refined by two Newton-Raphson steps.
///
/// Two refinement steps bring the relative error to a few parts in 1e6.
#[inline]
pub fn fast_inv_sqrt(x: f64) -> f64 {
    let i = 0x5FE6_EB50_C7B5_37A9_u64.wrapping_sub(x.to_bits() >> 1);
    let mut y = f64::from_bits(i);
    y *= 1.5 - 0.5 * x * y * y;
    y *= 1.5 - 0.5 * x * y * y;
    y
}
