use crate::kernel::{fast_inv_sqrt, kernel, kernel_fast, SOFTENING};
use approx::assert_relative_eq;

#[test]
fn test_kernel_direction_and_magnitude() {
    // Source one unit to the east of the target: d = (-1, 0), |d| = 1.
    let (kx, ky) = kernel((0.0, 0.0), (1.0, 0.0));
    assert_relative_eq!(kx, -1.0, max_relative = 1e-6);
    assert!(ky.abs() < 1e-12);

    // Half the separation, four times the magnitude.
    let (kx_near, _) = kernel((0.0, 0.0), (0.5, 0.0));
    assert_relative_eq!(kx_near, -4.0, max_relative = 1e-6);
}

#[test]
fn test_kernel_antisymmetry() {
    let a = (0.2, 0.7);
    let b = (0.9, 0.1);
    let (fx, fy) = kernel(a, b);
    let (gx, gy) = kernel(b, a);
    assert_relative_eq!(fx, -gx, max_relative = 1e-12);
    assert_relative_eq!(fy, -gy, max_relative = 1e-12);
}

#[test]
fn test_kernel_softening_keeps_result_finite() {
    // Coincident positions: the softening term bounds the magnitude at
    // SOFTENING^(-1/2) per axis factor instead of dividing by zero.
    let (kx, ky) = kernel((0.4, 0.4), (0.4, 0.4));
    assert!(kx.is_finite() && ky.is_finite());
    assert_eq!((kx, ky), (0.0, 0.0)); // zero displacement, zero direction

    // Nearly coincident: large but still finite.
    let (kx, _) = kernel((0.4 + 1e-12, 0.4), (0.4, 0.4));
    assert!(kx.is_finite());
    assert!(kx.abs() <= 1.0 / SOFTENING);
}

#[test]
fn test_fast_inv_sqrt_accuracy() {
    let mut worst = 0.0_f64;
    // Sweep several orders of magnitude around the distances the tree sees.
    for exp in -9..=3 {
        for step in 1..100 {
            let x = (step as f64 / 10.0) * 10.0_f64.powi(exp);
            let approx = fast_inv_sqrt(x);
            let exact = 1.0 / x.sqrt();
            worst = worst.max(((approx - exact) / exact).abs());
        }
    }
    assert!(worst < 1e-4, "worst relative error {} too large", worst);
}

#[test]
fn test_kernel_fast_matches_exact_kernel() {
    let pairs = [
        ((0.1, 0.2), (0.8, 0.9)),
        ((0.5, 0.5), (0.501, 0.499)),
        ((0.0, 0.0), (1.0, 1.0)),
        ((0.25, 0.75), (0.75, 0.25)),
    ];
    for (target, source) in pairs {
        let (ex, ey) = kernel(target, source);
        let (fx, fy) = kernel_fast(target, source);
        assert_relative_eq!(fx, ex, max_relative = 1e-3);
        assert_relative_eq!(fy, ey, max_relative = 1e-3);
    }
}
