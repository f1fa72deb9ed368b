// ─────────────────────────────────────────────────────────────────────
// CSR Wake — Property-Based Tests (proptest) for csr-math
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for csr-math using proptest.
//!
//! Covers: CIC deposition, Savitzky–Golay filtering, centered FFT
//! convolution, cubic splines, Thomas solver, incomplete elliptic integrals.

use csr_math::convolve::fft_convolve_2d_centered;
use csr_math::deposit::{histogram_1d, histogram_cic_2d};
use csr_math::elliptic::{ellipeinc, ellipkinc};
use csr_math::savgol::savgol_filter;
use csr_math::spline::BicubicSpline;
use csr_math::tridiag::thomas_solve_in_place;
use ndarray::{Array1, Array2};
use proptest::prelude::*;

// ── Deposition Properties ────────────────────────────────────────────

proptest! {
    /// Particles strictly inside the grid deposit all of their charge.
    #[test]
    fn cic_conserves_interior_charge(
        pts in prop::collection::vec((0.0f64..1.0, -2.0f64..2.0, 0.0f64..5.0), 1..200),
        nz in 2usize..40,
        nx in 2usize..40,
    ) {
        let z: Array1<f64> = pts.iter().map(|p| p.0).collect();
        let x: Array1<f64> = pts.iter().map(|p| p.1).collect();
        let w: Array1<f64> = pts.iter().map(|p| p.2).collect();
        let grid = histogram_cic_2d(z.view(), x.view(), w.view(), nz, 0.0, 1.0, nx, -2.0, 2.0).unwrap();

        let total = w.sum();
        prop_assert!((grid.sum() - total).abs() <= 1e-10 * total.max(1.0),
            "deposited {} of {}", grid.sum(), total);
        prop_assert!(grid.iter().all(|&v| v >= 0.0));
    }

    /// Weighted 1D histogram conserves total weight.
    #[test]
    fn histogram_conserves_weight(
        values in prop::collection::vec(-1.0f64..1.0, 2..200),
        nbins in 1usize..64,
    ) {
        let v = Array1::from(values.clone());
        let w = Array1::from_shape_fn(values.len(), |i| 1.0 + i as f64 * 0.01);
        prop_assume!(v.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
            > v.iter().cloned().fold(f64::INFINITY, f64::min));
        let h = histogram_1d(v.view(), w.view(), nbins).unwrap();
        prop_assert_eq!(h.counts.len(), nbins);
        prop_assert!((h.counts.sum() - w.sum()).abs() < 1e-9);
    }
}

// ── Filtering Properties ─────────────────────────────────────────────

proptest! {
    /// A quadratic-order filter leaves quadratics untouched, edges included.
    #[test]
    fn savgol_preserves_quadratics(
        n in 13usize..120,
        a in -5.0f64..5.0,
        b in -5.0f64..5.0,
        c in -5.0f64..5.0,
    ) {
        let y = Array1::from_shape_fn(n, |i| {
            let t = i as f64 / n as f64;
            a + b * t + c * t * t
        });
        let out = savgol_filter(y.view(), 13, 2).unwrap();
        for i in 0..n {
            prop_assert!((out[i] - y[i]).abs() < 1e-9, "sample {}: {} vs {}", i, out[i], y[i]);
        }
    }

    /// Filtering is linear: S(αy) = αS(y).
    #[test]
    fn savgol_is_linear(n in 13usize..80, alpha in -10.0f64..10.0) {
        let y = Array1::from_shape_fn(n, |i| ((i * 7919) % 13) as f64 - 6.0);
        let s1 = savgol_filter(y.view(), 13, 2).unwrap();
        let s2 = savgol_filter(y.mapv(|v| v * alpha).view(), 13, 2).unwrap();
        for i in 0..n {
            prop_assert!((s2[i] - alpha * s1[i]).abs() < 1e-9);
        }
    }
}

// ── Convolution Properties ───────────────────────────────────────────

proptest! {
    /// Centered FFT convolution agrees with the direct sum.
    #[test]
    fn fft_convolution_matches_direct(n in 2usize..7, m in 2usize..7, seed in 0u64..1000) {
        let input = Array2::from_shape_fn((n, m), |(i, j)| (((i * 31 + j * 17) as u64 + seed) % 11) as f64 - 5.0);
        let kernel = Array2::from_shape_fn((2 * n, 2 * m), |(i, j)| (((i * 13 + j * 7) as u64 + seed) % 5) as f64 * 0.5);
        let fast = fft_convolve_2d_centered(&input, &kernel, (n, m));

        for i in 0..n {
            for j in 0..m {
                let mut direct = 0.0;
                for a in 0..n {
                    for b in 0..m {
                        direct += input[[a, b]] * kernel[[i + n - a, j + m - b]];
                    }
                }
                prop_assert!((fast[[i, j]] - direct).abs() < 1e-9,
                    "({}, {}): fft {} vs direct {}", i, j, fast[[i, j]], direct);
            }
        }
    }
}

// ── Spline Properties ────────────────────────────────────────────────

proptest! {
    /// The spline passes through every node.
    #[test]
    fn spline_interpolates_nodes(nz in 2usize..20, nx in 2usize..20, phase in 0.0f64..6.0) {
        let z = Array1::<f64>::linspace(-1.0, 1.0, nz);
        let x = Array1::<f64>::linspace(0.0, 3.0, nx);
        let values = Array2::from_shape_fn((nz, nx), |(i, j)| (z[i] * 2.0 + phase).sin() + x[j].cos());
        let spline = BicubicSpline::new(&z, &x, &values).unwrap();
        for ((i, j), &v) in values.indexed_iter() {
            prop_assert!((spline.ev(z[i], x[j]) - v).abs() < 1e-9);
        }
    }
}

// ── Thomas Solver Properties ─────────────────────────────────────────

proptest! {
    /// For any diagonally dominant tridiagonal system the residual vanishes.
    #[test]
    fn thomas_solve_ax_eq_d(n in 3usize..30) {
        let a: Vec<f64> = (0..n).map(|i| if i > 0 { 1.0 } else { 0.0 }).collect();
        let b = vec![4.0; n];
        let c: Vec<f64> = (0..n).map(|i| if i < n - 1 { 1.0 } else { 0.0 }).collect();
        let d: Vec<f64> = (0..n).map(|i| (i as f64 + 1.0).sin()).collect();
        let mut x = d.clone();
        thomas_solve_in_place(&a, &b, &c, &mut x).unwrap();

        for i in 0..n {
            let mut ax_i = b[i] * x[i];
            if i > 0 { ax_i += a[i] * x[i - 1]; }
            if i < n - 1 { ax_i += c[i] * x[i + 1]; }
            prop_assert!((ax_i - d[i]).abs() < 1e-10);
        }
    }
}

// ── Elliptic Integral Properties ─────────────────────────────────────

proptest! {
    /// For m < 0 both integrands are positive, so F and E increase with φ,
    /// and E ≥ φ ≥ F on [0, π/2].
    #[test]
    fn incomplete_elliptic_ordering(phi in 0.001f64..1.5, m in -1000.0f64..-0.01) {
        let f = ellipkinc(phi, m);
        let e = ellipeinc(phi, m);
        prop_assert!(f.is_finite() && e.is_finite());
        prop_assert!(f <= phi + 1e-12, "F = {} > phi = {}", f, phi);
        prop_assert!(e >= phi - 1e-12, "E = {} < phi = {}", e, phi);
        prop_assert!(ellipkinc(phi + 0.01, m) > f);
        prop_assert!(ellipeinc(phi + 0.01, m) > e);
    }
}
