// ─────────────────────────────────────────────────────────────────────
// CSR Wake — Elliptic
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Elliptic integrals via Carlson's symmetric forms.
//!
//! Parameter convention matches scipy: `m = k²`. The incomplete forms
//! accept any `m` with `1 - m sin²φ > 0`, in particular the large negative
//! parameters that appear in the transverse CSR potential.
//!
//! Duplication algorithm after B. C. Carlson, "Numerical computation of
//! real or complex elliptic integrals", Numer. Algorithms 10 (1995).

use std::f64::consts::PI;

/// Convergence threshold on the relative spread of the arguments.
const CARLSON_TOL: f64 = 1e-4;
const CARLSON_MAX_ITER: usize = 64;

/// Carlson's symmetric integral of the first kind R_F(x, y, z).
///
/// Arguments must be non-negative with at most one of them zero.
pub fn carlson_rf(x: f64, y: f64, z: f64) -> f64 {
    let (mut x, mut y, mut z) = (x, y, z);
    let mut mean = (x + y + z) / 3.0;
    let (mut ex, mut ey, mut ez) = (1.0 - x / mean, 1.0 - y / mean, 1.0 - z / mean);

    for _ in 0..CARLSON_MAX_ITER {
        if ex.abs().max(ey.abs()).max(ez.abs()) < CARLSON_TOL {
            break;
        }
        let (sx, sy, sz) = (x.sqrt(), y.sqrt(), z.sqrt());
        let lambda = sx * (sy + sz) + sy * sz;
        x = 0.25 * (x + lambda);
        y = 0.25 * (y + lambda);
        z = 0.25 * (z + lambda);
        mean = (x + y + z) / 3.0;
        ex = 1.0 - x / mean;
        ey = 1.0 - y / mean;
        ez = 1.0 - z / mean;
    }

    let e2 = ex * ey - ez * ez;
    let e3 = ex * ey * ez;
    (1.0 + (e2 / 24.0 - 0.1 - 3.0 * e3 / 44.0) * e2 + e3 / 14.0) / mean.sqrt()
}

/// Carlson's symmetric integral of the second kind R_D(x, y, z).
///
/// `x, y` non-negative with at most one zero, `z` positive.
pub fn carlson_rd(x: f64, y: f64, z: f64) -> f64 {
    let (mut x, mut y, mut z) = (x, y, z);
    let mut sum = 0.0;
    let mut fac = 1.0;
    let mut mean = 0.2 * (x + y + 3.0 * z);
    let (mut ex, mut ey, mut ez) = (1.0 - x / mean, 1.0 - y / mean, 1.0 - z / mean);

    for _ in 0..CARLSON_MAX_ITER {
        if ex.abs().max(ey.abs()).max(ez.abs()) < CARLSON_TOL {
            break;
        }
        let (sx, sy, sz) = (x.sqrt(), y.sqrt(), z.sqrt());
        let lambda = sx * (sy + sz) + sy * sz;
        sum += fac / (sz * (z + lambda));
        fac *= 0.25;
        x = 0.25 * (x + lambda);
        y = 0.25 * (y + lambda);
        z = 0.25 * (z + lambda);
        mean = 0.2 * (x + y + 3.0 * z);
        ex = 1.0 - x / mean;
        ey = 1.0 - y / mean;
        ez = 1.0 - z / mean;
    }

    let ea = ex * ey;
    let eb = ez * ez;
    let ec = ea - eb;
    let ed = ea - 6.0 * eb;
    let ee = ed + ec + ec;
    let c1 = 3.0 / 14.0;
    let c2 = 1.0 / 6.0;
    let c3 = 9.0 / 22.0;
    let c4 = 3.0 / 26.0;
    let series = 1.0
        + ed * (-c1 + 0.25 * c3 * ed - 1.5 * c4 * ez * ee)
        + ez * (c2 * ee + ez * (-c3 * ec + ez * c4 * ea));
    3.0 * sum + fac * series / (mean * mean.sqrt())
}

/// Complete elliptic integral of the first kind K(m), m < 1.
///
/// Matches `scipy.special.ellipk(m)`; returns +∞ at m = 1.
pub fn ellipk(m: f64) -> f64 {
    if m == 1.0 {
        return f64::INFINITY;
    }
    carlson_rf(0.0, 1.0 - m, 1.0)
}

/// Complete elliptic integral of the second kind E(m), m <= 1.
///
/// Matches `scipy.special.ellipe(m)`.
pub fn ellipe(m: f64) -> f64 {
    if m == 1.0 {
        return 1.0;
    }
    let y = 1.0 - m;
    carlson_rf(0.0, y, 1.0) - m / 3.0 * carlson_rd(0.0, y, 1.0)
}

/// Reduce φ to [-π/2, π/2] and return (reduced φ, number of half periods).
fn reduce_amplitude(phi: f64) -> (f64, f64) {
    let periods = (phi / PI).round();
    (phi - periods * PI, periods)
}

/// Incomplete elliptic integral of the first kind F(φ | m).
///
/// Matches `scipy.special.ellipkinc(phi, m)`.
pub fn ellipkinc(phi: f64, m: f64) -> f64 {
    let (phi_r, periods) = reduce_amplitude(phi);
    let (s, c) = phi_r.sin_cos();
    let partial = s * carlson_rf(c * c, 1.0 - m * s * s, 1.0);
    if periods == 0.0 {
        partial
    } else {
        partial + 2.0 * periods * ellipk(m)
    }
}

/// Incomplete elliptic integral of the second kind E(φ | m).
///
/// Matches `scipy.special.ellipeinc(phi, m)`.
pub fn ellipeinc(phi: f64, m: f64) -> f64 {
    let (phi_r, periods) = reduce_amplitude(phi);
    let (s, c) = phi_r.sin_cos();
    let c2 = c * c;
    let delta2 = 1.0 - m * s * s;
    let partial = s * carlson_rf(c2, delta2, 1.0) - m / 3.0 * s * s * s * carlson_rd(c2, delta2, 1.0);
    if periods == 0.0 {
        partial
    } else {
        partial + 2.0 * periods * ellipe(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    // Reference values from scipy.special
    #[test]
    fn test_ellipk_reference_values() {
        let cases: &[(f64, f64)] = &[
            (0.0, FRAC_PI_2),
            (0.1, 1.6124413487202192),
            (0.5, 1.8540746773013719),
            (0.9, 2.5780921133481733),
            (0.999, 4.841132560550296),
            (-1.0, 1.3110287771460599),
        ];
        for &(m, expected) in cases {
            let got = ellipk(m);
            let err = (got - expected).abs();
            assert!(err < 1e-12, "K({m}) = {got}, expected {expected}, error = {err}");
        }
    }

    #[test]
    fn test_ellipe_reference_values() {
        let cases: &[(f64, f64)] = &[
            (0.0, FRAC_PI_2),
            (0.2, 1.489035058095853),
            (0.5, 1.3506438810476755),
            (0.95, 1.0604737277662784),
            (1.0, 1.0),
            (-1.0, 1.9100988945138562),
        ];
        for &(m, expected) in cases {
            let got = ellipe(m);
            let err = (got - expected).abs();
            assert!(err < 1e-12, "E({m}) = {got}, expected {expected}, error = {err}");
        }
    }

    #[test]
    fn test_incomplete_reduces_to_complete() {
        for m in [-25.0, -1.0, 0.0, 0.3, 0.8] {
            assert!((ellipkinc(FRAC_PI_2, m) - ellipk(m)).abs() < 1e-12, "F(pi/2 | {m})");
            assert!((ellipeinc(FRAC_PI_2, m) - ellipe(m)).abs() < 1e-12, "E(pi/2 | {m})");
        }
    }

    #[test]
    fn test_zero_parameter_is_identity() {
        for phi in [-1.2, -0.3, 0.0, 0.01, 0.7, 1.5] {
            assert!((ellipkinc(phi, 0.0) - phi).abs() < 1e-13);
            assert!((ellipeinc(phi, 0.0) - phi).abs() < 1e-13);
        }
    }

    #[test]
    fn test_incomplete_derivatives_negative_parameter() {
        // dF/dφ = 1/√(1 - m sin²φ), dE/dφ = √(1 - m sin²φ)
        let h = 1e-5;
        for &m in &[-400.0f64, -40.0, -4.0] {
            for &phi in &[0.001f64, 0.05, 0.4, 1.1] {
                let delta = (1.0 - m * phi.sin().powi(2)).sqrt();
                let df = (ellipkinc(phi + h, m) - ellipkinc(phi - h, m)) / (2.0 * h);
                let de = (ellipeinc(phi + h, m) - ellipeinc(phi - h, m)) / (2.0 * h);
                assert!((df - 1.0 / delta).abs() < 1e-6 * (1.0 / delta).max(1.0), "dF at ({phi}, {m})");
                assert!((de - delta).abs() < 1e-6 * delta, "dE at ({phi}, {m})");
            }
        }
    }

    #[test]
    fn test_incomplete_odd_and_quasi_periodic() {
        let m = -3.0;
        for phi in [0.2, 0.9, 1.4] {
            assert!((ellipkinc(-phi, m) + ellipkinc(phi, m)).abs() < 1e-13);
            assert!((ellipeinc(-phi, m) + ellipeinc(phi, m)).abs() < 1e-13);
            let shifted = ellipkinc(phi + PI, m);
            assert!((shifted - ellipkinc(phi, m) - 2.0 * ellipk(m)).abs() < 1e-12);
        }
    }
}
