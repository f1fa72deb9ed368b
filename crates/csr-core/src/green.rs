// ─────────────────────────────────────────────────────────────────────
// CSR Wake — Green
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Retarded-potential Green's functions of a bunch on a circular orbit.
//!
//! Coordinates are dimensionless: `z` is the longitudinal separation
//! divided by 2ρ, `x` the transverse separation divided by ρ. The
//! retardation angle α solves
//!
//!   z = α − (β/2) κ(α),   κ(α) = √(x² + 4(1+x) sin²α)
//!
//! where κ is the source–observer distance in units of ρ. Its derivative
//! in α is at least 1 − β > 0, so the root is unique and bisection on the
//! bracket `[z, z + β(|x|/2 + √(1+x))]` always converges.
//!
//! References: Y. Cai and Y. Ding, PRAB 23, 014402 (2020);
//! C. Huang et al., PRSTAB 16, 010701 (2013).

use csr_math::elliptic::{ellipeinc, ellipkinc};

const ALPHA_MAX_ITER: usize = 200;

/// The scalar potential formulas sampled by the kernel builder.
///
/// Implementations must be pure: the builder may call them from any
/// thread, in any order.
pub trait CsrPotential: Sync {
    /// Longitudinal potential ψ_s(z, x; β).
    fn psi_s(&self, z: f64, x: f64, beta: f64) -> f64;

    /// Transverse potential ψ_x(z, x; β). Singular at x = 0.
    fn psi_x(&self, z: f64, x: f64, beta: f64) -> f64;

    /// Finite stand-in for ψ_x on the x = 0 line, given the scaled cell
    /// width `dx` of the grid being filled.
    fn psi_x_where_x_equals_zero(&self, z: f64, dx: f64, beta: f64) -> f64 {
        0.5 * (self.psi_x(z, -0.5 * dx, beta) + self.psi_x(z, 0.5 * dx, beta))
    }
}

/// Potentials with the retardation angle solved to machine precision.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactPotential;

impl CsrPotential for ExactPotential {
    fn psi_s(&self, z: f64, x: f64, beta: f64) -> f64 {
        psi_s(z, x, beta)
    }

    fn psi_x(&self, z: f64, x: f64, beta: f64) -> f64 {
        psi_x(z, x, beta)
    }
}

/// Retardation angle α(z, x; β). NaN outside the domain x > −1.
pub fn alpha(z: f64, x: f64, beta: f64) -> f64 {
    if !(x > -1.0) || !z.is_finite() {
        return f64::NAN;
    }
    let residual = |a: f64| a - 0.5 * beta * kappa(a, x) - z;

    let mut lo = z;
    let mut hi = z + beta * (0.5 * x.abs() + (1.0 + x).sqrt());
    if residual(lo) >= 0.0 {
        return lo;
    }
    for _ in 0..ALPHA_MAX_ITER {
        let mid = 0.5 * (lo + hi);
        if mid <= lo || mid >= hi {
            break;
        }
        if residual(mid) < 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// Source–observer distance κ at retardation angle `alpha`.
pub fn kappa(alpha: f64, x: f64) -> f64 {
    let s = alpha.sin();
    (x * x + 4.0 * (1.0 + x) * s * s).sqrt()
}

/// Pieces shared by ψ_s and ψ_x at one retardation angle.
///
/// `d` is κ² − β²(1+x)² sin²2α written without the subtraction of two
/// O(1) terms, which cancel to about 1e-12 for ultrarelativistic
/// near-axis separations.
struct Retarded {
    alpha: f64,
    kappa: f64,
    sin2: f64,
    sin2a: f64,
    gamma_inv2: f64,
    d: f64,
}

impl Retarded {
    fn new(z: f64, x: f64, beta: f64) -> Self {
        let alpha = alpha(z, x, beta);
        let kappa = kappa(alpha, x);
        let s = alpha.sin();
        let sin2 = s * s;
        let sin2a = (2.0 * alpha).sin();
        let u = 1.0 + x;
        let beta2 = beta * beta;
        let gamma_inv2 = (1.0 - beta) * (1.0 + beta);
        let d = x * x + 4.0 * u * sin2 * (gamma_inv2 - beta2 * x + beta2 * u * sin2);
        Retarded {
            alpha,
            kappa,
            sin2,
            sin2a,
            gamma_inv2,
            d,
        }
    }
}

/// Longitudinal potential, without its constant term.
///
/// The only 0/0 point is the origin, where the limit is 0.
pub fn psi_s(z: f64, x: f64, beta: f64) -> f64 {
    if z == 0.0 && x == 0.0 {
        return 0.0;
    }
    let r = Retarded::new(z, x, beta);
    let u = 1.0 + x;
    // cos2α − 1/(1+x)
    let numerator = (x - 2.0 * u * r.sin2) / u;
    if r.sin2a >= 0.0 {
        // κ − β(1+x)sin2α = d / (κ + β(1+x)sin2α)
        numerator * (r.kappa + beta * u * r.sin2a) / r.d
    } else {
        numerator / (r.kappa - beta * u * r.sin2a)
    }
}

/// Transverse potential, without its constant term.
///
/// Returns 0 on x = 0, where the formula is singular; kernel grids patch
/// that line with [`CsrPotential::psi_x_where_x_equals_zero`].
///
/// The three rational terms over d are combined into one numerator and
/// expanded in sin²α and 1/γ², so behind the source (z < 0) they no
/// longer cancel at O(1/d).
pub fn psi_x(z: f64, x: f64, beta: f64) -> f64 {
    if x == 0.0 {
        return 0.0;
    }
    let beta2 = beta * beta;
    let r = Retarded::new(z, x, beta);
    let u = 1.0 + x;
    let m = -4.0 * u / (x * x);
    let ell_f = ellipkinc(r.alpha, m);
    let ell_e = ellipeinc(r.alpha, m);
    let abs_x = x.abs();
    let q = 1.0 + u * u;

    let elliptic = (q * ell_f - x * x * ell_e) / (abs_x * u);
    // κ² − 2β²(1+x)² + β²(1+x)(2+2x+x²)cos2α
    let radial = x * x * (1.0 + beta2 * u)
        + 2.0 * u * r.sin2 * (2.0 * r.gamma_inv2 - beta2 * x * (2.0 + x));
    // β(1+x)κ sin2α (β²(1+x)cos2α − 1)
    let angular = -beta
        * u
        * r.kappa
        * r.sin2a
        * (r.gamma_inv2 - beta2 * x + 2.0 * beta2 * u * r.sin2);
    // ψ_φ contribution
    let phi = ell_f / abs_x;

    elliptic + (radial + angular) / (beta * u * r.d) - 2.0 / beta2 * phi
}

/// Free-function form of the default x = 0 patch.
pub fn psi_x_where_x_equals_zero(z: f64, dx: f64, beta: f64) -> f64 {
    ExactPotential.psi_x_where_x_equals_zero(z, dx, beta)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BETA: f64 = 0.999_999_5; // γ = 1000

    #[test]
    fn test_alpha_satisfies_retardation() {
        for &(z, x) in &[(1e-3, 2e-3), (-4e-3, 1e-3), (0.0, -5e-3), (2e-2, 0.0), (1e-6, 1e-5)] {
            let a = alpha(z, x, BETA);
            let r = a - 0.5 * BETA * kappa(a, x) - z;
            assert!(r.abs() < 1e-15, "residual {r} at ({z}, {x})");
        }
    }

    #[test]
    fn test_alpha_monotone_in_z() {
        let x = 1e-3;
        let mut prev = alpha(-1e-2, x, BETA);
        for k in 1..100 {
            let z = -1e-2 + k as f64 * 2e-4;
            let a = alpha(z, x, BETA);
            assert!(a > prev, "alpha not increasing at z = {z}");
            prev = a;
        }
    }

    #[test]
    fn test_alpha_outside_domain() {
        assert!(alpha(0.0, -1.5, BETA).is_nan());
    }

    #[test]
    fn test_psi_s_origin_limit() {
        assert_eq!(psi_s(0.0, 0.0, BETA), 0.0);
        let near = psi_s(1e-22, 0.0, BETA);
        assert!(near.is_finite() && near.abs() < 1e-6, "psi_s near origin = {near}");
    }

    #[test]
    fn test_psi_s_on_axis_closed_form() {
        // x = 0: psi_s = -sin α / (1 - β cos α) for α > 0
        let z = 3e-3;
        let a = alpha(z, 0.0, BETA);
        let expected = -a.sin() / (1.0 - BETA * a.cos());
        assert!((psi_s(z, 0.0, BETA) - expected).abs() < 1e-9 * expected.abs());
    }

    #[test]
    fn test_potentials_behind_source_precise() {
        // 60-digit references; near-axis points behind the source
        let beta = (1.0 - 1.0 / (1000.0f64 * 1000.0)).sqrt();
        let cases = [
            (-1e-4, 6.6e-6, 0.032_974_728_003_029_2, 1.999_994_014_313_478_7),
            (-1e-6, 6.6e-6, 3.300_043_502_113_765_3, 2.000_019_898_873_619),
            (-3e-4, -6.6e-6, -0.011_075_091_362_014_36, 2.000_014_909_435_399_6),
            (0.0, 6.6e-6, -522.943_265_355_645_4, -2.653_507_310_927_907_7),
        ];
        for (z, x, s_ref, x_ref) in cases {
            let s = psi_s(z, x, beta);
            let px = psi_x(z, x, beta);
            assert!((s - s_ref).abs() < 1e-10 * s_ref.abs(), "psi_s({z}, {x}) = {s}");
            assert!((px - x_ref).abs() < 1e-10 * x_ref.abs(), "psi_x({z}, {x}) = {px}");
        }
    }

    #[test]
    fn test_psi_x_finite_off_axis() {
        for &z in &[-1e-2, -1e-4, 0.0, 1e-4, 1e-2] {
            for &x in &[-2e-2, -1e-4, 1e-4, 2e-2] {
                let v = psi_x(z, x, BETA);
                assert!(v.is_finite(), "psi_x({z}, {x}) = {v}");
            }
        }
        assert_eq!(psi_x(1e-3, 0.0, BETA), 0.0);
    }

    #[test]
    fn test_zero_patch_is_neighbour_average() {
        let (z, dx) = (2e-3, 4e-4);
        let patch = psi_x_where_x_equals_zero(z, dx, BETA);
        let expected = 0.5 * (psi_x(z, -2e-4, BETA) + psi_x(z, 2e-4, BETA));
        assert!((patch - expected).abs() <= 1e-12 * expected.abs().max(1.0));
        assert!(patch.is_finite());
    }
}
