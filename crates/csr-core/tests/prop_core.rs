// ─────────────────────────────────────────────────────────────────────
// CSR Wake — Property-Based Tests (proptest) for csr-core
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for csr-core using proptest.
//!
//! Covers: retardation angle, potential finiteness, kernel shape,
//! steady-state translation invariance.

use csr_core::green::{alpha, kappa, psi_s, psi_x, ExactPotential};
use csr_core::kernel::{build_potential_kernels, KernelGeometry, Sequential};
use csr_core::steady_state::csr1d_steady_state_kick_calc;
use csr_types::config::SteadyStateParams;
use csr_types::state::Grid2D;
use ndarray::Array1;
use proptest::prelude::*;

// ── Green's Function Properties ──────────────────────────────────────

proptest! {
    /// α solves the retardation condition and lies in its bracket.
    #[test]
    fn alpha_solves_retardation(
        z in -0.05f64..0.05,
        x in -0.05f64..0.05,
        gamma in 2.0f64..1e4,
    ) {
        let beta = (1.0 - 1.0 / (gamma * gamma)).sqrt();
        let a = alpha(z, x, beta);
        let residual = a - 0.5 * beta * kappa(a, x) - z;
        prop_assert!(residual.abs() < 1e-14, "residual {residual}");
        prop_assert!(a >= z);
    }

    /// Off the singular line both potentials are finite.
    #[test]
    fn potentials_finite(
        z in -0.01f64..0.01,
        x in prop_oneof![-0.01f64..-1e-6, 1e-6f64..0.01],
        gamma in 10.0f64..1e4,
    ) {
        let beta = (1.0 - 1.0 / (gamma * gamma)).sqrt();
        prop_assert!(psi_s(z, x, beta).is_finite());
        prop_assert!(psi_x(z, x, beta).is_finite());
    }
}

// ── Kernel Properties ────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Kernel grids have the doubled shape and no NaNs after patching.
    #[test]
    fn kernels_shape_and_finite(nz in 2usize..10, nx in 2usize..10) {
        let grid = Grid2D::new(nz, nx, -2e-4, 2e-4, -1e-4, 1e-4).unwrap();
        let geometry = KernelGeometry::new(1.0, 0.9999, &grid);
        let k = build_potential_kernels(&geometry, &ExactPotential, &Sequential).unwrap();
        prop_assert_eq!(k.psi_s.dim(), (2 * nz, 2 * nx));
        prop_assert!(k.psi_s.iter().all(|v| v.is_finite()));
        prop_assert!(k.psi_x.iter().all(|v| v.is_finite()));
    }

    /// Shifting every particle in z moves the wake axis but not the wake.
    #[test]
    fn steady_state_translation_invariant(shift in -1e-3f64..1e-3, nz in 20usize..120) {
        let z = Array1::linspace(-2e-4, 2e-4, 3000);
        let w = z.mapv(|v: f64| 1e-13 * (-0.5 * (v / 5e-5).powi(2)).exp());
        let params = SteadyStateParams { nz, ..Default::default() };
        let a = csr1d_steady_state_kick_calc(z.view(), w.view(), &params).unwrap();
        let moved = z.mapv(|v| v + shift);
        let b = csr1d_steady_state_kick_calc(moved.view(), w.view(), &params).unwrap();

        let scale = a.wake.iter().fold(0.0f64, |m, v| m.max(v.abs()));
        for (wa, wb) in a.wake.iter().zip(b.wake.iter()) {
            prop_assert!((wa - wb).abs() <= 1e-6 * scale, "{wa} vs {wb}");
        }
        prop_assert!((b.zvec[0] - a.zvec[0] - shift).abs() < 1e-12);
    }
}
