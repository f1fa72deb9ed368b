// ─────────────────────────────────────────────────────────────────────
// CSR Wake — Steady State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! 1D steady-state CSR energy change of a bunch on a long circular orbit.
//!
//! The wake is the density derivative convolved with the steady-state
//! Green's function, whose integral over one cell is proportional to the
//! increment of z^(2/3):
//!
//!   G_k = −3^(2/3) · (Q/e) · r · mc² · ρ^(−2/3) · (z_{k+1}^(2/3) − z_k^(2/3))
//!
//! Reference: E. L. Saldin et al., NIM A 398, 373 (1997).

use csr_math::convolve::convolve_full;
use csr_math::deposit::histogram_1d;
use csr_math::interp::{gradient_1d, interp_linear};
use csr_math::savgol::{savgol_filter, DENSITY_POLYORDER, DENSITY_WINDOW};
use csr_types::config::SteadyStateParams;
use csr_types::constants::E_CHARGE;
use csr_types::error::{CsrError, CsrResult};
use csr_types::state::validate_line;
use ndarray::{Array1, ArrayView1};
use std::time::Instant;

/// Steady-state energy change per particle and the wake it was sampled from.
#[derive(Debug, Clone)]
pub struct SteadyStateKick {
    /// Energy change per unit path length at each particle (eV/m).
    pub denergy_ds: Array1<f64>,
    /// Wake sample positions (m).
    pub zvec: Array1<f64>,
    /// Wake at `zvec` (eV/m).
    pub wake: Array1<f64>,
}

/// Green's function increments for `n` cells of width `dz`.
pub fn steady_state_green(n: usize, dz: f64, factor: f64) -> Array1<f64> {
    let z23 = |k: usize| (k as f64 * dz).powf(2.0 / 3.0);
    Array1::from_shape_fn(n, |k| factor * (z23(k + 1) - z23(k)))
}

/// Steady-state CSR energy change for particles at `z` with charges `weights`.
pub fn csr1d_steady_state_kick_calc(
    z: ArrayView1<'_, f64>,
    weights: ArrayView1<'_, f64>,
    params: &SteadyStateParams,
) -> CsrResult<SteadyStateKick> {
    let t0 = Instant::now();
    let species = params.species()?;
    validate_line(z, weights)?;
    let nz = params.nz;
    if nz < 2 {
        return Err(CsrError::DegenerateGrid(format!(
            "steady-state wake needs at least 2 samples, got {nz}"
        )));
    }
    if !params.rho.is_finite() || params.rho == 0.0 {
        return Err(CsrError::InvalidInput(format!(
            "rho must be finite and nonzero, got {}",
            params.rho
        )));
    }
    let total_charge = weights.sum();
    if !(total_charge > 0.0) {
        return Err(CsrError::EmptyBunch);
    }

    let hist = histogram_1d(z, weights, nz)?;
    let (zmin, zmax) = (hist.min, hist.max);
    let dz = (zmax - zmin) / (nz - 1) as f64;
    let zvec = Array1::linspace(zmin, zmax, nz);

    let density = hist.counts / (dz * total_charge);
    let density_prime = gradient_1d(density.view(), dz);
    let density_prime = savgol_filter(density_prime.view(), DENSITY_WINDOW, DENSITY_POLYORDER)?;

    let factor = -(3.0f64).powf(2.0 / 3.0)
        * (total_charge / E_CHARGE)
        * species.classical_radius_m()
        * species.rest_energy_ev()
        * params.rho.abs().powf(-2.0 / 3.0);
    let green = steady_state_green(nz - 2, dz, factor);

    let full = convolve_full(density_prime.view(), green.view());
    let mut wake = Array1::<f64>::zeros(nz);
    let kept = full.len().min(nz);
    wake.slice_mut(ndarray::s![..kept])
        .assign(&full.slice(ndarray::s![..kept]));

    let denergy_ds = z.mapv(|zp| interp_linear(zp, zvec.view(), wake.view()));
    log::debug!(
        "steady-state wake for {} particles on {nz} samples in {:.3} ms",
        z.len(),
        t0.elapsed().as_secs_f64() * 1e3
    );
    Ok(SteadyStateKick {
        denergy_ds,
        zvec,
        wake,
    })
}
