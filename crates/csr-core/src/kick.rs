// ─────────────────────────────────────────────────────────────────────
// CSR Wake — Kick
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! 2D CSR kick on a bunch in a bend.
//!
//! Pipeline: deposit → smooth and differentiate along z → sample (or reuse)
//! the potential kernels → convolve → interpolate the wakes back to the
//! particles and scale by r·N/γ.

use crate::density::{bunch_grid, charge_density, smoothed_density_derivative};
use crate::green::{CsrPotential, ExactPotential};
use crate::kernel::{
    build_potential_kernels, KernelCache, KernelGeometry, KernelSource, MapExecutor,
    PotentialKernels,
};
use crate::wake::{compute_wake_grids, WakeGrids};
use csr_math::spline::BicubicSpline;
use csr_types::config::Csr2dParams;
use csr_types::constants::E_CHARGE;
use csr_types::error::{CsrError, CsrResult};
use csr_types::state::{Grid2D, ParticleBunch};
use ndarray::{Array1, Array2};
use std::borrow::Cow;
use std::time::Instant;

/// Per-particle CSR kicks.
#[derive(Debug, Clone)]
pub struct Csr2dKick {
    /// Relative energy change per unit path length (1/m).
    pub ddelta_ds: Array1<f64>,
    /// Transverse angle change per unit path length (1/m).
    pub dxp_ds: Array1<f64>,
    /// Intermediate grids, present when `Csr2dParams::debug` is set.
    pub diagnostics: Option<Csr2dDiagnostics>,
}

/// Intermediate results of a kick, in the bend-sign-normalized frame.
#[derive(Debug, Clone)]
pub struct Csr2dDiagnostics {
    pub zvec: Array1<f64>,
    pub xvec: Array1<f64>,
    pub zvec2: Array1<f64>,
    pub xvec2: Array1<f64>,
    pub ws_grid: Array2<f64>,
    pub wx_grid: Array2<f64>,
    pub psi_s_grid: Array2<f64>,
    pub psi_x_grid: Array2<f64>,
    pub charge_grid: Array2<f64>,
    pub lambda_grid_filtered_prime: Array2<f64>,
    /// Fraction of the bunch charge that landed on the mesh.
    pub deposited_fraction: f64,
}

/// Relativistic β for Lorentz factor γ.
pub fn beta_from_gamma(gamma: f64) -> f64 {
    (1.0 - 1.0 / (gamma * gamma)).sqrt()
}

/// Compute the 2D CSR kick with the exact retarded potentials.
pub fn csr2d_kick_calc<E: MapExecutor>(
    bunch: &ParticleBunch,
    params: &Csr2dParams,
    kernels: KernelSource<'_>,
    executor: &E,
) -> CsrResult<Csr2dKick> {
    csr2d_kick_calc_with(bunch, params, kernels, &ExactPotential, executor)
}

/// Kick using `cache` for the kernel grids.
///
/// The cache is rebuilt whenever the mesh geometry changes, so pass fixed
/// `zlim`/`xlim` in `params` to get reuse across steps.
pub fn csr2d_kick_cached<E: MapExecutor>(
    bunch: &ParticleBunch,
    params: &Csr2dParams,
    cache: &mut KernelCache,
    executor: &E,
) -> CsrResult<Csr2dKick> {
    let setup = KickSetup::new(bunch, params)?;
    let kernels = cache.get_or_build(&setup.geometry, &ExactPotential, executor)?;
    setup.finish(params, kernels)
}

/// [`csr2d_kick_calc`] with a caller-supplied potential.
pub fn csr2d_kick_calc_with<P, E>(
    bunch: &ParticleBunch,
    params: &Csr2dParams,
    kernels: KernelSource<'_>,
    potential: &P,
    executor: &E,
) -> CsrResult<Csr2dKick>
where
    P: CsrPotential,
    E: MapExecutor,
{
    let setup = KickSetup::new(bunch, params)?;
    let built;
    let kernels: &PotentialKernels = match kernels {
        KernelSource::Build => {
            built = build_potential_kernels(&setup.geometry, potential, executor)?;
            &built
        }
        KernelSource::Reuse(k) => k,
    };
    setup.finish(params, kernels)
}

/// State shared by every kernel source: the normalized bunch, its mesh,
/// and the smoothed density derivative.
struct KickSetup<'a> {
    bunch: Cow<'a, ParticleBunch>,
    flipped: bool,
    kick_factor: f64,
    grid: Grid2D,
    geometry: KernelGeometry,
    charge_grid: Array2<f64>,
    lambda_prime: Array2<f64>,
    deposited_fraction: f64,
    t0: Instant,
}

impl<'a> KickSetup<'a> {
    fn new(bunch: &'a ParticleBunch, params: &Csr2dParams) -> CsrResult<Self> {
        let t0 = Instant::now();
        let species = params.species()?;
        validate_beam(params)?;

        // Work in the ρ > 0 frame; dxp_ds is mirrored back at the end.
        // Explicit xlim applies to that frame as given.
        let flipped = params.rho < 0.0;
        let bunch = if flipped {
            Cow::Owned(bunch.with_flipped_x())
        } else {
            Cow::Borrowed(bunch)
        };

        let grid = bunch_grid(&bunch, params.nz, params.nx, params.zlim, params.xlim)?;
        let density = charge_density(&bunch, &grid)?;
        let lambda_prime = smoothed_density_derivative(&density.lambda_grid, grid.dz)?;
        log::debug!(
            "deposit and smoothing on {}x{} mesh in {:.3} ms",
            grid.nz,
            grid.nx,
            t0.elapsed().as_secs_f64() * 1e3
        );

        let n_particles = bunch.total_charge() / E_CHARGE;
        let kick_factor = species.classical_radius_m() * n_particles / params.gamma;
        let geometry = KernelGeometry::new(params.rho, beta_from_gamma(params.gamma), &grid);

        Ok(KickSetup {
            bunch,
            flipped,
            kick_factor,
            grid,
            geometry,
            charge_grid: density.charge_grid,
            lambda_prime,
            deposited_fraction: density.deposited_fraction,
            t0,
        })
    }

    fn finish(self, params: &Csr2dParams, kernels: &PotentialKernels) -> CsrResult<Csr2dKick> {
        let WakeGrids { ws_grid, wx_grid } =
            compute_wake_grids(&self.lambda_prime, kernels, &self.geometry)?;

        let t_interp = Instant::now();
        let (z, x) = (self.bunch.z(), self.bunch.x());
        let ws_spline = BicubicSpline::new(&self.grid.z, &self.grid.x, &ws_grid)?;
        let wx_spline = BicubicSpline::new(&self.grid.z, &self.grid.x, &wx_grid)?;
        let ddelta_ds = ws_spline.ev_many(z, x) * self.kick_factor;
        let mut dxp_ds = wx_spline.ev_many(z, x) * self.kick_factor;
        if self.flipped {
            dxp_ds.mapv_inplace(|v| -v);
        }
        log::debug!(
            "interpolated kicks for {} particles in {:.3} ms (total {:.3} ms)",
            self.bunch.len(),
            t_interp.elapsed().as_secs_f64() * 1e3,
            self.t0.elapsed().as_secs_f64() * 1e3
        );

        let diagnostics = params.debug.then(|| Csr2dDiagnostics {
            zvec: self.grid.z.clone(),
            xvec: self.grid.x.clone(),
            zvec2: self.geometry.z_separations(),
            xvec2: self.geometry.x_separations(),
            ws_grid,
            wx_grid,
            psi_s_grid: kernels.psi_s.clone(),
            psi_x_grid: kernels.psi_x.clone(),
            charge_grid: self.charge_grid,
            lambda_grid_filtered_prime: self.lambda_prime,
            deposited_fraction: self.deposited_fraction,
        });

        Ok(Csr2dKick {
            ddelta_ds,
            dxp_ds,
            diagnostics,
        })
    }
}

fn validate_beam(params: &Csr2dParams) -> CsrResult<()> {
    if !(params.gamma.is_finite() && params.gamma > 1.0) {
        return Err(CsrError::InvalidInput(format!(
            "gamma must be finite and > 1, got {}",
            params.gamma
        )));
    }
    if !params.rho.is_finite() || params.rho == 0.0 {
        return Err(CsrError::InvalidInput(format!(
            "rho must be finite and nonzero, got {}",
            params.rho
        )));
    }
    Ok(())
}
