// ─────────────────────────────────────────────────────────────────────
// CSR Wake — Density
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Charge deposition and the smoothed longitudinal density derivative.

use csr_math::deposit::histogram_cic_2d;
use csr_math::interp::central_difference_z;
use csr_math::savgol::{savgol_filter_axis0, DENSITY_POLYORDER, DENSITY_WINDOW};
use csr_types::constants::CHARGE_LOSS_WARN_FRACTION;
use csr_types::error::{CsrError, CsrResult};
use csr_types::state::{Grid2D, ParticleBunch};
use ndarray::{Array2, ArrayView1};

/// Deposited charge on the mesh.
#[derive(Debug, Clone)]
pub struct ChargeDensity {
    /// Charge per cell (C).
    pub charge_grid: Array2<f64>,
    /// Charge density normalized so that Σλ·dz·dx = 1.
    pub lambda_grid: Array2<f64>,
    /// Fraction of the bunch charge that landed on the mesh.
    pub deposited_fraction: f64,
}

/// `lim` if given, otherwise the extent of `values`.
pub fn grid_bounds(values: ArrayView1<'_, f64>, lim: Option<[f64; 2]>) -> (f64, f64) {
    match lim {
        Some([lo, hi]) => (lo, hi),
        None => values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            }),
    }
}

/// Mesh covering the bunch, or the explicit limits where given.
pub fn bunch_grid(
    bunch: &ParticleBunch,
    nz: usize,
    nx: usize,
    zlim: Option<[f64; 2]>,
    xlim: Option<[f64; 2]>,
) -> CsrResult<Grid2D> {
    if bunch.is_empty() {
        return Err(CsrError::EmptyBunch);
    }
    let (zmin, zmax) = grid_bounds(bunch.z(), zlim);
    let (xmin, xmax) = grid_bounds(bunch.x(), xlim);
    Grid2D::new(nz, nx, zmin, zmax, xmin, xmax)
}

/// Deposit the bunch with cloud-in-cell weighting and normalize.
///
/// Charge outside the mesh is dropped; a warning is logged when more than
/// [`CHARGE_LOSS_WARN_FRACTION`] of the bunch is lost that way.
pub fn charge_density(bunch: &ParticleBunch, grid: &Grid2D) -> CsrResult<ChargeDensity> {
    let charge_grid = histogram_cic_2d(
        bunch.z(),
        bunch.x(),
        bunch.weight(),
        grid.nz,
        grid.zmin(),
        grid.zmax(),
        grid.nx,
        grid.xmin(),
        grid.xmax(),
    )?;

    let deposited = charge_grid.sum();
    if !(deposited > 0.0) {
        return Err(CsrError::EmptyBunch);
    }
    let deposited_fraction = deposited / bunch.total_charge();
    if 1.0 - deposited_fraction > CHARGE_LOSS_WARN_FRACTION {
        log::warn!(
            "{:.2}% of the bunch charge fell outside the CSR mesh",
            100.0 * (1.0 - deposited_fraction)
        );
    }

    let lambda_grid = &charge_grid / (deposited * grid.cell_area());
    Ok(ChargeDensity {
        charge_grid,
        lambda_grid,
        deposited_fraction,
    })
}

/// ∂λ/∂z after Savitzky–Golay smoothing of every z-column.
pub fn smoothed_density_derivative(lambda_grid: &Array2<f64>, dz: f64) -> CsrResult<Array2<f64>> {
    let filtered = savgol_filter_axis0(lambda_grid, DENSITY_WINDOW, DENSITY_POLYORDER)?;
    Ok(central_difference_z(&filtered, dz))
}
