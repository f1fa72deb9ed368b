// ─────────────────────────────────────────────────────────────────────
// CSR Wake — Wake
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Wake grids: the smoothed density derivative convolved with the kernels.

use crate::kernel::{KernelGeometry, PotentialKernels};
use csr_math::convolve::fft_convolve_2d_centered_many;
use csr_types::error::{CsrError, CsrResult};
use ndarray::Array2;
use std::time::Instant;

/// Longitudinal and transverse wakes on the charge mesh, per unit
/// kick factor.
#[derive(Debug, Clone)]
pub struct WakeGrids {
    pub ws_grid: Array2<f64>,
    pub wx_grid: Array2<f64>,
}

/// Convolve ∂λ/∂z with both kernels and scale by β²/ρ · dz · dx.
///
/// Kernel cell `(nz, nx)` is aligned with zero separation, so the output
/// has the mesh shape. A centred "same"-mode crop of the full convolution
/// starts at `(nz − 1, nx − 1)` instead and returns at mesh node `(i, j)`
/// the aligned wake of node `(i − 1, j − 1)`. The scale uses
/// `geometry` from the current call, which may differ from the geometry
/// stored with reused kernels.
pub fn compute_wake_grids(
    lambda_prime: &Array2<f64>,
    kernels: &PotentialKernels,
    geometry: &KernelGeometry,
) -> CsrResult<WakeGrids> {
    let (nz, nx) = lambda_prime.dim();
    kernels.check_shape(nz, nx)?;

    let t0 = Instant::now();
    let scale = geometry.beta * geometry.beta / geometry.rho * geometry.dz * geometry.dx;
    let wakes: Vec<Array2<f64>> = fft_convolve_2d_centered_many(
        lambda_prime,
        &[&kernels.psi_s, &kernels.psi_x],
        (nz, nx),
    )
    .into_iter()
    .map(|w| w * scale)
    .collect();
    let [ws_grid, wx_grid]: [Array2<f64>; 2] = wakes
        .try_into()
        .map_err(|_| CsrError::InvalidInput("expected one wake per kernel".to_string()))?;
    log::debug!(
        "wake convolution {nz}x{nx} in {:.3} ms",
        t0.elapsed().as_secs_f64() * 1e3
    );
    Ok(WakeGrids { ws_grid, wx_grid })
}
