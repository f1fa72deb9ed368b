// ─────────────────────────────────────────────────────────────────────
// CSR Wake — Deposit
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Charge deposition onto uniform grids.
//!
//! `histogram_cic_2d` is a cloud-in-cell (bilinear) deposit: each particle's
//! weight is shared between the four nodes enclosing it, proportionally to
//! the opposite sub-cell area. Shares that land on nodes outside the grid
//! are dropped, so particles beyond the declared bounds lose charge.

use csr_types::error::{CsrError, CsrResult};
use csr_types::state::axis_spacing;
use ndarray::{Array1, Array2, ArrayView1};

/// Cloud-in-cell deposit of weighted points onto an `nz × nx` node grid
/// spanning `[zmin, zmax] × [xmin, xmax]`.
#[allow(clippy::too_many_arguments)]
pub fn histogram_cic_2d(
    z: ArrayView1<'_, f64>,
    x: ArrayView1<'_, f64>,
    weight: ArrayView1<'_, f64>,
    nz: usize,
    zmin: f64,
    zmax: f64,
    nx: usize,
    xmin: f64,
    xmax: f64,
) -> CsrResult<Array2<f64>> {
    if x.len() != z.len() {
        return Err(CsrError::length_mismatch("deposit x", z.len(), x.len()));
    }
    if weight.len() != z.len() {
        return Err(CsrError::length_mismatch("deposit weight", z.len(), weight.len()));
    }
    let dz = axis_spacing("z", nz, zmin, zmax)?;
    let dx = axis_spacing("x", nx, xmin, xmax)?;

    let mut grid = Array2::zeros((nz, nx));
    for ((&zp, &xp), &w) in z.iter().zip(x.iter()).zip(weight.iter()) {
        let Some([(iz0, sz0), (iz1, sz1)]) = cic_shares((zp - zmin) / dz, nz) else {
            continue;
        };
        let Some([(ix0, sx0), (ix1, sx1)]) = cic_shares((xp - xmin) / dx, nx) else {
            continue;
        };
        for (iz, sz) in [(iz0, sz0), (iz1, sz1)] {
            let Some(iz) = iz else { continue };
            for (ix, sx) in [(ix0, sx0), (ix1, sx1)] {
                if let Some(ix) = ix {
                    grid[[iz, ix]] += w * sz * sx;
                }
            }
        }
    }
    Ok(grid)
}

/// Left/right node indices and linear shares for fractional cell index `f`.
///
/// A node is `None` when it falls outside `0..n`; the whole result is
/// `None` when neither node is on the grid (or `f` is not finite).
fn cic_shares(f: f64, n: usize) -> Option<[(Option<usize>, f64); 2]> {
    if !f.is_finite() {
        return None;
    }
    let i0 = f.floor();
    let frac = f - i0;
    let on_grid = |i: f64| (i >= 0.0 && i < n as f64).then_some(i as usize);
    let left = on_grid(i0);
    let right = on_grid(i0 + 1.0);
    if left.is_none() && right.is_none() {
        return None;
    }
    Some([(left, 1.0 - frac), (right, frac)])
}

/// Weighted 1D histogram with equal-width bins over the data range.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedHistogram {
    pub counts: Array1<f64>,
    /// Left edge of the first bin
    pub min: f64,
    /// Right edge of the last bin
    pub max: f64,
}

/// Weighted histogram of `values` in `nbins` bins spanning `[min, max]` of
/// the data. Matches `numpy.histogram(values, weights=weight, bins=nbins)`:
/// every bin is half-open except the last, which includes `max`.
pub fn histogram_1d(
    values: ArrayView1<'_, f64>,
    weight: ArrayView1<'_, f64>,
    nbins: usize,
) -> CsrResult<WeightedHistogram> {
    if weight.len() != values.len() {
        return Err(CsrError::length_mismatch("histogram weight", values.len(), weight.len()));
    }
    if nbins == 0 {
        return Err(CsrError::DegenerateGrid("histogram needs at least 1 bin".to_string()));
    }
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if !(max > min) {
        return Err(CsrError::DegenerateGrid(format!(
            "histogram range must have positive width, got [{min}, {max}]"
        )));
    }

    let width = (max - min) / nbins as f64;
    let mut counts = Array1::zeros(nbins);
    for (&v, &w) in values.iter().zip(weight.iter()) {
        let bin = (((v - min) / width).floor() as usize).min(nbins - 1);
        counts[bin] += w;
    }
    Ok(WeightedHistogram { counts, min, max })
}
