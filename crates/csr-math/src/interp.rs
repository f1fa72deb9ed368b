// ─────────────────────────────────────────────────────────────────────
// CSR Wake — Interp
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Finite differences and linear interpolation on uniform axes.

use ndarray::{Array1, Array2, ArrayView1};

/// First derivative along axis 0 (z) of a 2D field.
///
/// Central differences in the interior, first-order forward/backward
/// differences on the first and last rows. Fields with a single row
/// have zero derivative.
pub fn central_difference_z(field: &Array2<f64>, dz: f64) -> Array2<f64> {
    let (nz, nx) = field.dim();
    let mut df_dz = Array2::zeros((nz, nx));
    if nz < 2 {
        return df_dz;
    }

    for ix in 0..nx {
        df_dz[[0, ix]] = (field[[1, ix]] - field[[0, ix]]) / dz;
        df_dz[[nz - 1, ix]] = (field[[nz - 1, ix]] - field[[nz - 2, ix]]) / dz;
        for iz in 1..nz - 1 {
            df_dz[[iz, ix]] = (field[[iz + 1, ix]] - field[[iz - 1, ix]]) / (2.0 * dz);
        }
    }
    df_dz
}

/// First derivative of a uniformly sampled signal. Matches
/// `numpy.gradient(y, spacing)` with its default first-order edges.
pub fn gradient_1d(y: ArrayView1<'_, f64>, spacing: f64) -> Array1<f64> {
    let n = y.len();
    let mut dy = Array1::zeros(n);
    if n < 2 {
        return dy;
    }
    dy[0] = (y[1] - y[0]) / spacing;
    dy[n - 1] = (y[n - 1] - y[n - 2]) / spacing;
    for i in 1..n - 1 {
        dy[i] = (y[i + 1] - y[i - 1]) / (2.0 * spacing);
    }
    dy
}

/// Piecewise-linear interpolation of `(xp, fp)` at `x`. Matches
/// `numpy.interp`: `xp` must be increasing, and queries outside
/// `[xp[0], xp[last]]` return the end values.
pub fn interp_linear(x: f64, xp: ArrayView1<'_, f64>, fp: ArrayView1<'_, f64>) -> f64 {
    let n = xp.len();
    debug_assert_eq!(n, fp.len(), "interp_linear: xp/fp length mismatch");
    if n == 0 {
        return f64::NAN;
    }
    if x <= xp[0] {
        return fp[0];
    }
    if x >= xp[n - 1] {
        return fp[n - 1];
    }
    // First index with xp[i] > x; 1 <= i <= n - 1 here
    let hi = xp
        .as_slice()
        .map(|s| s.partition_point(|&v| v <= x))
        .unwrap_or_else(|| xp.iter().position(|&v| v > x).unwrap_or(n - 1));
    let lo = hi - 1;
    let t = (x - xp[lo]) / (xp[hi] - xp[lo]);
    fp[lo] + t * (fp[hi] - fp[lo])
}
