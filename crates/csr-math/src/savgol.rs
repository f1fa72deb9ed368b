// ─────────────────────────────────────────────────────────────────────
// CSR Wake — Savitzky–Golay
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Savitzky–Golay smoothing.
//!
//! Each output sample is the value, at that sample, of the least-squares
//! polynomial of degree `polyorder` fitted over a `window`-point stencil.
//! Edge handling follows `scipy.signal.savgol_filter(..., mode="interp")`:
//! the first and last `window / 2` samples are evaluated on the polynomial
//! fitted to the first and last `window` samples respectively.

use csr_types::error::{CsrError, CsrResult};
use ndarray::{Array1, Array2, ArrayView1, Axis, Zip};

/// Window length used for density smoothing.
pub const DENSITY_WINDOW: usize = 13;

/// Polynomial degree used for density smoothing.
pub const DENSITY_POLYORDER: usize = 2;

/// Least-squares weights that evaluate the degree-`polyorder` fit of a
/// `window`-point stencil at stencil position `eval_at` (0 = first sample).
///
/// The fitted value is `Σ_j weights[j] · y[j]`.
pub fn savgol_weights(window: usize, polyorder: usize, eval_at: f64) -> Vec<f64> {
    let n_coef = polyorder + 1;
    // Positions centred on the stencil for conditioning
    let centre = (window as f64 - 1.0) / 2.0;
    let t: Vec<f64> = (0..window).map(|j| j as f64 - centre).collect();
    let te = eval_at - centre;

    // Normal equations (VᵀV) g = e(te)
    let mut normal = vec![vec![0.0; n_coef]; n_coef];
    for (p, row) in normal.iter_mut().enumerate() {
        for (q, entry) in row.iter_mut().enumerate() {
            *entry = t.iter().map(|&tj| tj.powi((p + q) as i32)).sum();
        }
    }
    let rhs: Vec<f64> = (0..n_coef).map(|p| te.powi(p as i32)).collect();
    let g = solve_dense(normal, rhs);

    t.iter()
        .map(|&tj| (0..n_coef).map(|p| g[p] * tj.powi(p as i32)).sum())
        .collect()
}

/// Gaussian elimination with partial pivoting for the small normal systems.
fn solve_dense(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Vec<f64> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);
        a.swap(col, pivot);
        b.swap(col, pivot);
        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }
    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    x
}

fn validate_window(window: usize, polyorder: usize) -> CsrResult<()> {
    if window % 2 == 0 {
        return Err(CsrError::InvalidInput(format!(
            "Savitzky-Golay window must be odd, got {window}"
        )));
    }
    if polyorder >= window {
        return Err(CsrError::InvalidInput(format!(
            "Savitzky-Golay polyorder {polyorder} must be less than window {window}"
        )));
    }
    Ok(())
}

/// Smooth a 1D signal.
///
/// Signals shorter than `window` are filtered with the largest odd window
/// that fits; if that window cannot support the polynomial the signal is
/// returned unchanged.
pub fn savgol_filter(y: ArrayView1<'_, f64>, window: usize, polyorder: usize) -> CsrResult<Array1<f64>> {
    validate_window(window, polyorder)?;
    let n = y.len();
    let window = if n >= window {
        window
    } else if n % 2 == 1 {
        n
    } else {
        n.saturating_sub(1)
    };
    if window <= polyorder {
        return Ok(y.to_owned());
    }

    let half = window / 2;
    let centre = savgol_weights(window, polyorder, half as f64);
    let mut out = Array1::zeros(n);
    for i in half..n - half {
        let stencil = y.slice(ndarray::s![i - half..=i + half]);
        out[i] = stencil.iter().zip(centre.iter()).map(|(v, w)| v * w).sum();
    }

    let head = y.slice(ndarray::s![..window]);
    let tail = y.slice(ndarray::s![n - window..]);
    for k in 0..half {
        let w_head = savgol_weights(window, polyorder, k as f64);
        out[k] = head.iter().zip(w_head.iter()).map(|(v, w)| v * w).sum();
        let w_tail = savgol_weights(window, polyorder, (window - half + k) as f64);
        out[n - half + k] = tail.iter().zip(w_tail.iter()).map(|(v, w)| v * w).sum();
    }
    Ok(out)
}

/// Smooth every column of `grid` (fixed axis-1 index, varying axis 0).
pub fn savgol_filter_axis0(grid: &Array2<f64>, window: usize, polyorder: usize) -> CsrResult<Array2<f64>> {
    let mut out = Array2::zeros(grid.dim());
    for (src, mut dst) in grid.axis_iter(Axis(1)).zip(out.axis_iter_mut(Axis(1))) {
        let smoothed = savgol_filter(src, window, polyorder)?;
        Zip::from(&mut dst).and(&smoothed).for_each(|d, &s| *d = s);
    }
    Ok(out)
}
