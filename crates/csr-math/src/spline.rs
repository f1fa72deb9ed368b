// ─────────────────────────────────────────────────────────────────────
// CSR Wake — Spline
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Interpolating cubic splines on uniform axes.
//!
//! The 2D spline is the tensor product of 1D not-a-knot cubic splines,
//! which is the interpolant `scipy.interpolate.RectBivariateSpline`
//! builds with its defaults (`kx = ky = 3`, `s = 0`). It is stored as the
//! node values plus the second derivatives `f_zz`, `f_xx` and the cross
//! term `f_zzxx`, so evaluation only touches the four enclosing nodes.

use crate::tridiag::thomas_solve_in_place;
use csr_types::error::{CsrError, CsrResult};
use ndarray::{Array1, Array2, ArrayView1, Axis};

/// Second derivatives of the not-a-knot cubic spline through `y` sampled
/// with uniform spacing `h`.
pub fn not_a_knot_second_derivatives(y: ArrayView1<'_, f64>, h: f64) -> CsrResult<Array1<f64>> {
    let n = y.len();
    let mut m = Array1::zeros(n);
    if n < 3 {
        // Two nodes: the spline is the straight line
        return Ok(m);
    }
    let second_diff = |i: usize| 6.0 * (y[i - 1] - 2.0 * y[i] + y[i + 1]) / (h * h);
    if n == 3 {
        // Single parabola through all three nodes
        m.fill(second_diff(1) / 6.0);
        return Ok(m);
    }

    // Unknowns M[1..n-1]. Not-a-knot closes the system with
    // M[0] = 2 M[1] - M[2] and M[n-1] = 2 M[n-2] - M[n-3], which turns the
    // first and last interior rows into 6 M = rhs.
    let k = n - 2;
    let mut sub = vec![1.0; k];
    let mut diag = vec![4.0; k];
    let mut sup = vec![1.0; k];
    diag[0] = 6.0;
    sup[0] = 0.0;
    diag[k - 1] = 6.0;
    sub[k - 1] = 0.0;
    let mut rhs: Vec<f64> = (1..n - 1).map(second_diff).collect();
    thomas_solve_in_place(&sub, &diag, &sup, &mut rhs)?;

    for (i, v) in rhs.into_iter().enumerate() {
        m[i + 1] = v;
    }
    m[0] = 2.0 * m[1] - m[2];
    m[n - 1] = 2.0 * m[n - 2] - m[n - 3];
    Ok(m)
}

/// Apply the 1D second-derivative solve to every lane along `axis`.
fn second_derivatives_along(values: &Array2<f64>, axis: Axis, h: f64) -> CsrResult<Array2<f64>> {
    let mut out = Array2::zeros(values.dim());
    for (src, mut dst) in values.lanes(axis).into_iter().zip(out.lanes_mut(axis)) {
        dst.assign(&not_a_knot_second_derivatives(src, h)?);
    }
    Ok(out)
}

/// Uniform axis: origin, spacing and node count.
#[derive(Debug, Clone, Copy, PartialEq)]
struct UniformAxis {
    origin: f64,
    step: f64,
    n: usize,
}

impl UniformAxis {
    fn from_nodes(label: &str, nodes: &Array1<f64>) -> CsrResult<Self> {
        let n = nodes.len();
        if n < 2 {
            return Err(CsrError::DegenerateGrid(format!(
                "spline {label} axis needs at least 2 nodes, got {n}"
            )));
        }
        let step = (nodes[n - 1] - nodes[0]) / (n - 1) as f64;
        if !(step > 0.0) || !step.is_finite() {
            return Err(CsrError::DegenerateGrid(format!(
                "spline {label} axis must be strictly increasing, step = {step}"
            )));
        }
        Ok(UniformAxis { origin: nodes[0], step, n })
    }

    /// Cell index and cubic basis weights `(A, B, C, D)` at `v`.
    ///
    /// Points outside the axis use the polynomial of the nearest end cell.
    fn basis(&self, v: f64) -> (usize, [f64; 4]) {
        let f = (v - self.origin) / self.step;
        let i = (f.floor().max(0.0) as usize).min(self.n - 2);
        let b = f - i as f64;
        let a = 1.0 - b;
        let h2 = self.step * self.step / 6.0;
        (i, [a, b, (a * a * a - a) * h2, (b * b * b - b) * h2])
    }
}

/// Tensor-product cubic spline interpolant over a uniform (z, x) grid.
#[derive(Debug, Clone)]
pub struct BicubicSpline {
    z_axis: UniformAxis,
    x_axis: UniformAxis,
    f: Array2<f64>,
    f_zz: Array2<f64>,
    f_xx: Array2<f64>,
    f_zzxx: Array2<f64>,
}

impl BicubicSpline {
    /// Build the interpolant of `values[[iz, ix]]` sampled at `(z[iz], x[ix])`.
    pub fn new(z: &Array1<f64>, x: &Array1<f64>, values: &Array2<f64>) -> CsrResult<Self> {
        let z_axis = UniformAxis::from_nodes("z", z)?;
        let x_axis = UniformAxis::from_nodes("x", x)?;
        let (nz, nx) = values.dim();
        if nz != z_axis.n {
            return Err(CsrError::length_mismatch("spline z rows", z_axis.n, nz));
        }
        if nx != x_axis.n {
            return Err(CsrError::length_mismatch("spline x columns", x_axis.n, nx));
        }

        let f_zz = second_derivatives_along(values, Axis(0), z_axis.step)?;
        let f_xx = second_derivatives_along(values, Axis(1), x_axis.step)?;
        let f_zzxx = second_derivatives_along(&f_zz, Axis(1), x_axis.step)?;

        Ok(BicubicSpline {
            z_axis,
            x_axis,
            f: values.clone(),
            f_zz,
            f_xx,
            f_zzxx,
        })
    }

    /// Evaluate the spline at a single point.
    pub fn ev(&self, z: f64, x: f64) -> f64 {
        let (i, [az, bz, cz, dz]) = self.z_axis.basis(z);
        let (j, [ax, bx, cx, dx]) = self.x_axis.basis(x);

        let mut acc = 0.0;
        for (di, wz_val, wz_curv) in [(0, az, cz), (1, bz, dz)] {
            for (dj, wx_val, wx_curv) in [(0, ax, cx), (1, bx, dx)] {
                let node = [i + di, j + dj];
                acc += wz_val * wx_val * self.f[node]
                    + wz_curv * wx_val * self.f_zz[node]
                    + wz_val * wx_curv * self.f_xx[node]
                    + wz_curv * wx_curv * self.f_zzxx[node];
            }
        }
        acc
    }

    /// Evaluate at paired coordinates, like `RectBivariateSpline.ev`.
    pub fn ev_many(&self, z: ArrayView1<'_, f64>, x: ArrayView1<'_, f64>) -> Array1<f64> {
        debug_assert_eq!(z.len(), x.len());
        z.iter().zip(x.iter()).map(|(&zp, &xp)| self.ev(zp, xp)).collect()
    }
}
