// ─────────────────────────────────────────────────────────────────────
// CSR Wake — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::error::{CsrError, CsrResult};
use ndarray::{Array1, ArrayView1};

/// Uniform 2D computational grid over the bunch plane.
/// Axis 0 = z (longitudinal, rows), axis 1 = x (transverse, columns).
#[derive(Debug, Clone, PartialEq)]
pub struct Grid2D {
    pub nz: usize,
    pub nx: usize,
    pub z: Array1<f64>, // z coordinates [nz] - linspace(zmin, zmax, nz)
    pub x: Array1<f64>, // x coordinates [nx] - linspace(xmin, xmax, nx)
    pub dz: f64,
    pub dx: f64,
}

impl Grid2D {
    /// Create a grid with `nz × nx` nodes spanning `[zmin, zmax] × [xmin, xmax]`.
    ///
    /// Fails with `DegenerateGrid` when either axis has fewer than two nodes
    /// or a non-positive / non-finite width, so the cell sizes are never NaN.
    pub fn new(
        nz: usize,
        nx: usize,
        zmin: f64,
        zmax: f64,
        xmin: f64,
        xmax: f64,
    ) -> CsrResult<Self> {
        let dz = axis_spacing("z", nz, zmin, zmax)?;
        let dx = axis_spacing("x", nx, xmin, xmax)?;
        Ok(Grid2D {
            nz,
            nx,
            z: Array1::linspace(zmin, zmax, nz),
            x: Array1::linspace(xmin, xmax, nx),
            dz,
            dx,
        })
    }

    pub fn zmin(&self) -> f64 {
        self.z[0]
    }

    pub fn zmax(&self) -> f64 {
        self.z[self.nz - 1]
    }

    pub fn xmin(&self) -> f64 {
        self.x[0]
    }

    pub fn xmax(&self) -> f64 {
        self.x[self.nx - 1]
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.nz, self.nx)
    }

    pub fn cell_area(&self) -> f64 {
        self.dz * self.dx
    }
}

/// Node spacing of a uniform axis with `n` nodes over `[min, max]`.
pub fn axis_spacing(label: &str, n: usize, min: f64, max: f64) -> CsrResult<f64> {
    if n < 2 {
        return Err(CsrError::DegenerateGrid(format!(
            "{label} axis needs at least 2 nodes, got {n}"
        )));
    }
    if !min.is_finite() || !max.is_finite() {
        return Err(CsrError::DegenerateGrid(format!(
            "{label} bounds must be finite, got [{min}, {max}]"
        )));
    }
    if max <= min {
        return Err(CsrError::DegenerateGrid(format!(
            "{label} bounds must have positive width, got [{min}, {max}]"
        )));
    }
    Ok((max - min) / (n - 1) as f64)
}

/// Weighted macro-particle bunch in the (z, x) plane.
///
/// `weight` is the charge carried by each macro-particle in Coulombs; it
/// is never negative and sums to the total bunch charge.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleBunch {
    z: Array1<f64>,
    x: Array1<f64>,
    weight: Array1<f64>,
}

impl ParticleBunch {
    pub fn new(z: Array1<f64>, x: Array1<f64>, weight: Array1<f64>) -> CsrResult<Self> {
        if x.len() != z.len() {
            return Err(CsrError::length_mismatch("bunch x", z.len(), x.len()));
        }
        validate_line(z.view(), weight.view())?;
        if let Some(i) = x.iter().position(|v| !v.is_finite()) {
            return Err(CsrError::InvalidInput(format!(
                "x coordinate at index {i} is not finite"
            )));
        }
        Ok(ParticleBunch { z, x, weight })
    }

    pub fn from_slices(z: &[f64], x: &[f64], weight: &[f64]) -> CsrResult<Self> {
        Self::new(
            Array1::from(z.to_vec()),
            Array1::from(x.to_vec()),
            Array1::from(weight.to_vec()),
        )
    }

    pub fn z(&self) -> ArrayView1<'_, f64> {
        self.z.view()
    }

    pub fn x(&self) -> ArrayView1<'_, f64> {
        self.x.view()
    }

    pub fn weight(&self) -> ArrayView1<'_, f64> {
        self.weight.view()
    }

    pub fn len(&self) -> usize {
        self.z.len()
    }

    pub fn is_empty(&self) -> bool {
        self.z.is_empty()
    }

    /// Total bunch charge (C).
    pub fn total_charge(&self) -> f64 {
        self.weight.sum()
    }

    /// Mirror the bunch about x = 0.
    pub fn with_flipped_x(&self) -> Self {
        ParticleBunch {
            z: self.z.clone(),
            x: self.x.mapv(|v| -v),
            weight: self.weight.clone(),
        }
    }
}

/// Validate a longitudinal coordinate array against its weights.
///
/// Shared by the 2D bunch constructor and the 1D steady-state entry point,
/// which takes `z` and weights without a transverse coordinate.
pub fn validate_line(z: ArrayView1<'_, f64>, weight: ArrayView1<'_, f64>) -> CsrResult<()> {
    if weight.len() != z.len() {
        return Err(CsrError::length_mismatch("bunch weight", z.len(), weight.len()));
    }
    if let Some(i) = z.iter().position(|v| !v.is_finite()) {
        return Err(CsrError::InvalidInput(format!(
            "z coordinate at index {i} is not finite"
        )));
    }
    if let Some(i) = weight.iter().position(|w| !w.is_finite() || *w < 0.0) {
        return Err(CsrError::InvalidInput(format!(
            "weight at index {i} must be finite and >= 0, got {}",
            weight[i]
        )));
    }
    Ok(())
}
