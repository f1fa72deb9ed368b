// ─────────────────────────────────────────────────────────────────────
// CSR Wake — Kernel
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Potential kernel grids ψ_s and ψ_x sampled on the doubled separation mesh.
//!
//! For a charge mesh of `nz × nx` cells the kernels are `2nz × 2nx`, indexed
//! by separations `Δz_i = (i − nz)·dz` and `Δx_j = (j − nx)·dx`. Cell
//! `(nz, nx)` is the zero separation. Evaluating the Green's functions is
//! the dominant cost of a kick, so the grids can be built once and reused
//! while the geometry is unchanged.

use crate::green::CsrPotential;
use csr_types::config::CsrConfig;
use csr_types::error::{CsrError, CsrResult};
use csr_types::state::Grid2D;
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use std::time::Instant;

/// Strategy for evaluating a pure function over many independent inputs.
///
/// Implementations must return the results in input order.
pub trait MapExecutor {
    fn map<T, R, F>(&self, inputs: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send;
}

/// Evaluate on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

impl MapExecutor for Sequential {
    fn map<T, R, F>(&self, inputs: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send,
    {
        inputs.iter().map(f).collect()
    }
}

/// Evaluate on the global rayon pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parallel;

impl MapExecutor for Parallel {
    fn map<T, R, F>(&self, inputs: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send,
    {
        inputs.par_iter().map(f).collect()
    }
}

/// Evaluate on a dedicated rayon pool with a fixed worker count.
pub struct ThreadPoolExecutor {
    pool: rayon::ThreadPool,
}

impl ThreadPoolExecutor {
    pub fn new(num_threads: usize) -> CsrResult<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
            .map_err(|e| CsrError::InvalidInput(format!("cannot start thread pool: {e}")))?;
        Ok(ThreadPoolExecutor { pool })
    }
}

impl MapExecutor for ThreadPoolExecutor {
    fn map<T, R, F>(&self, inputs: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send,
    {
        self.pool.install(|| inputs.par_iter().map(f).collect())
    }
}

/// Sequential or global-pool evaluation, chosen at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfiguredExecutor {
    Sequential,
    Parallel,
}

impl ConfiguredExecutor {
    /// Follow `parallel_kernels` of a loaded configuration.
    pub fn from_config(config: &CsrConfig) -> Self {
        if config.parallel_kernels {
            ConfiguredExecutor::Parallel
        } else {
            ConfiguredExecutor::Sequential
        }
    }
}

impl MapExecutor for ConfiguredExecutor {
    fn map<T, R, F>(&self, inputs: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send,
    {
        match self {
            ConfiguredExecutor::Sequential => Sequential.map(inputs, f),
            ConfiguredExecutor::Parallel => Parallel.map(inputs, f),
        }
    }
}

/// Everything the kernel values depend on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelGeometry {
    /// Bending radius magnitude |ρ| (m).
    pub rho: f64,
    /// Relativistic β.
    pub beta: f64,
    pub nz: usize,
    pub nx: usize,
    pub dz: f64,
    pub dx: f64,
}

impl KernelGeometry {
    pub fn new(rho: f64, beta: f64, grid: &Grid2D) -> Self {
        KernelGeometry {
            rho: rho.abs(),
            beta,
            nz: grid.nz,
            nx: grid.nx,
            dz: grid.dz,
            dx: grid.dx,
        }
    }

    /// Kernel grid shape `(2nz, 2nx)`.
    pub fn kernel_shape(&self) -> (usize, usize) {
        (2 * self.nz, 2 * self.nx)
    }

    /// Longitudinal separations `(i − nz)·dz`, i in 0..2nz (m).
    pub fn z_separations(&self) -> Array1<f64> {
        separations(self.nz, self.dz)
    }

    /// Transverse separations `(j − nx)·dx`, j in 0..2nx (m).
    pub fn x_separations(&self) -> Array1<f64> {
        separations(self.nx, self.dx)
    }
}

fn separations(n: usize, step: f64) -> Array1<f64> {
    Array1::from_shape_fn(2 * n, |i| (i as f64 - n as f64) * step)
}

/// Sampled ψ_s and ψ_x grids together with the geometry they were built for.
#[derive(Debug, Clone)]
pub struct PotentialKernels {
    pub geometry: KernelGeometry,
    pub psi_s: Array2<f64>,
    pub psi_x: Array2<f64>,
}

impl PotentialKernels {
    pub fn shape(&self) -> (usize, usize) {
        self.psi_s.dim()
    }

    /// Fail unless both grids are `2nz × 2nx` for the given charge mesh.
    pub fn check_shape(&self, nz: usize, nx: usize) -> CsrResult<()> {
        let expected = (2 * nz, 2 * nx);
        for (what, grid) in [("psi_s kernel", &self.psi_s), ("psi_x kernel", &self.psi_x)] {
            let (rows, cols) = grid.dim();
            if rows != expected.0 {
                return Err(CsrError::length_mismatch(&format!("{what} rows"), expected.0, rows));
            }
            if cols != expected.1 {
                return Err(CsrError::length_mismatch(&format!("{what} columns"), expected.1, cols));
            }
        }
        Ok(())
    }
}

/// Where a kick takes its kernel grids from.
#[derive(Debug, Clone, Copy)]
pub enum KernelSource<'a> {
    /// Sample fresh grids for this call.
    Build,
    /// Use caller-held grids. Only the shape is checked; the caller is
    /// responsible for the geometry matching.
    Reuse(&'a PotentialKernels),
}

/// Sample ψ_s and ψ_x over the doubled separation mesh.
///
/// Arguments are scaled as (Δz/(2ρ), Δx/ρ). The x = 0 column of ψ_x is
/// replaced by the finite patch evaluated at the scaled cell width dx/ρ.
pub fn build_potential_kernels<P, E>(
    geometry: &KernelGeometry,
    potential: &P,
    executor: &E,
) -> CsrResult<PotentialKernels>
where
    P: CsrPotential,
    E: MapExecutor,
{
    let t0 = Instant::now();
    let (rows, cols) = geometry.kernel_shape();
    if rows == 0 || cols == 0 {
        return Err(CsrError::DegenerateGrid(format!(
            "kernel grid {rows}x{cols} is empty"
        )));
    }
    let rho = geometry.rho;
    let beta = geometry.beta;
    let zs: Vec<f64> = geometry.z_separations().iter().map(|&z| z / (2.0 * rho)).collect();
    let xs: Vec<f64> = geometry.x_separations().iter().map(|&x| x / rho).collect();

    let points: Vec<(f64, f64)> = zs
        .iter()
        .flat_map(|&z| xs.iter().map(move |&x| (z, x)))
        .collect();

    let psi_s = collect_grid(
        "psi_s kernel",
        (rows, cols),
        executor.map(&points, |&(z, x)| potential.psi_s(z, x, beta)),
    )?;
    let mut psi_x = collect_grid(
        "psi_x kernel",
        (rows, cols),
        executor.map(&points, |&(z, x)| potential.psi_x(z, x, beta)),
    )?;

    let dx_scaled = geometry.dx / rho;
    let patch = executor.map(&zs, |&z| potential.psi_x_where_x_equals_zero(z, dx_scaled, beta));
    if patch.len() != rows {
        return Err(CsrError::length_mismatch("psi_x zero-line patch", rows, patch.len()));
    }
    psi_x
        .column_mut(geometry.nx)
        .iter_mut()
        .zip(patch)
        .for_each(|(cell, v)| *cell = v);

    log::debug!(
        "built {rows}x{cols} potential kernels in {:.3} ms",
        t0.elapsed().as_secs_f64() * 1e3
    );
    Ok(PotentialKernels {
        geometry: *geometry,
        psi_s,
        psi_x,
    })
}

fn collect_grid(what: &str, shape: (usize, usize), values: Vec<f64>) -> CsrResult<Array2<f64>> {
    let expected = shape.0 * shape.1;
    if values.len() != expected {
        return Err(CsrError::length_mismatch(what, expected, values.len()));
    }
    Array2::from_shape_vec(shape, values)
        .map_err(|e| CsrError::InvalidInput(format!("{what}: {e}")))
}

/// Single-entry memo of the last kernel grids, keyed by geometry.
#[derive(Debug, Default)]
pub struct KernelCache {
    entry: Option<PotentialKernels>,
    hits: u64,
    misses: u64,
}

impl KernelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached grids if `geometry` matches exactly, otherwise build and store.
    pub fn get_or_build<P, E>(
        &mut self,
        geometry: &KernelGeometry,
        potential: &P,
        executor: &E,
    ) -> CsrResult<&PotentialKernels>
    where
        P: CsrPotential,
        E: MapExecutor,
    {
        let stale = self
            .entry
            .as_ref()
            .map_or(true, |cached| cached.geometry != *geometry);
        if stale {
            self.misses += 1;
            self.entry = Some(build_potential_kernels(geometry, potential, executor)?);
        } else {
            self.hits += 1;
        }
        log::debug!(
            "kernel cache {} (hits {}, misses {})",
            if stale { "miss" } else { "hit" },
            self.hits,
            self.misses
        );
        self.entry
            .as_ref()
            .ok_or_else(|| CsrError::InvalidInput("kernel cache is empty".to_string()))
    }

    pub fn get(&self) -> Option<&PotentialKernels> {
        self.entry.as_ref()
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// `(hits, misses)` since construction.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}
