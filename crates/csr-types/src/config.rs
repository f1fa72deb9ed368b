// ─────────────────────────────────────────────────────────────────────
// CSR Wake — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::constants::{MEC2_EV, R_E};
use crate::error::{CsrError, CsrResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Particle species of the bunch.
///
/// Only electrons are implemented; other tags are rejected up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Species {
    Electron,
}

impl Species {
    /// Classical radius r = q²/(4πε₀ m c²) in metres.
    pub fn classical_radius_m(&self) -> f64 {
        match self {
            Species::Electron => R_E,
        }
    }

    /// Rest energy m c² in eV.
    pub fn rest_energy_ev(&self) -> f64 {
        match self {
            Species::Electron => MEC2_EV,
        }
    }
}

impl FromStr for Species {
    type Err = CsrError;

    fn from_str(tag: &str) -> CsrResult<Self> {
        match tag {
            "electron" => Ok(Species::Electron),
            other => Err(CsrError::UnsupportedSpecies(other.to_string())),
        }
    }
}

/// Parameters of the 2D CSR kick calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Csr2dParams {
    /// Relativistic Lorentz factor
    pub gamma: f64,
    /// Bending radius (m). Negative means positive x is the magnet's inner side.
    pub rho: f64,
    #[serde(default = "default_n_grid")]
    pub nz: usize,
    #[serde(default = "default_n_grid")]
    pub nx: usize,
    /// Explicit z grid limits (m); bunch extrema when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zlim: Option<[f64; 2]>,
    /// Explicit x grid limits (m); bunch extrema when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xlim: Option<[f64; 2]>,
    #[serde(default = "default_species")]
    pub species: String,
    /// Return intermediate grids alongside the kicks
    #[serde(default)]
    pub debug: bool,
}

impl Csr2dParams {
    /// Parameters with the default 100×100 grid and automatic bounds.
    pub fn new(gamma: f64, rho: f64) -> Self {
        Csr2dParams {
            gamma,
            rho,
            nz: default_n_grid(),
            nx: default_n_grid(),
            zlim: None,
            xlim: None,
            species: default_species(),
            debug: false,
        }
    }

    pub fn with_grid(mut self, nz: usize, nx: usize) -> Self {
        self.nz = nz;
        self.nx = nx;
        self
    }

    pub fn with_limits(mut self, zlim: Option<[f64; 2]>, xlim: Option<[f64; 2]>) -> Self {
        self.zlim = zlim;
        self.xlim = xlim;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn species(&self) -> CsrResult<Species> {
        self.species.parse()
    }
}

/// Parameters of the 1D steady-state CSR model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SteadyStateParams {
    #[serde(default = "default_n_grid")]
    pub nz: usize,
    /// Bending radius (m)
    #[serde(default = "default_rho")]
    pub rho: f64,
    #[serde(default = "default_species")]
    pub species: String,
}

impl SteadyStateParams {
    pub fn species(&self) -> CsrResult<Species> {
        self.species.parse()
    }
}

impl Default for SteadyStateParams {
    fn default() -> Self {
        SteadyStateParams {
            nz: default_n_grid(),
            rho: default_rho(),
            species: default_species(),
        }
    }
}

fn default_n_grid() -> usize {
    100
}
fn default_rho() -> f64 {
    1.0
}
fn default_species() -> String {
    "electron".to_string()
}

/// Top-level configuration file: any combination of the two models, plus
/// whether the kernel grids are built on the rayon pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csr2d: Option<Csr2dParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steady_state: Option<SteadyStateParams>,
    #[serde(default)]
    pub parallel_kernels: bool,
}

impl CsrConfig {
    /// Load from a JSON file.
    pub fn from_file(path: &str) -> CsrResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        if config.csr2d.is_none() && config.steady_state.is_none() {
            return Err(CsrError::ConfigError(format!(
                "{path} configures neither 'csr2d' nor 'steady_state'"
            )));
        }
        Ok(config)
    }
}
