//! Coherent synchrotron radiation wakes and kicks.
//!
//! - [`kick`]: 2D kick from the retarded potentials of a bunch in a bend
//! - [`steady_state`]: 1D steady-state energy change
//! - [`kernel`]: potential kernel grids, their executors and cache
//! - [`green`]: the Green's functions sampled by the kernels

pub mod density;
pub mod green;
pub mod kernel;
pub mod kick;
pub mod steady_state;
pub mod wake;

pub use kernel::{
    ConfiguredExecutor, KernelCache, KernelSource, MapExecutor, Parallel, Sequential,
};
pub use kick::{csr2d_kick_cached, csr2d_kick_calc, Csr2dDiagnostics, Csr2dKick};
pub use steady_state::{csr1d_steady_state_kick_calc, SteadyStateKick};
