// ─────────────────────────────────────────────────────────────────────
// CSR Wake — Math
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Numerical primitives for CSR wake computation.
//!
//! Deposition, filtering, differentiation, FFT convolution, spline
//! interpolation and the elliptic integrals used by the Green's functions.

pub mod convolve;
pub mod deposit;
pub mod elliptic;
pub mod fft;
pub mod interp;
pub mod savgol;
pub mod spline;
pub mod tridiag;

