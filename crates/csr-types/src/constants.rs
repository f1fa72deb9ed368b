// ─────────────────────────────────────────────────────────────────────
// CSR Wake — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Physical constants (CODATA 2018, matching `scipy.constants`).

/// Elementary charge (C)
pub const E_CHARGE: f64 = 1.602_176_634e-19;

/// Classical electron radius (m)
pub const R_E: f64 = 2.817_940_326_2e-15;

/// Electron rest energy (eV)
pub const MEC2_EV: f64 = 510_998.950_00;

/// Fraction of the bunch charge that may fall off the grid edges before
/// the deposition step warns about it.
pub const CHARGE_LOSS_WARN_FRACTION: f64 = 0.01;
