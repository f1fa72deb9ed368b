// ─────────────────────────────────────────────────────────────────────
// CSR Wake — Tridiag
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Thomas algorithm for tridiagonal systems.
//!
//! Used by the cubic-spline second-derivative solve.

use csr_types::error::{CsrError, CsrResult};

/// Solve `A x = d` for tridiagonal `A`, overwriting `d` with `x`.
///
/// - `sub`: sub-diagonal \[n\] (`sub[0]` unused)
/// - `diag`: main diagonal \[n\]
/// - `sup`: super-diagonal \[n\] (`sup[n-1]` unused)
///
/// Fails on mismatched lengths or a vanishing pivot.
pub fn thomas_solve_in_place(sub: &[f64], diag: &[f64], sup: &[f64], d: &mut [f64]) -> CsrResult<()> {
    let n = d.len();
    for (what, len) in [("tridiag sub", sub.len()), ("tridiag diag", diag.len()), ("tridiag sup", sup.len())] {
        if len != n {
            return Err(CsrError::length_mismatch(what, n, len));
        }
    }
    if n == 0 {
        return Ok(());
    }

    let mut c_prime = vec![0.0; n];
    let mut den = diag[0];
    for i in 0..n {
        if i > 0 {
            den = diag[i] - sub[i] * c_prime[i - 1];
        }
        if den == 0.0 || !den.is_finite() {
            return Err(CsrError::InvalidInput(format!(
                "tridiagonal pivot {i} vanished (den = {den})"
            )));
        }
        c_prime[i] = if i + 1 < n { sup[i] / den } else { 0.0 };
        d[i] = if i > 0 { (d[i] - sub[i] * d[i - 1]) / den } else { d[i] / den };
    }

    for i in (0..n - 1).rev() {
        d[i] -= c_prime[i] * d[i + 1];
    }
    Ok(())
}
