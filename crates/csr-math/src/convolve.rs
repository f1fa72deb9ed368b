// ─────────────────────────────────────────────────────────────────────
// CSR Wake — Convolve
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Linear (non-circular) convolutions.
//!
//! The 2D path zero-pads both operands to the full linear-convolution
//! shape before multiplying spectra, so no wrap-around ever reaches the
//! returned window.

use crate::fft::Fft2Plan;
use ndarray::{s, Array1, Array2, ArrayView1};

/// Convolve `input` with each kernel and return the input-shaped window in
/// which kernel element `origin` is the zero offset:
///
/// `out[i, j] = Σ_{a,b} input[a, b] · kernel[i - a + origin.0, j - b + origin.1]`
///
/// Kernel terms whose index falls outside the kernel are zero. All kernels
/// must share one shape; the input spectrum is computed once.
pub fn fft_convolve_2d_centered_many(
    input: &Array2<f64>,
    kernels: &[&Array2<f64>],
    origin: (usize, usize),
) -> Vec<Array2<f64>> {
    let Some(first) = kernels.first() else {
        return Vec::new();
    };
    let (na, ma) = input.dim();
    let (nk, mk) = first.dim();
    assert!(
        kernels.iter().all(|k| k.dim() == (nk, mk)),
        "all kernels must share one shape"
    );
    assert!(
        origin.0 < nk && origin.1 < mk,
        "kernel origin {origin:?} outside kernel {nk}x{mk}"
    );

    // Full linear convolution shape
    let plan = Fft2Plan::new(na + nk - 1, ma + mk - 1);
    let input_spectrum = plan.forward_padded(input);

    kernels
        .iter()
        .map(|kernel| {
            let mut spectrum = plan.forward_padded(kernel);
            spectrum.zip_mut_with(&input_spectrum, |k, a| *k *= *a);
            let full = plan.inverse_real(spectrum);
            full.slice(s![origin.0..origin.0 + na, origin.1..origin.1 + ma])
                .to_owned()
        })
        .collect()
}

/// Single-kernel form of [`fft_convolve_2d_centered_many`].
pub fn fft_convolve_2d_centered(
    input: &Array2<f64>,
    kernel: &Array2<f64>,
    origin: (usize, usize),
) -> Array2<f64> {
    fft_convolve_2d_centered_many(input, &[kernel], origin)
        .pop()
        .unwrap_or_else(|| Array2::zeros(input.dim()))
}

/// Full discrete linear convolution. Matches `numpy.convolve(a, v, "full")`.
pub fn convolve_full(a: ArrayView1<'_, f64>, v: ArrayView1<'_, f64>) -> Array1<f64> {
    if a.is_empty() || v.is_empty() {
        return Array1::zeros(0);
    }
    let mut out = Array1::zeros(a.len() + v.len() - 1);
    for (i, &ai) in a.iter().enumerate() {
        if ai == 0.0 {
            continue;
        }
        for (j, &vj) in v.iter().enumerate() {
            out[i + j] += ai * vj;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Direct O(N²M²) evaluation of the centered convolution.
    fn direct_centered(input: &Array2<f64>, kernel: &Array2<f64>, origin: (usize, usize)) -> Array2<f64> {
        let (na, ma) = input.dim();
        let (nk, mk) = kernel.dim();
        let mut out = Array2::zeros((na, ma));
        for i in 0..na {
            for j in 0..ma {
                let mut acc = 0.0;
                for a in 0..na {
                    for b in 0..ma {
                        let ki = i as isize - a as isize + origin.0 as isize;
                        let kj = j as isize - b as isize + origin.1 as isize;
                        if ki >= 0 && kj >= 0 && (ki as usize) < nk && (kj as usize) < mk {
                            acc += input[[a, b]] * kernel[[ki as usize, kj as usize]];
                        }
                    }
                }
                out[[i, j]] = acc;
            }
        }
        out
    }

    #[test]
    fn test_centered_matches_direct() {
        let input = Array2::from_shape_fn((5, 4), |(i, j)| ((i * 4 + j) as f64 * 0.37).cos());
        let kernel = Array2::from_shape_fn((10, 8), |(i, j)| (i as f64 - 4.5) * 0.3 + (j as f64).sqrt());
        let fast = fft_convolve_2d_centered(&input, &kernel, (5, 4));
        let slow = direct_centered(&input, &kernel, (5, 4));
        for ((i, j), &v) in slow.indexed_iter() {
            assert!(
                (fast[[i, j]] - v).abs() < 1e-10,
                "mismatch at ({i}, {j}): {} vs {v}",
                fast[[i, j]]
            );
        }
    }

    #[test]
    fn test_delta_kernel_is_identity() {
        let input = Array2::from_shape_fn((6, 3), |(i, j)| (i + 10 * j) as f64);
        let mut kernel = Array2::zeros((12, 6));
        kernel[[6, 3]] = 1.0;
        let out = fft_convolve_2d_centered(&input, &kernel, (6, 3));
        for (a, b) in out.iter().zip(input.iter()) {
            assert!((a - b).abs() < 1e-10);
        }
    }

    #[test]
    fn test_shifted_delta_shifts_output() {
        // kernel[origin + (1, 0)] = 1 → out[i] = input[i - 1]
        let input = Array2::from_shape_fn((4, 2), |(i, _)| (i + 1) as f64);
        let mut kernel = Array2::zeros((8, 4));
        kernel[[5, 2]] = 1.0;
        let out = fft_convolve_2d_centered(&input, &kernel, (4, 2));
        assert!(out[[0, 0]].abs() < 1e-12);
        assert!((out[[1, 0]] - 1.0).abs() < 1e-12);
        assert!((out[[3, 1]] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_many_matches_single() {
        let input = Array2::from_shape_fn((4, 4), |(i, j)| (i * j) as f64);
        let k1 = Array2::from_shape_fn((8, 8), |(i, j)| (i + j) as f64);
        let k2 = Array2::from_shape_fn((8, 8), |(i, j)| (i as f64) - (j as f64));
        let both = fft_convolve_2d_centered_many(&input, &[&k1, &k2], (4, 4));
        assert_eq!(both.len(), 2);
        let single = fft_convolve_2d_centered(&input, &k2, (4, 4));
        for (a, b) in both[1].iter().zip(single.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_convolve_full_matches_numpy() {
        // numpy.convolve([1, 2, 3], [0, 1, 0.5]) = [0, 1, 2.5, 4, 1.5]
        let a = Array1::from(vec![1.0, 2.0, 3.0]);
        let v = Array1::from(vec![0.0, 1.0, 0.5]);
        let out = convolve_full(a.view(), v.view());
        let expected = [0.0, 1.0, 2.5, 4.0, 1.5];
        assert_eq!(out.len(), expected.len());
        for (o, e) in out.iter().zip(expected.iter()) {
            assert!((o - e).abs() < 1e-14);
        }
    }
}
