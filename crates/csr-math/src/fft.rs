// ─────────────────────────────────────────────────────────────────────
// CSR Wake — FFT
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! 2D FFT plans built on rustfft.
//!
//! Convention matches numpy:
//! - Forward FFT: unnormalized
//! - Inverse FFT: normalized by 1/(nrows*ncols)

use ndarray::{s, Array2, ArrayViewMut1, Axis};
use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Forward and inverse 2D transforms for a fixed `(nrows, ncols)` shape.
///
/// Plans are created once and reused, so convolving several kernels
/// against the same input only pays the planning cost once.
pub struct Fft2Plan {
    nrows: usize,
    ncols: usize,
    row_forward: Arc<dyn Fft<f64>>,
    row_inverse: Arc<dyn Fft<f64>>,
    col_forward: Arc<dyn Fft<f64>>,
    col_inverse: Arc<dyn Fft<f64>>,
}

impl Fft2Plan {
    pub fn new(nrows: usize, ncols: usize) -> Self {
        let mut planner = FftPlanner::new();
        Fft2Plan {
            nrows,
            ncols,
            row_forward: planner.plan_fft_forward(ncols),
            row_inverse: planner.plan_fft_inverse(ncols),
            col_forward: planner.plan_fft_forward(nrows),
            col_inverse: planner.plan_fft_inverse(nrows),
        }
    }

    /// Forward transform of `input` zero-padded into the plan shape.
    ///
    /// `input` is placed in the top-left corner; it must not be larger
    /// than the plan in either dimension.
    pub fn forward_padded(&self, input: &Array2<f64>) -> Array2<Complex64> {
        let (r, c) = input.dim();
        assert!(
            r <= self.nrows && c <= self.ncols,
            "input {r}x{c} does not fit FFT plan {}x{}",
            self.nrows,
            self.ncols
        );
        let mut data = Array2::zeros((self.nrows, self.ncols));
        data.slice_mut(s![..r, ..c])
            .zip_mut_with(input, |d, &v| *d = Complex64::new(v, 0.0));
        self.transform(&mut data, &self.row_forward, &self.col_forward);
        data
    }

    /// Inverse transform, returning the normalized real part.
    pub fn inverse_real(&self, mut spectrum: Array2<Complex64>) -> Array2<f64> {
        assert_eq!(spectrum.dim(), (self.nrows, self.ncols));
        self.transform(&mut spectrum, &self.row_inverse, &self.col_inverse);
        let norm = 1.0 / (self.nrows * self.ncols) as f64;
        spectrum.mapv(|c| c.re * norm)
    }

    fn transform(
        &self,
        data: &mut Array2<Complex64>,
        row_fft: &Arc<dyn Fft<f64>>,
        col_fft: &Arc<dyn Fft<f64>>,
    ) {
        let mut buffer = vec![Complex64::new(0.0, 0.0); self.nrows.max(self.ncols)];
        for lane in data.lanes_mut(Axis(1)) {
            process_lane(lane, row_fft.as_ref(), &mut buffer[..self.ncols]);
        }
        for lane in data.lanes_mut(Axis(0)) {
            process_lane(lane, col_fft.as_ref(), &mut buffer[..self.nrows]);
        }
    }
}

/// Run a 1D transform over one (possibly strided) lane via a scratch buffer.
fn process_lane(mut lane: ArrayViewMut1<'_, Complex64>, fft: &dyn Fft<f64>, buffer: &mut [Complex64]) {
    for (b, v) in buffer.iter_mut().zip(lane.iter()) {
        *b = *v;
    }
    fft.process(buffer);
    for (v, b) in lane.iter_mut().zip(buffer.iter()) {
        *v = *b;
    }
}

/// Forward 2D FFT. Matches `numpy.fft.fft2()`.
pub fn fft2(input: &Array2<f64>) -> Array2<Complex64> {
    let (nrows, ncols) = input.dim();
    Fft2Plan::new(nrows, ncols).forward_padded(input)
}

/// Inverse 2D FFT, real part. Matches `numpy.fft.ifft2().real`.
pub fn ifft2(input: &Array2<Complex64>) -> Array2<f64> {
    let (nrows, ncols) = input.dim();
    Fft2Plan::new(nrows, ncols).inverse_real(input.clone())
}
