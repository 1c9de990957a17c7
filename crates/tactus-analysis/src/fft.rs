//! FFT wrapper for real-valued frames

use rustfft::{FftPlanner, num_complex::Complex};
use std::sync::Arc;

/// Forward FFT processor with cached plan and working buffers.
///
/// The plan, the complex buffer and the scratch space are allocated once in
/// [`Fft::new`]; [`Fft::process`] reuses them, so steady-state transforms do
/// not allocate.
pub struct Fft {
    fft: Arc<dyn rustfft::Fft<f32>>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    size: usize,
}

impl Fft {
    /// Create a new forward FFT processor for the given size
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        let scratch_len = fft.get_inplace_scratch_len();

        Self {
            fft,
            buffer: vec![Complex::new(0.0, 0.0); size],
            scratch: vec![Complex::new(0.0, 0.0); scratch_len],
            size,
        }
    }

    /// Get FFT size
    pub fn size(&self) -> usize {
        self.size
    }

    /// Transform real input in place of the internal buffer.
    ///
    /// Input shorter than the FFT size is zero-padded, longer input is
    /// truncated. Returns the full `size`-point complex spectrum; for real
    /// input the upper half mirrors the lower half.
    pub fn process(&mut self, input: &[f32]) -> &[Complex<f32>] {
        for (dst, src) in self
            .buffer
            .iter_mut()
            .zip(input.iter().copied().chain(std::iter::repeat(0.0)))
        {
            *dst = Complex::new(src, 0.0);
        }
        self.fft
            .process_with_scratch(&mut self.buffer, &mut self.scratch);
        &self.buffer
    }

    /// Forward FFT returning the positive-frequency bins (DC to Nyquist).
    pub fn forward(&mut self, input: &[f32]) -> Vec<Complex<f32>> {
        let half = self.size / 2 + 1;
        self.process(input)[..half].to_vec()
    }
}

impl std::fmt::Debug for Fft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fft").field("size", &self.size).finish()
    }
}

/// Squared magnitude of each bin.
pub fn power(spectrum: &[Complex<f32>]) -> Vec<f32> {
    spectrum.iter().map(Complex::norm_sqr).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_dc_detection() {
        let mut fft = Fft::new(256);

        // DC signal
        let input = vec![1.0; 256];
        let spectrum = fft.forward(&input);

        // DC bin should be large, others small
        let dc_mag = spectrum[0].norm();
        let other_mag: f32 = spectrum[1..].iter().map(|c| c.norm()).sum();

        assert!(dc_mag > other_mag * 10.0);
        assert!((dc_mag - 256.0).abs() < 1e-3);
    }

    #[test]
    fn test_sine_peak_bin() {
        let mut fft = Fft::new(512);
        let input: Vec<f32> = (0..512)
            .map(|i| (2.0 * PI * 16.0 * i as f32 / 512.0).sin())
            .collect();

        let p = power(&fft.forward(&input));
        let peak = p
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| i);
        assert_eq!(peak, Some(16));
    }

    #[test]
    fn test_short_input_zero_padded() {
        let mut fft = Fft::new(8);
        let spectrum = fft.process(&[1.0]).to_vec();
        // A lone impulse has a flat spectrum
        for bin in spectrum {
            assert!((bin.norm() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_buffers_reused_between_calls() {
        let mut fft = Fft::new(64);
        let first = fft.forward(&[0.5; 64]);
        let _ = fft.forward(&[0.0; 64]);
        let again = fft.forward(&[0.5; 64]);
        assert_eq!(first, again);
    }
}
