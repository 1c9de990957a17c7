//! Windowed log-power spectra of analysis frames.

use tactus_core::{Frame, OnsetConfig, Window, power_to_log};

use crate::fft::Fft;

/// Turns frames into log-power spectra.
///
/// For each frame: multiply by the window, take the forward FFT, square the
/// magnitude of the first `frame_size / 2` bins, and map each power `p` to
/// `20 * scale * log10(p + 1)`. The upper half of the FFT output mirrors the
/// lower half for real input and is discarded.
///
/// The frame size must be a power of two; [`OnsetConfig::validate`] enforces
/// this before an analyzer is built. Window coefficients and FFT buffers are
/// precomputed, so [`analyze_into`](Self::analyze_into) does not allocate.
///
/// # Example
///
/// ```rust
/// use tactus_analysis::SpectralAnalyzer;
/// use tactus_core::{Frame, OnsetConfig};
///
/// let config = OnsetConfig::default().with_frame_size(256).with_hop_size(64);
/// let mut analyzer = SpectralAnalyzer::from_config(&config);
///
/// let silence = [0.0f32; 256];
/// let spectrum = analyzer.analyze(Frame::new(&silence));
/// assert_eq!(spectrum.len(), 128);
/// assert!(spectrum.iter().all(|&bin| bin == 0.0));
/// ```
#[derive(Debug)]
pub struct SpectralAnalyzer {
    fft: Fft,
    coefficients: Vec<f32>,
    windowed: Vec<f32>,
    frame_size: usize,
    scale: f32,
}

impl SpectralAnalyzer {
    /// Create an analyzer for `frame_size`-sample frames.
    pub fn new(frame_size: usize, window: Window, scale: f32) -> Self {
        Self {
            fft: Fft::new(frame_size),
            coefficients: window.coefficients(frame_size),
            windowed: vec![0.0; frame_size],
            frame_size,
            scale,
        }
    }

    /// Create an analyzer from the frame size, window and scale of `config`.
    pub fn from_config(config: &OnsetConfig) -> Self {
        Self::new(config.frame_size, config.window, config.spectral_scale)
    }

    /// Samples per frame.
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Number of bins in each spectrum (`frame_size / 2`).
    pub fn num_bins(&self) -> usize {
        self.frame_size / 2
    }

    /// Log-power scaling factor.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Write the spectrum of `frame` into `out`.
    ///
    /// A frame shorter than `frame_size` is zero-padded and a longer one is
    /// truncated, so the result depends on `frame` alone. `out` should hold
    /// [`num_bins`](Self::num_bins) values; extra entries are left untouched
    /// and missing ones are not computed.
    pub fn analyze_into(&mut self, frame: Frame<'_>, out: &mut [f32]) {
        debug_assert!(
            frame.len() <= self.frame_size,
            "frame of {} samples for a {}-point analyzer",
            frame.len(),
            self.frame_size
        );
        let samples = frame.iter().copied().chain(std::iter::repeat(0.0));
        for ((dst, sample), &coeff) in self
            .windowed
            .iter_mut()
            .zip(samples)
            .zip(self.coefficients.iter())
        {
            *dst = sample * coeff;
        }

        let bins = self.fft.process(&self.windowed);
        let scale = self.scale;
        for (dst, bin) in out.iter_mut().zip(&bins[..self.frame_size / 2]) {
            *dst = power_to_log(bin.norm_sqr(), scale);
        }
    }

    /// Spectrum of `frame` as a new vector.
    pub fn analyze(&mut self, frame: Frame<'_>) -> Vec<f32> {
        let mut spectrum = vec![0.0; self.num_bins()];
        self.analyze_into(frame, &mut spectrum);
        spectrum
    }
}
