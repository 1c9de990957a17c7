//! Analysis window functions.
//!
//! Frames are multiplied by a smoothing window before the FFT to suppress the
//! spectral leakage caused by the discontinuity at the frame edges. All windows
//! here are the periodic (DFT-even) variants, so consecutive overlapping
//! frames see a consistent taper.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use core::f32::consts::PI;
use libm::cosf;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Window {
    /// Rectangular (no windowing)
    Rectangular,
    /// Hann window (raised cosine)
    Hann,
    /// Hamming window
    #[default]
    Hamming,
    /// Blackman window
    Blackman,
}

impl Window {
    /// Every window variant, in display order.
    pub const ALL: [Window; 4] = [
        Window::Hamming,
        Window::Hann,
        Window::Blackman,
        Window::Rectangular,
    ];

    /// Short lowercase name, as used in settings files and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Window::Rectangular => "rectangular",
            Window::Hann => "hann",
            Window::Hamming => "hamming",
            Window::Blackman => "blackman",
        }
    }

    /// Look a window up by name (case-insensitive). `rect` and `none` alias
    /// [`Window::Rectangular`].
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("rect") || name.eq_ignore_ascii_case("none") {
            return Some(Window::Rectangular);
        }
        Self::ALL
            .into_iter()
            .find(|w| w.name().eq_ignore_ascii_case(name))
    }

    /// Window coefficient at index `i` of an `n`-point window.
    #[inline]
    pub fn coefficient(&self, i: usize, n: usize) -> f32 {
        let x = 2.0 * PI * i as f32 / n as f32;
        match self {
            Window::Rectangular => 1.0,
            Window::Hann => 0.5 * (1.0 - cosf(x)),
            Window::Hamming => 0.54 - 0.46 * cosf(x),
            Window::Blackman => 0.42 - 0.5 * cosf(x) + 0.08 * cosf(2.0 * x),
        }
    }

    /// Apply window to a buffer
    pub fn apply(&self, buffer: &mut [f32]) {
        let n = buffer.len();
        if *self == Window::Rectangular {
            return;
        }
        for (i, sample) in buffer.iter_mut().enumerate() {
            *sample *= self.coefficient(i, n);
        }
    }

    /// Get window coefficients
    pub fn coefficients(&self, size: usize) -> Vec<f32> {
        let mut coeffs = vec![1.0; size];
        self.apply(&mut coeffs);
        coeffs
    }
}
