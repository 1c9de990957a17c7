//! Onset-detection configuration and validation.
//!
//! [`OnsetConfig`] fixes the analysis geometry (frame and hop size), the length
//! of the normalization history, and the output scaling. It is checked once with
//! [`OnsetConfig::validate`] before any session starts; after that the
//! processing path has no failure modes.

use crate::window::Window;

/// Default analysis frame length in samples.
pub const DEFAULT_FRAME_SIZE: usize = 1024;

/// Default advance between consecutive frames in samples.
pub const DEFAULT_HOP_SIZE: usize = 128;

/// Default number of flux values kept for rolling-maximum normalization.
pub const DEFAULT_ROLLING_WINDOW_SIZE: usize = 100;

/// Default ceiling of the normalized onset-strength signal.
pub const DEFAULT_TARGET_MAX_FLUX: f32 = 5.0;

/// Default multiplier of the log-power conversion.
pub const DEFAULT_SPECTRAL_SCALE: f32 = 1000.0;

/// Reasons an [`OnsetConfig`] is refused.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The frame size must be a power of two and at least 2.
    FrameSizeNotPowerOfTwo(usize),
    /// The hop size must lie in `1..=frame_size`.
    HopSizeOutOfRange {
        /// Offending hop size.
        hop_size: usize,
        /// Frame size it was checked against.
        frame_size: usize,
    },
    /// The rolling window must hold at least one flux value.
    RollingWindowTooSmall(usize),
    /// The target maximum must be finite and positive.
    InvalidTargetMaxFlux(f32),
    /// The spectral scaling factor must be finite and positive.
    InvalidSpectralScale(f32),
}

#[cfg(feature = "std")]
impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::FrameSizeNotPowerOfTwo(n) => {
                write!(f, "frame size {n} is not a power of two (>= 2)")
            }
            Self::HopSizeOutOfRange {
                hop_size,
                frame_size,
            } => write!(
                f,
                "hop size {hop_size} must be between 1 and the frame size {frame_size}"
            ),
            Self::RollingWindowTooSmall(n) => {
                write!(f, "rolling window size {n} must be at least 1")
            }
            Self::InvalidTargetMaxFlux(v) => {
                write!(f, "target max flux {v} must be finite and > 0")
            }
            Self::InvalidSpectralScale(v) => {
                write!(f, "spectral scale {v} must be finite and > 0")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Parameters of the onset-strength pipeline.
///
/// Fixed at construction of a pipeline; there is no runtime mutation.
///
/// # Example
///
/// ```rust
/// use tactus_core::{OnsetConfig, Window};
///
/// let config = OnsetConfig::default()
///     .with_frame_size(2048)
///     .with_hop_size(256)
///     .with_window(Window::Hann);
/// assert!(config.validate().is_ok());
///
/// let bad = OnsetConfig::default().with_frame_size(1000);
/// assert!(bad.validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnsetConfig {
    /// Samples per analysis frame (power of two).
    pub frame_size: usize,
    /// Samples between the starts of consecutive frames.
    pub hop_size: usize,
    /// Capacity of the flux history used for normalization.
    pub rolling_window_size: usize,
    /// Value a flux equal to the rolling maximum maps to.
    pub target_max_flux: f32,
    /// Multiplier of the `20 * log10(power + 1)` conversion.
    pub spectral_scale: f32,
    /// Window applied to each frame before the FFT.
    pub window: Window,
}

impl Default for OnsetConfig {
    fn default() -> Self {
        Self {
            frame_size: DEFAULT_FRAME_SIZE,
            hop_size: DEFAULT_HOP_SIZE,
            rolling_window_size: DEFAULT_ROLLING_WINDOW_SIZE,
            target_max_flux: DEFAULT_TARGET_MAX_FLUX,
            spectral_scale: DEFAULT_SPECTRAL_SCALE,
            window: Window::Hamming,
        }
    }
}

impl OnsetConfig {
    /// Set the frame size.
    pub fn with_frame_size(mut self, frame_size: usize) -> Self {
        self.frame_size = frame_size;
        self
    }

    /// Set the hop size.
    pub fn with_hop_size(mut self, hop_size: usize) -> Self {
        self.hop_size = hop_size;
        self
    }

    /// Set the rolling window size.
    pub fn with_rolling_window_size(mut self, rolling_window_size: usize) -> Self {
        self.rolling_window_size = rolling_window_size;
        self
    }

    /// Set the target maximum of the normalized output.
    pub fn with_target_max_flux(mut self, target_max_flux: f32) -> Self {
        self.target_max_flux = target_max_flux;
        self
    }

    /// Set the log-power scaling factor.
    pub fn with_spectral_scale(mut self, spectral_scale: f32) -> Self {
        self.spectral_scale = spectral_scale;
        self
    }

    /// Set the analysis window.
    pub fn with_window(mut self, window: Window) -> Self {
        self.window = window;
        self
    }

    /// Check every constraint, returning the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let result = self.check();
        #[cfg(feature = "tracing")]
        if let Err(ref err) = result {
            tracing::debug!("onset config rejected: {err:?}");
        }
        result
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.frame_size < 2 || !self.frame_size.is_power_of_two() {
            return Err(ConfigError::FrameSizeNotPowerOfTwo(self.frame_size));
        }
        if self.hop_size == 0 || self.hop_size > self.frame_size {
            return Err(ConfigError::HopSizeOutOfRange {
                hop_size: self.hop_size,
                frame_size: self.frame_size,
            });
        }
        if self.rolling_window_size == 0 {
            return Err(ConfigError::RollingWindowTooSmall(self.rolling_window_size));
        }
        if !self.target_max_flux.is_finite() || self.target_max_flux <= 0.0 {
            return Err(ConfigError::InvalidTargetMaxFlux(self.target_max_flux));
        }
        if !self.spectral_scale.is_finite() || self.spectral_scale <= 0.0 {
            return Err(ConfigError::InvalidSpectralScale(self.spectral_scale));
        }
        Ok(())
    }

    /// Number of spectrum bins per frame (`frame_size / 2`).
    pub fn num_bins(&self) -> usize {
        self.frame_size / 2
    }

    /// Overlap between consecutive frames in samples.
    pub fn overlap(&self) -> usize {
        self.frame_size.saturating_sub(self.hop_size)
    }

    /// Hop rate in hops per second at the given sample rate.
    pub fn hops_per_second(&self, sample_rate: u32) -> f32 {
        sample_rate as f32 / self.hop_size as f32
    }
}
