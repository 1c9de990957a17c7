//! Tactus Core - streaming primitives for onset-strength detection
//!
//! This crate provides the building blocks of a real-time onset detector: the
//! pieces that buffer incoming audio, compare consecutive spectra, and rescale
//! the result into a self-calibrating onset-strength signal. The FFT-backed
//! spectral stage lives in `tactus-analysis`; everything here is allocation-free
//! in the steady state and usable from an audio callback.
//!
//! # Core Abstractions
//!
//! ## Framing
//!
//! - [`SampleRingBuffer`] - Accumulates arbitrary-sized blocks, yields overlapping [`Frame`]s
//!
//! ## Onset Strength
//!
//! - [`spectral_flux`] - Half-wave rectified spectral difference between two spectra
//! - [`AdaptiveNormalizer`] - Rolling-maximum normalization against recent flux history
//! - [`OnsetSample`] / [`OnsetSink`] - Per-hop output record and where it goes
//!
//! ## Configuration
//!
//! - [`OnsetConfig`] - Frame/hop geometry and scaling, validated up front
//! - [`ConfigError`] - Why a configuration was refused
//!
//! ## Utilities
//!
//! - [`Window`] - Analysis window functions (Hamming by default)
//! - Math functions: [`power_to_log`], [`mono_sum`], [`hop_count`]
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (it needs `alloc`). Disable the default
//! `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! tactus-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use tactus_core::{AdaptiveNormalizer, OnsetConfig, SampleRingBuffer, spectral_flux};
//!
//! let config = OnsetConfig::default();
//! let mut ring = SampleRingBuffer::new(config.frame_size, config.hop_size);
//! let mut normalizer = AdaptiveNormalizer::new(config.rolling_window_size, config.target_max_flux);
//!
//! ring.push(&[0.0; 2048]);
//! while let Some(frame) = ring.try_extract_frame() {
//!     assert_eq!(frame.len(), 1024);
//! }
//!
//! let flux = spectral_flux(&[2.0, 1.0], Some(&[1.0, 3.0]));
//! assert_eq!(flux, 1.0);
//! assert_eq!(normalizer.normalize(flux), 5.0);
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations once buffers have reached working size
//! - **No dependencies on std**: Pure `no_std` with `libm` for math
//! - **Infallible hot path**: Once a config validates, framing, flux and
//!   normalization cannot fail

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod config;
pub mod flux;
pub mod math;
pub mod normalizer;
pub mod ring_buffer;
pub mod sample;
pub mod window;

// Re-export main types at crate root
pub use config::{
    ConfigError, DEFAULT_FRAME_SIZE, DEFAULT_HOP_SIZE, DEFAULT_ROLLING_WINDOW_SIZE,
    DEFAULT_SPECTRAL_SCALE, DEFAULT_TARGET_MAX_FLUX, OnsetConfig,
};
pub use flux::spectral_flux;
pub use math::{hop_count, mono_sum, power_to_log};
pub use normalizer::AdaptiveNormalizer;
pub use ring_buffer::{Frame, SampleRingBuffer};
pub use sample::{OnsetSample, OnsetSink};
pub use window::Window;
