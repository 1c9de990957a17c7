//! Tactus Analysis - spectral stage and onset-strength pipeline
//!
//! This crate adds the FFT-backed parts of the detector on top of
//! `tactus-core`:
//!
//! - [`fft`] - Forward FFT wrapper with reusable buffers
//! - [`spectrum`] - [`SpectralAnalyzer`]: windowed log-power spectra
//! - [`onset`] - [`OnsetPipeline`]: the per-block streaming detector
//! - [`offline`] - Whole-signal analysis and peak picking
//!
//! ## Streaming
//!
//! ```rust
//! use tactus_analysis::OnsetPipeline;
//! use tactus_core::{OnsetConfig, OnsetSample};
//!
//! let mut pipeline = OnsetPipeline::new(OnsetConfig::default(), Vec::<OnsetSample>::new())?;
//! pipeline.start();
//!
//! // Blocks of any size; hops are emitted as soon as a frame completes
//! for _ in 0..20 {
//!     pipeline.submit_block(&[0.0; 256])?;
//! }
//! assert_eq!(pipeline.sink().len(), (20 * 256 - 1024) / 128 + 1);
//!
//! pipeline.stop();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Offline
//!
//! ```rust,ignore
//! use tactus_analysis::{analyze_signal, find_peaks};
//!
//! let track = analyze_signal(&samples, &config, 512)?;
//! for peak in find_peaks(&track, 2.5) {
//!     println!("{:.3}s  {:.2}", peak.time_secs(config.hop_size, 48000), peak.strength);
//! }
//! ```

pub mod fft;
pub mod offline;
pub mod onset;
pub mod spectrum;

pub use offline::{DEFAULT_BLOCK_SIZE, analyze_signal, find_peaks};
pub use onset::{OnsetPipeline, PipelineError, PipelineState};
pub use spectrum::SpectralAnalyzer;
