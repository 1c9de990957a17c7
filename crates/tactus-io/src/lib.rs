//! Audio capture and output plumbing for the tactus onset detector.
//!
//! This crate connects an [`OnsetPipeline`](tactus_analysis::OnsetPipeline)
//! to the outside world:
//!
//! - **Capture**: the [`AudioBackend`] trait with [`CpalBackend`] for real
//!   input devices and [`MockBackend`] for deterministic tests
//! - **Sessions**: [`CaptureSession`] runs the pipeline inside the capture
//!   callback and handles start/stop
//! - **Output stream**: [`onset_channel`] hands samples from the audio thread
//!   to a consumer-owned [`OnsetStream`] without ever blocking the producer
//! - **WAV file I/O**: [`read_wav`] and [`write_wav`] for offline analysis
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tactus_core::OnsetConfig;
//! use tactus_io::{CaptureConfig, CaptureSession, CpalBackend};
//!
//! let (mut session, mut stream) =
//!     CaptureSession::new(CpalBackend::new(), OnsetConfig::default(), CaptureConfig::default())?;
//! session.start()?;
//!
//! loop {
//!     stream.poll_timeout(std::time::Duration::from_millis(50));
//!     if let Some(latest) = stream.latest() {
//!         println!("{:.2}", latest.strength);
//!     }
//! }
//! ```

pub mod backend;
pub mod cpal_backend;
pub mod mock_backend;

mod devices;
mod session;
mod stream;
mod wav;

pub use backend::{AudioBackend, CaptureConfig, ErrorCallback, InputCallback, StreamHandle};
pub use cpal_backend::CpalBackend;
pub use devices::{AudioDevice, default_input_device, list_input_devices};
pub use mock_backend::MockBackend;
pub use session::CaptureSession;
pub use stream::{ChannelSink, OnsetEvent, OnsetStream, onset_channel};
pub use wav::{WavFormat, WavInfo, WavSpec, read_wav, read_wav_info, write_wav};

use tactus_core::ConfigError;

/// Error types for capture and audio file operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Audio stream setup or runtime error.
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// No capture device available on the system.
    #[error("No audio input device available")]
    NoDevice,

    /// The requested sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// The requested audio device was not found.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// The onset configuration was refused.
    #[error("Invalid onset configuration: {0}")]
    Config(#[from] ConfigError),

    /// `start()` was called while a session is running.
    #[error("Capture session is already listening")]
    AlreadyListening,

    /// `stop()` was called with no session running.
    #[error("Capture session is not listening")]
    NotListening,

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for capture and I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
