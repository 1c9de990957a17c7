//! Pluggable capture backend abstraction.
//!
//! The onset pipeline only needs a producer of raw input blocks. This module
//! defines the [`AudioBackend`] trait that decouples the pipeline from any
//! specific platform audio API:
//!
//! - **Desktop**: [`CpalBackend`](crate::CpalBackend) (ALSA, CoreAudio, WASAPI)
//! - **Testing**: [`MockBackend`](crate::MockBackend) plays a fixed signal
//!   from a worker thread
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────┐
//! │          CaptureSession          │
//! │    (pipeline inside callback)    │
//! └──────────────┬───────────────────┘
//!                │ uses AudioBackend trait
//!                ▼
//! ┌──────────────────────────────────┐
//! │        AudioBackend trait        │
//! │ list_devices / build_input_stream│
//! └──────────────┬───────────────────┘
//!        ┌───────┴────────┐
//!        ▼                ▼
//! ┌─────────────┐  ┌─────────────┐
//! │ CpalBackend │  │ MockBackend │
//! └─────────────┘  └─────────────┘
//! ```
//!
//! Callbacks are boxed closures, so the trait is object-safe and the backend
//! can be chosen at runtime. Streams come back as a type-erased
//! [`StreamHandle`] that stops capture when dropped.

use crate::{AudioDevice, Result};

/// Configuration for opening a capture stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureConfig {
    /// Requested sample rate in Hz.
    pub sample_rate: u32,
    /// Preferred buffer size in frames.
    pub buffer_size: u32,
    /// Number of interleaved input channels.
    pub channels: u16,
    /// Device name filter (case-insensitive substring); system default if `None`.
    pub device_name: Option<String>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            buffer_size: 512,
            channels: 1,
            device_name: None,
        }
    }
}

/// Type-erased capture stream handle.
///
/// Capture runs while this handle exists; dropping it stops the stream. Once
/// the drop returns, the backend delivers no further callbacks.
pub struct StreamHandle {
    _inner: Box<dyn Send>,
}

impl StreamHandle {
    /// Wrap a backend-specific stream object, keeping it alive until the
    /// handle is dropped.
    pub fn new<T: Send + 'static>(stream: T) -> Self {
        Self {
            _inner: Box::new(stream),
        }
    }
}

impl std::fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandle").finish_non_exhaustive()
    }
}

/// Capture callback signature.
///
/// Called on the audio thread with interleaved f32 samples
/// (`[L0, R0, L1, R1, ...]` for stereo). Implementations must not block.
pub type InputCallback = Box<dyn FnMut(&[f32]) + Send>;

/// Called when the backend reports a streaming error.
pub type ErrorCallback = Box<dyn FnMut(&str) + Send>;

/// Pluggable capture backend.
///
/// Object-safe: all callbacks are boxed and stream handles are type-erased,
/// so `Box<dyn AudioBackend>` works.
pub trait AudioBackend: Send {
    /// Human-readable name of this backend (e.g. "cpal", "mock").
    fn name(&self) -> &str;

    /// List the available capture devices.
    fn list_devices(&self) -> Result<Vec<AudioDevice>>;

    /// The default capture device, if any.
    fn default_input_device(&self) -> Result<Option<AudioDevice>>;

    /// Open and start a capture stream.
    ///
    /// `callback` runs once per hardware buffer until the returned handle is
    /// dropped. Fails when no matching device exists or the device refuses
    /// the configuration.
    fn build_input_stream(
        &self,
        config: &CaptureConfig,
        callback: InputCallback,
        error_callback: ErrorCallback,
    ) -> Result<StreamHandle>;
}

impl<B: AudioBackend + ?Sized> AudioBackend for Box<B> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn list_devices(&self) -> Result<Vec<AudioDevice>> {
        (**self).list_devices()
    }

    fn default_input_device(&self) -> Result<Option<AudioDevice>> {
        (**self).default_input_device()
    }

    fn build_input_stream(
        &self,
        config: &CaptureConfig,
        callback: InputCallback,
        error_callback: ErrorCallback,
    ) -> Result<StreamHandle> {
        (**self).build_input_stream(config, callback, error_callback)
    }
}
