//! cpal-based capture backend.
//!
//! [`CpalBackend`] is the default [`AudioBackend`], wrapping
//! [cpal](https://crates.io/crates/cpal) for cross-platform capture on ALSA
//! (Linux), CoreAudio (macOS) and WASAPI (Windows).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tactus_io::{AudioBackend, CaptureConfig, CpalBackend};
//!
//! let backend = CpalBackend::new();
//! let stream = backend.build_input_stream(
//!     &CaptureConfig::default(),
//!     Box::new(|samples: &[f32]| {
//!         // Hand samples to the pipeline...
//!     }),
//!     Box::new(|err| eprintln!("Capture error: {}", err)),
//! )?;
//! // Capture runs until `stream` is dropped.
//! ```

use crate::backend::{AudioBackend, CaptureConfig, ErrorCallback, InputCallback, StreamHandle};
use crate::devices::{find_input_device, host_default_input_device, list_host_input_devices};
use crate::{AudioDevice, Error, Result};
use cpal::Host;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

/// cpal-based capture backend.
///
/// Holds the cpal [`Host`], the connection to the platform's audio system.
pub struct CpalBackend {
    host: Host,
}

impl CpalBackend {
    /// Create a backend on the platform's default audio host.
    pub fn new() -> Self {
        let host = cpal::default_host();
        tracing::info!(host = host.id().name(), "cpal backend initialized");
        Self { host }
    }
}

impl Default for CpalBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CpalBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpalBackend")
            .field("host", &self.host.id().name())
            .finish()
    }
}

impl AudioBackend for CpalBackend {
    fn name(&self) -> &'static str {
        "cpal"
    }

    fn list_devices(&self) -> Result<Vec<AudioDevice>> {
        list_host_input_devices(&self.host)
    }

    fn default_input_device(&self) -> Result<Option<AudioDevice>> {
        Ok(host_default_input_device(&self.host))
    }

    fn build_input_stream(
        &self,
        config: &CaptureConfig,
        mut callback: InputCallback,
        mut error_callback: ErrorCallback,
    ) -> Result<StreamHandle> {
        let device = find_input_device(&self.host, config.device_name.as_deref())?;

        let stream_config = cpal::StreamConfig {
            channels: config.channels,
            sample_rate: config.sample_rate,
            buffer_size: cpal::BufferSize::Fixed(config.buffer_size),
        };

        let stream = device
            .build_input_stream(
                &stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    callback(data);
                },
                move |err| {
                    error_callback(&err.to_string());
                },
                None,
            )
            .map_err(|e| match e {
                cpal::BuildStreamError::StreamConfigNotSupported => Error::UnsupportedFormat(
                    format!(
                        "{} ch @ {} Hz, {} frames",
                        config.channels, config.sample_rate, config.buffer_size
                    ),
                ),
                other => Error::Stream(other.to_string()),
            })?;

        stream.play().map_err(|e| Error::Stream(e.to_string()))?;
        tracing::info!(
            channels = config.channels,
            sample_rate = config.sample_rate,
            buffer_size = config.buffer_size,
            "input stream started"
        );

        Ok(StreamHandle::new(stream))
    }
}
