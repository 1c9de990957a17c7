//! Deterministic capture backend for tests and offline runs.
//!
//! [`MockBackend`] plays a fixed mono signal through the capture callback
//! from a worker thread, in blocks of `buffer_size` frames, duplicated across
//! the configured channel count. It exercises the same threading and
//! downmix path as a real device without any hardware.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::backend::{AudioBackend, CaptureConfig, ErrorCallback, InputCallback, StreamHandle};
use crate::{AudioDevice, Error, Result};

const MOCK_DEVICE_NAME: &str = "Mock Input";

/// Capture backend that replays an in-memory signal.
#[derive(Debug, Clone)]
pub struct MockBackend {
    signal: Arc<[f32]>,
    block_interval: Option<Duration>,
    available: bool,
}

impl MockBackend {
    /// Backend that plays `signal` once per stream.
    pub fn new(signal: Vec<f32>) -> Self {
        Self {
            signal: signal.into(),
            block_interval: None,
            available: true,
        }
    }

    /// Backend with no capture device: every stream build fails with
    /// [`Error::NoDevice`].
    pub fn unavailable() -> Self {
        Self {
            signal: Arc::from(Vec::new()),
            block_interval: None,
            available: false,
        }
    }

    /// Sleep this long between blocks, approximating hardware pacing.
    pub fn with_block_interval(mut self, interval: Duration) -> Self {
        self.block_interval = Some(interval);
        self
    }

    /// The signal replayed by each stream.
    pub fn signal(&self) -> &[f32] {
        &self.signal
    }

    fn device(&self) -> AudioDevice {
        AudioDevice {
            name: MOCK_DEVICE_NAME.to_string(),
            default_sample_rate: 48000,
            channels: 1,
            is_default: true,
        }
    }
}

/// Worker thread owner; dropping it stops the worker and waits for it.
struct MockStream {
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl Drop for MockStream {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl AudioBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn list_devices(&self) -> Result<Vec<AudioDevice>> {
        Ok(if self.available {
            vec![self.device()]
        } else {
            Vec::new()
        })
    }

    fn default_input_device(&self) -> Result<Option<AudioDevice>> {
        Ok(self.available.then(|| self.device()))
    }

    fn build_input_stream(
        &self,
        config: &CaptureConfig,
        mut callback: InputCallback,
        _error_callback: ErrorCallback,
    ) -> Result<StreamHandle> {
        if !self.available {
            return Err(Error::NoDevice);
        }
        if let Some(name) = &config.device_name
            && !MOCK_DEVICE_NAME
                .to_lowercase()
                .contains(&name.to_lowercase())
        {
            return Err(Error::DeviceNotFound(format!(
                "no input device matching '{}'",
                name
            )));
        }

        let channels = usize::from(config.channels.max(1));
        let frames = (config.buffer_size as usize).max(1);
        let signal = Arc::clone(&self.signal);
        let interval = self.block_interval;
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let worker = std::thread::Builder::new()
            .name("tactus-mock-capture".into())
            .spawn(move || {
                let mut block = Vec::with_capacity(frames * channels);
                for chunk in signal.chunks(frames) {
                    if stop_flag.load(Ordering::SeqCst) {
                        return;
                    }
                    block.clear();
                    for &sample in chunk {
                        block.extend(std::iter::repeat_n(sample, channels));
                    }
                    callback(&block);
                    if let Some(interval) = interval {
                        std::thread::sleep(interval);
                    }
                }
            })?;

        tracing::debug!(
            channels,
            buffer_size = frames,
            samples = self.signal.len(),
            "mock input stream started"
        );

        Ok(StreamHandle::new(MockStream {
            stop,
            worker: Some(worker),
        }))
    }
}
