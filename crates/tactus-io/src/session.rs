//! Live capture session: backend + pipeline + output stream.
//!
//! The pipeline lives behind an `Arc<parking_lot::Mutex<_>>` shared between
//! the control thread and the capture callback. The callback only ever
//! `try_lock`s it: the lock is contended solely by start/stop, and a block
//! that collides with one of those is rejected and counted rather than
//! waited on, so the audio thread never blocks.
//!
//! Stop ordering: the stream handle is dropped first (no further callbacks),
//! then the pipeline is locked and cleared. A block already in flight either
//! finishes against the old state before the clear or is rejected.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tactus_analysis::OnsetPipeline;
use tactus_core::{OnsetConfig, mono_sum};

use crate::backend::{AudioBackend, CaptureConfig, StreamHandle};
use crate::stream::{ChannelSink, OnsetStream, onset_channel};
use crate::{Error, Result};

/// Onset detection over a live capture stream.
///
/// Created Idle together with the consumer's [`OnsetStream`]. Each
/// [`start`](Self::start)/[`stop`](Self::stop) pair is one session; on stop
/// the stream receives a session reset and clears its history.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use tactus_core::OnsetConfig;
/// use tactus_io::{CaptureConfig, CaptureSession, MockBackend};
///
/// let backend = MockBackend::new(vec![0.0; 4096]);
/// let (mut session, mut stream) =
///     CaptureSession::new(backend, OnsetConfig::default(), CaptureConfig::default())?;
///
/// session.start()?;
/// while stream.len() < 25 {
///     stream.poll_timeout(Duration::from_millis(100));
/// }
/// session.stop()?;
/// # Ok::<(), tactus_io::Error>(())
/// ```
pub struct CaptureSession<B: AudioBackend> {
    backend: B,
    capture: CaptureConfig,
    pipeline: Arc<Mutex<OnsetPipeline<ChannelSink>>>,
    onset: OnsetConfig,
    handle: Option<StreamHandle>,
    hops: Arc<AtomicU64>,
    rejected: Arc<AtomicU64>,
}

impl<B: AudioBackend> CaptureSession<B> {
    /// Build an idle session and its output stream.
    ///
    /// Fails with [`Error::Config`] if `onset` does not validate.
    pub fn new(backend: B, onset: OnsetConfig, capture: CaptureConfig) -> Result<(Self, OnsetStream)> {
        let (sink, stream) = onset_channel();
        let pipeline = OnsetPipeline::new(onset, sink)?;
        let session = Self {
            backend,
            capture,
            pipeline: Arc::new(Mutex::new(pipeline)),
            onset,
            handle: None,
            hops: Arc::new(AtomicU64::new(0)),
            rejected: Arc::new(AtomicU64::new(0)),
        };
        Ok((session, stream))
    }

    /// Begin capturing.
    ///
    /// Clears all pipeline state, then opens the input stream. If the backend
    /// cannot deliver audio the error is returned and the pipeline is back in
    /// Idle with nothing buffered.
    pub fn start(&mut self) -> Result<()> {
        if self.handle.is_some() {
            return Err(Error::AlreadyListening);
        }

        self.pipeline.lock().start();
        self.hops.store(0, Ordering::Relaxed);
        self.rejected.store(0, Ordering::Relaxed);

        let channels = usize::from(self.capture.channels.max(1));
        let pipeline = Arc::clone(&self.pipeline);
        let hops = Arc::clone(&self.hops);
        let rejected = Arc::clone(&self.rejected);
        let mut mono = vec![0.0f32; self.capture.buffer_size as usize];

        let callback = Box::new(move |data: &[f32]| {
            let frames = data.len() / channels;
            if mono.len() < frames {
                mono.resize(frames, 0.0);
            }
            let n = mono_sum(data, channels, &mut mono);

            match pipeline.try_lock() {
                Some(mut pipeline) => match pipeline.submit_block(&mono[..n]) {
                    Ok(_) => hops.store(pipeline.hops_processed(), Ordering::Relaxed),
                    Err(_) => {
                        rejected.fetch_add(1, Ordering::Relaxed);
                    }
                },
                None => {
                    rejected.fetch_add(1, Ordering::Relaxed);
                }
            }
        });
        let error_callback = Box::new(|err: &str| {
            tracing::warn!(error = err, "capture stream error");
        });

        match self
            .backend
            .build_input_stream(&self.capture, callback, error_callback)
        {
            Ok(handle) => {
                self.handle = Some(handle);
                tracing::info!(
                    backend = self.backend.name(),
                    sample_rate = self.capture.sample_rate,
                    channels = self.capture.channels,
                    "capture session started"
                );
                Ok(())
            }
            Err(err) => {
                // Nothing was emitted, so the consumer gets no reset
                self.pipeline.lock().abort();
                tracing::warn!(backend = self.backend.name(), error = %err, "capture session failed to start");
                Err(err)
            }
        }
    }

    /// End the session.
    ///
    /// Stops the input stream, then clears the ring buffer, previous
    /// spectrum and flux history. The output stream receives a session
    /// reset.
    pub fn stop(&mut self) -> Result<()> {
        let Some(handle) = self.handle.take() else {
            return Err(Error::NotListening);
        };
        drop(handle);

        let mut pipeline = self.pipeline.lock();
        let hops = pipeline.hops_processed();
        pipeline.stop();
        self.hops.store(0, Ordering::Relaxed);
        tracing::info!(
            hops,
            rejected = self.rejected.load(Ordering::Relaxed),
            "capture session stopped"
        );
        Ok(())
    }

    /// Whether a session is running.
    pub fn is_listening(&self) -> bool {
        self.handle.is_some()
    }

    /// Hops emitted in the current session.
    ///
    /// Read from a counter the callback updates, so polling it never
    /// contends with capture.
    pub fn hops_processed(&self) -> u64 {
        self.hops.load(Ordering::Relaxed)
    }

    /// Blocks dropped because they collided with start/stop or arrived while
    /// the pipeline was idle.
    pub fn rejected_blocks(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    /// The onset configuration in use.
    pub fn onset_config(&self) -> &OnsetConfig {
        &self.onset
    }

    /// The capture configuration in use.
    pub fn capture_config(&self) -> &CaptureConfig {
        &self.capture
    }

    /// The capture backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: AudioBackend> Drop for CaptureSession<B> {
    fn drop(&mut self) {
        if self.is_listening() {
            let _ = self.stop();
        }
    }
}

impl<B: AudioBackend> std::fmt::Debug for CaptureSession<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureSession")
            .field("backend", &self.backend.name())
            .field("capture", &self.capture)
            .field("listening", &self.is_listening())
            .finish_non_exhaustive()
    }
}
