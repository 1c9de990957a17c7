//! Per-hop output record and the sink it is emitted into.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// One emitted onset-strength value.
///
/// Produced once per analysed hop, strictly in hop order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OnsetSample {
    /// Zero-based hop index within the session.
    pub hop: u64,
    /// Raw spectral flux of this hop (always `>= 0`; `0.0` for hop 0).
    pub flux: f32,
    /// Flux normalized against the rolling maximum, in `[0, target_max_flux]`.
    pub strength: f32,
}

impl OnsetSample {
    /// Start time of this hop's frame in seconds.
    pub fn time_secs(&self, hop_size: usize, sample_rate: u32) -> f64 {
        (self.hop as f64 * hop_size as f64) / f64::from(sample_rate)
    }
}

/// Destination of emitted onset samples.
///
/// The pipeline calls [`emit`](Self::emit) synchronously from the audio
/// callback, so implementations must not block: hand the value off (channel,
/// lock-free queue, preallocated buffer) and return.
pub trait OnsetSink {
    /// Receive the sample for one completed hop.
    fn emit(&mut self, sample: OnsetSample);

    /// The session that produced the previous samples has ended.
    ///
    /// Called once per session stop. Sinks that keep history clear it here so
    /// consumers see one session at a time.
    fn session_reset(&mut self) {}
}

impl OnsetSink for Vec<OnsetSample> {
    fn emit(&mut self, sample: OnsetSample) {
        self.push(sample);
    }

    fn session_reset(&mut self) {
        self.clear();
    }
}

impl<S: OnsetSink + ?Sized> OnsetSink for &mut S {
    fn emit(&mut self, sample: OnsetSample) {
        (**self).emit(sample);
    }

    fn session_reset(&mut self) {
        (**self).session_reset();
    }
}
