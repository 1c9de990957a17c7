//! Streaming onset-strength pipeline.
//!
//! [`OnsetPipeline`] owns every piece of per-session state: the sample ring
//! buffer, the previous frame's spectrum, the flux history and the hop
//! counter. Each submitted block is processed synchronously:
//!
//! ```text
//! block -> SampleRingBuffer -> frame* -> SpectralAnalyzer -> spectrum
//!                                        spectral_flux(spectrum, previous)
//!                                        AdaptiveNormalizer -> OnsetSink
//! ```
//!
//! The pipeline is a two-state machine. It starts [`Idle`](PipelineState::Idle);
//! [`start`](OnsetPipeline::start) clears all state and moves to
//! [`Listening`](PipelineState::Listening), and
//! [`stop`](OnsetPipeline::stop) clears it again and returns to Idle. Blocks
//! submitted while Idle are refused.

use std::fmt;

use tactus_core::{
    AdaptiveNormalizer, ConfigError, OnsetConfig, OnsetSample, OnsetSink, SampleRingBuffer,
    spectral_flux,
};

use crate::spectrum::SpectralAnalyzer;

/// Lifecycle state of an [`OnsetPipeline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    /// No session active; all buffers empty.
    #[default]
    Idle,
    /// Accepting audio blocks.
    Listening,
}

/// Errors returned by [`OnsetPipeline::submit_block`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineError {
    /// A block arrived while no session was active. The block is dropped and
    /// no state changes.
    Idle,
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "onset pipeline is idle; call start() before submitting audio"),
        }
    }
}

impl std::error::Error for PipelineError {}

/// Per-block onset-strength detector.
///
/// Emits exactly one [`OnsetSample`] per completed hop, in hop order, to its
/// [`OnsetSink`]. Over a session, the number of emissions equals
/// [`hop_count`](tactus_core::hop_count) of the total submitted samples no
/// matter how the samples were split into blocks.
///
/// Spectrum buffers are allocated once at construction and swapped between
/// hops, so processing a block allocates only when the ring buffer first
/// grows to hold it.
///
/// # Example
///
/// ```rust
/// use tactus_analysis::OnsetPipeline;
/// use tactus_core::{OnsetConfig, OnsetSample};
///
/// let config = OnsetConfig::default();
/// let mut pipeline = OnsetPipeline::new(config, Vec::<OnsetSample>::new()).unwrap();
/// pipeline.start();
///
/// // 1024 + 2 * 128 samples: three complete hops
/// let emitted = pipeline.submit_block(&vec![0.0; 1280]).unwrap();
/// assert_eq!(emitted, 3);
/// assert_eq!(pipeline.sink()[0].flux, 0.0);
/// ```
#[derive(Debug)]
pub struct OnsetPipeline<S: OnsetSink> {
    config: OnsetConfig,
    ring: SampleRingBuffer,
    analyzer: SpectralAnalyzer,
    normalizer: AdaptiveNormalizer,
    current: Vec<f32>,
    previous: Vec<f32>,
    has_previous: bool,
    hops: u64,
    state: PipelineState,
    sink: S,
}

impl<S: OnsetSink> OnsetPipeline<S> {
    /// Build an idle pipeline, validating `config` first.
    pub fn new(config: OnsetConfig, sink: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let bins = config.num_bins();
        Ok(Self {
            config,
            ring: SampleRingBuffer::new(config.frame_size, config.hop_size),
            analyzer: SpectralAnalyzer::from_config(&config),
            normalizer: AdaptiveNormalizer::new(
                config.rolling_window_size,
                config.target_max_flux,
            ),
            current: vec![0.0; bins],
            previous: vec![0.0; bins],
            has_previous: false,
            hops: 0,
            state: PipelineState::Idle,
            sink,
        })
    }

    /// Begin a session.
    ///
    /// Clears all state first, so a pipeline that is already listening starts
    /// over as if freshly stopped and started (without a sink reset).
    pub fn start(&mut self) {
        self.clear();
        self.state = PipelineState::Listening;
        tracing::debug!(
            frame_size = self.config.frame_size,
            hop_size = self.config.hop_size,
            "onset session started"
        );
    }

    /// End the session.
    ///
    /// Clears the ring buffer, previous spectrum, flux history and hop
    /// counter, then tells the sink the session is over. No further samples
    /// are emitted until the next [`start`](Self::start). Does nothing when
    /// already idle.
    pub fn stop(&mut self) {
        if self.state == PipelineState::Idle {
            return;
        }
        tracing::debug!(hops = self.hops, "onset session stopped");
        self.clear();
        self.state = PipelineState::Idle;
        self.sink.session_reset();
    }

    /// Return to Idle without telling the sink.
    ///
    /// For a session that never delivered audio, e.g. when the capture
    /// stream failed to open right after [`start`](Self::start). State is
    /// cleared exactly as by [`stop`](Self::stop).
    pub fn abort(&mut self) {
        if self.state == PipelineState::Idle {
            return;
        }
        tracing::debug!("onset session aborted");
        self.clear();
        self.state = PipelineState::Idle;
    }

    /// Process one block of mono samples.
    ///
    /// Returns the number of onset samples emitted, which may be zero (not
    /// enough samples for a new frame yet) or many (block longer than a hop).
    pub fn submit_block(&mut self, samples: &[f32]) -> Result<usize, PipelineError> {
        if self.state == PipelineState::Idle {
            return Err(PipelineError::Idle);
        }

        self.ring.push(samples);
        let mut emitted = 0;
        while let Some(frame) = self.ring.try_extract_frame() {
            self.analyzer.analyze_into(frame, &mut self.current);
            let previous = self.has_previous.then_some(self.previous.as_slice());
            let flux = spectral_flux(&self.current, previous);
            let strength = self.normalizer.normalize(flux);

            self.sink.emit(OnsetSample {
                hop: self.hops,
                flux,
                strength,
            });

            std::mem::swap(&mut self.current, &mut self.previous);
            self.has_previous = true;
            self.hops += 1;
            emitted += 1;
        }
        Ok(emitted)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Whether a session is active.
    pub fn is_listening(&self) -> bool {
        self.state == PipelineState::Listening
    }

    /// Hops emitted in the current session.
    pub fn hops_processed(&self) -> u64 {
        self.hops
    }

    /// Samples buffered but not yet consumed by a hop.
    pub fn buffered_samples(&self) -> usize {
        self.ring.len()
    }

    /// The configuration this pipeline was built with.
    pub fn config(&self) -> &OnsetConfig {
        &self.config
    }

    /// The output sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the output sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the pipeline, returning its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    fn clear(&mut self) {
        self.ring.reset();
        self.normalizer.reset();
        self.has_previous = false;
        self.hops = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;
    use tactus_core::hop_count;

    fn pipeline(config: OnsetConfig) -> OnsetPipeline<Vec<OnsetSample>> {
        let mut p = OnsetPipeline::new(config, Vec::new()).unwrap();
        p.start();
        p
    }

    /// Deterministic noise in [-1, 1).
    fn noise(len: usize, seed: u32) -> Vec<f32> {
        let mut state = seed.max(1);
        (0..len)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state as i32 as f32) / (i32::MAX as f32)
            })
            .collect()
    }

    #[test]
    fn test_new_is_idle() {
        let p = OnsetPipeline::new(OnsetConfig::default(), Vec::new()).unwrap();
        assert_eq!(p.state(), PipelineState::Idle);
        assert!(!p.is_listening());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = OnsetConfig::default().with_frame_size(1000);
        let err = OnsetPipeline::new(config, Vec::new()).unwrap_err();
        assert_eq!(err, ConfigError::FrameSizeNotPowerOfTwo(1000));

        let config = OnsetConfig::default().with_hop_size(2048);
        assert!(OnsetPipeline::new(config, Vec::new()).is_err());
    }

    #[test]
    fn test_submit_while_idle_is_rejected() {
        let mut p = OnsetPipeline::new(OnsetConfig::default(), Vec::new()).unwrap();
        assert_eq!(p.submit_block(&[0.0; 4096]), Err(PipelineError::Idle));
        assert_eq!(p.buffered_samples(), 0);
        assert!(p.sink().is_empty());
    }

    #[test]
    fn test_emission_count_matches_hop_formula() {
        let config = OnsetConfig::default();
        for total in [0, 500, 1023, 1024, 1151, 1152, 5000, 48000] {
            let mut p = pipeline(config);
            let signal = noise(total, 7);
            for block in signal.chunks(333) {
                p.submit_block(block).unwrap();
            }
            assert_eq!(
                p.sink().len(),
                hop_count(total, config.frame_size, config.hop_size),
                "total = {total}"
            );
        }
    }

    #[test]
    fn test_first_flux_is_zero_and_hops_are_sequential() {
        let mut p = pipeline(OnsetConfig::default());
        p.submit_block(&noise(8192, 3)).unwrap();
        let out = p.sink();
        assert_eq!(out[0].flux, 0.0);
        assert_eq!(out[0].strength, 0.0);
        for (i, s) in out.iter().enumerate() {
            assert_eq!(s.hop, i as u64);
        }
        assert_eq!(p.hops_processed(), out.len() as u64);
    }

    #[test]
    fn test_static_periodic_signal_has_no_flux() {
        // Period 64 divides the hop, so every frame holds identical samples
        let signal: Vec<f32> = (0..16384)
            .map(|n| (2.0 * PI * (n % 64) as f32 / 64.0).sin() * 0.8)
            .collect();
        let mut p = pipeline(OnsetConfig::default());
        p.submit_block(&signal).unwrap();
        assert!(p.sink().len() > 100);
        for s in p.sink() {
            assert_eq!(s.flux, 0.0, "hop {}", s.hop);
            assert_eq!(s.strength, 0.0);
        }
    }

    #[test]
    fn test_impulse_in_silence_peaks_at_target() {
        let config = OnsetConfig::default();
        let impulse_at = 4096;
        let mut signal = vec![0.0f32; 8192];
        signal[impulse_at] = 1.0;

        let mut p = pipeline(config);
        p.submit_block(&signal).unwrap();

        let contains_impulse = |hop: u64| {
            let start = hop as usize * config.hop_size;
            (start..start + config.frame_size).contains(&impulse_at)
        };

        let out = p.sink();
        let peak = out
            .iter()
            .max_by(|a, b| a.strength.total_cmp(&b.strength))
            .unwrap();
        assert_eq!(peak.strength, config.target_max_flux);
        assert!(contains_impulse(peak.hop));

        for s in out {
            assert!(s.strength >= 0.0 && s.strength <= config.target_max_flux);
            if !contains_impulse(s.hop) {
                assert_eq!(s.strength, 0.0, "hop {} outside the impulse", s.hop);
            }
        }
        // Onset registers on the first frame that sees the impulse
        let first = out.iter().find(|s| s.flux > 0.0).unwrap();
        assert_eq!(first.hop, 25);
        assert_eq!(first.strength, config.target_max_flux);
    }

    #[test]
    fn test_block_boundaries_do_not_matter() {
        let config = OnsetConfig::default().with_frame_size(256).with_hop_size(64);
        let signal = noise(6000, 11);

        let mut whole = pipeline(config);
        whole.submit_block(&signal).unwrap();

        let mut tiny = pipeline(config);
        for block in signal.chunks(1) {
            tiny.submit_block(block).unwrap();
        }

        let mut odd = pipeline(config);
        for block in signal.chunks(317) {
            odd.submit_block(block).unwrap();
        }

        assert_eq!(whole.sink(), tiny.sink());
        assert_eq!(whole.sink(), odd.sink());
    }

    #[test]
    fn test_stop_then_start_resets_state() {
        let mut p = pipeline(OnsetConfig::default());
        p.submit_block(&noise(5000, 5)).unwrap();
        assert!(p.hops_processed() > 0);

        p.stop();
        assert_eq!(p.state(), PipelineState::Idle);
        assert_eq!(p.hops_processed(), 0);
        assert_eq!(p.buffered_samples(), 0);
        // Vec sink clears on session reset
        assert!(p.sink().is_empty());
        assert_eq!(p.submit_block(&[0.5; 2048]), Err(PipelineError::Idle));

        p.start();
        p.submit_block(&noise(2048, 99)).unwrap();
        let first = p.sink()[0];
        assert_eq!(first.hop, 0);
        assert_eq!(first.flux, 0.0);
    }

    #[test]
    fn test_restart_matches_fresh_pipeline() {
        let config = OnsetConfig::default().with_frame_size(512).with_hop_size(128);
        let second = noise(4000, 42);

        let mut reused = pipeline(config);
        reused.submit_block(&noise(3000, 1)).unwrap();
        reused.stop();
        reused.start();
        reused.submit_block(&second).unwrap();

        let mut fresh = pipeline(config);
        fresh.submit_block(&second).unwrap();

        assert_eq!(reused.sink(), fresh.sink());
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        struct Counting(usize);
        impl OnsetSink for Counting {
            fn emit(&mut self, _sample: OnsetSample) {}
            fn session_reset(&mut self) {
                self.0 += 1;
            }
        }

        let mut p = OnsetPipeline::new(OnsetConfig::default(), Counting(0)).unwrap();
        p.stop();
        assert_eq!(p.sink().0, 0);
        p.start();
        p.stop();
        p.stop();
        assert_eq!(p.into_sink().0, 1);
    }

    #[test]
    fn test_abort_clears_without_sink_reset() {
        let mut p = pipeline(OnsetConfig::default());
        p.submit_block(&noise(4096, 7)).unwrap();
        let emitted = p.sink().len();
        assert_eq!(emitted, hop_count(4096, 1024, 128));

        p.abort();
        assert_eq!(p.state(), PipelineState::Idle);
        assert_eq!(p.hops_processed(), 0);
        assert_eq!(p.buffered_samples(), 0);
        // The sink keeps what it had: no reset was sent
        assert_eq!(p.sink().len(), emitted);
        assert_eq!(p.submit_block(&[0.0; 128]), Err(PipelineError::Idle));

        p.abort();
        p.start();
        p.submit_block(&noise(2048, 7)).unwrap();
        assert_eq!(p.sink()[emitted].hop, 0);
        assert_eq!(p.sink()[emitted].flux, 0.0);
    }

    #[test]
    fn test_error_display() {
        assert!(PipelineError::Idle.to_string().contains("idle"));
    }
}
