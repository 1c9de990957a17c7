//! Whole-signal onset analysis.
//!
//! Runs one complete pipeline session over an in-memory signal, the way a
//! capture backend would feed it, and collects the emitted samples.

use tactus_core::{ConfigError, OnsetConfig, OnsetSample};

use crate::onset::{OnsetPipeline, PipelineError};

/// Block size used when the caller has no preference.
pub const DEFAULT_BLOCK_SIZE: usize = 512;

/// Onset-strength track of `samples` (mono).
///
/// The signal is fed in `block_size` chunks (a block size of zero is treated
/// as one). The result has one entry per complete hop and does not depend on
/// the block size.
///
/// # Example
///
/// ```rust
/// use tactus_analysis::analyze_signal;
/// use tactus_core::OnsetConfig;
///
/// let signal = vec![0.0f32; 48000];
/// let track = analyze_signal(&signal, &OnsetConfig::default(), 480).unwrap();
/// assert_eq!(track.len(), (48000 - 1024) / 128 + 1);
/// ```
pub fn analyze_signal(
    samples: &[f32],
    config: &OnsetConfig,
    block_size: usize,
) -> Result<Vec<OnsetSample>, ConfigError> {
    let expected = tactus_core::hop_count(samples.len(), config.frame_size, config.hop_size);
    let mut pipeline = OnsetPipeline::new(*config, Vec::with_capacity(expected))?;
    pipeline.start();

    for block in samples.chunks(block_size.max(1)) {
        let submitted = pipeline.submit_block(block);
        debug_assert!(
            !matches!(submitted, Err(PipelineError::Idle)),
            "pipeline left Listening during offline analysis"
        );
    }

    tracing::debug!(
        samples = samples.len(),
        hops = pipeline.hops_processed(),
        "offline analysis complete"
    );
    Ok(pipeline.into_sink())
}

/// Local maxima of the strength track at or above `min_strength`.
///
/// A hop is a peak when its strength is strictly greater than the previous
/// hop's and not less than the next hop's, so a plateau reports its first
/// hop only.
pub fn find_peaks(track: &[OnsetSample], min_strength: f32) -> Vec<OnsetSample> {
    let mut peaks = Vec::new();
    for (i, sample) in track.iter().enumerate() {
        if sample.strength < min_strength {
            continue;
        }
        let prev = if i > 0 { track[i - 1].strength } else { 0.0 };
        let next = track.get(i + 1).map_or(0.0, |s| s.strength);
        if sample.strength > prev && sample.strength >= next {
            peaks.push(*sample);
        }
    }
    peaks
}
