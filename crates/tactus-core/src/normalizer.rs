//! Rolling-maximum normalization of spectral flux.
//!
//! Absolute flux depends on input gain, microphone sensitivity and the noise
//! floor, so no fixed threshold works across setups. [`AdaptiveNormalizer`]
//! self-calibrates instead: each flux value is divided by the largest flux seen
//! in a trailing window and scaled to a fixed target. The scale follows the
//! window and is therefore not globally stable; a loud hit raises the ceiling
//! only until it ages out.

#[cfg(not(feature = "std"))]
use alloc::collections::VecDeque;
#[cfg(feature = "std")]
use std::collections::VecDeque;

/// Maximum used when the history is empty.
const EMPTY_HISTORY_MAX: f32 = 1.0;

/// Scales flux against the maximum of a bounded FIFO history.
///
/// # Example
///
/// ```rust
/// use tactus_core::AdaptiveNormalizer;
///
/// let mut norm = AdaptiveNormalizer::new(3, 5.0);
/// assert_eq!(norm.normalize(2.0), 5.0);  // new maximum
/// assert_eq!(norm.normalize(1.0), 2.5);  // half of the max
/// assert_eq!(norm.normalize(1.0), 2.5);
/// assert_eq!(norm.normalize(0.5), 2.5);  // 2.0 aged out, max is now 1.0
/// ```
#[derive(Debug, Clone)]
pub struct AdaptiveNormalizer {
    history: VecDeque<f32>,
    capacity: usize,
    target_max: f32,
}

impl AdaptiveNormalizer {
    /// Create a normalizer keeping `capacity` values (at least one) and
    /// mapping the rolling maximum to `target_max`.
    pub fn new(capacity: usize, target_max: f32) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: VecDeque::with_capacity(capacity),
            capacity,
            target_max,
        }
    }

    /// Record `flux` and return it rescaled against the rolling maximum.
    ///
    /// The oldest entry is evicted first when the history is full, so the
    /// history never exceeds its capacity. Because `flux` is recorded before
    /// the maximum is taken, the result lies in `[0, target_max]` for any
    /// non-negative input; a flux that sets a new maximum maps to exactly
    /// `target_max`. A rolling maximum of zero (silence, or the first hop of
    /// a session) maps to `0.0`.
    pub fn normalize(&mut self, flux: f32) -> f32 {
        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(flux);

        let rolling_max = self.rolling_max();
        if rolling_max <= 0.0 {
            return 0.0;
        }
        (flux / rolling_max) * self.target_max
    }

    /// Largest value in the history, or `1.0` if the history is empty.
    pub fn rolling_max(&self) -> f32 {
        if self.history.is_empty() {
            return EMPTY_HISTORY_MAX;
        }
        self.history.iter().copied().fold(0.0, f32::max)
    }

    /// Number of values currently held.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Whether no flux has been recorded since creation or the last reset.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Maximum number of values held.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Value the rolling maximum maps to.
    pub fn target_max(&self) -> f32 {
        self.target_max
    }

    /// Recorded values, oldest first.
    pub fn history(&self) -> impl Iterator<Item = f32> + '_ {
        self.history.iter().copied()
    }

    /// Forget all recorded values.
    pub fn reset(&mut self) {
        self.history.clear();
    }
}
