//! Mathematical utility functions for onset analysis.
//!
//! All functions are allocation-free and suitable for `no_std`.
//!
//! - [`power_to_log`] - Power to the scaled logarithmic spectrum domain
//! - [`mono_sum`] - Interleaved multi-channel to mono downmix
//! - [`hop_count`] - Number of complete frames in a run of samples

use libm::log10f;

/// Convert a power value to the scaled log domain used for spectra.
///
/// Computes `20 * scale * log10(power + 1)`. The `+ 1` keeps silence at
/// exactly zero instead of `-inf`, and keeps the result non-negative for any
/// non-negative power. The scale is a tuning constant, not a physical unit;
/// what matters is that the mapping is monotonic and identical run to run.
///
/// # Example
/// ```rust
/// use tactus_core::power_to_log;
///
/// assert_eq!(power_to_log(0.0, 1000.0), 0.0);
/// assert!((power_to_log(9.0, 1.0) - 20.0).abs() < 1e-4);
/// ```
#[inline]
pub fn power_to_log(power: f32, scale: f32) -> f32 {
    20.0 * scale * log10f(power + 1.0)
}

/// Downmix interleaved samples to mono by averaging each frame's channels.
///
/// Writes `interleaved.len() / channels` samples into `out` and returns that
/// count. A trailing partial frame is ignored. `channels == 1` is a straight
/// copy.
///
/// # Example
/// ```rust
/// use tactus_core::mono_sum;
///
/// let mut out = [0.0; 2];
/// let n = mono_sum(&[0.5, 0.3, 0.4, 0.2], 2, &mut out);
/// assert_eq!(n, 2);
/// assert!((out[0] - 0.4).abs() < 1e-6);
/// ```
pub fn mono_sum(interleaved: &[f32], channels: usize, out: &mut [f32]) -> usize {
    let channels = channels.max(1);
    let frames = (interleaved.len() / channels).min(out.len());
    if channels == 1 {
        out[..frames].copy_from_slice(&interleaved[..frames]);
        return frames;
    }
    let inv = 1.0 / channels as f32;
    for (dst, chunk) in out[..frames]
        .iter_mut()
        .zip(interleaved.chunks_exact(channels))
    {
        *dst = chunk.iter().sum::<f32>() * inv;
    }
    frames
}

/// Number of complete frames extractable from `total_samples` samples.
///
/// `floor((total - frame_size) / hop_size) + 1` once `total >= frame_size`,
/// otherwise zero.
///
/// # Example
/// ```rust
/// use tactus_core::hop_count;
///
/// assert_eq!(hop_count(1023, 1024, 128), 0);
/// assert_eq!(hop_count(1024, 1024, 128), 1);
/// assert_eq!(hop_count(2048, 1024, 128), 9);
/// ```
#[inline]
pub fn hop_count(total_samples: usize, frame_size: usize, hop_size: usize) -> usize {
    if total_samples < frame_size || hop_size == 0 {
        return 0;
    }
    (total_samples - frame_size) / hop_size + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_to_log_monotonic() {
        let mut prev = power_to_log(0.0, 1000.0);
        assert_eq!(prev, 0.0);
        for p in [1e-6, 1e-3, 0.1, 1.0, 10.0, 1e4] {
            let v = power_to_log(p, 1000.0);
            assert!(v > prev, "power_to_log should be increasing at {p}");
            prev = v;
        }
    }

    #[test]
    fn test_power_to_log_scale_is_linear() {
        let a = power_to_log(3.0, 1.0);
        let b = power_to_log(3.0, 1000.0);
        assert!((b / a - 1000.0).abs() < 0.01);
    }

    #[test]
    fn test_mono_sum_passthrough() {
        let input = [0.1, 0.2, 0.3];
        let mut out = [0.0; 3];
        assert_eq!(mono_sum(&input, 1, &mut out), 3);
        assert_eq!(out, input);
    }

    #[test]
    fn test_mono_sum_averages_channels() {
        let input = [1.0, 0.0, 0.5, 0.5, -1.0, 1.0];
        let mut out = [9.0; 3];
        assert_eq!(mono_sum(&input, 2, &mut out), 3);
        assert_eq!(out, [0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_mono_sum_ignores_partial_frame_and_short_output() {
        let input = [1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 3.0];
        let mut out = [0.0; 4];
        assert_eq!(mono_sum(&input, 3, &mut out), 2);

        let mut short = [0.0; 1];
        assert_eq!(mono_sum(&input, 3, &mut short), 1);
        assert_eq!(short[0], 1.0);
    }

    #[test]
    fn test_hop_count_formula() {
        assert_eq!(hop_count(0, 1024, 128), 0);
        assert_eq!(hop_count(1024 + 127, 1024, 128), 1);
        assert_eq!(hop_count(1024 + 128, 1024, 128), 2);
        assert_eq!(hop_count(10, 4, 4), 2);
        assert_eq!(hop_count(10, 4, 0), 0);
    }
}
