//! Spectral flux between consecutive spectra.

/// Half-wave rectified spectral flux.
///
/// Sums `current[i] - previous[i]` over all bins where the difference is
/// positive. Only energy increases count: onsets are attacks, and a decaying
/// note must not register. The result is always `>= 0`.
///
/// `previous` is `None` for the first frame of a session, which yields `0.0`.
/// If the two spectra differ in length only the common prefix is compared.
///
/// # Example
///
/// ```rust
/// use tactus_core::spectral_flux;
///
/// let prev = [1.0, 5.0, 2.0];
/// let curr = [3.0, 1.0, 2.5];
/// // (3 - 1) + (2.5 - 2); the drop in bin 1 is ignored
/// assert_eq!(spectral_flux(&curr, Some(&prev)), 2.5);
/// assert_eq!(spectral_flux(&curr, None), 0.0);
/// ```
#[inline]
pub fn spectral_flux(current: &[f32], previous: Option<&[f32]>) -> f32 {
    let Some(previous) = previous else {
        return 0.0;
    };
    current
        .iter()
        .zip(previous.iter())
        .map(|(&cur, &prev)| {
            let diff = cur - prev;
            if diff > 0.0 { diff } else { 0.0 }
        })
        .sum()
}
