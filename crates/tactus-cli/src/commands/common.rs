//! Shared argument groups and settings resolution.

use clap::Args;
use std::path::Path;
use tactus_config::{AnalysisSettings, Settings};
use tactus_core::OnsetConfig;

/// Analysis overrides accepted by every command that runs the detector.
///
/// Each flag replaces the matching `[analysis]` key of the settings file.
#[derive(Args, Debug, Default, Clone)]
pub struct AnalysisOpts {
    /// Samples per analysis frame (power of two)
    #[arg(long)]
    pub frame_size: Option<usize>,

    /// Samples between consecutive frames
    #[arg(long)]
    pub hop_size: Option<usize>,

    /// Number of flux values used for normalization
    #[arg(long)]
    pub window_size: Option<usize>,

    /// Strength assigned to the recent maximum flux
    #[arg(long)]
    pub target_max: Option<f32>,

    /// Log-power scaling factor
    #[arg(long)]
    pub scale: Option<f32>,

    /// Analysis window (hamming, hann, blackman, rectangular)
    #[arg(long)]
    pub window: Option<String>,
}

impl AnalysisOpts {
    /// Overwrite the keys of `settings` that were given on the command line.
    pub fn apply(&self, settings: &mut AnalysisSettings) {
        if let Some(frame_size) = self.frame_size {
            settings.frame_size = frame_size;
        }
        if let Some(hop_size) = self.hop_size {
            settings.hop_size = hop_size;
        }
        if let Some(window_size) = self.window_size {
            settings.rolling_window_size = window_size;
        }
        if let Some(target) = self.target_max {
            settings.target_max_flux = target;
        }
        if let Some(scale) = self.scale {
            settings.spectral_scale = scale;
        }
        if let Some(window) = &self.window {
            settings.window.clone_from(window);
        }
    }
}

/// Load the settings file named on the command line, or the default one.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let (settings, source) = Settings::load_or_default(path)?;
    match source {
        Some(source) => tracing::info!(path = %source.display(), "loaded settings"),
        None => tracing::debug!("no settings file, using defaults"),
    }
    Ok(settings)
}

/// Validated onset configuration: settings file with command-line overrides.
pub fn onset_config(settings: &Settings, opts: &AnalysisOpts) -> anyhow::Result<OnsetConfig> {
    let mut analysis = settings.analysis.clone();
    opts.apply(&mut analysis);
    Ok(analysis.to_onset_config()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactus_core::Window;

    #[test]
    fn test_no_overrides_keeps_settings() {
        let settings = Settings::from_toml("[analysis]\nhop_size = 256").unwrap();
        let config = onset_config(&settings, &AnalysisOpts::default()).unwrap();
        assert_eq!(config.hop_size, 256);
        assert_eq!(config.frame_size, 1024);
    }

    #[test]
    fn test_flags_override_file() {
        let settings = Settings::from_toml("[analysis]\nhop_size = 256\nwindow = \"hann\"").unwrap();
        let opts = AnalysisOpts {
            hop_size: Some(64),
            window: Some("blackman".into()),
            target_max: Some(1.0),
            ..Default::default()
        };
        let config = onset_config(&settings, &opts).unwrap();
        assert_eq!(config.hop_size, 64);
        assert_eq!(config.window, Window::Blackman);
        assert_eq!(config.target_max_flux, 1.0);
    }

    #[test]
    fn test_invalid_override_is_error() {
        let opts = AnalysisOpts {
            frame_size: Some(1000),
            ..Default::default()
        };
        assert!(onset_config(&Settings::default(), &opts).is_err());
    }
}
