//! Settings file format and operations.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tactus_core::{
    DEFAULT_FRAME_SIZE, DEFAULT_HOP_SIZE, DEFAULT_ROLLING_WINDOW_SIZE, DEFAULT_SPECTRAL_SCALE,
    DEFAULT_TARGET_MAX_FLUX, OnsetConfig, Window,
};

use crate::error::SettingsError;
use crate::paths;

/// Persisted tactus settings.
///
/// Every key is optional; anything missing takes its default.
///
/// # TOML Format
///
/// ```toml
/// [analysis]
/// frame_size = 1024
/// hop_size = 128
/// rolling_window_size = 100
/// target_max_flux = 5.0
/// spectral_scale = 1000.0
/// window = "hamming"
///
/// [capture]
/// device = "USB Audio"
/// sample_rate = 48000
/// buffer_size = 512
/// channels = 1
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Onset-detection parameters.
    pub analysis: AnalysisSettings,
    /// Live capture parameters.
    pub capture: CaptureSettings,
}

/// The `[analysis]` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Samples per analysis frame (power of two).
    pub frame_size: usize,
    /// Samples between consecutive frames.
    pub hop_size: usize,
    /// Flux values kept for normalization.
    pub rolling_window_size: usize,
    /// Value the rolling maximum maps to.
    pub target_max_flux: f32,
    /// Log-power scaling factor.
    pub spectral_scale: f32,
    /// Analysis window by name.
    pub window: String,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            frame_size: DEFAULT_FRAME_SIZE,
            hop_size: DEFAULT_HOP_SIZE,
            rolling_window_size: DEFAULT_ROLLING_WINDOW_SIZE,
            target_max_flux: DEFAULT_TARGET_MAX_FLUX,
            spectral_scale: DEFAULT_SPECTRAL_SCALE,
            window: Window::default().name().to_string(),
        }
    }
}

impl AnalysisSettings {
    /// Build and validate the pipeline configuration these settings describe.
    pub fn to_onset_config(&self) -> Result<OnsetConfig, SettingsError> {
        let window = Window::from_name(&self.window)
            .ok_or_else(|| SettingsError::UnknownWindow(self.window.clone()))?;
        let config = OnsetConfig {
            frame_size: self.frame_size,
            hop_size: self.hop_size,
            rolling_window_size: self.rolling_window_size,
            target_max_flux: self.target_max_flux,
            spectral_scale: self.spectral_scale,
            window,
        };
        config.validate()?;
        Ok(config)
    }
}

impl From<&OnsetConfig> for AnalysisSettings {
    fn from(config: &OnsetConfig) -> Self {
        Self {
            frame_size: config.frame_size,
            hop_size: config.hop_size,
            rolling_window_size: config.rolling_window_size,
            target_max_flux: config.target_max_flux,
            spectral_scale: config.spectral_scale,
            window: config.window.name().to_string(),
        }
    }
}

/// The `[capture]` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CaptureSettings {
    /// Input device name filter; system default when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    /// Requested sample rate in Hz.
    pub sample_rate: u32,
    /// Preferred buffer size in frames.
    pub buffer_size: u32,
    /// Number of input channels (downmixed to mono).
    pub channels: u16,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            device: None,
            sample_rate: 48000,
            buffer_size: 512,
            channels: 1,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| SettingsError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse settings from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save settings to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| SettingsError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| SettingsError::write_file(path, e))?;
        Ok(())
    }

    /// Load from `explicit` if given, else from the first file in the lookup
    /// order, else defaults.
    ///
    /// Returns the settings and the file they came from. An explicit path
    /// that cannot be read is an error; a missing default file is not.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), SettingsError> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => paths::find_config_file(),
        };
        match path {
            Some(path) => Ok((Self::load(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }

    /// Validated pipeline configuration of the `[analysis]` table.
    pub fn onset_config(&self) -> Result<OnsetConfig, SettingsError> {
        self.analysis.to_onset_config()
    }
}
