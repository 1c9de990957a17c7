//! Error types for settings operations.

use std::path::PathBuf;
use tactus_core::ConfigError;
use thiserror::Error;

/// Errors that can occur while loading, validating or saving settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// The analysis window name is not recognised
    #[error("unknown window '{0}' (expected hamming, hann, blackman or rectangular)")]
    UnknownWindow(String),

    /// The analysis settings describe an invalid pipeline
    #[error("invalid analysis settings: {0}")]
    Invalid(#[from] ConfigError),
}

impl SettingsError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SettingsError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SettingsError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SettingsError::CreateDir {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn mock_io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "mock")
    }

    #[test]
    fn read_file_display() {
        let err = SettingsError::read_file("/a/tactus.toml", mock_io_err());
        let msg = err.to_string();
        assert!(msg.contains("failed to read file"), "got: {msg}");
        assert!(msg.contains("/a/tactus.toml"), "got: {msg}");
        assert!(err.source().is_some(), "ReadFile must expose I/O source");
    }

    #[test]
    fn write_file_factory_produces_correct_variant() {
        let err = SettingsError::write_file("/out/path", mock_io_err());
        assert!(
            matches!(err, SettingsError::WriteFile { ref path, .. } if path == std::path::Path::new("/out/path"))
        );
    }

    #[test]
    fn unknown_window_display() {
        let msg = SettingsError::UnknownWindow("kaiser".into()).to_string();
        assert!(msg.starts_with("unknown window 'kaiser'"), "got: {msg}");
    }

    #[test]
    fn invalid_wraps_config_error() {
        let err = SettingsError::from(ConfigError::RollingWindowTooSmall(0));
        assert!(matches!(err, SettingsError::Invalid(_)));
        assert!(err.to_string().contains("rolling window"));
        assert!(err.source().is_some());
    }
}
