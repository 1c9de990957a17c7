//! Settings files for the tactus onset detector.
//!
//! Analysis and capture parameters can be kept in a TOML file instead of
//! being passed on every command line. Missing keys fall back to the
//! built-in defaults, and the `[analysis]` table is validated into an
//! [`OnsetConfig`](tactus_core::OnsetConfig) before use.
//!
//! # Example
//!
//! ```rust,no_run
//! use tactus_config::{Settings, paths};
//!
//! // Explicit file, else ./tactus.toml, else the user config file, else defaults
//! let (settings, source) = Settings::load_or_default(None).unwrap();
//! if let Some(path) = source {
//!     println!("settings from {}", path.display());
//! }
//! let config = settings.onset_config().unwrap();
//!
//! // Persist the current settings for next time
//! settings.save(paths::user_config_path()).unwrap();
//! ```

mod error;
mod settings;

/// Platform-specific settings locations.
pub mod paths;

pub use error::SettingsError;
pub use paths::{LOCAL_CONFIG_FILE, find_config_file, user_config_dir, user_config_path};
pub use settings::{AnalysisSettings, CaptureSettings, Settings};
