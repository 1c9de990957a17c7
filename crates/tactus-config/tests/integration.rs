//! Integration tests for tactus-config.
//!
//! Exercise settings files the way the command line uses them: written by
//! hand, found through the lookup order, and turned into pipeline configs.

use std::path::Path;

use tactus_config::{LOCAL_CONFIG_FILE, Settings, SettingsError, paths};
use tactus_core::{OnsetConfig, Window};
use tempfile::tempdir;

#[test]
fn hand_written_file_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(LOCAL_CONFIG_FILE);
    std::fs::write(
        &path,
        r#"
# Tighter hop for fast tempos
[analysis]
frame_size = 2048
hop_size = 256
rolling_window_size = 50
target_max_flux = 10.0
window = "blackman"

[capture]
sample_rate = 44100
buffer_size = 256
channels = 2
"#,
    )
    .unwrap();

    assert_eq!(paths::find_config_file_in(dir.path()), Some(path.clone()));

    let settings = Settings::load(&path).unwrap();
    let config = settings.onset_config().unwrap();
    assert_eq!(
        config,
        OnsetConfig::default()
            .with_frame_size(2048)
            .with_hop_size(256)
            .with_rolling_window_size(50)
            .with_target_max_flux(10.0)
            .with_window(Window::Blackman)
    );
    assert_eq!(settings.capture.channels, 2);

    // Saving and reloading keeps every value
    let copy = dir.path().join("copy.toml");
    settings.save(&copy).unwrap();
    assert_eq!(Settings::load(&copy).unwrap(), settings);
}

#[test]
fn every_window_name_is_accepted() {
    for window in Window::ALL {
        let toml = format!("[analysis]\nwindow = \"{}\"\n", window.name());
        let config = Settings::from_toml(&toml).unwrap().onset_config().unwrap();
        assert_eq!(config.window, window);
    }
}

#[test]
fn invalid_settings_are_reported_not_defaulted() {
    let settings = Settings::from_toml("[analysis]\nhop_size = 4096\n").unwrap();
    let err = settings.onset_config().unwrap_err();
    assert!(matches!(err, SettingsError::Invalid(_)));
    assert!(err.to_string().contains("hop size 4096"), "got: {err}");
}

#[test]
fn unreadable_explicit_path_is_an_error() {
    let err = Settings::load_or_default(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
    assert!(err.to_string().contains("failed to read file"));
}
