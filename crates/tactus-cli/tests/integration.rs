//! End-to-end tests of the `tactus` binary.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn tactus(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tactus"))
        .args(args)
        .current_dir(dir)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run tactus")
}

fn ok(output: &Output) -> String {
    assert!(
        output.status.success(),
        "tactus failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

/// Two seconds of clicks at 120 BPM, written into `dir`.
fn click_file(dir: &TempDir) -> String {
    let path = dir.path().join("clicks.wav");
    let path = path.to_str().unwrap().to_string();
    ok(&tactus(
        dir.path(),
        &["generate", "click", "-o", &path, "--bpm", "120", "--duration", "2"],
    ));
    path
}

#[test]
fn help_lists_commands() {
    let dir = TempDir::new().unwrap();
    let stdout = ok(&tactus(dir.path(), &["--help"]));
    for command in ["analyze", "listen", "devices", "generate"] {
        assert!(stdout.contains(command), "missing {command} in help");
    }
}

#[test]
fn analyze_click_track_csv() {
    let dir = TempDir::new().unwrap();
    let input = click_file(&dir);

    let output = tactus(dir.path(), &["analyze", &input]);
    let stdout = ok(&output);
    let mut lines = stdout.lines();
    assert_eq!(lines.next(), Some("hop,time,flux,strength"));

    // 96000 samples, frame 1024, hop 128
    let rows: Vec<Vec<f64>> = lines
        .map(|l| l.split(',').map(|v| v.parse().unwrap()).collect())
        .collect();
    assert_eq!(rows.len(), 743);
    assert_eq!(rows[0][2], 0.0);
    assert!(rows.iter().all(|r| r[3] >= 0.0 && r[3] <= 5.0 + 1e-4));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Hops: 743"), "{stderr}");
}

#[test]
fn analyze_json_report_to_file() {
    let dir = TempDir::new().unwrap();
    let input = click_file(&dir);
    let report_path = dir.path().join("report.json");

    let stdout = ok(&tactus(
        dir.path(),
        &[
            "analyze",
            &input,
            "--format",
            "json",
            "-o",
            report_path.to_str().unwrap(),
        ],
    ));
    assert!(stdout.contains("Peaks:"));

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["sample_rate"], 48000);
    assert_eq!(report["hop_size"], 128);
    assert_eq!(report["window"], "hamming");
    assert_eq!(report["track"].as_array().unwrap().len(), 743);

    // Clicks at 0.5 s intervals: later peaks fall near a beat
    let peaks = report["peaks"].as_array().unwrap();
    assert!(!peaks.is_empty());
    for peak in peaks.iter().filter(|p| p["time"].as_f64().unwrap() > 0.2) {
        let time = peak["time"].as_f64().unwrap();
        let offset = (time + 1024.0 / 48000.0) % 0.5;
        assert!(offset < 0.05 || offset > 0.45, "peak at {time}s is off-beat");
    }
}

#[test]
fn config_file_and_flag_overrides() {
    let dir = TempDir::new().unwrap();
    let input = click_file(&dir);
    let config = dir.path().join("custom.toml");
    std::fs::write(&config, "[analysis]\nhop_size = 256\nwindow = \"hann\"\n").unwrap();

    let json = ok(&tactus(
        dir.path(),
        &["--config", config.to_str().unwrap(), "analyze", &input, "--format", "json"],
    ));
    let report: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(report["hop_size"], 256);
    assert_eq!(report["window"], "hann");

    let json = ok(&tactus(
        dir.path(),
        &[
            "--config",
            config.to_str().unwrap(),
            "analyze",
            &input,
            "--format",
            "json",
            "--hop-size",
            "512",
        ],
    ));
    let report: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(report["hop_size"], 512);
}

#[test]
fn local_settings_file_is_picked_up() {
    let dir = TempDir::new().unwrap();
    let input = click_file(&dir);
    std::fs::write(dir.path().join("tactus.toml"), "[analysis]\nframe_size = 2048\n").unwrap();

    let json = ok(&tactus(dir.path(), &["analyze", &input, "--format", "json"]));
    let report: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(report["frame_size"], 2048);
}

#[test]
fn silence_has_zero_strength() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("silence.wav");
    let path = path.to_str().unwrap();
    ok(&tactus(dir.path(), &["generate", "silence", "-o", path, "--duration", "0.5"]));

    let stdout = ok(&tactus(dir.path(), &["analyze", path]));
    let strengths: Vec<f64> = stdout
        .lines()
        .skip(1)
        .map(|l| l.rsplit(',').next().unwrap().parse().unwrap())
        .collect();
    assert!(!strengths.is_empty());
    assert!(strengths.iter().all(|&s| s == 0.0));
}

#[test]
fn invalid_geometry_is_an_error() {
    let dir = TempDir::new().unwrap();
    let input = click_file(&dir);

    let output = tactus(dir.path(), &["analyze", &input, "--frame-size", "1000"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("power of two"), "{stderr}");
}

#[test]
fn missing_input_is_an_error() {
    let dir = TempDir::new().unwrap();
    let output = tactus(dir.path(), &["analyze", "does-not-exist.wav"]);
    assert!(!output.status.success());
}

#[test]
fn missing_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    let input = click_file(&dir);
    let output = tactus(
        dir.path(),
        &["--config", "nowhere.toml", "analyze", &input],
    );
    assert!(!output.status.success());
}
