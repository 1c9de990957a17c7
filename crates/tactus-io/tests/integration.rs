//! Integration tests for tactus-io.
//!
//! Run full capture sessions against the mock backend and check the
//! consumer-facing stream against offline analysis of the same signal.

use std::time::Duration;

use tactus_analysis::analyze_signal;
use tactus_core::{OnsetConfig, hop_count};
use tactus_io::{
    AudioBackend, CaptureConfig, CaptureSession, Error, MockBackend, OnsetStream, WavSpec,
    read_wav, write_wav,
};
use tempfile::NamedTempFile;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Decaying clicks every `interval` samples.
fn clicks(len: usize, interval: usize) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let k = i % interval;
            if k < 100 {
                (-(k as f32) / 20.0).exp() * if k % 2 == 0 { 1.0 } else { -1.0 }
            } else {
                0.0
            }
        })
        .collect()
}

fn drain(stream: &mut OnsetStream, count: usize) {
    let mut spins = 0;
    while stream.len() < count {
        stream.poll_timeout(Duration::from_millis(50));
        spins += 1;
        assert!(spins < 400, "timed out at {} of {count} samples", stream.len());
    }
}

// ===========================================================================
// 1. Live session vs. offline analysis
// ===========================================================================

#[test]
fn live_session_matches_offline_analysis() {
    let signal = clicks(96000, 12000);
    let config = OnsetConfig::default();
    let expected = analyze_signal(&signal, &config, 512).unwrap();

    let capture = CaptureConfig {
        buffer_size: 441,
        ..Default::default()
    };
    let (mut session, mut stream) =
        CaptureSession::new(MockBackend::new(signal.clone()), config, capture).unwrap();
    session.start().unwrap();
    drain(&mut stream, expected.len());

    assert_eq!(stream.len(), hop_count(signal.len(), 1024, 128));
    assert_eq!(stream.samples(), expected.as_slice());

    // The counter is published after the block's samples are sent
    let mut spins = 0;
    while session.hops_processed() < expected.len() as u64 && spins < 1000 {
        std::thread::sleep(Duration::from_millis(1));
        spins += 1;
    }
    assert_eq!(session.hops_processed(), expected.len() as u64);
    session.stop().unwrap();
}

#[test]
fn restart_produces_identical_session() {
    let signal = clicks(30000, 5000);
    let config = OnsetConfig::default();
    let (mut session, mut stream) = CaptureSession::new(
        MockBackend::new(signal.clone()),
        config,
        CaptureConfig::default(),
    )
    .unwrap();

    let expected = hop_count(signal.len(), config.frame_size, config.hop_size);

    session.start().unwrap();
    drain(&mut stream, expected);
    let first = stream.samples().to_vec();
    session.stop().unwrap();

    stream.poll();
    assert!(stream.is_empty(), "stop clears the consumer history");

    session.start().unwrap();
    drain(&mut stream, expected);
    assert_eq!(stream.samples(), first.as_slice());
    assert_eq!(stream.samples()[0].flux, 0.0);
    assert_eq!(stream.resets(), 1);
}

#[test]
fn producer_error_surfaces_from_start() {
    let (mut session, _stream) = CaptureSession::new(
        MockBackend::unavailable(),
        OnsetConfig::default(),
        CaptureConfig::default(),
    )
    .unwrap();
    let err = session.start().unwrap_err();
    assert!(matches!(err, Error::NoDevice));
    assert!(err.to_string().contains("No audio input device"));
    assert!(!session.is_listening());

    // A boxed backend works the same way
    let backend: Box<dyn AudioBackend> = Box::new(MockBackend::new(vec![0.0; 2048]));
    let (mut session, mut stream) =
        CaptureSession::new(backend, OnsetConfig::default(), CaptureConfig::default()).unwrap();
    session.start().unwrap();
    drain(&mut stream, 9);
}

// ===========================================================================
// 2. WAV round trip into analysis
// ===========================================================================

#[test]
fn wav_file_analysis_matches_in_memory() {
    let signal = clicks(48000, 6000);
    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &signal, WavSpec::mono_float(48000)).unwrap();

    let (loaded, spec) = read_wav(file.path()).unwrap();
    assert_eq!(spec.sample_rate, 48000);

    let config = OnsetConfig::default();
    assert_eq!(
        analyze_signal(&loaded, &config, 1024).unwrap(),
        analyze_signal(&signal, &config, 1024).unwrap()
    );
}
