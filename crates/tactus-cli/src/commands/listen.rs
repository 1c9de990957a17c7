//! Live onset detection command.

use clap::Args;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tactus_io::{CaptureConfig, CaptureSession, CpalBackend};

use super::common::{AnalysisOpts, load_settings, onset_config};

/// Width of the strength meter in characters.
const METER_WIDTH: usize = 40;

#[derive(Args)]
pub struct ListenArgs {
    /// Input device (name substring, default: system default)
    #[arg(short, long)]
    device: Option<String>,

    /// Sample rate in Hz
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Buffer size in frames
    #[arg(long)]
    buffer_size: Option<u32>,

    /// Input channel count (downmixed to mono)
    #[arg(long)]
    channels: Option<u16>,

    /// Stop after this many seconds (default: run until Ctrl+C)
    #[arg(long)]
    duration: Option<f32>,

    /// Strength a hop must rise through to count as an onset
    #[arg(long, default_value = "2.5")]
    threshold: f32,

    #[command(flatten)]
    analysis: AnalysisOpts,
}

pub fn run(args: ListenArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let settings = load_settings(config_path)?;
    let onset = onset_config(&settings, &args.analysis)?;

    let limit = match args.duration {
        Some(secs) if secs > 0.0 && secs.is_finite() => Some(Duration::from_secs_f32(secs)),
        Some(secs) => anyhow::bail!("Duration must be positive, got {secs}"),
        None => None,
    };

    let capture = CaptureConfig {
        sample_rate: args.sample_rate.unwrap_or(settings.capture.sample_rate),
        buffer_size: args.buffer_size.unwrap_or(settings.capture.buffer_size),
        channels: args.channels.unwrap_or(settings.capture.channels),
        device_name: args.device.or(settings.capture.device),
    };

    println!("Listening for onsets");
    println!("====================\n");
    println!(
        "Device: {}",
        capture.device_name.as_deref().unwrap_or("(default)")
    );
    println!(
        "Sample rate: {} Hz, {} ch, buffer {}",
        capture.sample_rate, capture.channels, capture.buffer_size
    );
    println!(
        "Frame {} / hop {} ({:.1} hops/s)",
        onset.frame_size,
        onset.hop_size,
        onset.hops_per_second(capture.sample_rate)
    );
    println!("\nPress Ctrl+C to stop\n");

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        println!("\nStopping...");
        r.store(false, Ordering::SeqCst);
    })?;

    let target = onset.target_max_flux;
    let (mut session, mut stream) = CaptureSession::new(CpalBackend::new(), onset, capture)?;
    session.start()?;

    let started = Instant::now();
    let mut seen = 0;
    let mut previous = 0.0f32;
    let mut onsets = 0u64;
    let mut stdout = std::io::stdout();

    while running.load(Ordering::SeqCst) {
        if limit.is_some_and(|limit| started.elapsed() >= limit) {
            break;
        }
        if stream.poll_timeout(Duration::from_millis(50)) == 0 {
            continue;
        }

        for sample in &stream.samples()[seen..] {
            if previous < args.threshold && sample.strength >= args.threshold {
                onsets += 1;
            }
            previous = sample.strength;
        }
        seen = stream.len();

        if let Some(latest) = stream.latest() {
            print!(
                "\r{} {:5.2}  onsets {:<6}",
                render_meter(latest.strength, target, METER_WIDTH),
                latest.strength,
                onsets
            );
            stdout.flush()?;
        }
    }

    let hops = session.hops_processed();
    let rejected = session.rejected_blocks();
    session.stop()?;

    println!();
    println!(
        "Captured {} hops in {:.1}s: {} onsets ({} blocks rejected)",
        hops,
        started.elapsed().as_secs_f32(),
        onsets,
        rejected
    );
    Ok(())
}

/// Horizontal bar for `strength` on a `0..=max` scale.
fn render_meter(strength: f32, max: f32, width: usize) -> String {
    let fraction = if max > 0.0 {
        (strength / max).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = ((fraction * width as f32).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
