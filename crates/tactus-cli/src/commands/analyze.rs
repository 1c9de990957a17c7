//! Offline onset-strength analysis command.

use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tactus_analysis::{DEFAULT_BLOCK_SIZE, analyze_signal, find_peaks};
use tactus_core::{OnsetConfig, OnsetSample};
use tactus_io::{read_wav, read_wav_info};

use super::common::{AnalysisOpts, load_settings, onset_config};

/// Peaks listed in the summary.
const SUMMARY_PEAKS: usize = 10;

/// Track output formats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One row per hop: hop,time,flux,strength
    #[default]
    Csv,
    /// Report object with the track and detected peaks
    Json,
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Write the track here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Track format
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Samples per block fed to the detector
    #[arg(long, default_value_t = DEFAULT_BLOCK_SIZE)]
    block_size: usize,

    /// Minimum strength for a hop to be reported as a peak
    #[arg(long, default_value = "2.5")]
    min_peak: f32,

    #[command(flatten)]
    analysis: AnalysisOpts,
}

/// One hop of the output track.
#[derive(Debug, Clone, Copy, Serialize)]
struct TrackRow {
    hop: u64,
    time: f64,
    flux: f32,
    strength: f32,
}

impl TrackRow {
    fn new(sample: &OnsetSample, config: &OnsetConfig, sample_rate: u32) -> Self {
        Self {
            hop: sample.hop,
            time: sample.time_secs(config.hop_size, sample_rate),
            flux: sample.flux,
            strength: sample.strength,
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    input: String,
    sample_rate: u32,
    duration_secs: f64,
    frame_size: usize,
    hop_size: usize,
    window: &'a str,
    hops: usize,
    peaks: &'a [TrackRow],
    track: &'a [TrackRow],
}

pub fn run(args: AnalyzeArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let settings = load_settings(config_path)?;
    let config = onset_config(&settings, &args.analysis)?;

    let info = read_wav_info(&args.input)?;
    let (samples, spec) = read_wav(&args.input)?;
    tracing::info!(
        input = %args.input.display(),
        sample_rate = spec.sample_rate,
        channels = spec.channels,
        frames = info.num_frames,
        "analyzing"
    );

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner} [{elapsed_precise}] {msg}")?);
    pb.set_message(format!("{} samples", samples.len()));
    pb.enable_steady_tick(Duration::from_millis(100));
    let track = analyze_signal(&samples, &config, args.block_size)?;
    pb.finish_with_message("done");

    let rows: Vec<TrackRow> = track
        .iter()
        .map(|s| TrackRow::new(s, &config, spec.sample_rate))
        .collect();
    let peaks: Vec<TrackRow> = find_peaks(&track, args.min_peak)
        .iter()
        .map(|s| TrackRow::new(s, &config, spec.sample_rate))
        .collect();

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    match args.format {
        OutputFormat::Csv => write_csv(&mut out, &rows)?,
        OutputFormat::Json => {
            let report = Report {
                input: args.input.display().to_string(),
                sample_rate: spec.sample_rate,
                duration_secs: info.duration_secs,
                frame_size: config.frame_size,
                hop_size: config.hop_size,
                window: config.window.name(),
                hops: rows.len(),
                peaks: &peaks,
                track: &rows,
            };
            serde_json::to_writer_pretty(&mut out, &report)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    drop(out);

    // Keep stdout clean for the track when it goes there
    let summary = summary(&args.input, info.duration_secs, &config, rows.len(), &peaks);
    if args.output.is_some() {
        print!("{summary}");
    } else {
        eprint!("{summary}");
    }
    Ok(())
}

fn write_csv<W: Write>(out: &mut W, rows: &[TrackRow]) -> io::Result<()> {
    writeln!(out, "hop,time,flux,strength")?;
    for row in rows {
        writeln!(
            out,
            "{},{:.6},{:.6},{:.6}",
            row.hop, row.time, row.flux, row.strength
        )?;
    }
    Ok(())
}

fn summary(
    input: &Path,
    duration_secs: f64,
    config: &OnsetConfig,
    hops: usize,
    peaks: &[TrackRow],
) -> String {
    let mut text = String::new();
    text.push_str(&format!("Input: {} ({:.2}s)\n", input.display(), duration_secs));
    text.push_str(&format!(
        "Frame: {} samples, hop {}, window {}\n",
        config.frame_size,
        config.hop_size,
        config.window.name()
    ));
    text.push_str(&format!("Hops: {}\n", hops));
    text.push_str(&format!("Peaks: {}\n", peaks.len()));
    for peak in peaks.iter().take(SUMMARY_PEAKS) {
        text.push_str(&format!(
            "  {:>9.3}s  hop {:>6}  strength {:.2}\n",
            peak.time, peak.hop, peak.strength
        ));
    }
    if peaks.len() > SUMMARY_PEAKS {
        text.push_str(&format!("  ... {} more\n", peaks.len() - SUMMARY_PEAKS));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(hop: u64, strength: f32) -> TrackRow {
        TrackRow {
            hop,
            time: hop as f64 * 0.5,
            flux: strength * 2.0,
            strength,
        }
    }

    #[test]
    fn test_csv_layout() {
        let mut out = Vec::new();
        write_csv(&mut out, &[row(0, 0.0), row(1, 5.0)]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "hop,time,flux,strength");
        assert_eq!(lines[1], "0,0.000000,0.000000,0.000000");
        assert_eq!(lines[2], "1,0.500000,10.000000,5.000000");
    }

    #[test]
    fn test_row_time_uses_hop_size() {
        let sample = OnsetSample {
            hop: 375,
            flux: 1.0,
            strength: 2.0,
        };
        let row = TrackRow::new(&sample, &OnsetConfig::default(), 48000);
        assert!((row.time - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_summary_truncates_peaks() {
        let peaks: Vec<_> = (0..15).map(|i| row(i * 10, 5.0)).collect();
        let text = summary(Path::new("in.wav"), 3.0, &OnsetConfig::default(), 1000, &peaks);
        assert!(text.contains("Hops: 1000"));
        assert!(text.contains("Peaks: 15"));
        assert!(text.contains("... 5 more"));
    }
}
