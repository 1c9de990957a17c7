//! Test signal generation command.

use clap::{Args, Subcommand};
use std::f32::consts::TAU;
use std::path::PathBuf;
use tactus_io::{WavSpec, write_wav};

/// Click length in seconds.
const CLICK_SECS: f32 = 0.01;
/// Click carrier frequency in Hz.
const CLICK_FREQ: f32 = 2000.0;

#[derive(Args)]
pub struct GenerateArgs {
    #[command(subcommand)]
    command: GenerateCommand,
}

#[derive(Subcommand)]
enum GenerateCommand {
    /// Generate a click track (one decaying burst per beat)
    Click {
        /// Output WAV file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Beats per minute
        #[arg(long, default_value = "120.0")]
        bpm: f32,

        /// Duration in seconds
        #[arg(long, default_value = "4.0")]
        duration: f32,

        /// Sample rate
        #[arg(long, default_value = "48000")]
        sample_rate: u32,

        /// Amplitude (0-1)
        #[arg(long, default_value = "0.8")]
        amplitude: f32,
    },

    /// Generate a steady sine tone
    Sine {
        /// Output WAV file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Frequency in Hz
        #[arg(long, default_value = "440.0")]
        freq: f32,

        /// Duration in seconds
        #[arg(long, default_value = "2.0")]
        duration: f32,

        /// Sample rate
        #[arg(long, default_value = "48000")]
        sample_rate: u32,

        /// Amplitude (0-1)
        #[arg(long, default_value = "0.5")]
        amplitude: f32,
    },

    /// Generate digital silence
    Silence {
        /// Output WAV file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Duration in seconds
        #[arg(long, default_value = "1.0")]
        duration: f32,

        /// Sample rate
        #[arg(long, default_value = "48000")]
        sample_rate: u32,
    },
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    let (output, samples, sample_rate, description) = match args.command {
        GenerateCommand::Click {
            output,
            bpm,
            duration,
            sample_rate,
            amplitude,
        } => {
            if !(bpm > 0.0 && bpm.is_finite()) {
                anyhow::bail!("BPM must be positive, got {bpm}");
            }
            let len = sample_count(duration, sample_rate)?;
            let samples = click_track(len, sample_rate, bpm, amplitude);
            (output, samples, sample_rate, format!("click track at {bpm} BPM"))
        }
        GenerateCommand::Sine {
            output,
            freq,
            duration,
            sample_rate,
            amplitude,
        } => {
            let len = sample_count(duration, sample_rate)?;
            let samples = sine(len, sample_rate, freq, amplitude);
            (output, samples, sample_rate, format!("{freq} Hz sine"))
        }
        GenerateCommand::Silence {
            output,
            duration,
            sample_rate,
        } => {
            let len = sample_count(duration, sample_rate)?;
            (output, vec![0.0; len], sample_rate, "silence".to_string())
        }
    };

    write_wav(&output, &samples, WavSpec::mono_float(sample_rate))?;
    println!(
        "Generated {} ({:.2}s) -> {}",
        description,
        samples.len() as f32 / sample_rate as f32,
        output.display()
    );
    Ok(())
}

fn sample_count(duration: f32, sample_rate: u32) -> anyhow::Result<usize> {
    if !(duration > 0.0 && duration.is_finite()) {
        anyhow::bail!("Duration must be positive, got {duration}");
    }
    if sample_rate == 0 {
        anyhow::bail!("Sample rate must be positive");
    }
    Ok((duration * sample_rate as f32) as usize)
}

/// Click track of `len` samples with a burst starting on every beat.
fn click_track(len: usize, sample_rate: u32, bpm: f32, amplitude: f32) -> Vec<f32> {
    let sr = sample_rate as f32;
    let beat = ((60.0 / bpm) * sr).round().max(1.0) as usize;
    let click_len = (CLICK_SECS * sr) as usize;
    let decay = click_len as f32 / 5.0;

    (0..len)
        .map(|i| {
            let k = i % beat;
            if k < click_len {
                let t = k as f32 / sr;
                amplitude * (-(k as f32) / decay).exp() * (TAU * CLICK_FREQ * t).sin()
            } else {
                0.0
            }
        })
        .collect()
}

fn sine(len: usize, sample_rate: u32, freq: f32, amplitude: f32) -> Vec<f32> {
    let sr = sample_rate as f32;
    (0..len)
        .map(|i| amplitude * (TAU * freq * i as f32 / sr).sin())
        .collect()
}
