//! Reference Asset Generator
//!
//! Synthesizes the two reference clips every documentation example starts
//! from, so the tool runs without downloading recordings.
//!
//! Usage: cargo run --example generate_fixtures

use std::fs;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use waveform_docs::config::EXAMPLE_SAMPLE_RATE;
use waveform_docs::engine::{synthesize_background, synthesize_speech, write_wav};
use waveform_docs::DocsConfig;

/// Longer than the example window so the crop is exercised
const SPEECH_SECS: f32 = 6.0;

const BACKGROUND_SECS: f32 = 8.0;

/// Recorded at a different rate so loading resamples it
const BACKGROUND_SAMPLE_RATE: u32 = 44100;

const BACKGROUND_SEED: u64 = 7;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let assets = DocsConfig::fixed().assets;
    if let Some(dir) = assets.speech.parent() {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let speech = synthesize_speech(SPEECH_SECS, EXAMPLE_SAMPLE_RATE);
    write_wav(&speech, &assets.speech)
        .with_context(|| format!("writing {}", assets.speech.display()))?;
    info!(seconds = speech.duration_secs(), "wrote {}", assets.speech.display());

    let background = synthesize_background(BACKGROUND_SECS, BACKGROUND_SAMPLE_RATE, BACKGROUND_SEED);
    write_wav(&background, &assets.background_noise)
        .with_context(|| format!("writing {}", assets.background_noise.display()))?;
    info!(
        seconds = background.duration_secs(),
        "wrote {}",
        assets.background_noise.display()
    );

    Ok(())
}
