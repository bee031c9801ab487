//! Shared fixtures for the integration tests

use std::path::Path;

use waveform_docs::engine::{synthesize_background, synthesize_speech, write_wav};
use waveform_docs::{DocsConfig, ReferenceAssets};

/// Write the synthetic reference clips into `dir`
pub fn write_assets(dir: &Path) -> ReferenceAssets {
    let assets = ReferenceAssets::in_dir(dir);
    write_wav(&synthesize_speech(6.0, 16000), &assets.speech).unwrap();
    write_wav(&synthesize_background(3.0, 22050, 7), &assets.background_noise).unwrap();
    assets
}

/// A configuration writing into `dir/out`, with assets in `dir/assets`
#[allow(dead_code)]
pub fn temp_config(dir: &Path) -> DocsConfig {
    let asset_dir = dir.join("assets");
    std::fs::create_dir_all(&asset_dir).unwrap();
    DocsConfig::new(dir.join("out"), write_assets(&asset_dir))
}
