//! Pipeline Tests
//!
//! End-to-end tests for example generation, figure layout and export.

mod common;

use std::fs;
use std::path::Path;

use approx::assert_relative_eq;
use pretty_assertions::assert_eq;
use tempfile::tempdir;
use test_case::test_case;

use waveform_docs::engine::read_wav;
use waveform_docs::render::FigureSpec;
use waveform_docs::{Driver, DriverState, ExampleRegistry};

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// === Generation ===

#[test_case("AddBackgroundNoise")]
#[test_case("AddGaussianNoise")]
#[test_case("RoomSimulator")]
#[test_case("SevenBandParametricEQ")]
#[test_case("Shift")]
#[test_case("TanhDistortion")]
#[test_case("TimeStretch")]
#[test_case("Trim")]
fn test_generation_is_deterministic(identifier: &str) {
    let dir = tempdir().unwrap();
    let assets = common::write_assets(dir.path());
    let registry = ExampleRegistry::with_defaults();
    let descriptor = registry.lookup(identifier).unwrap();

    let first = descriptor.generate(&assets).unwrap();
    let second = descriptor.generate(&assets).unwrap();

    assert_eq!(first.sample_rate(), 16000);
    assert_eq!(first.original().sample_rate(), first.transformed().sample_rate());
    assert_eq!(first.original().num_samples(), 75200);
    assert!(first.transformed().is_finite());
    assert!(first == second, "{} is not reproducible", identifier);
}

#[test_case("AddGaussianNoise")]
#[test_case("SevenBandParametricEQ")]
#[test_case("Shift")]
#[test_case("TanhDistortion")]
fn test_transform_changes_the_signal(identifier: &str) {
    let dir = tempdir().unwrap();
    let assets = common::write_assets(dir.path());
    let pair = ExampleRegistry::with_defaults()
        .lookup(identifier)
        .unwrap()
        .generate(&assets)
        .unwrap();
    assert!(pair.original() != pair.transformed());
}

#[test]
fn test_trim_scenario() {
    let dir = tempdir().unwrap();
    let assets = common::write_assets(dir.path());
    let pair = ExampleRegistry::with_defaults()
        .lookup("trim")
        .unwrap()
        .generate(&assets)
        .unwrap();

    assert_eq!(pair.sample_rate(), 16000);
    assert!(pair.transformed().num_samples() <= pair.original().num_samples());
    // The clip opens with 0.4 s of silence
    assert!(pair.transformed().num_samples() < pair.original().num_samples());
}

#[test]
fn test_room_simulator_adds_tail() {
    let dir = tempdir().unwrap();
    let assets = common::write_assets(dir.path());
    let pair = ExampleRegistry::with_defaults()
        .lookup("RoomSimulator")
        .unwrap()
        .generate(&assets)
        .unwrap();
    assert_eq!(pair.transformed().num_samples(), 75200 + 8000);
}

// === Figure layout ===

#[test]
fn test_figure_axes_are_aligned() {
    let dir = tempdir().unwrap();
    let assets = common::write_assets(dir.path());
    let pair = ExampleRegistry::with_defaults()
        .lookup("TanhDistortion")
        .unwrap()
        .generate(&assets)
        .unwrap();
    let spec = FigureSpec::compute(&pair).unwrap();

    let peak = pair.original().peak().max(pair.transformed().peak());
    assert_relative_eq!(spec.ylim, 1.1 * peak, epsilon = 1e-6);
    for panel in &spec.waveforms {
        assert_eq!(panel.y_range, (-spec.ylim, spec.ylim));
        assert!(panel.time_ticks.len() <= 5);
    }
    assert_relative_eq!(spec.color_scale.vmax - spec.color_scale.vmin, 85.0);
    assert_relative_eq!(spec.freq_max, 8000.0);
}

#[test]
fn test_figure_columns_follow_lengths() {
    let dir = tempdir().unwrap();
    let assets = common::write_assets(dir.path());
    let pair = ExampleRegistry::with_defaults()
        .lookup("Trim")
        .unwrap()
        .generate(&assets)
        .unwrap();
    let spec = FigureSpec::compute(&pair).unwrap();

    assert_eq!(spec.max_samples, pair.original().num_samples());
    assert_relative_eq!(spec.width_ratios[0], 1.0);
    assert!(spec.width_ratios[1] < 1.0);
}

// === Export ===

#[test]
fn test_export_writes_exactly_three_artifacts() {
    let dir = tempdir().unwrap();
    let config = common::temp_config(dir.path());
    let output_dir = config.output_dir.clone();
    let registry = ExampleRegistry::with_defaults();

    let mut driver = Driver::new(&registry, config);
    let report = driver.run("shift").unwrap();

    assert_eq!(driver.state(), DriverState::Done);
    assert_eq!(
        file_names(&output_dir),
        vec!["Shift.webp", "Shift_input.wav", "Shift_transformed.wav"]
    );
    assert_eq!(report.image.path, output_dir.join("Shift.webp"));
}

#[test]
fn test_exported_audio_round_trips() {
    let dir = tempdir().unwrap();
    let config = common::temp_config(dir.path());
    let registry = ExampleRegistry::with_defaults();
    let pair = registry
        .lookup("AddGaussianNoise")
        .unwrap()
        .generate(&config.assets)
        .unwrap();

    let mut driver = Driver::new(&registry, config.clone());
    let report = driver.run("AddGaussianNoise").unwrap();

    let input = read_wav(&report.input_audio.path).unwrap();
    let transformed = read_wav(&report.transformed_audio.path).unwrap();
    assert!(&input == pair.original());
    assert!(&transformed == pair.transformed());
}

#[test]
fn test_rerun_overwrites_with_identical_artifacts() {
    let dir = tempdir().unwrap();
    let config = common::temp_config(dir.path());
    let registry = ExampleRegistry::with_defaults();

    let first = Driver::new(&registry, config.clone()).run("TimeStretch").unwrap();
    let second = Driver::new(&registry, config).run("TimeStretch").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_unknown_transform_writes_nothing() {
    let dir = tempdir().unwrap();
    let config = common::temp_config(dir.path());
    let output_dir = config.output_dir.clone();
    let registry = ExampleRegistry::with_defaults();

    let mut driver = Driver::new(&registry, config);
    assert!(driver.run("Reverse").is_err());
    assert_eq!(driver.state(), DriverState::Rejected);
    assert!(!output_dir.exists());
}
