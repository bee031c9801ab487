//! Audio Engine Module
//!
//! Core audio types and file handling:
//! - Audio buffer and pair types
//! - WAV import/export
//! - Reference clip synthesis

pub mod buffer;
pub mod io;

pub use buffer::{db_to_linear, linear_to_db, AudioBuffer, AudioPair};
pub use io::{
    generate_test_tone, load_audio, read_wav, synthesize_background, synthesize_speech,
    write_wav,
};
