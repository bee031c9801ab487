//! CLI Module
//!
//! Command-line interface for waveform-docs. The accepted transform names
//! come from the registry at runtime, so argument validation rejects an
//! unknown name before any pipeline stage runs.

use std::ffi::OsString;

use clap::builder::PossibleValuesParser;
use clap::{CommandFactory, FromArgMatches, Parser};

use crate::registry::ExampleRegistry;

/// Generate before/after documentation artifacts for an audio transform
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "waveform-docs")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Transform to document (case-insensitive)
    #[arg(short, long)]
    pub transform: String,
}

/// The clap command with `--transform` restricted to registered names
pub fn build_command(registry: &ExampleRegistry) -> clap::Command {
    let names: Vec<String> = registry.enumerate().into_iter().map(String::from).collect();
    Cli::command().mut_arg("transform", |arg| {
        arg.value_parser(PossibleValuesParser::new(names))
            .ignore_case(true)
    })
}

/// Parse `args` (including the program name) against `registry`
pub fn parse_from<I, T>(registry: &ExampleRegistry, args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_command(registry).try_get_matches_from(args)?;
    Cli::from_arg_matches(&matches)
}
