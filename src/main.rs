//! waveform-docs CLI
//!
//! Generates the documentation example for a single transform.

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use waveform_docs::{cli, DocsConfig, DocsError, Driver, ExampleRegistry};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let registry = ExampleRegistry::with_defaults();
    let cli = cli::parse_from(&registry, std::env::args_os()).unwrap_or_else(|e| e.exit());

    info!("waveform-docs v{}", env!("CARGO_PKG_VERSION"));

    let mut driver = Driver::new(&registry, DocsConfig::fixed());
    info!("output directory: {}", driver.config().output_dir.display());
    let report = driver.run(&cli.transform).map_err(|e| {
        report_failure(&e);
        e
    });
    let report =
        report.with_context(|| format!("could not document transform '{}'", cli.transform))?;

    for artifact in report.artifacts() {
        println!("{}", artifact.path.display());
    }
    Ok(())
}

fn report_failure(err: &DocsError) {
    error!(code = err.error_code(), category = ?err.category(), "{}", err);
    for suggestion in err.recovery_suggestions() {
        info!("hint: {}", suggestion);
    }
}
