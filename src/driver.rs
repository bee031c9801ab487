//! Pipeline driver
//!
//! Runs one documentation example end to end: resolve the requested name,
//! generate the audio pair, render the figure and export the artifacts.
//! Stages run strictly in order and the first failure ends the run.

use std::fmt;

use tracing::{debug, info};

use crate::config::DocsConfig;
use crate::error::Result;
use crate::export::{ArtifactExporter, ExportReport};
use crate::registry::ExampleRegistry;
use crate::render::render_comparison;

/// Pipeline stage reached by a driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriverState {
    /// Nothing has run yet
    #[default]
    Idle,
    /// The requested name matched a registered example
    Resolved,
    /// The audio pair has been produced
    Generated,
    /// The comparison figure has been drawn
    Rendered,
    /// All artifacts have been written
    Exported,
    /// The run completed
    Done,
    /// The requested name is not registered
    Rejected,
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverState::Idle => write!(f, "Idle"),
            DriverState::Resolved => write!(f, "Resolved"),
            DriverState::Generated => write!(f, "Generated"),
            DriverState::Rendered => write!(f, "Rendered"),
            DriverState::Exported => write!(f, "Exported"),
            DriverState::Done => write!(f, "Done"),
            DriverState::Rejected => write!(f, "Rejected"),
        }
    }
}

/// Runs examples from a registry against one configuration
#[derive(Debug)]
pub struct Driver<'a> {
    registry: &'a ExampleRegistry,
    config: DocsConfig,
    exporter: ArtifactExporter,
    history: Vec<DriverState>,
}

impl<'a> Driver<'a> {
    pub fn new(registry: &'a ExampleRegistry, config: DocsConfig) -> Self {
        let exporter = ArtifactExporter::new(config.output_dir.clone());
        Self {
            registry,
            config,
            exporter,
            history: vec![DriverState::Idle],
        }
    }

    /// Current state
    pub fn state(&self) -> DriverState {
        self.history.last().copied().unwrap_or_default()
    }

    /// Every state visited, starting with `Idle`
    pub fn history(&self) -> &[DriverState] {
        &self.history
    }

    /// Paths this driver reads from and writes to
    pub fn config(&self) -> &DocsConfig {
        &self.config
    }

    /// Generate, render and export the example registered as `name`
    ///
    /// An unknown name moves the driver to `Rejected` before anything is
    /// generated or written.
    pub fn run(&mut self, name: &str) -> Result<ExportReport> {
        let descriptor = match self.registry.lookup(name) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                self.transition(DriverState::Rejected);
                return Err(e);
            }
        };
        let identifier = descriptor.identifier().to_string();
        self.transition(DriverState::Resolved);

        info!("generating example for {}", identifier);
        let pair = descriptor.generate(&self.config.assets)?;
        self.transition(DriverState::Generated);

        let figure = render_comparison(&pair)?;
        self.transition(DriverState::Rendered);

        let report = self.exporter.export(figure, &pair, &identifier)?;
        self.transition(DriverState::Exported);

        self.transition(DriverState::Done);
        info!(
            "{} artifacts written to {}",
            identifier,
            self.exporter.output_dir().display()
        );
        Ok(report)
    }

    fn transition(&mut self, next: DriverState) {
        debug!("driver: {} -> {}", self.state(), next);
        self.history.push(next);
    }
}
