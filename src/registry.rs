//! Example registry
//!
//! Maps transform identifiers to the recipe that produces their
//! documentation example. Built once at startup and read-only afterwards.

use std::fmt;
use std::sync::Arc;

use crate::config::ReferenceAssets;
use crate::engine::AudioPair;
use crate::error::{DocsError, Result};
use crate::recipes;

/// A recipe producing the (original, transformed) pair for one transform
pub type Generator = Arc<dyn Fn(&ReferenceAssets) -> Result<AudioPair> + Send + Sync>;

/// Registered example: identifier plus its generator
#[derive(Clone)]
pub struct ExampleDescriptor {
    identifier: String,
    generator: Generator,
}

impl ExampleDescriptor {
    /// Identifier as registered (original casing)
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Run the recipe against `assets`
    pub fn generate(&self, assets: &ReferenceAssets) -> Result<AudioPair> {
        (self.generator)(assets)
    }
}

impl fmt::Debug for ExampleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExampleDescriptor")
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}

/// Registry of example generators, in registration order
#[derive(Debug, Clone, Default)]
pub struct ExampleRegistry {
    entries: Vec<ExampleDescriptor>,
}

impl ExampleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in recipe
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register("AddBackgroundNoise", recipes::add_background_noise);
        registry.register("AddGaussianNoise", recipes::add_gaussian_noise);
        registry.register("RoomSimulator", recipes::room_simulator);
        registry.register("SevenBandParametricEQ", recipes::seven_band_parametric_eq);
        registry.register("Shift", recipes::shift);
        registry.register("TanhDistortion", recipes::tanh_distortion);
        registry.register("TimeStretch", recipes::time_stretch);
        registry.register("Trim", recipes::trim);

        registry
    }

    /// Register a generator under `identifier`
    ///
    /// An identifier that matches an existing one (ignoring ASCII case)
    /// replaces that entry in place.
    pub fn register<F>(&mut self, identifier: &str, generator: F)
    where
        F: Fn(&ReferenceAssets) -> Result<AudioPair> + Send + Sync + 'static,
    {
        let descriptor = ExampleDescriptor {
            identifier: identifier.to_string(),
            generator: Arc::new(generator),
        };
        match self.position(identifier) {
            Some(index) => self.entries[index] = descriptor,
            None => self.entries.push(descriptor),
        }
    }

    /// Find the descriptor for `name`, ignoring ASCII case
    pub fn lookup(&self, name: &str) -> Result<&ExampleDescriptor> {
        self.position(name)
            .map(|index| &self.entries[index])
            .ok_or_else(|| DocsError::UnknownTransform {
                name: name.to_string(),
                available: self.enumerate().iter().map(|s| s.to_string()).collect(),
            })
    }

    /// All identifiers in registration order
    pub fn enumerate(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.identifier.as_str()).collect()
    }

    /// Check if `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.identifier.eq_ignore_ascii_case(name))
    }
}
