//! Fixtures

use std::{fs, path::PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::deals::Deal;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// Deals fixture file
#[derive(Debug, Deserialize)]
struct DealsFixture {
    #[serde(default)]
    deals: Vec<Deal>,
}

/// Deals loaded from YAML fixture files
#[derive(Debug, Default)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Deals in load order
    deals: Vec<Deal>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            deals: Vec::new(),
        }
    }

    /// Load deals from `deals/<name>.yml` under the base path, appending them to any
    /// already loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("deals").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: DealsFixture = serde_norway::from_str(&contents)?;

        self.deals.extend(fixture.deals);

        Ok(self)
    }

    /// Loaded deals
    pub fn deals(&self) -> &[Deal] {
        &self.deals
    }

    /// Take the loaded deals
    pub fn into_deals(self) -> Vec<Deal> {
        self.deals
    }
}
