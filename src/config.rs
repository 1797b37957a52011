//! Benchmark harness configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::{Error, Result};

/// Default number of slowest queries to report.
const DEFAULT_TOP_N: usize = 10;

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

impl OutputFormat {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(Error::Config(format!("unknown output format: {}", s))),
        }
    }
}

/// Configuration for a benchmark run.
///
/// Every field has a default, so a YAML file only needs the keys it wants
/// to change:
///
/// ```yaml
/// top_n: 20
/// iterations: 3
/// format: json
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Number of slowest queries to keep in the report
    pub top_n: usize,
    /// Passes over the address list
    pub iterations: usize,
    /// Run one untimed pass before measuring
    pub warmup: bool,
    /// Report output format
    pub format: OutputFormat,
    /// Build the index with the sharded parallel build
    pub parallel_build: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            iterations: 1,
            warmup: true,
            format: OutputFormat::Text,
            parallel_build: false,
        }
    }
}

impl HarnessConfig {
    /// Parse a configuration from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a YAML file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Check that the values make sense together.
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(Error::Config("iterations must be at least 1".to_string()));
        }
        if self.parallel_build && !cfg!(feature = "parallel") {
            return Err(Error::Config(
                "parallel_build requires the `parallel` feature".to_string(),
            ));
        }
        Ok(())
    }
}
