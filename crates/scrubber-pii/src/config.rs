//! Scrubber configuration
//!
//! Loaded from YAML or TOML, then overridden by `SCRUBBER_*` environment
//! variables and finally by command-line flags.

use crate::detector::DetectorConfig;
use crate::error::{Error, Result};
use crate::resolver::ResolutionPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrubberConfig {
    #[serde(default)]
    pub detectors: DetectorConfig,

    #[serde(default)]
    pub resolution: ResolutionPolicy,

    #[serde(default)]
    pub min_confidence: f32,

    #[serde(default)]
    pub batch: BatchConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Skip and report bad records instead of aborting the run
    #[serde(default = "default_true")]
    pub continue_on_error: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            continue_on_error: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ScrubberConfig {
    /// Load configuration from a YAML or TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        let config: Self = if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml::from_str(&contents).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))?
        } else {
            // Default to YAML
            serde_yaml::from_str(&contents)
                .map_err(|e| Error::Config(format!("Invalid YAML: {}", e)))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Merge environment variables into config (env vars take precedence)
    pub fn merge_env(&mut self) {
        self.merge_vars(|key| std::env::var(key).ok());
    }

    fn merge_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(level) = var("SCRUBBER_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Some(val) = var("SCRUBBER_RESOLUTION") {
            match val.parse() {
                Ok(policy) => self.resolution = policy,
                Err(e) => eprintln!("Warning: {}, keeping '{}'", e, self.resolution),
            }
        }

        if let Some(val) = var("SCRUBBER_MIN_CONFIDENCE") {
            match val.parse::<f32>() {
                Ok(min) if (0.0..=1.0).contains(&min) => self.min_confidence = min,
                _ => eprintln!(
                    "Warning: Invalid SCRUBBER_MIN_CONFIDENCE '{}', keeping {}",
                    val, self.min_confidence
                ),
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(Error::Config(format!(
                "min_confidence must be between 0 and 1, got {}",
                self.min_confidence
            )));
        }

        for pattern in &self.detectors.custom_patterns {
            if !(0.0..=1.0).contains(&pattern.confidence) {
                return Err(Error::Config(format!(
                    "custom pattern '{}' has confidence {} outside 0..=1",
                    pattern.name, pattern.confidence
                )));
            }
        }

        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}
