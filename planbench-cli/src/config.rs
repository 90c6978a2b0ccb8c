//! Configuration loading from planbench.toml
//!
//! PlanBench configuration can be specified in a `planbench.toml` file in the project root.
//! The configuration is automatically discovered by walking up from the current directory.
//! Command line flags take precedence over file values.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file
pub const CONFIG_FILE: &str = "planbench.toml";

/// PlanBench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlanBenchConfig {
    /// Runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Runner configuration for benchmark execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Repetitions per algorithm when the request does not say otherwise
    #[serde(default = "default_average_count")]
    pub default_average_count: usize,
    /// Show a progress bar while trials run
    #[serde(default = "default_progress")]
    pub progress: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            default_average_count: default_average_count(),
            progress: default_progress(),
        }
    }
}

fn default_average_count() -> usize {
    1
}
fn default_progress() -> bool {
    true
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Report format: "log" or "json"
    #[serde(default = "default_format")]
    pub format: String,
    /// Output directory for reports
    #[serde(default = "default_output_dir")]
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            directory: default_output_dir(),
        }
    }
}

fn default_format() -> String {
    "log".to_string()
}
fn default_output_dir() -> String {
    ".".to_string()
}

impl PlanBenchConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let dir = std::env::current_dir().ok()?;
        Self::discover_from(&dir)
    }

    /// Walk up from `start` looking for a configuration file
    pub fn discover_from(start: &Path) -> Option<Self> {
        let mut dir = start.to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE);
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => Some(config),
                    Err(e) => {
                        tracing::warn!("Ignoring {}: {}", config_path.display(), e);
                        None
                    }
                };
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# PlanBench Configuration

[runner]
# Repetitions per algorithm unless the request overrides it
default_average_count = 1
# Show a progress bar while trials run
progress = true

[output]
# Report format: log or json
format = "log"
# Output directory for reports
directory = "."
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = PlanBenchConfig::default();
        assert_eq!(config.runner.default_average_count, 1);
        assert!(config.runner.progress);
        assert_eq!(config.output.format, "log");
        assert_eq!(config.output.directory, ".");
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            [runner]
            default_average_count = 10

            [output]
            directory = "reports"
        "#;

        let config: PlanBenchConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.runner.default_average_count, 10);
        assert_eq!(config.output.directory, "reports");
        // Defaults should still apply
        assert!(config.runner.progress);
        assert_eq!(config.output.format, "log");
    }

    #[test]
    fn test_default_toml_parses() {
        let default_toml = PlanBenchConfig::default_toml();
        let config: PlanBenchConfig = toml::from_str(&default_toml).unwrap();
        assert_eq!(config.runner.default_average_count, 1);
    }

    #[test]
    fn test_discover_walks_up() {
        let root = TempDir::new().unwrap();
        std::fs::write(
            root.path().join(CONFIG_FILE),
            "[runner]\ndefault_average_count = 4\n",
        )
        .unwrap();
        let nested = root.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        let config = PlanBenchConfig::discover_from(&nested).unwrap();
        assert_eq!(config.runner.default_average_count, 4);
    }
}
