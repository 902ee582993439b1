//! Settings structures for the Cortex Search action

use crate::params::ParamSource;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main settings structure, loaded from `cortex-search.yml`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub resolver: ResolverSettings,
    pub executor: ExecutorSettings,
    pub output: OutputSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables (CORTEX_SEARCH_* prefix and runner flags)
    pub fn merge_env(&mut self, env: &dyn ParamSource) {
        if let Some(val) = env.get("CORTEX_SEARCH_COMMAND") {
            let command: Vec<String> = val.split_whitespace().map(str::to_string).collect();
            self.executor.command = if command.is_empty() {
                None
            } else {
                Some(command)
            };
        }
        if let Some(val) = env.get("CORTEX_SEARCH_OUTPUT") {
            if !val.trim().is_empty() {
                self.output.name = val.trim().to_string();
            }
        }
        if let Some(val) = env.get("CORTEX_SEARCH_LOG_LEVEL") {
            if !val.trim().is_empty() {
                self.logging.level = val.trim().to_string();
            }
        }
        // Set by the runner when step debug logging is enabled
        if env.get("RUNNER_DEBUG").as_deref() == Some("1") {
            self.logging.level = "debug".to_string();
        }
    }
}

/// Messages used when a required parameter is missing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResolverSettings {
    /// Reported when neither `service-name` nor SEARCH_SERVICE is set
    pub missing_service_message: String,
    /// Reported when neither `query` nor SEARCH_QUERY is set
    pub missing_query_message: String,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            missing_service_message: "Missing Cortex Search service name - provide `service-name` input or set SEARCH_SERVICE.".to_string(),
            missing_query_message: "Missing Cortex Search query - provide `query` input or set SEARCH_QUERY.".to_string(),
        }
    }
}

/// Search collaborator settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExecutorSettings {
    /// Program and arguments of the search command (none = dry run)
    pub command: Option<Vec<String>>,
}

/// Output channel settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputSettings {
    /// Name of the output receiving the compact result JSON
    pub name: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            name: "result-json".to_string(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    /// Maximum level: error, warn, info, debug or trace
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
